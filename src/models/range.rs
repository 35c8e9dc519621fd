use std::fmt;

/// 导入后默认选中的最大页数
pub const DEFAULT_RANGE_SIZE: usize = 10;

/// 页码范围（从 1 开始，首尾都包含）
///
/// 只能通过夹取构造，保证 `1 <= start <= end <= total`（total 为 0 时退化为 `[1, 1]`）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    start: usize,
    end: usize,
}

impl PageRange {
    /// 将用户输入夹取到 `[1, total]` 内
    pub fn clamped(start: usize, end: usize, total: usize) -> Self {
        let upper = total.max(1);
        let start = start.clamp(1, upper);
        let end = end.clamp(start, upper);
        Self { start, end }
    }

    /// 导入后的默认范围 `[1, min(total, 10)]`
    pub fn initial(total: usize) -> Self {
        Self::clamped(1, total.min(DEFAULT_RANGE_SIZE), total)
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// 范围内的页数
    pub fn page_count(&self) -> usize {
        self.end - self.start + 1
    }

    /// 对应的 0 基下标区间
    pub fn indices(&self) -> std::ops::Range<usize> {
        (self.start - 1)..self.end
    }

    /// 按新的页面总数重新夹取
    pub fn reclamp(self, total: usize) -> Self {
        Self::clamped(self.start, self.end, total)
    }
}

impl Default for PageRange {
    fn default() -> Self {
        Self { start: 1, end: 1 }
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_keeps_valid_input() {
        let range = PageRange::clamped(2, 3, 5);
        assert_eq!((range.start(), range.end()), (2, 3));
        assert_eq!(range.indices(), 1..3);
        assert_eq!(range.page_count(), 2);
    }

    #[test]
    fn test_clamped_fixes_out_of_bounds() {
        assert_eq!(PageRange::clamped(0, 99, 5), PageRange::clamped(1, 5, 5));
        // end 小于 start 时收拢到 start
        let range = PageRange::clamped(4, 2, 5);
        assert_eq!((range.start(), range.end()), (4, 4));
        let range = PageRange::clamped(9, 12, 5);
        assert_eq!((range.start(), range.end()), (5, 5));
    }

    #[test]
    fn test_initial_caps_at_ten() {
        let range = PageRange::initial(37);
        assert_eq!((range.start(), range.end()), (1, 10));
        let range = PageRange::initial(4);
        assert_eq!((range.start(), range.end()), (1, 4));
        let range = PageRange::initial(0);
        assert_eq!((range.start(), range.end()), (1, 1));
    }
}
