//! 自然排序
//!
//! 数字片段按数值比较，其余字符逐个忽略大小写比较，
//! 使 "2.jpg" 排在 "10.jpg" 之前。
//! 标点和空白排在数字之前，字母排在数字之后，所以 "cover.jpg" 排在 "cover2.jpg" 之前

use regex::Regex;
use std::cmp::Ordering;
use std::sync::OnceLock;

fn token_regex() -> &'static Regex {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    TOKEN_RE.get_or_init(|| Regex::new(r"[0-9]+|[^0-9]").expect("合法的正则表达式"))
}

/// 比较两个文件名
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = token_regex().find_iter(a).map(|m| m.as_str());
    let mut right = token_regex().find_iter(b).map(|m| m.as_str());

    loop {
        match (left.next(), right.next()) {
            (Some(x), Some(y)) => {
                let ordering = compare_tokens(x, y);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (None, None) => break,
        }
    }

    // 仅大小写或前导零不同时，保持确定的顺序
    a.cmp(b)
}

/// 原地自然排序
pub fn sort_natural<T>(items: &mut [T], key: impl Fn(&T) -> &str) {
    items.sort_by(|a, b| natural_cmp(key(a), key(b)));
}

fn compare_tokens(x: &str, y: &str) -> Ordering {
    match (is_number(x), is_number(y)) {
        (true, true) => {
            let x_digits = x.trim_start_matches('0');
            let y_digits = y.trim_start_matches('0');
            x_digits
                .len()
                .cmp(&y_digits.len())
                .then_with(|| x_digits.cmp(y_digits))
        }
        (false, false) => x.to_lowercase().cmp(&y.to_lowercase()),
        (true, false) if sorts_before_digits(y) => Ordering::Greater,
        (true, false) => Ordering::Less,
        (false, true) if sorts_before_digits(x) => Ordering::Less,
        (false, true) => Ordering::Greater,
    }
}

fn is_number(token: &str) -> bool {
    token.as_bytes()[0].is_ascii_digit()
}

/// 标点、空白等非字母数字字符
fn sorts_before_digits(token: &str) -> bool {
    !token.chars().next().is_some_and(char::is_alphanumeric)
}
