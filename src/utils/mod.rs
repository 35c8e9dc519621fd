pub mod logging;
pub mod natural_sort;

pub use natural_sort::{natural_cmp, sort_natural};
