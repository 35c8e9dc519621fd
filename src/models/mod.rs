pub mod image_format;
pub mod options;
pub mod page;
pub mod range;

pub use image_format::InputKind;
pub use options::{ProcessingOptions, Quality};
pub use page::{ImagePayload, Page, PageId, PageStatus};
pub use range::PageRange;
