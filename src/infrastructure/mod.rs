pub mod zip_reader;

pub use zip_reader::{ArchiveEntry, ZipReader};
