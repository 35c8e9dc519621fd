pub mod archive_ingestor;
pub mod exporter;
pub mod log_sink;
pub mod page_registry;
pub mod result_saver;

pub use archive_ingestor::ArchiveIngestor;
pub use exporter::{build_zip, export_zip};
pub use log_sink::{LogEntry, LogSink, Severity, LOG_CAPACITY};
pub use page_registry::PageRegistry;
pub use result_saver::{DirectorySaver, ResultSaver};
