/*!
 * filescopier - Copy the contents of selected files to the clipboard
 *
 * Walks a selection of files and directories breadth-first, keeps the files
 * the inclusion policy accepts, and concatenates them into one document with
 * a header per file. The document is then handed to a sink: the system
 * clipboard, standard output or a file.
 */

pub mod aggregator;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod filter;
pub mod formatter;
pub mod logging;
pub mod report;
pub mod scanner;
pub mod sink;
pub mod types;
pub mod utils;


pub use aggregator::Aggregator;
pub use config::{Config, DedupPolicy, Destination, FilterMode, HeaderStyle, Preset};
pub use error::{FilesCopierError, Result};
pub use formatter::{language_hint, relative_path, Formatter, Fragment};
pub use report::{CopyReport, ReportFormat, Reporter};
pub use scanner::{traverse, Traversal};
pub use sink::{summary_message, Notifier, Severity, Sink};
pub use types::{AggregationRequest, AggregationResult, Entry, FsEntry, IncludedFile};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Collect `config.paths` relative to `config.base_path`
pub fn collect(config: &Config) -> AggregationResult {
    let request = AggregationRequest::from_paths(&config.paths, &config.base_path);
    Aggregator::new(config).aggregate(request)
}
