/*!
 * Delivery of the assembled document and the summary notification
 */

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::clipboard::{Clipboard, SystemClipboard};
use crate::config::{Config, Destination};
use crate::error::{FilesCopierError, Result};
use crate::utils::files_noun;

/// Destination of the final text
pub trait Sink {
    /// Deliver `text`, replacing whatever the destination held before
    fn deliver(&mut self, text: &str) -> Result<()>;

    /// Short description used in messages
    fn describe(&self) -> String;
}

/// Writes to the system clipboard
pub struct ClipboardSink<C = SystemClipboard> {
    clipboard: Option<C>,
}

impl ClipboardSink<SystemClipboard> {
    /// Use the platform clipboard; a missing helper only fails at delivery
    pub fn system() -> Self {
        match SystemClipboard::detect() {
            Ok(clipboard) => Self {
                clipboard: Some(clipboard),
            },
            Err(e) => {
                debug!("No clipboard available: {}", e);
                Self { clipboard: None }
            }
        }
    }
}

impl<C: Clipboard> ClipboardSink<C> {
    pub fn new(clipboard: C) -> Self {
        Self {
            clipboard: Some(clipboard),
        }
    }
}

impl<C: Clipboard> Sink for ClipboardSink<C> {
    fn deliver(&mut self, text: &str) -> Result<()> {
        let clipboard = self
            .clipboard
            .as_ref()
            .ok_or(crate::clipboard::ClipboardError::NoClipboardFound)?;
        clipboard.copy_to_clipboard(text)?;
        Ok(())
    }

    fn describe(&self) -> String {
        "clipboard".to_string()
    }
}

/// Writes to any `io::Write`, standard output by default
pub struct WriterSink<W> {
    writer: W,
    name: String,
}

impl WriterSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self {
            writer: io::stdout(),
            name: "stdout".to_string(),
        }
    }
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W, name: impl Into<String>) -> Self {
        Self {
            writer,
            name: name.into(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Sink for WriterSink<W> {
    fn deliver(&mut self, text: &str) -> Result<()> {
        self.writer.write_all(text.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

/// Replaces the content of a file
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Sink for FileSink {
    fn deliver(&mut self, text: &str) -> Result<()> {
        fs::write(&self.path, text).map_err(|e| {
            FilesCopierError::Sink(format!("Failed to write {}: {}", self.path.display(), e))
        })?;
        info!("Wrote {} bytes to {}", text.len(), self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Build the sink selected by `config`
pub fn sink_for(config: &Config) -> Result<Box<dyn Sink>> {
    let sink: Box<dyn Sink> = match config.destination {
        Destination::Clipboard => Box::new(ClipboardSink::system()),
        Destination::Stdout => Box::new(WriterSink::stdout()),
        Destination::File => {
            let path = config.output_file.clone().ok_or_else(|| {
                FilesCopierError::Config("--to file requires --output <FILE>".to_string())
            })?;
            Box::new(FileSink::new(path))
        }
    };

    Ok(sink)
}

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Information,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Information => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Fire-and-forget user notification
pub trait Notifier {
    fn notify(&self, message: &str, severity: Severity);
}

/// Prints notifications to standard error
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Information => eprintln!("{}", message),
            other => eprintln!("{}: {}", other, message),
        }
    }
}

/// Discards notifications
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _message: &str, _severity: Severity) {}
}

/// Message shown after copying `file_count` files to the clipboard
pub fn summary_message(file_count: usize) -> String {
    if file_count > 0 {
        format!("{} {} copied to clipboard!", file_count, files_noun(file_count))
    } else {
        "No files found to copy.".to_string()
    }
}

/// Message shown after delivering `file_count` files to `destination`
pub fn delivery_message(file_count: usize, destination: Destination, target: &str) -> String {
    match destination {
        Destination::Clipboard => summary_message(file_count),
        _ if file_count == 0 => "No files found to copy.".to_string(),
        _ => format!("{} {} written to {}.", file_count, files_noun(file_count), target),
    }
}

/// Deliver `text` and notify about the outcome
///
/// A failed delivery is reported through `notifier` and returned; the caller
/// still owns `text` and may fall back to another sink.
pub fn deliver_and_notify(
    sink: &mut dyn Sink,
    notifier: &dyn Notifier,
    destination: Destination,
    text: &str,
    file_count: usize,
) -> Result<()> {
    match sink.deliver(text) {
        Ok(()) => {
            let message = delivery_message(file_count, destination, &sink.describe());
            notifier.notify(&message, Severity::Information);
            Ok(())
        }
        Err(e) => {
            warn!("Delivery to {} failed: {}", sink.describe(), e);
            notifier.notify(
                &format!("Could not write to {}: {}", sink.describe(), e),
                Severity::Error,
            );
            Err(e)
        }
    }
}
