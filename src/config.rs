/*!
 * Configuration handling for filescopier
 */

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use clap_complete::Shell;

use crate::error::Result;
use crate::utils::absolutize;
use crate::{bail, ensure};

/// How each file header is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum HeaderStyle {
    /// `### path` followed by a fenced code block with a language hint
    #[default]
    Markdown,
    /// `[path]` followed by the raw content
    Bracket,
}

/// Which files are rejected before formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FilterMode {
    /// Skip dotfiles, backup files ending in `~` and `.DS_Store`
    #[default]
    Strict,
    /// Accept every file
    Permissive,
}

/// Whether a file reachable through several selected roots is emitted once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DedupPolicy {
    /// Emit each canonical path at most once
    #[default]
    On,
    /// Emit a file once per path it was reached through
    Off,
}

/// Where the assembled text goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Destination {
    /// System clipboard
    #[default]
    Clipboard,
    /// Standard output
    Stdout,
    /// A file given with --output
    File,
}

/// Ready-made combinations of header, filter and dedup settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Preset {
    /// Bracket headers, every file, no deduplication
    Plain,
    /// Markdown headers with language hints, strict filtering, deduplication
    #[default]
    Annotated,
}

impl Preset {
    fn settings(self) -> (HeaderStyle, FilterMode, DedupPolicy) {
        match self {
            Self::Plain => (HeaderStyle::Bracket, FilterMode::Permissive, DedupPolicy::Off),
            Self::Annotated => (HeaderStyle::Markdown, FilterMode::Strict, DedupPolicy::On),
        }
    }
}

/// Command-line arguments for filescopier
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "filescopier",
    version = env!("CARGO_PKG_VERSION"),
    about = "Copy the contents of files and directories to the clipboard",
    long_about = "Collects the contents of the given files, descending into directories breadth-first, and concatenates them into one document with a header per file. The document replaces the clipboard content unless another destination is chosen."
)]
pub struct Args {
    /// Files and directories to collect
    pub paths: Vec<String>,

    /// Project base path; headers show file paths relative to it
    #[clap(long)]
    pub base: Option<String>,

    /// Preset combination of header, filter and dedup settings
    #[clap(long, value_enum, default_value_t = Preset::default())]
    pub preset: Preset,

    /// Header style (overrides the preset)
    #[clap(long, value_enum)]
    pub header: Option<HeaderStyle>,

    /// Filtering mode (overrides the preset)
    #[clap(long, value_enum)]
    pub filter: Option<FilterMode>,

    /// Deduplicate files reached through overlapping selections (overrides the preset)
    #[clap(long, value_enum)]
    pub dedup: Option<DedupPolicy>,

    /// Where to write the result
    #[clap(long = "to", value_enum, default_value_t = Destination::default())]
    pub destination: Destination,

    /// Output file, required with `--to file`
    #[clap(long, short)]
    pub output: Option<String>,

    /// Comma-separated list of file name patterns to skip
    #[clap(long, value_delimiter = ',')]
    pub ignore: Vec<String>,

    /// Replace invalid UTF-8 instead of emitting a read failure placeholder
    #[clap(long)]
    pub lossy: bool,

    /// Replace the content of files larger than this many bytes with a note
    #[clap(long, value_name = "BYTES")]
    pub max_file_size: Option<u64>,

    /// Suppress the report and the summary message
    #[clap(long, short)]
    pub quiet: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[clap(long, short, action = ArgAction::Count)]
    pub verbose: u8,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Selected files and directories, in order
    pub paths: Vec<PathBuf>,

    /// Base path stripped from displayed file paths
    pub base_path: PathBuf,

    /// Header style of each fragment
    pub header_style: HeaderStyle,

    /// Default-deny rules on or off
    pub filter_mode: FilterMode,

    /// Deduplication of overlapping selections
    pub dedup: DedupPolicy,

    /// Destination of the assembled text
    pub destination: Destination,

    /// Output path for `Destination::File`
    pub output_file: Option<PathBuf>,

    /// File name patterns to skip
    pub ignore_patterns: Vec<String>,

    /// Decode invalid UTF-8 lossily
    pub lossy: bool,

    /// Content size limit per file
    pub max_file_size: Option<u64>,

    /// Suppress report and notification
    pub quiet: bool,

    /// Log verbosity
    pub verbosity: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_preset(Preset::default())
    }
}

impl Config {
    /// Configuration reproducing one of the presets, delivering to the clipboard
    pub fn from_preset(preset: Preset) -> Self {
        let (header_style, filter_mode, dedup) = preset.settings();
        Self {
            paths: Vec::new(),
            base_path: absolutize(&PathBuf::from(".")),
            header_style,
            filter_mode,
            dedup,
            destination: Destination::Clipboard,
            output_file: None,
            ignore_patterns: Vec::new(),
            lossy: false,
            max_file_size: None,
            quiet: false,
            verbosity: 0,
        }
    }

    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        let preset = Self::from_preset(args.preset);
        Self {
            paths: args.paths.into_iter().map(PathBuf::from).collect(),
            base_path: args
                .base
                .map(|base| absolutize(&PathBuf::from(base)))
                .unwrap_or(preset.base_path),
            header_style: args.header.unwrap_or(preset.header_style),
            filter_mode: args.filter.unwrap_or(preset.filter_mode),
            dedup: args.dedup.unwrap_or(preset.dedup),
            destination: args.destination,
            output_file: args.output.map(PathBuf::from),
            ignore_patterns: args.ignore,
            lossy: args.lossy,
            max_file_size: args.max_file_size,
            quiet: args.quiet,
            verbosity: args.verbose,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        match (self.destination, &self.output_file) {
            (Destination::File, None) => {
                bail!(Config, "--to file requires --output <FILE>")
            }
            (Destination::File, Some(path)) => {
                if let Some(parent) = path.parent() {
                    ensure!(
                        parent.as_os_str().is_empty() || parent.exists(),
                        Config,
                        "Output directory not found: {}",
                        parent.display()
                    );
                }
            }
            _ => {}
        }

        if let Some(pattern) = self.ignore_patterns.iter().find(|p| p.is_empty()) {
            bail!(InvalidArgument, "empty ignore pattern {:?}", pattern);
        }

        Ok(())
    }
}
