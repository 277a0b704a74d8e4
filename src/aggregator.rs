/*!
 * Content aggregation: traversal, filtering and formatting in one pass
 */

use std::sync::Arc;

use indicatif::ProgressBar;
use tracing::{debug, info};

use crate::config::{Config, DedupPolicy, FilterMode};
use crate::filter::FilterPolicy;
use crate::formatter::Formatter;
use crate::scanner::traverse;
use crate::types::{AggregationRequest, AggregationResult, Entry, IncludedFile};

/// Builds one document out of a selection of files and directories
pub struct Aggregator {
    formatter: Formatter,
    filter_mode: FilterMode,
    dedup: DedupPolicy,
    ignore_patterns: Vec<String>,
    progress: Option<Arc<ProgressBar>>,
}

impl Aggregator {
    /// Create an aggregator from the filter and format settings of `config`
    pub fn new(config: &Config) -> Self {
        Self {
            formatter: Formatter::from_config(config),
            filter_mode: config.filter_mode,
            dedup: config.dedup,
            ignore_patterns: config.ignore_patterns.clone(),
            progress: None,
        }
    }

    /// Tick `progress` once per included file
    pub fn with_progress(mut self, progress: Arc<ProgressBar>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Run one aggregation
    ///
    /// Fragments appear in traversal order. The visited set used for
    /// deduplication is created here and dropped when this returns.
    pub fn aggregate<E: Entry>(&self, request: AggregationRequest<E>) -> AggregationResult {
        let mut policy = FilterPolicy::new(
            self.filter_mode,
            self.dedup,
            self.ignore_patterns.clone(),
        );
        let mut text = String::new();
        let mut files = Vec::new();

        debug!(
            "Aggregating {} root(s) relative to {}",
            request.roots.len(),
            request.base_path.display()
        );

        for file in traverse(request.roots) {
            if !policy.is_included(&file) {
                continue;
            }

            let fragment = self.formatter.format(&file, &request.base_path);
            if let Some(progress) = &self.progress {
                progress.inc(1);
                progress.set_message(fragment.display_path.clone());
            }

            text.push_str(&fragment.text);
            files.push(IncludedFile {
                lines: fragment.body.lines().count(),
                chars: fragment.body.chars().count(),
                placeholder: fragment.placeholder,
                display_path: fragment.display_path,
            });
        }

        info!("Aggregated {} file(s), {} bytes", files.len(), text.len());
        AggregationResult::new(text, files)
    }
}
