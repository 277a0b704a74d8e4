/*!
 * Reporting functionality for filescopier
 *
 * Renders a summary of an aggregation as console tables using the tabled
 * library. Reports go to stderr so they never end up inside the document.
 */

use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::types::{AggregationResult, IncludedFile};
use crate::utils::format_file_size;

/// Number of rows above which only the largest files are listed
const FULL_LISTING_LIMIT: usize = 15;
/// Rows shown when the listing is cut
const TOP_FILES: usize = 10;

/// Statistics for one run
#[derive(Debug, Clone)]
pub struct CopyReport {
    /// Where the document went
    pub destination: String,
    /// Time taken to collect and deliver
    pub duration: Duration,
    /// Number of bytes in the document
    pub output_bytes: usize,
    /// Details for each included file, in output order
    pub file_details: Vec<IncludedFile>,
}

impl CopyReport {
    pub fn new(result: &AggregationResult, destination: impl Into<String>, duration: Duration) -> Self {
        Self {
            destination: destination.into(),
            duration,
            output_bytes: result.text().len(),
            file_details: result.files().to_vec(),
        }
    }

    pub fn total_lines(&self) -> usize {
        self.file_details.iter().map(|f| f.lines).sum()
    }

    pub fn total_chars(&self) -> usize {
        self.file_details.iter().map(|f| f.chars).sum()
    }

    /// Files whose body is a placeholder
    pub fn placeholder_files(&self) -> usize {
        self.file_details.iter().filter(|f| f.placeholder).count()
    }
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for copy results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Generate a report string
    pub fn generate_report(&self, report: &CopyReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
        }
    }

    /// Print the report to stderr
    pub fn print_report(&self, report: &CopyReport) {
        eprintln!("\n{}", self.generate_report(report));
    }

    // Keep the tail of long paths, cut at a separator
    fn format_path(&self, path: &str, max_len: usize) -> String {
        if path.chars().count() <= max_len {
            return path.to_string();
        }

        let mut kept = Vec::new();
        let mut current_len = 3; // "..."
        for part in path.split('/').rev() {
            let part_len = part.chars().count() + 1;
            if current_len + part_len > max_len {
                break;
            }
            kept.push(part);
            current_len += part_len;
        }

        if kept.is_empty() {
            let tail: String = path
                .chars()
                .rev()
                .take(max_len.saturating_sub(3))
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            return format!("...{}", tail);
        }

        kept.reverse();
        format!(".../{}", kept.join("/"))
    }

    fn create_summary_table(&self, report: &CopyReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let mut rows = vec![
            SummaryRow {
                key: "Destination".to_string(),
                value: report.destination.clone(),
            },
            SummaryRow {
                key: "Process Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "Files Copied".to_string(),
                value: self.format_number(report.file_details.len()),
            },
            SummaryRow {
                key: "Output Size".to_string(),
                value: format_file_size(report.output_bytes as u64),
            },
            SummaryRow {
                key: "Total Lines".to_string(),
                value: self.format_number(report.total_lines()),
            },
            SummaryRow {
                key: "Total Chars".to_string(),
                value: self.format_number(report.total_chars()),
            },
        ];

        let placeholders = report.placeholder_files();
        if placeholders > 0 {
            rows.push(SummaryRow {
                key: "Placeholder Files".to_string(),
                value: placeholders.to_string(),
            });
        }

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn create_files_table(&self, report: &CopyReport) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Lines")]
            lines: String,

            #[tabled(rename = "Chars")]
            chars: String,
        }

        let mut files: Vec<&IncludedFile> = report.file_details.iter().collect();
        if files.len() > FULL_LISTING_LIMIT {
            files.sort_by(|a, b| b.chars.cmp(&a.chars));
            files.truncate(TOP_FILES);
        }

        let rows: Vec<FileRow> = files
            .iter()
            .map(|info| FileRow {
                path: if info.placeholder {
                    format!("{} (placeholder)", self.format_path(&info.display_path, 47))
                } else {
                    self.format_path(&info.display_path, 60)
                },
                lines: self.format_number(info.lines),
                chars: self.format_number(info.chars),
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn generate_console_report(&self, report: &CopyReport) -> String {
        let summary_table = self.create_summary_table(report);
        if report.file_details.is_empty() {
            return format!("SUMMARY\n{}", summary_table);
        }

        let files_table = self.create_files_table(report);
        let files_title = if report.file_details.len() > FULL_LISTING_LIMIT {
            "TOP 10 LARGEST FILES BY CHARACTER COUNT"
        } else {
            "COPIED FILES"
        };

        format!(
            "{}\n{}\n\nSUMMARY\n{}",
            files_title, files_table, summary_table
        )
    }
}
