/*!
 * Command-line interface for filescopier
 */

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};

use filescopier::config::{Args, Config, Destination};
use filescopier::logging::init_logging;
use filescopier::report::{CopyReport, ReportFormat, Reporter};
use filescopier::sink::{
    deliver_and_notify, sink_for, ConsoleNotifier, Notifier, Severity, SilentNotifier, Sink,
    WriterSink,
};
use filescopier::types::AggregationRequest;
use filescopier::Aggregator;

fn main() -> io::Result<()> {
    let args = Args::parse();

    if let Some(shell) = args.generate {
        let mut command = Args::command();
        let name = command.get_name().to_string();
        clap_complete::generate(shell, &mut command, name, &mut io::stdout());
        return Ok(());
    }

    let config = Config::from_args(args);
    init_logging(config.verbosity);
    config.validate()?;

    info!(
        "Collecting {} path(s) relative to {}",
        config.paths.len(),
        config.base_path.display()
    );

    let progress = if config.quiet {
        ProgressBar::hidden()
    } else {
        let progress = ProgressBar::new_spinner();
        progress.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {prefix:.bold.cyan} {pos} files {wide_msg:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        progress.set_prefix("Collecting");
        progress.enable_steady_tick(Duration::from_millis(100));
        progress
    };

    let start_time = Instant::now();

    let request = AggregationRequest::from_paths(&config.paths, &config.base_path);
    let result = Aggregator::new(&config)
        .with_progress(Arc::new(progress.clone()))
        .aggregate(request);

    progress.finish_and_clear();

    let notifier: Box<dyn Notifier> = if config.quiet {
        Box::new(SilentNotifier)
    } else {
        Box::new(ConsoleNotifier)
    };

    let mut sink = sink_for(&config)?;
    let mut destination = sink.describe();
    let delivered = deliver_and_notify(
        sink.as_mut(),
        notifier.as_ref(),
        config.destination,
        result.text(),
        result.file_count(),
    );

    if let Err(e) = delivered {
        if config.destination != Destination::Clipboard {
            return Err(e.into());
        }

        // The document is still valid; hand it over on stdout instead
        error!("Clipboard unavailable, writing to stdout: {}", e);
        let mut fallback = WriterSink::stdout();
        fallback.deliver(result.text())?;
        destination = fallback.describe();
        notifier.notify(
            "Clipboard unavailable; the content was written to stdout instead.",
            Severity::Warning,
        );
    }

    if !config.quiet {
        let report = CopyReport::new(&result, destination, start_time.elapsed());
        Reporter::new(ReportFormat::ConsoleTable).print_report(&report);
    }

    Ok(())
}
