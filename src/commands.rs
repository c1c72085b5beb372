//! Delta run orchestration for the csvdelta CLI

use crate::change_detection::{ChangeSet, DeltaClassifier};
use crate::cli::Cli;
use crate::data::SnapshotReader;
use crate::error::Result;
use crate::output::{DeltaWriter, JsonFormatter, PrettyPrinter, RunSummary};
use crate::progress::ProgressReporter;
use crate::record::SnapshotRole;
use crate::snapshot::{ReferenceIndex, SnapshotIndexer};

/// Run a delta from parsed arguments and print the summary
pub fn execute_command(cli: &Cli) -> Result<RunSummary> {
    let summary = run_delta(cli)?;

    if cli.json {
        println!("{}", JsonFormatter::format(&summary)?);
    } else if cli.quiet {
        PrettyPrinter::print_quiet(&summary);
    } else {
        PrettyPrinter::print_summary(&summary);
    }

    Ok(summary)
}

/// Index, classify, then write.
///
/// Both snapshots are read completely before any output is created, so a
/// read failure leaves no delta files behind.
pub fn run_delta(cli: &Cli) -> Result<RunSummary> {
    let mut progress = if cli.show_progress() {
        ProgressReporter::new_for_delta()
    } else {
        ProgressReporter::new_minimal()
    };

    log::info!(
        "Comparing {} (reference) with {} (current)",
        cli.older.display(),
        cli.newer.display()
    );

    let index = index_reference(cli, &progress)?;
    let duplicate_keys = index.duplicate_keys();
    if duplicate_keys > 0 {
        log::warn!(
            "Reference snapshot has {} duplicate keys; later rows were kept",
            duplicate_keys
        );
    }
    progress.finish_index(&format!("Indexed {} reference keys", index.len()));

    let changes = classify_current(cli, index, &progress)?;
    progress.finish_classify(&format!(
        "Classified {} current rows ({} changes)",
        changes.current_rows,
        changes.total_changes()
    ));

    let writer = DeltaWriter::new(&cli.output_prefix, cli.delimiter, cli.null_value.clone());
    let report = writer.write_all(&changes);
    progress.finish_write(&format!("Wrote {} of 3 delta files", report.written.len()));
    let outputs = report.into_result()?;

    log::debug!("Delta run finished in {:?}", progress.elapsed());

    Ok(RunSummary::new(
        &cli.older,
        &cli.newer,
        &changes,
        duplicate_keys,
        outputs,
    ))
}

fn index_reference(cli: &Cli, progress: &ProgressReporter) -> Result<ReferenceIndex> {
    let reader = SnapshotReader::open(&cli.older, SnapshotRole::Reference, &cli.read_options())?;
    let (header, rows) = reader.into_parts();

    let mut seen = 0u64;
    let rows = rows.inspect(|_| {
        seen += 1;
        progress.update_indexed(seen);
    });

    SnapshotIndexer::new(cli.width_policy()).build(header, rows)
}

fn classify_current(cli: &Cli, index: ReferenceIndex, progress: &ProgressReporter) -> Result<ChangeSet> {
    let reader = SnapshotReader::open(&cli.newer, SnapshotRole::Current, &cli.read_options())?;
    let (header, rows) = reader.into_parts();

    let mut seen = 0u64;
    let rows = rows.inspect(|_| {
        seen += 1;
        progress.update_classified(seen);
    });

    DeltaClassifier::new(cli.width_policy()).classify(index, header, rows)
}
