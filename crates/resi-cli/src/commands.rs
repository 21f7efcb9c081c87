use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info, info_span, warn};

use resi_cli::config::{Credentials, EnvSource, GEMINI_KEY_KEYS};
use resi_cli::pipeline::{build_mapper, ensure_complete, map_columns, read_table, validate_rows};
use resi_cli::template::write_template;
use resi_import::{
    BatchImporter, ImportConfig, ImportError, ProgressSnapshot, ProgressStore, RestPersistence,
    RunState, SkippedRow, write_error_log,
};
use resi_map::FieldMapper;
use resi_model::ImportRunStats;
use resi_validate::ValidationOptions;

use crate::cli::{ImportArgs, MappingArgs, PreviewArgs, TemplateArgs};
use crate::progress::ProgressReporter;
use crate::summary::{MESSAGE_LIMIT, print_fields, print_import_summary, print_mapping, print_validation};

/// Wait before auto-resuming an interrupted run.
const RESUME_WAIT: Duration = Duration::from_secs(5);

/// Result of a completed import run.
pub struct ImportOutcome {
    pub stats: ImportRunStats,
    pub error_log: Option<PathBuf>,
}

impl ImportOutcome {
    pub fn has_failures(&self) -> bool {
        self.stats.failed > 0
    }
}

pub fn run_fields() -> Result<()> {
    print_fields();
    Ok(())
}

pub fn run_template(args: &TemplateArgs) -> Result<()> {
    let rows = write_template(&args.out)?;
    println!(
        "Wrote {} with {rows} sample rows; replace them with your residents before importing.",
        args.out.display()
    );
    Ok(())
}

pub fn run_preview(args: &PreviewArgs) -> Result<()> {
    let env = EnvSource::load(&args.mapping.env_file)?;
    let table = read_table(&args.file).with_context(|| format!("read {}", args.file.display()))?;
    let mapper = mapper_for(&args.mapping, &env);
    let result = map_columns(&mapper, &table, &args.mapping.overrides)?;
    print_mapping(&result);
    if let Err(error) = ensure_complete(&result.mapping) {
        println!("{error}");
        return Ok(());
    }
    let report = validate_rows(&table, &result.mapping, validation_options(&args.mapping));
    print_validation(&report, args.messages);
    Ok(())
}

pub fn run_import(args: &ImportArgs) -> Result<ImportOutcome> {
    let file = args
        .file
        .as_deref()
        .ok_or_else(|| anyhow!("no spreadsheet given, usage: resi <FILE>"))?;
    let span = info_span!("import", path = %file.display());
    let _guard = span.enter();

    let env = EnvSource::load(&args.mapping.env_file)?;
    let credentials = Credentials::from_env(&env)?;
    let mut state = RunState::Idle;

    advance(&mut state, RunState::Reading);
    let table = read_table(file).with_context(|| format!("read {}", file.display()))?;

    advance(&mut state, RunState::Mapping);
    let mapper = mapper_for(&args.mapping, &env);
    let result = map_columns(&mapper, &table, &args.mapping.overrides)?;
    print_mapping(&result);
    ensure_complete(&result.mapping)?;

    advance(&mut state, RunState::Validating);
    let report = validate_rows(&table, &result.mapping, validation_options(&args.mapping));
    print_validation(&report, MESSAGE_LIMIT);

    let records = report.valid_records();
    let config = import_config(args);
    let persistence = RestPersistence::new(&credentials.base_url, &credentials.api_key)
        .context("create backend client")?;
    let importer = BatchImporter::new(persistence, config)
        .with_row_numbers(report.valid_row_numbers());

    let (mut stats, start_batch) = match resolve_resume(importer.progress(), args, records.len())? {
        Some(snapshot) => {
            let next = snapshot.next_batch();
            (snapshot.stats, next)
        }
        None => (ImportRunStats::new(records.len()), 0),
    };
    stats.skipped = report.invalid_count();

    advance(&mut state, RunState::Importing { batch: start_batch });
    let mut reporter = ProgressReporter::new(records.len(), &stats);
    let imported = importer.import_all(&records, &mut stats, start_batch, &mut reporter);
    match imported {
        Ok(summary) => {
            reporter.finish();
            advance(&mut state, RunState::Complete);
            debug!(success = summary.success, failed = summary.failed, "importer finished");
        }
        Err(ImportError::ProgressWrite { batch, source }) => {
            reporter.abandon();
            advance(&mut state, RunState::Failed { batch });
            return Err(anyhow::Error::new(*source)
                .context(format!("import stopped after batch {}", batch + 1)));
        }
        Err(error) => {
            reporter.abandon();
            return Err(error).context("import stopped");
        }
    }

    let log_path = importer.config().error_log_path();
    let skipped = report.invalid_outcomes().map(SkippedRow::from_outcome).collect();
    let error_log = write_error_log(&log_path, &stats, skipped)
        .context("write error log")?
        .then_some(log_path);
    print_import_summary(&stats, &report, error_log.as_deref());

    Ok(ImportOutcome { stats, error_log })
}

fn advance(state: &mut RunState, next: RunState) {
    debug!(from = %state, to = %next, "run state");
    *state = next;
}

fn mapper_for(args: &MappingArgs, env: &EnvSource) -> FieldMapper {
    let key = args.gemini_key.as_deref().or_else(|| env.get(&GEMINI_KEY_KEYS));
    build_mapper(key, args.gemini_model.as_deref())
}

fn validation_options(args: &MappingArgs) -> ValidationOptions {
    ValidationOptions {
        normalize_case: !args.keep_case,
        default_status: args.status,
        ..ValidationOptions::default()
    }
}

fn import_config(args: &ImportArgs) -> ImportConfig {
    ImportConfig {
        batch_size: args.batch_size,
        max_retries: args.max_retries,
        backoff_step: Duration::from_millis(args.backoff_ms),
        batch_delay: Duration::from_millis(args.delay_ms),
        logs_dir: args.logs_dir.clone(),
        table: args.table.clone(),
    }
}

/// Decide whether to continue from a snapshot left by an interrupted run.
fn resolve_resume(
    store: &ProgressStore,
    args: &ImportArgs,
    record_count: usize,
) -> Result<Option<ProgressSnapshot>> {
    if args.no_resume {
        store.clear().context("discard progress snapshot")?;
        return Ok(None);
    }
    let Some(snapshot) = store.load().context("load progress snapshot")? else {
        return Ok(None);
    };
    if snapshot.stats.total != record_count {
        warn!(
            snapshot_records = snapshot.stats.total,
            records = record_count,
            "progress snapshot belongs to a different record set, starting over"
        );
        store.clear().context("discard progress snapshot")?;
        return Ok(None);
    }

    announce_resume(store.path(), &snapshot);
    if !args.yes {
        eprintln!(
            "Resuming in {} seconds, press Ctrl+C to abort (use --no-resume to start over).",
            RESUME_WAIT.as_secs()
        );
        std::thread::sleep(RESUME_WAIT);
    }
    info!(start_batch = snapshot.next_batch(), "resuming import");
    Ok(Some(snapshot))
}

fn announce_resume(path: &Path, snapshot: &ProgressSnapshot) {
    eprintln!(
        "Found progress from {} in {}: {} batch(es) done, {} imported, {} failed.",
        snapshot.timestamp.to_rfc3339(),
        path.display(),
        snapshot.next_batch(),
        snapshot.stats.success,
        snapshot.stats.failed
    );
}
