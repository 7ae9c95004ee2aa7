use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use livemark::cli::{CliArgs, InputSource, OutputFormat, RunConfig};
use livemark::config::EditorConfig;
use livemark::coordinator::{EditCoordinator, EditRecord};
use livemark::style::AttributedText;
use livemark::syntax::{run_full_scan, ScanWorker, SyntaxCatalog};
use livemark::theme::load_theme;

const BACKGROUND_SCAN_TIMEOUT: Duration = Duration::from_secs(30);

fn read_input(input: &InputSource) -> Result<String> {
    match input {
        InputSource::File(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        InputSource::Stdin => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

fn read_edits(config: &RunConfig) -> Result<Vec<EditRecord>> {
    let Some(path) = &config.edits else {
        return Ok(Vec::new());
    };
    let content = if path.as_os_str() == "-" {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        content
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read edits from {}", path.display()))?
    };
    serde_json::from_str(&content).context("Edits file is not a JSON array of edit records")
}

/// Queue a scan of the coordinator's current text
fn submit_scan(worker: &ScanWorker, coordinator: &EditCoordinator) -> Result<()> {
    if worker.submit(coordinator.full_scan_request()) {
        Ok(())
    } else {
        Err(anyhow!("Background scan worker stopped"))
    }
}

/// Wait for the worker's scan of the current generation, resubmitting
/// whenever edits made the pending one stale.
fn finish_background_scan(
    worker: &ScanWorker,
    coordinator: &EditCoordinator,
    sink: &mut AttributedText,
) -> Result<()> {
    loop {
        let result = worker
            .recv_timeout(BACKGROUND_SCAN_TIMEOUT)
            .ok_or_else(|| anyhow!("Background scan did not finish"))?;
        if coordinator.apply_full_scan(result, sink)? {
            return Ok(());
        }
        submit_scan(worker, coordinator)?;
    }
}

fn run(config: RunConfig) -> Result<()> {
    let editor_config = EditorConfig::load();
    let theme_id = config.theme.as_deref().unwrap_or(&editor_config.theme);
    let theme = load_theme(theme_id).map_err(|e| anyhow!(e))?;
    let catalog = Arc::new(SyntaxCatalog::with_theme(&theme));

    let text = read_input(&config.input)?;
    let coordinator = EditCoordinator::new(&text, Arc::clone(&catalog));
    coordinator.set_selection_state(config.selected);
    let mut sink = AttributedText::new(coordinator.len());

    let worker = if editor_config.prefers_background_scan(coordinator.len()) {
        let worker = ScanWorker::spawn(Arc::clone(&catalog))
            .context("Failed to start background scan worker")?;
        submit_scan(&worker, &coordinator)?;
        Some(worker)
    } else {
        coordinator.restyle_all(&mut sink)?;
        None
    };

    let edits = read_edits(&config)?;
    for (i, record) in edits.iter().enumerate() {
        coordinator
            .apply_edit(record.range.clone(), &record.text, &mut sink)
            .with_context(|| format!("Edit #{} ({:?}) failed", i, record.range))?;
        if config.check {
            coordinator
                .check_consistency()
                .with_context(|| format!("Line index inconsistent after edit #{}", i))?;
        }
    }

    if let Some(worker) = &worker {
        finish_background_scan(worker, &coordinator, &mut sink)?;
    }

    if config.check {
        coordinator.check_consistency()?;
    }

    let json = match config.format {
        OutputFormat::Tokens => {
            let result = run_full_scan(&coordinator.full_scan_request(), &catalog);
            serde_json::to_string_pretty(&result.tokens)?
        }
        OutputFormat::Lines => serde_json::to_string_pretty(&coordinator.line_ranges())?,
        OutputFormat::Runs => serde_json::to_string_pretty(&sink.runs())?,
    };
    println!("{}", json);

    tracing::info!(
        edits = edits.len(),
        generation = coordinator.generation(),
        "done"
    );
    Ok(())
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    livemark::tracing::init();

    let config = args.into_config().map_err(|e| anyhow!(e))?;
    run(config)
}
