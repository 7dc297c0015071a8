//! Question processing command

use doubles_core::{
    error::{DoublesError, Result},
    similarity, CliProgress, CsvPartitionSink, CsvQuestionSource, Deduplicator, DoublesConfig,
    FunctionWordDetector, LanguageDetector, ProgressSink, QuestionStore, Report,
};
use std::path::PathBuf;
use tokio::task;
use tracing::{info, warn};

/// Load, process, report and export a question file
pub async fn handle(
    config: DoublesConfig,
    ifile: PathBuf,
    ofile: Option<PathBuf>,
    dry: bool,
    progress: bool,
    report_path: Option<PathBuf>,
) -> Result<()> {
    info!(
        "Initialising application: {}, version: {}",
        config.app.name, config.app.version
    );
    info!("Question file to process: {}", ifile.display());

    let function_words = FunctionWordDetector::new();
    let detector: Option<&dyn LanguageDetector> = if config.language.detect_foreign {
        Some(&function_words)
    } else {
        None
    };

    let mut source = CsvQuestionSource::open(&ifile)?;
    let store = QuestionStore::load(&mut source, detector)?;
    if store.num_q() == 0 {
        warn!("No questions in question file, exiting...");
        return Ok(());
    }

    let oracle = similarity::from_config(&config).await?;
    info!(
        "Similarity backend: {}, threshold: {}",
        config.similarity.backend, config.scores.ss_match
    );

    // The pass is synchronous and CPU-bound; keep it off the async workers
    let pass_config = config.clone();
    let store = task::spawn_blocking(move || -> Result<QuestionStore> {
        let mut store = store;
        let dedup = Deduplicator::from_config(oracle.as_ref(), &pass_config);
        let mut bar = progress
            .then(|| CliProgress::new("Processing questions", pass_config.progress.width));
        store.process(&dedup, bar.as_mut().map(|b| b as &mut dyn ProgressSink))?;
        Ok(store)
    })
    .await
    .map_err(|e| DoublesError::Other(format!("Task join error: {}", e)))??;

    info!("Generating results...");
    let report = Report::build(&store, &config)?;
    println!("{}", report.render_text());

    if let Some(path) = report_path {
        report.write_json(&path)?;
    }

    if dry {
        info!("Dry run, no export files created.");
        return Ok(());
    }

    let output = ofile.unwrap_or_else(|| ifile.clone());
    info!("File for results export: {}", output.display());
    let mut sink = CsvPartitionSink::for_output(&output);
    store.export(&mut sink)?;

    Ok(())
}
