use anyhow::{Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use std::path::Path;

use crate::app_config::Config;
use crate::batching::chunk_lines;
use crate::file_utils::FileManager;
use crate::translation_service::{BatchTranslator, TranslationService};

// @module: Application controller for the translation run

/// Controller driving a single translation run:
/// read input, resume from prior output, chunk, translate batch by batch,
/// and checkpoint the output file after every batch.
pub struct Controller {
    /// Application configuration
    config: Config,
}

impl Controller {
    /// Create a new controller with the given configuration
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Run a translation with the configured provider
    pub async fn run<P1: AsRef<Path>, P2: AsRef<Path>>(
        &self,
        input_path: P1,
        output_path: P2,
        resume: bool,
    ) -> Result<()> {
        let service = TranslationService::new(&self.config)
            .map_err(|e| anyhow!("Failed to initialize translation service: {}", e))?;
        self.run_with_translator(&service, input_path, output_path, resume)
            .await
    }

    /// Run a translation using the given batch translator.
    ///
    /// Batches are processed strictly in order, one at a time. After each
    /// batch the output file is rewritten in full with everything translated
    /// so far. A batch that fails after all retries aborts the run without
    /// persisting anything for that batch; the last checkpoint stands and a
    /// later resume run picks up from it.
    pub async fn run_with_translator<T, P1, P2>(
        &self,
        translator: &T,
        input_path: P1,
        output_path: P2,
        resume: bool,
    ) -> Result<()>
    where
        T: BatchTranslator,
        P1: AsRef<Path>,
        P2: AsRef<Path>,
    {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        if !FileManager::file_exists(input_path) {
            return Err(anyhow!("Input file does not exist: {:?}", input_path));
        }

        let src_lines = FileManager::read_lines(input_path)?;
        let total = src_lines.len();

        // Resume trusts the existing output length as the count of consumed
        // input lines; content is not verified against the current input.
        let mut out_lines: Vec<String> = Vec::new();
        if resume && FileManager::file_exists(output_path) {
            out_lines = FileManager::read_lines(output_path)?;
            info!("[resume] Already translated: {} lines", out_lines.len());
        }
        let done = out_lines.len();

        let remaining = src_lines.get(done..).unwrap_or(&[]);
        let batches = chunk_lines(remaining, self.config.batch_size);

        if batches.is_empty() {
            info!("Nothing to translate: {}/{} lines already done", done, total);
            return Ok(());
        }

        let progress_bar = ProgressBar::new(total as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} lines ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_position(done as u64);

        for batch in &batches {
            let translated = translator.translate_batch(batch).await?;
            out_lines.extend(translated);

            FileManager::write_lines(output_path, &out_lines)?;
            progress_bar.set_position(out_lines.len() as u64);
            info!("Progress: {}/{} lines", out_lines.len(), total);
        }

        progress_bar.finish_with_message("translation complete");
        Ok(())
    }
}
