use anyhow::{Result, anyhow};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::{Config, LanguageTarget};
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::includes::{relocate_includes, Relocation};
use crate::providers::openai::OpenAI;
use crate::providers::Translator;
use crate::translation::core::INCLUDES_DIR;
use crate::translation::{build_instructions, finalize_output, DocumentTranslator};

// @module: Application controller for documentation translation

/// One (source file, language) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationJob {
    /// Absolute or root-joined source path
    pub source: PathBuf,
    /// Source path relative to the source root
    pub relative: PathBuf,
    /// Mirrored output path
    pub target: PathBuf,
    /// Target language
    pub language: LanguageTarget,
}

/// What happened to a job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    /// Output was written
    Translated,
    /// Output was already up to date
    Skipped,
    /// Dry run: output would have been written
    Planned,
}

/// Totals for one run
#[derive(Debug, Default, Clone)]
pub struct RunSummary {
    /// Files written
    pub translated: usize,
    /// Files already up to date
    pub skipped: usize,
    /// Files that would be written (dry run)
    pub planned: usize,
    /// Failed jobs with their error message
    pub failures: Vec<(PathBuf, String)>,
    /// Include folders moved after the pass
    pub relocations: Vec<Relocation>,
    /// Wall time of the run
    pub elapsed: Duration,
}

impl RunSummary {
    /// Whether every job succeeded
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Main application controller for documentation translation
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Document pipeline; None for dry runs
    document_translator: Option<DocumentTranslator>,
    // @field: Label of the translator for logs
    translator_label: String,
    // @field: Ignore timestamps and translate everything
    force_overwrite: bool,
}

impl Controller {
    // @method: Create a controller talking to the configured provider
    pub fn with_config(config: Config) -> Result<Self> {
        let translator = OpenAI::from_config(&config.provider)?;
        Ok(Self::with_translator(config, Arc::new(translator)))
    }

    // @method: Create a controller with an explicit translator
    pub fn with_translator(config: Config, translator: Arc<dyn Translator>) -> Self {
        let translator_label = translator.describe();
        let document_translator = DocumentTranslator::from_config(translator, &config);
        Self {
            config,
            document_translator: Some(document_translator),
            translator_label,
            force_overwrite: false,
        }
    }

    // @method: Create a controller that only plans work
    pub fn dry_run(config: Config) -> Self {
        Self {
            config,
            document_translator: None,
            translator_label: "dry run".to_string(),
            force_overwrite: false,
        }
    }

    /// Translate every file regardless of timestamps
    pub fn force_overwrite(mut self, force: bool) -> Self {
        self.force_overwrite = force;
        self
    }

    /// The configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Directories holding translated output, never walked as sources
    fn output_dirs(&self) -> Vec<PathBuf> {
        let root = &self.config.source_dir;
        self.config
            .languages
            .keys()
            .flat_map(|code| [root.join(code), root.join(INCLUDES_DIR).join(code)])
            .collect()
    }

    /// Source files eligible for translation, in path order
    pub fn collect_source_files(&self) -> Result<Vec<PathBuf>> {
        let root = &self.config.source_dir;
        if !FileManager::dir_exists(root) {
            return Err(anyhow!("Source directory does not exist: {:?}", root));
        }

        let files = FileManager::find_markdown_files(root, &self.output_dirs())?;
        let mut eligible = Vec::with_capacity(files.len());
        for file in files {
            let relative = FileManager::relative_path(root, &file)?;
            if FileManager::is_excluded(&relative, &self.config.excluded_paths) {
                debug!("Excluded: {}", relative.display());
                continue;
            }
            eligible.push(file);
        }

        Ok(eligible)
    }

    /// Every (file, language) job, up to date or not
    pub fn plan_jobs(&self) -> Result<Vec<TranslationJob>> {
        let root = &self.config.source_dir;
        let languages = self.config.language_targets();
        let mut jobs = Vec::new();

        for source in self.collect_source_files()? {
            let relative = FileManager::relative_path(root, &source)?;
            for language in &languages {
                jobs.push(TranslationJob {
                    target: FileManager::output_path_for(root, &source, &language.code)?,
                    source: source.clone(),
                    relative: relative.clone(),
                    language: language.clone(),
                });
            }
        }

        Ok(jobs)
    }

    /// Whether a job's output is already fresh
    ///
    /// Include fragments are also looked up at their relocated path, since
    /// relocation moves them away from the mirrored location.
    pub fn is_up_to_date(&self, job: &TranslationJob) -> Result<bool> {
        if FileManager::is_up_to_date(&job.source, &job.target)? {
            return Ok(true);
        }

        match FileManager::relocated_include_path(&self.config.source_dir, &job.relative, &job.language.code) {
            Some(relocated) => FileManager::is_up_to_date(&job.source, relocated),
            None => Ok(false),
        }
    }

    /// Run the whole pass: translate stale files, then relocate includes
    ///
    /// Jobs are pulled from one queue by `concurrency` workers. A failed job
    /// does not stop the others; it is recorded in the summary and the
    /// includes relocation is skipped so a broken run leaves the tree as the
    /// jobs left it.
    pub async fn run(&self) -> Result<RunSummary> {
        let start_time = Instant::now();
        let jobs = self.plan_jobs()?;

        info!(
            "{}: {} job(s) over {} language(s) with {} worker(s)",
            self.translator_label,
            jobs.len(),
            self.config.languages.len(),
            self.config.concurrency
        );

        let instructions: HashMap<String, String> = self
            .config
            .language_targets()
            .into_iter()
            .map(|lang| {
                let prompt = build_instructions(&lang.display_name, &lang.code, &self.config.rules);
                (lang.code, prompt)
            })
            .collect();

        let progress_bar = ProgressBar::new(jobs.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("=>-"));

        let results: Vec<(TranslationJob, Result<JobOutcome, AppError>)> = stream::iter(jobs)
            .map(|job| {
                let instructions = &instructions;
                let progress_bar = progress_bar.clone();
                async move {
                    progress_bar.set_message(job.relative.display().to_string());
                    let prompt = instructions.get(&job.language.code).map(String::as_str).unwrap_or_default();
                    let result = self.process_job(&job, prompt).await;
                    progress_bar.inc(1);
                    (job, result)
                }
            })
            .buffer_unordered(self.config.concurrency.max(1))
            .collect()
            .await;

        progress_bar.finish_and_clear();

        let mut summary = RunSummary::default();
        for (job, result) in results {
            match result {
                Ok(JobOutcome::Translated) => summary.translated += 1,
                Ok(JobOutcome::Skipped) => summary.skipped += 1,
                Ok(JobOutcome::Planned) => summary.planned += 1,
                Err(e) => {
                    error!("Failed to translate {} into {}: {}", job.source.display(), job.language.code, e);
                    summary.failures.push((job.target, e.to_string()));
                }
            }
        }

        if !summary.is_success() {
            warn!("{} job(s) failed; includes were not relocated", summary.failures.len());
        } else if self.document_translator.is_some() {
            summary.relocations = relocate_includes(&self.config.source_dir, &self.config.language_codes())?;
            info!("Includes dir relocated.");
        }

        summary.elapsed = start_time.elapsed();
        info!(
            "Translation completed: {} translated, {} skipped, {} planned, {} failed in {}",
            summary.translated,
            summary.skipped,
            summary.planned,
            summary.failures.len(),
            Self::format_duration(summary.elapsed)
        );

        Ok(summary)
    }

    /// Decide and, when needed, execute one job
    async fn process_job(&self, job: &TranslationJob, instructions: &str) -> Result<JobOutcome, AppError> {
        if !self.force_overwrite && self.is_up_to_date(job)? {
            info!("Skipping up-to-date file: {}", job.target.display());
            return Ok(JobOutcome::Skipped);
        }

        let Some(document_translator) = &self.document_translator else {
            info!("Would translate {} into {}", job.relative.display(), job.target.display());
            return Ok(JobOutcome::Planned);
        };

        info!("Translating {} into {}", job.source.display(), job.language.code);
        let content = FileManager::read_to_string(&job.source).map_err(|e| AppError::File(format!("{:#}", e)))?;
        let body = document_translator.translate_document(&content, instructions).await?;
        FileManager::write_to_file(&job.target, &finalize_output(&job.relative, body))
            .map_err(|e| AppError::File(format!("{:#}", e)))?;

        Ok(JobOutcome::Translated)
    }

    // Format duration in a human-readable format
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
