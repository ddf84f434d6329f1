use anyhow::{Context, Result, anyhow};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};

use crate::app_config::{Config, TranslationProvider};
use crate::catalog::store::Catalog;
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::markdown::reconstructor::{CoverageReport, DocumentReconstructor};
use crate::markdown::segmenter::{Block, BlockKind, MarkdownSegmenter};
use crate::providers::Provider;
use crate::providers::mock::MockProvider;
use crate::providers::openai_compat::OpenAiCompat;
use crate::translation::core::TranslationService;
use crate::translation::glossary::Glossary;
use crate::translation::reference_pool::ReferencePool;

// @module: Application controller for the document translation workflow

/// Per-document translation counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Units translated in this run
    pub translated: usize,

    /// Units whose provider call failed (left pending)
    pub failed: usize,

    /// Skip-kind units tracked but never translated
    pub skipped: usize,
}

/// Result of processing one document
#[derive(Debug, Clone)]
pub struct DocumentReport {
    /// Source document path
    pub source_path: PathBuf,

    /// Translated document path
    pub target_path: PathBuf,

    /// Catalog path
    pub po_path: PathBuf,

    /// Number of blocks in the segmentation
    pub blocks_count: usize,

    /// Coverage after the run
    pub coverage: CoverageReport,

    /// Translation counts for the run
    pub stats: RunStats,
}

/// Aggregate result of a directory run
#[derive(Debug, Clone, Default)]
pub struct DirectoryReport {
    /// Files with at least one newly translated unit
    pub files_processed: usize,

    /// Files that failed outright
    pub files_failed: usize,

    /// Files already fully up to date
    pub files_skipped: usize,

    /// Per-file reports for files that completed
    pub results: Vec<DocumentReport>,
}

/// Main application controller for markdown translation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Block kinds exempt from translation and staleness tracking
    pub const SKIP_KINDS: &'static [BlockKind] = &[BlockKind::Rule];

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Access the active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the translation service from the configuration.
    ///
    /// Provider capabilities are resolved here, once per service.
    pub fn build_service(&self) -> Result<TranslationService> {
        let provider_config = &self.config.provider;
        let provider: Box<dyn Provider> = match provider_config.provider_type {
            TranslationProvider::Mock => Box::new(MockProvider::working()),
            _ => Box::new(
                OpenAiCompat::new(
                    provider_config.effective_endpoint(),
                    provider_config.api_key.clone(),
                    provider_config.timeout_secs,
                )
                .with_retries(provider_config.max_retries, 1000),
            ),
        };

        let mut service = TranslationService::new(
            provider,
            provider_config.model.clone(),
            self.config.target_language.clone(),
        );

        let translation = &self.config.translation;
        if let Some(instruction) = &translation.system_prompt {
            service = service.with_instruction(instruction.clone());
        }
        if let Some(temperature) = translation.temperature {
            service = service.with_temperature(temperature);
        }

        let inline = if translation.glossary.is_empty() {
            None
        } else {
            Some(&translation.glossary)
        };
        if let Some(glossary) = Glossary::resolve(
            translation.glossary_path.as_deref(),
            inline,
            &self.config.target_language,
        )? {
            debug!("Loaded glossary with {} terms", glossary.len());
            service = service.with_glossary(glossary);
        }

        Ok(service)
    }

    /// Translate a single document.
    ///
    /// When `output` is omitted the translated file lands next to the source
    /// with the target language inserted (`README.md` -> `README.ko.md`);
    /// when `po_path` is omitted it defaults to the output path with a `.po`
    /// extension.
    pub async fn run_file(
        &self,
        input: &Path,
        output: Option<PathBuf>,
        po_path: Option<PathBuf>,
        inplace: bool,
    ) -> Result<DocumentReport> {
        if !FileManager::file_exists(input) {
            return Err(anyhow!("Input file not found: {}", input.display()));
        }

        let target_path = match output {
            Some(path) => path,
            None => {
                let parent = input.parent().unwrap_or_else(|| Path::new("."));
                FileManager::generate_output_path(input, parent, &self.config.target_language)
            }
        };
        let po_path = po_path.unwrap_or_else(|| FileManager::catalog_path_for(&target_path));

        let service = self.build_service()?;
        let report = self
            .process_document(&service, input, &target_path, &po_path, inplace, true)
            .await?;

        info!("{}", service.token_usage().summary());
        Ok(report)
    }

    /// Translate every markdown file under a directory tree.
    ///
    /// The output and catalog trees mirror the source structure. Documents
    /// are fully independent (own catalog, own reference pool) and run
    /// concurrently up to `max_workers`; units inside one document always
    /// run sequentially so each benefits from the ones before it.
    pub async fn run_directory(
        &self,
        source_dir: &Path,
        target_dir: &Path,
        po_dir: &Path,
        inplace: bool,
    ) -> Result<DirectoryReport> {
        if !FileManager::dir_exists(source_dir) {
            return Err(anyhow!("Input directory not found: {}", source_dir.display()));
        }

        let files = FileManager::find_markdown_files(source_dir)?;
        info!("Found {} markdown files under {}", files.len(), source_dir.display());

        let service = self.build_service()?;
        let aggregate: Mutex<DirectoryReport> = Mutex::new(DirectoryReport::default());

        let progress = ProgressBar::new(files.len() as u64);
        progress.set_style(
            ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        futures::stream::iter(files)
            .map(|source_file| {
                let service = &service;
                let aggregate = &aggregate;
                let progress = &progress;
                async move {
                    let outcome = self
                        .process_directory_entry(service, source_dir, target_dir, po_dir, &source_file, inplace)
                        .await;

                    let mut aggregate = aggregate.lock();
                    match outcome {
                        Ok(report) => {
                            if report.stats.translated == 0 {
                                aggregate.files_skipped += 1;
                            } else {
                                aggregate.files_processed += 1;
                            }
                            aggregate.results.push(report);
                        }
                        Err(e) => {
                            error!("Failed to process {}: {:#}", source_file.display(), e);
                            aggregate.files_failed += 1;
                        }
                    }
                    progress.inc(1);
                }
            })
            .buffer_unordered(self.config.translation.max_workers)
            .collect::<Vec<()>>()
            .await;

        progress.finish_and_clear();
        info!("{}", service.token_usage().summary());

        Ok(aggregate.into_inner())
    }

    /// Resolve mirrored paths for one directory entry and process it
    async fn process_directory_entry(
        &self,
        service: &TranslationService,
        source_dir: &Path,
        target_dir: &Path,
        po_dir: &Path,
        source_file: &Path,
        inplace: bool,
    ) -> Result<DocumentReport> {
        let target_path = FileManager::mirror_path(source_file, source_dir, target_dir)?;
        let po_path = FileManager::mirror_path(source_file, source_dir, po_dir)?.with_extension("po");
        self.process_document(service, source_file, &target_path, &po_path, inplace, false)
            .await
    }

    /// Process one document end to end.
    ///
    /// The catalog is persisted after the run no matter what happened in
    /// between: partial progress is durable, and a body error is surfaced
    /// only after the save has been attempted.
    async fn process_document(
        &self,
        service: &TranslationService,
        source_path: &Path,
        target_path: &Path,
        po_path: &Path,
        inplace: bool,
        show_progress: bool,
    ) -> Result<DocumentReport> {
        debug!("Processing {} -> {}", source_path.display(), target_path.display());

        let content = FileManager::read_to_string(source_path)?;
        let raw_lines: Vec<&str> = content.lines().collect();

        let segmenter = MarkdownSegmenter::new();
        let blocks = segmenter.segment(&raw_lines);

        // Catalog load failures are fatal before any unit is attempted
        let mut catalog = Catalog::load_or_create(
            po_path,
            Some(&self.config.target_language),
            Self::SKIP_KINDS.to_vec(),
        )
        .map_err(AppError::Catalog)?;

        catalog.reconcile(&blocks);

        let outcome = self
            .translate_and_rebuild(service, &mut catalog, &raw_lines, &blocks, target_path, inplace, show_progress)
            .await;

        // Persist whatever subset of units completed, even on failure
        let save_result = catalog.save(po_path);

        let (stats, coverage) = outcome?;
        save_result.map_err(AppError::Catalog)?;

        Ok(DocumentReport {
            source_path: source_path.to_path_buf(),
            target_path: target_path.to_path_buf(),
            po_path: po_path.to_path_buf(),
            blocks_count: blocks.len(),
            coverage,
            stats,
        })
    }

    /// The fallible document body: translate pending units, rebuild, write
    #[allow(clippy::too_many_arguments)]
    async fn translate_and_rebuild(
        &self,
        service: &TranslationService,
        catalog: &mut Catalog,
        raw_lines: &[&str],
        blocks: &[Block],
        target_path: &Path,
        inplace: bool,
        show_progress: bool,
    ) -> Result<(RunStats, CoverageReport)> {
        let stats = self.translate_pending(service, catalog, show_progress).await;

        let reconstructor = DocumentReconstructor::new(Self::SKIP_KINDS.to_vec());
        let coverage = reconstructor.coverage(blocks, catalog);
        let rebuilt = reconstructor.rebuild(raw_lines, blocks, catalog);

        if inplace {
            // The translated text becomes the new source of truth: re-segment
            // the output and rebuild positional identity from its own shape
            let rebuilt_lines: Vec<&str> = rebuilt.lines().collect();
            let segmenter = MarkdownSegmenter::new();
            let rebuilt_blocks = segmenter.segment(&rebuilt_lines);
            catalog.reset_seed(&rebuilt_blocks);
        }

        FileManager::write_to_file(target_path, &rebuilt)
            .with_context(|| format!("Failed to write output: {}", target_path.display()))?;

        Ok((stats, coverage))
    }

    /// Translate pending units sequentially with growing reference context.
    ///
    /// Seeds the pool from existing translations, walks pending entries in
    /// store order (document order after reconciliation), and feeds each
    /// fresh translation back into the pool before the next unit is scored.
    /// Per-unit failures are logged and counted; they never abort the batch.
    async fn translate_pending(
        &self,
        service: &TranslationService,
        catalog: &mut Catalog,
        show_progress: bool,
    ) -> RunStats {
        let mut pool = ReferencePool::new(self.config.translation.max_reference_pairs);
        pool.seed_from_catalog(catalog);

        let mut stats = RunStats {
            skipped: catalog
                .entries()
                .iter()
                .filter(|e| !e.obsolete)
                .filter(|e| {
                    crate::catalog::store::context_kind(&e.msgctxt)
                        .map(|kind| Self::SKIP_KINDS.iter().any(|k| k.as_str() == kind))
                        .unwrap_or(false)
                })
                .count(),
            ..RunStats::default()
        };

        let pending = catalog.pending_ids();
        if pending.is_empty() {
            debug!("Nothing pending, catalog is up to date");
            return stats;
        }

        let progress = if show_progress {
            let bar = ProgressBar::new(pending.len() as u64);
            bar.set_style(
                ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} units")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            Some(bar)
        } else {
            None
        };

        for context_id in pending {
            let source = match catalog.entry(&context_id) {
                Some(entry) => entry.msgid.clone(),
                None => continue,
            };

            let similar = pool.find_similar(&source);

            match service.translate(&source, &similar).await {
                Ok(translation) => {
                    catalog.set_translation(&context_id, &translation);
                    catalog.mark_complete(&context_id);
                    pool.add(source, translation);
                    stats.translated += 1;
                }
                Err(e) => {
                    warn!("Failed to translate unit {}: {}", context_id, e);
                    stats.failed += 1;
                }
            }

            if let Some(bar) = &progress {
                bar.inc(1);
            }
        }

        if let Some(bar) = &progress {
            bar.finish_and_clear();
        }

        stats
    }

    /// Coverage and catalog statistics for a document without translating
    pub fn translation_stats(
        &self,
        source_path: &Path,
        po_path: &Path,
    ) -> Result<(CoverageReport, crate::catalog::store::CatalogStats)> {
        let content = FileManager::read_to_string(source_path)?;
        let raw_lines: Vec<&str> = content.lines().collect();
        let blocks = MarkdownSegmenter::new().segment(&raw_lines);

        let catalog = Catalog::load_or_create(
            po_path,
            Some(&self.config.target_language),
            Self::SKIP_KINDS.to_vec(),
        )
        .map_err(AppError::Catalog)?;

        let reconstructor = DocumentReconstructor::new(Self::SKIP_KINDS.to_vec());
        Ok((reconstructor.coverage(&blocks, &catalog), catalog.stats()))
    }

    /// Render the human-readable translation report for a document
    pub fn export_report(&self, source_path: &Path, po_path: &Path) -> Result<String> {
        let content = FileManager::read_to_string(source_path)?;
        let raw_lines: Vec<&str> = content.lines().collect();
        let blocks = MarkdownSegmenter::new().segment(&raw_lines);

        let catalog = Catalog::load_or_create(
            po_path,
            Some(&self.config.target_language),
            Self::SKIP_KINDS.to_vec(),
        )
        .map_err(AppError::Catalog)?;

        let reconstructor = DocumentReconstructor::new(Self::SKIP_KINDS.to_vec());
        Ok(reconstructor.render_report(&source_path.display().to_string(), &blocks, &catalog))
    }
}
