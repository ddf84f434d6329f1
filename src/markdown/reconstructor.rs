/*!
 * Document reconstruction from catalog translations.
 *
 * Rebuilds a translated document by walking the segmentation in order,
 * splicing in translations where they exist and copying the original lines
 * everywhere else. Incomplete or skipped units always fall back to the
 * source text, so the output is never half-substituted.
 */

use std::fmt::Write as _;

use crate::catalog::store::Catalog;
use crate::markdown::segmenter::{Block, BlockKind};

/// Per-kind coverage counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindCoverage {
    /// All blocks of this kind
    pub total: usize,

    /// Blocks of this kind that are translatable (not skip-kind)
    pub translatable: usize,

    /// Translated and current
    pub translated: usize,

    /// Translated but stale
    pub fuzzy: usize,
}

/// Translation coverage for one document
#[derive(Debug, Clone, Default)]
pub struct CoverageReport {
    /// All blocks in the segmentation
    pub total_blocks: usize,

    /// Blocks subject to translation (total minus skip kinds)
    pub translatable_blocks: usize,

    /// Blocks with a current translation
    pub translated_blocks: usize,

    /// Blocks whose translation is stale
    pub fuzzy_blocks: usize,

    /// Translatable blocks with no translation at all
    pub untranslated_blocks: usize,

    /// `translated / translatable * 100`, 0 when nothing is translatable
    pub coverage_percentage: f64,

    /// Per-kind breakdown in first-seen document order
    pub by_kind: Vec<(BlockKind, KindCoverage)>,
}

/// Rebuilds translated documents from raw lines, blocks, and the catalog
#[derive(Debug, Clone, Default)]
pub struct DocumentReconstructor {
    skip_kinds: Vec<BlockKind>,
}

impl DocumentReconstructor {
    /// Create a reconstructor with the given skip-kind set
    pub fn new(skip_kinds: Vec<BlockKind>) -> Self {
        DocumentReconstructor { skip_kinds }
    }

    /// Rebuild the document.
    ///
    /// `raw_lines` are the original source lines without line terminators;
    /// every emitted line is terminated with a single `\n` regardless of the
    /// source file's original line-ending style. Gaps between blocks (blank
    /// lines and anything the segmenter did not claim) are copied verbatim.
    pub fn rebuild(&self, raw_lines: &[&str], blocks: &[Block], catalog: &Catalog) -> String {
        let mut output = String::new();
        let mut position = 0;

        for block in blocks {
            for line in &raw_lines[position..block.start] {
                output.push_str(line);
                output.push('\n');
            }

            let entry = catalog.entry(&block.context_id());
            let translated = entry.filter(|e| e.is_translated());

            if self.skip_kinds.contains(&block.kind) || translated.is_none() {
                for line in &raw_lines[block.start..block.end] {
                    output.push_str(line);
                    output.push('\n');
                }
            } else if let Some(entry) = translated {
                for line in entry.msgstr.split('\n') {
                    output.push_str(line);
                    output.push('\n');
                }
            }

            position = block.end;
        }

        for line in &raw_lines[position..] {
            output.push_str(line);
            output.push('\n');
        }

        output
    }

    /// Compute coverage statistics for a segmentation against the catalog
    pub fn coverage(&self, blocks: &[Block], catalog: &Catalog) -> CoverageReport {
        let mut report = CoverageReport {
            total_blocks: blocks.len(),
            ..CoverageReport::default()
        };

        for block in blocks {
            let idx = match report.by_kind.iter().position(|(k, _)| *k == block.kind) {
                Some(idx) => idx,
                None => {
                    report.by_kind.push((block.kind, KindCoverage::default()));
                    report.by_kind.len() - 1
                }
            };
            report.by_kind[idx].1.total += 1;

            if self.skip_kinds.contains(&block.kind) {
                continue;
            }

            report.by_kind[idx].1.translatable += 1;
            report.translatable_blocks += 1;

            let entry = catalog.entry(&block.context_id());
            match entry.filter(|e| e.is_translated()) {
                Some(entry) if entry.fuzzy => {
                    report.fuzzy_blocks += 1;
                    report.by_kind[idx].1.fuzzy += 1;
                }
                Some(_) => {
                    report.translated_blocks += 1;
                    report.by_kind[idx].1.translated += 1;
                }
                None => {
                    report.untranslated_blocks += 1;
                }
            }
        }

        if report.translatable_blocks > 0 {
            report.coverage_percentage =
                report.translated_blocks as f64 / report.translatable_blocks as f64 * 100.0;
        }

        report
    }

    /// Render a human-readable coverage report as Markdown
    pub fn render_report(&self, source_name: &str, blocks: &[Block], catalog: &Catalog) -> String {
        let coverage = self.coverage(blocks, catalog);
        let generated = catalog
            .metadata_value("PO-Revision-Date")
            .unwrap_or("Unknown");

        let mut report = String::new();
        let _ = writeln!(report, "# Translation Report\n");
        let _ = writeln!(report, "**Source File:** {}\n", source_name);
        let _ = writeln!(report, "**Generated:** {}\n", generated);

        let _ = writeln!(report, "## Summary\n");
        let _ = writeln!(report, "- **Total Blocks:** {}", coverage.total_blocks);
        let _ = writeln!(report, "- **Translatable Blocks:** {}", coverage.translatable_blocks);
        let _ = writeln!(report, "- **Translated:** {}", coverage.translated_blocks);
        let _ = writeln!(report, "- **Fuzzy:** {}", coverage.fuzzy_blocks);
        let _ = writeln!(report, "- **Untranslated:** {}", coverage.untranslated_blocks);
        let _ = writeln!(report, "- **Coverage:** {:.1}%\n", coverage.coverage_percentage);

        let _ = writeln!(report, "## By Block Kind\n");
        for (kind, stats) in &coverage.by_kind {
            if stats.translatable > 0 {
                let pct = stats.translated as f64 / stats.translatable as f64 * 100.0;
                let _ = writeln!(
                    report,
                    "- **{}:** {}/{} ({:.1}%)",
                    kind, stats.translated, stats.translatable, pct
                );
            } else {
                let _ = writeln!(report, "- **{}:** {} (non-translatable)", kind, stats.total);
            }
        }

        report
    }
}
