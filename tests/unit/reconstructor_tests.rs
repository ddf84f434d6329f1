/*!
 * Tests for document reconstruction and coverage reporting
 */

use yamtwai::app_controller::Controller;
use yamtwai::catalog::store::Catalog;
use yamtwai::markdown::reconstructor::DocumentReconstructor;
use yamtwai::markdown::segmenter::BlockKind;

use crate::common;

fn reconstructor() -> DocumentReconstructor {
    DocumentReconstructor::new(Controller::SKIP_KINDS.to_vec())
}

/// Rebuild a document against a catalog built from the same content
fn rebuild(content: &str, catalog: &Catalog) -> String {
    let raw_lines: Vec<&str> = content.lines().collect();
    let blocks = common::segment(content);
    reconstructor().rebuild(&raw_lines, &blocks, catalog)
}

#[test]
fn test_rebuild_identityCatalog_shouldRoundTripByteForByte() {
    // Every unit complete with translation == source must reproduce the
    // document exactly
    for document in [common::SIMPLE_DOCUMENT, common::KITCHEN_SINK_DOCUMENT] {
        let catalog = common::complete_catalog(document, "");
        assert_eq!(rebuild(document, &catalog), document);
    }
}

#[test]
fn test_rebuild_markedTranslations_shouldMatchScenarioOutput() {
    let catalog = common::complete_catalog(common::SIMPLE_DOCUMENT, "[T] ");

    assert_eq!(
        rebuild(common::SIMPLE_DOCUMENT, &catalog),
        "[T] # Title\n\n[T] Hello world\n\n---\n\n[T] Goodbye\n"
    );
}

#[test]
fn test_rebuild_incompleteUnit_shouldFallBackToSource() {
    let mut catalog = Catalog::new(Some("ko"), Controller::SKIP_KINDS.to_vec());
    catalog.reconcile(&common::segment(common::SIMPLE_DOCUMENT));

    // Only the heading gets a translation
    catalog.set_translation("title::heading:0", "[T] # Title");
    catalog.mark_complete("title::heading:0");

    assert_eq!(
        rebuild(common::SIMPLE_DOCUMENT, &catalog),
        "[T] # Title\n\nHello world\n\n---\n\nGoodbye\n"
    );
}

#[test]
fn test_rebuild_staleUnit_shouldStillEmitRetainedTranslation() {
    let mut catalog = common::complete_catalog(common::SIMPLE_DOCUMENT, "[T] ");
    let edited = "# Title\n\nHello world\n\n---\n\nFarewell\n";
    catalog.reconcile(&common::segment(edited));

    // The stale paragraph keeps emitting its previous translation rather
    // than falling back to the new source
    let output = rebuild(edited, &catalog);
    assert!(output.ends_with("[T] Goodbye\n"));
}

#[test]
fn test_rebuild_skipKind_shouldAlwaysEmitOriginal() {
    let mut catalog = common::complete_catalog(common::SIMPLE_DOCUMENT, "[T] ");
    // Even a translation smuggled into the rule entry must not be emitted
    catalog.set_translation("title::hr:0", "*** sabotage ***");

    let output = rebuild(common::SIMPLE_DOCUMENT, &catalog);
    assert!(output.contains("\n---\n"));
    assert!(!output.contains("sabotage"));
}

#[test]
fn test_rebuild_multilineTranslation_shouldSplitBackIntoLines() {
    let content = "- one\n- two\n";
    let mut catalog = Catalog::new(Some("ko"), Controller::SKIP_KINDS.to_vec());
    catalog.reconcile(&common::segment(content));
    catalog.set_translation("::ulist:0", "- eins\n- zwei");
    catalog.mark_complete("::ulist:0");

    assert_eq!(rebuild(content, &catalog), "- eins\n- zwei\n");
}

#[test]
fn test_rebuild_trailingBlankLines_shouldBePreserved() {
    let content = "# Title\n\nbody\n\n\n";
    let catalog = common::complete_catalog(content, "");

    assert_eq!(rebuild(content, &catalog), content);
}

#[test]
fn test_coverage_freshCatalog_shouldCountEverythingUntranslated() {
    let blocks = common::segment(common::SIMPLE_DOCUMENT);
    let mut catalog = Catalog::new(Some("ko"), Controller::SKIP_KINDS.to_vec());
    catalog.reconcile(&blocks);

    let coverage = reconstructor().coverage(&blocks, &catalog);

    assert_eq!(coverage.total_blocks, 4);
    assert_eq!(coverage.translatable_blocks, 3);
    assert_eq!(coverage.translated_blocks, 0);
    assert_eq!(coverage.untranslated_blocks, 3);
    assert_eq!(coverage.coverage_percentage, 0.0);
}

#[test]
fn test_coverage_completeCatalog_shouldReportFullCoverage() {
    let blocks = common::segment(common::SIMPLE_DOCUMENT);
    let catalog = common::complete_catalog(common::SIMPLE_DOCUMENT, "[T] ");

    let coverage = reconstructor().coverage(&blocks, &catalog);

    assert_eq!(coverage.translated_blocks, 3);
    assert_eq!(coverage.untranslated_blocks, 0);
    assert!((coverage.coverage_percentage - 100.0).abs() < f64::EPSILON);
}

#[test]
fn test_coverage_staleUnit_shouldCountAsFuzzyNotTranslated() {
    let mut catalog = common::complete_catalog(common::SIMPLE_DOCUMENT, "[T] ");
    let edited = "# Title\n\nHello world\n\n---\n\nFarewell\n";
    let blocks = common::segment(edited);
    catalog.reconcile(&blocks);

    let coverage = reconstructor().coverage(&blocks, &catalog);

    assert_eq!(coverage.translated_blocks, 2);
    assert_eq!(coverage.fuzzy_blocks, 1);
    assert_eq!(coverage.untranslated_blocks, 0);
}

#[test]
fn test_coverage_byKind_shouldBreakDownPerKind() {
    let blocks = common::segment(common::SIMPLE_DOCUMENT);
    let catalog = common::complete_catalog(common::SIMPLE_DOCUMENT, "[T] ");

    let coverage = reconstructor().coverage(&blocks, &catalog);

    let paragraph = coverage
        .by_kind
        .iter()
        .find(|(kind, _)| *kind == BlockKind::Paragraph)
        .map(|(_, stats)| *stats)
        .unwrap();
    assert_eq!(paragraph.total, 2);
    assert_eq!(paragraph.translated, 2);

    let rule = coverage
        .by_kind
        .iter()
        .find(|(kind, _)| *kind == BlockKind::Rule)
        .map(|(_, stats)| *stats)
        .unwrap();
    assert_eq!(rule.total, 1);
    assert_eq!(rule.translatable, 0);
}

#[test]
fn test_coverage_noTranslatableBlocks_shouldReportZeroPercent() {
    let content = "---\n";
    let blocks = common::segment(content);
    let catalog = common::complete_catalog(content, "");

    let coverage = reconstructor().coverage(&blocks, &catalog);
    assert_eq!(coverage.translatable_blocks, 0);
    assert_eq!(coverage.coverage_percentage, 0.0);
}

#[test]
fn test_renderReport_shouldIncludeSummaryAndKindBreakdown() {
    let blocks = common::segment(common::SIMPLE_DOCUMENT);
    let catalog = common::complete_catalog(common::SIMPLE_DOCUMENT, "[T] ");

    let report = reconstructor().render_report("doc.md", &blocks, &catalog);

    assert!(report.contains("# Translation Report"));
    assert!(report.contains("**Source File:** doc.md"));
    assert!(report.contains("- **Total Blocks:** 4"));
    assert!(report.contains("- **Coverage:** 100.0%"));
    assert!(report.contains("- **hr:** 1 (non-translatable)"));
}
