/*!
 * Tests for catalog reconciliation, queries, and persistence
 */

use tempfile::TempDir;

use yamtwai::app_controller::Controller;
use yamtwai::catalog::store::{Catalog, context_kind};

use crate::common;

fn fresh_catalog() -> Catalog {
    Catalog::new(Some("ko"), Controller::SKIP_KINDS.to_vec())
}

#[test]
fn test_contextKind_shouldExtractKindBetweenSeparators() {
    assert_eq!(context_kind("intro/setup::para:3"), Some("para"));
    assert_eq!(context_kind("::hr:0"), Some("hr"));
    assert_eq!(context_kind("no separators"), None);
}

#[test]
fn test_reconcile_freshCatalog_shouldInsertEveryBlock() {
    let blocks = common::segment(common::SIMPLE_DOCUMENT);
    let mut catalog = fresh_catalog();

    let purged = catalog.reconcile(&blocks);

    assert_eq!(purged, 0);
    assert_eq!(catalog.entries().len(), 4);
    let stats = catalog.stats();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.complete, 0);
    assert_eq!(stats.pending_new, 4);
    assert_eq!(stats.pending_stale, 0);
}

#[test]
fn test_reconcile_unchangedInput_shouldBeIdempotent() {
    let blocks = common::segment(common::KITCHEN_SINK_DOCUMENT);
    let mut catalog = fresh_catalog();

    catalog.reconcile(&blocks);
    let first = catalog.stats();

    let purged = catalog.reconcile(&blocks);
    let second = catalog.stats();

    assert_eq!(purged, 0);
    assert_eq!(first, second);
}

#[test]
fn test_reconcile_editedParagraph_shouldMarkExactlyOneStale() {
    // Scenario: translate everything, then edit only the second paragraph
    let mut catalog = common::complete_catalog(common::SIMPLE_DOCUMENT, "[T] ");

    let edited = "# Title\n\nHello world\n\n---\n\nFarewell\n";
    let purged = catalog.reconcile(&common::segment(edited));

    assert_eq!(purged, 0);
    let stats = catalog.stats();
    assert_eq!(stats.pending_stale, 1);
    assert_eq!(stats.complete, 2);

    let stale = catalog.entry("title::para:1").unwrap();
    assert!(stale.fuzzy);
    assert_eq!(stale.msgid, "Farewell");
    // The previous translation is retained, not cleared
    assert_eq!(stale.msgstr, "[T] Goodbye");

    // Everything else is untouched
    assert!(!catalog.entry("title::heading:0").unwrap().fuzzy);
    assert!(!catalog.entry("title::para:0").unwrap().fuzzy);
}

#[test]
fn test_reconcile_removedBlock_shouldPurgeItsEntry() {
    let mut catalog = common::complete_catalog(common::SIMPLE_DOCUMENT, "[T] ");
    let count_before = catalog.entries().len();

    let shortened = "# Title\n\nHello world\n\n---\n";
    let purged = catalog.reconcile(&common::segment(shortened));

    assert_eq!(purged, 1);
    assert_eq!(catalog.entries().len(), count_before - 1);
    assert!(catalog.entry("title::para:1").is_none());
    assert_eq!(catalog.stats().obsolete, 0, "purge happens in the same pass");
}

#[test]
fn test_reconcile_skipKindTextChange_shouldNeverGoStale() {
    let mut catalog = fresh_catalog();
    catalog.reconcile(&common::segment("intro\n\n---\n"));

    let rule_ctx = "::hr:0";
    assert_eq!(catalog.entry(rule_ctx).unwrap().msgid, "---");

    catalog.reconcile(&common::segment("intro\n\n- - -\n"));

    let rule = catalog.entry(rule_ctx).unwrap();
    assert_eq!(rule.msgid, "- - -", "source updated silently");
    assert!(!rule.fuzzy);
}

#[test]
fn test_reconcile_staleEntryEditedAgain_shouldStayStaleOnce() {
    let mut catalog = common::complete_catalog("para\n", "[T] ");

    catalog.reconcile(&common::segment("edited once\n"));
    catalog.reconcile(&common::segment("edited twice\n"));

    let stats = catalog.stats();
    assert_eq!(stats.pending_stale, 1);
    assert_eq!(catalog.entry("::para:0").unwrap().msgid, "edited twice");
}

#[test]
fn test_pendingIds_shouldExcludeSkipAndComplete() {
    let mut catalog = common::complete_catalog(common::SIMPLE_DOCUMENT, "[T] ");

    // All translatable entries complete, rule skipped: nothing pending
    assert!(catalog.pending_ids().is_empty());

    // Edit one paragraph: exactly that unit becomes pending again
    catalog.reconcile(&common::segment("# Title\n\nHello world\n\n---\n\nChanged\n"));
    assert_eq!(catalog.pending_ids(), vec!["title::para:1".to_string()]);
}

#[test]
fn test_pendingIds_shouldFollowStoreOrder() {
    let mut catalog = fresh_catalog();
    catalog.reconcile(&common::segment(common::SIMPLE_DOCUMENT));

    let pending = catalog.pending_ids();
    assert_eq!(
        pending,
        vec![
            "title::heading:0".to_string(),
            "title::para:0".to_string(),
            "title::para:1".to_string(),
        ]
    );
}

#[test]
fn test_markComplete_shouldClearStaleFlag() {
    let mut catalog = common::complete_catalog("para\n", "[T] ");
    catalog.reconcile(&common::segment("edited\n"));
    assert_eq!(catalog.fuzzy_entries().len(), 1);

    catalog.set_translation("::para:0", "[T] edited");
    catalog.mark_complete("::para:0");

    assert!(catalog.fuzzy_entries().is_empty());
    assert_eq!(catalog.stats().complete, 1);
}

#[test]
fn test_resetSeed_shouldSeedTranslationsWithSource() {
    let mut catalog = common::complete_catalog(common::SIMPLE_DOCUMENT, "[T] ");

    let blocks = common::segment(common::SIMPLE_DOCUMENT);
    catalog.reset_seed(&blocks);

    assert_eq!(catalog.entries().len(), 4);
    for entry in catalog.entries() {
        let is_rule = context_kind(&entry.msgctxt) == Some("hr");
        if is_rule {
            assert!(entry.msgstr.is_empty(), "skip kinds stay untranslated");
        } else {
            assert_eq!(entry.msgstr, entry.msgid, "translation seeded from source");
        }
        assert!(!entry.fuzzy);
    }

    // Language metadata survives the rebuild
    assert_eq!(catalog.metadata_value("Language"), Some("ko"));
    assert!(catalog.pending_ids().is_empty());
}

#[test]
fn test_saveAndLoad_shouldPreserveEntriesAndFlags() {
    let tmp = TempDir::new().unwrap();
    let po_path = tmp.path().join("nested").join("doc.po");

    let mut catalog = common::complete_catalog(common::SIMPLE_DOCUMENT, "[T] ");
    catalog.reconcile(&common::segment("# Title\n\nHello world\n\n---\n\nChanged\n"));

    catalog.save(&po_path).unwrap();
    assert!(po_path.exists(), "save creates parent directories");

    let reloaded =
        Catalog::load_or_create(&po_path, Some("ko"), Controller::SKIP_KINDS.to_vec()).unwrap();

    assert_eq!(reloaded.entries(), catalog.entries());
    assert_eq!(reloaded.metadata_value("Language"), Some("ko"));
    assert_eq!(reloaded.stats(), catalog.stats());
}

#[test]
fn test_loadOrCreate_missingFile_shouldStartEmptyWithLanguage() {
    let tmp = TempDir::new().unwrap();
    let catalog = Catalog::load_or_create(
        &tmp.path().join("absent.po"),
        Some("fr"),
        Controller::SKIP_KINDS.to_vec(),
    )
    .unwrap();

    assert!(catalog.entries().is_empty());
    assert_eq!(catalog.metadata_value("Language"), Some("fr"));
}

#[test]
fn test_loadOrCreate_corruptFile_shouldFail() {
    let tmp = TempDir::new().unwrap();
    let po_path = common::write_file(tmp.path(), "bad.po", "msgid \"unterminated\nnonsense here\n");

    let result = Catalog::load_or_create(&po_path, Some("ko"), Controller::SKIP_KINDS.to_vec());
    assert!(result.is_err());
}

#[test]
fn test_reconcile_multilineBlocks_shouldRoundTripThroughDisk() {
    let tmp = TempDir::new().unwrap();
    let po_path = tmp.path().join("doc.po");

    let content = "- item one\n- item two\n\n> quoted\n> lines\n";
    let mut catalog = fresh_catalog();
    catalog.reconcile(&common::segment(content));
    catalog.save(&po_path).unwrap();

    let reloaded =
        Catalog::load_or_create(&po_path, Some("ko"), Controller::SKIP_KINDS.to_vec()).unwrap();
    assert_eq!(
        reloaded.entry("::ulist:0").unwrap().msgid,
        "- item one\n- item two"
    );
    assert_eq!(reloaded.entry("::quote:0").unwrap().msgid, "> quoted\n> lines");
}
