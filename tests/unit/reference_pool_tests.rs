/*!
 * Tests for reference pool seeding and retrieval
 */

use yamtwai::app_controller::Controller;
use yamtwai::catalog::store::Catalog;
use yamtwai::translation::reference_pool::ReferencePool;

use crate::common;

#[test]
fn test_seedFromCatalog_shouldPickUpOnlyCompleteEntries() {
    let mut catalog = common::complete_catalog(common::SIMPLE_DOCUMENT, "[T] ");

    // Make one entry stale; it must not be seeded
    catalog.reconcile(&common::segment("# Title\n\nHello world\n\n---\n\nChanged\n"));

    let mut pool = ReferencePool::new(5);
    pool.seed_from_catalog(&catalog);

    // Heading and first paragraph are complete; stale paragraph and the
    // untranslated rule are excluded
    assert_eq!(pool.len(), 2);
}

#[test]
fn test_seedFromCatalog_emptyCatalog_shouldLeavePoolEmpty() {
    let catalog = Catalog::new(Some("ko"), Controller::SKIP_KINDS.to_vec());
    let mut pool = ReferencePool::new(5);
    pool.seed_from_catalog(&catalog);

    assert!(pool.is_empty());
}

#[test]
fn test_findSimilar_afterSeeding_shouldRetrieveCatalogPairs() {
    let catalog = common::complete_catalog(common::SIMPLE_DOCUMENT, "[T] ");
    let mut pool = ReferencePool::new(5);
    pool.seed_from_catalog(&catalog);

    let similar = pool.find_similar("Hello words");
    assert_eq!(similar[0].0, "Hello world");
    assert_eq!(similar[0].1, "[T] Hello world");
}

#[test]
fn test_pool_growsWithinARun_shouldRankNewPairs() {
    let mut pool = ReferencePool::new(3);
    pool.add("the api returns json", "API는 JSON을 반환합니다");

    // A later unit benefits from the pair added earlier in the same run
    let similar = pool.find_similar("the api returns xml");
    assert_eq!(similar.len(), 1);
    assert_eq!(similar[0].1, "API는 JSON을 반환합니다");
}
