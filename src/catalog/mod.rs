/*!
 * Persistent translation catalog.
 *
 * Translation units live in a gettext-style PO file keyed by context ID:
 *
 * - `po_file`: PO parsing and serialization
 * - `store`: the catalog itself (reconciliation, queries, persistence)
 */

// Re-export main types for easier usage
pub use self::po_file::{PoEntry, PoFile};
pub use self::store::{Catalog, CatalogStats, context_kind};

// Submodules
pub mod po_file;
pub mod store;
