/*!
 * Durable catalog of translation units.
 *
 * The catalog maps stable context IDs to (source, translation) pairs and is
 * the single place where unit lifecycle state changes: reconciliation against
 * a fresh segmentation decides what is new, unchanged, stale, or obsolete,
 * by content comparison rather than timestamps.
 */

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::Path;
use log::{debug, info};

use crate::catalog::po_file::{PoEntry, PoFile};
use crate::errors::CatalogError;
use crate::markdown::segmenter::{Block, BlockKind};

/// Extract the block kind name out of a context ID (`path::kind:idx`)
pub fn context_kind(context_id: &str) -> Option<&str> {
    let start = context_id.find("::")? + 2;
    let end = context_id[start..].find(':')? + start;
    Some(&context_id[start..end])
}

/// Aggregate entry counts by lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogStats {
    /// Non-obsolete entries
    pub total: usize,

    /// Translated, not stale
    pub complete: usize,

    /// Never translated
    pub pending_new: usize,

    /// Translated but source changed since (fuzzy)
    pub pending_stale: usize,

    /// Marked obsolete (only non-zero between mark and purge)
    pub obsolete: usize,
}

/// Persistent store of translation units keyed by context ID.
///
/// A catalog instance must be owned by exactly one in-flight document
/// operation; independent documents get independent catalogs.
#[derive(Debug, Clone)]
pub struct Catalog {
    po: PoFile,
    skip_kinds: Vec<BlockKind>,
}

impl Catalog {
    /// Create an empty catalog with fresh metadata
    pub fn new(target_language: Option<&str>, skip_kinds: Vec<BlockKind>) -> Self {
        Catalog {
            po: PoFile::new(target_language),
            skip_kinds,
        }
    }

    /// Load an existing catalog file, or initialize an empty one.
    ///
    /// Existing files keep all entry fields and flags and their metadata;
    /// the target language only stamps newly created catalogs. Read or parse
    /// failures are fatal for the document run.
    pub fn load_or_create(
        path: &Path,
        target_language: Option<&str>,
        skip_kinds: Vec<BlockKind>,
    ) -> Result<Self, CatalogError> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let po = PoFile::parse(&content)?;
            debug!("Loaded catalog with {} entries from {}", po.entries.len(), path.display());
            Ok(Catalog { po, skip_kinds })
        } else {
            debug!("No catalog at {}, starting empty", path.display());
            Ok(Catalog::new(target_language, skip_kinds))
        }
    }

    /// All entries in file order
    pub fn entries(&self) -> &[PoEntry] {
        &self.po.entries
    }

    /// Header metadata lookup
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.po.metadata_value(key)
    }

    /// Whether a block kind is exempt from translation and staleness tracking
    pub fn is_skip_kind(&self, kind: BlockKind) -> bool {
        self.skip_kinds.contains(&kind)
    }

    fn is_skip_context(&self, context_id: &str) -> bool {
        context_kind(context_id)
            .map(|kind| self.skip_kinds.iter().any(|k| k.as_str() == kind))
            .unwrap_or(false)
    }

    /// First non-obsolete entry for a context ID
    pub fn entry(&self, context_id: &str) -> Option<&PoEntry> {
        self.po
            .entries
            .iter()
            .find(|e| e.msgctxt == context_id && !e.obsolete)
    }

    fn entry_mut(&mut self, context_id: &str) -> Option<&mut PoEntry> {
        self.po
            .entries
            .iter_mut()
            .find(|e| e.msgctxt == context_id && !e.obsolete)
    }

    /// Reconcile the store against a fresh segmentation.
    ///
    /// For every block, resolved by context ID:
    /// - absent: insert a new untranslated entry;
    /// - present, skip kind: overwrite the source silently, never fuzzy;
    /// - present, source unchanged: no-op;
    /// - present, source changed: overwrite the source and set fuzzy,
    ///   keeping the existing translation.
    ///
    /// Entries not visited by any block are marked obsolete, then purged in
    /// the same pass. Idempotent for identical input. Returns the number of
    /// entries purged.
    pub fn reconcile(&mut self, blocks: &[Block]) -> usize {
        let mut seen: HashSet<String> = HashSet::with_capacity(blocks.len());

        for block in blocks {
            let context_id = block.context_id();
            let is_skip = self.is_skip_kind(block.kind);

            match self.po.entries.iter().position(|e| e.msgctxt == context_id) {
                None => {
                    self.po.entries.push(PoEntry::new(context_id.clone(), block.text.clone()));
                }
                Some(idx) => {
                    let entry = &mut self.po.entries[idx];
                    if is_skip {
                        entry.msgid = block.text.clone();
                    } else if entry.msgid != block.text {
                        entry.msgid = block.text.clone();
                        entry.fuzzy = true;
                        debug!("Entry {} went stale", context_id);
                    }
                }
            }

            seen.insert(context_id);
        }

        for entry in &mut self.po.entries {
            if !seen.contains(&entry.msgctxt) {
                entry.obsolete = true;
            }
        }

        let before = self.po.entries.len();
        self.po.entries.retain(|e| !e.obsolete);
        let purged = before - self.po.entries.len();
        if purged > 0 {
            info!("Purged {} obsolete catalog entries", purged);
        }
        purged
    }

    /// Discard the store and rebuild it from a segmentation, seeding every
    /// translatable entry with `translation = source`.
    ///
    /// This is the re-synchronization path after structural edits: the
    /// document's own shape changed, so positional identity is rebuilt from
    /// scratch and every unit starts out "already translated" with its own
    /// text. Deliberately distinct from [`reconcile`](Self::reconcile).
    pub fn reset_seed(&mut self, blocks: &[Block]) {
        let language = self.po.metadata_value("Language").map(str::to_string);
        self.po = PoFile::new(language.as_deref());

        for block in blocks {
            let context_id = block.context_id();
            let mut entry = PoEntry::new(context_id, block.text.clone());
            if !self.is_skip_kind(block.kind) {
                entry.msgstr = block.text.clone();
            }
            self.po.entries.push(entry);
        }
    }

    /// Context IDs of units that still need processing, in store order:
    /// non-obsolete, non-skip, and either never translated or stale.
    pub fn pending_ids(&self) -> Vec<String> {
        self.po
            .entries
            .iter()
            .filter(|e| !e.obsolete)
            .filter(|e| !self.is_skip_context(&e.msgctxt))
            .filter(|e| e.msgstr.is_empty() || e.fuzzy)
            .map(|e| e.msgctxt.clone())
            .collect()
    }

    /// Entries whose source changed after translation (stale only)
    pub fn fuzzy_entries(&self) -> Vec<&PoEntry> {
        self.po
            .entries
            .iter()
            .filter(|e| !e.obsolete && e.fuzzy)
            .collect()
    }

    /// Store a translation for a unit (leaves staleness untouched)
    pub fn set_translation(&mut self, context_id: &str, translation: &str) {
        if let Some(entry) = self.entry_mut(context_id) {
            entry.msgstr = translation.to_string();
        }
    }

    /// Mark a unit complete by clearing its stale flag.
    ///
    /// Called exactly once per unit the orchestrator successfully fills.
    pub fn mark_complete(&mut self, context_id: &str) {
        if let Some(entry) = self.entry_mut(context_id) {
            entry.fuzzy = false;
        }
    }

    /// Aggregate counts by lifecycle status
    pub fn stats(&self) -> CatalogStats {
        let mut stats = CatalogStats::default();
        for entry in &self.po.entries {
            if entry.obsolete {
                stats.obsolete += 1;
                continue;
            }
            stats.total += 1;
            if entry.fuzzy {
                stats.pending_stale += 1;
            } else if entry.is_translated() {
                stats.complete += 1;
            } else {
                stats.pending_new += 1;
            }
        }
        stats
    }

    /// Persist the catalog to disk, creating parent directories as needed.
    ///
    /// Writes through a temporary file in the target directory so a crashed
    /// save never leaves a truncated catalog behind.
    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
        let mut tmp = match parent {
            Some(dir) => tempfile::NamedTempFile::new_in(dir),
            None => tempfile::NamedTempFile::new(),
        }
        .map_err(|e| CatalogError::Persist(e.to_string()))?;

        tmp.write_all(self.po.render().as_bytes())
            .map_err(|e| CatalogError::Persist(e.to_string()))?;
        tmp.persist(path)
            .map_err(|e| CatalogError::Persist(e.to_string()))?;

        debug!("Saved catalog ({} entries) to {}", self.po.entries.len(), path.display());
        Ok(())
    }
}
