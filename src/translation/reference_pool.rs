/*!
 * Reference pool for few-shot translation context.
 *
 * Maintains a growing pool of (source, translation) pairs for one document
 * run and retrieves the most similar previously translated blocks so the
 * provider sees consistent terminology and style. Similarity is a
 * Ratcliff/Obershelp sequence ratio over matched contiguous character runs.
 */

use crate::catalog::store::Catalog;

/// Pool of (source, translation) pairs used as few-shot context.
///
/// Append-only within a run: seeded from completed catalog entries, grown
/// with each newly translated unit so later units benefit from earlier
/// results in the same pass.
#[derive(Debug, Clone)]
pub struct ReferencePool {
    /// Maximum number of similar pairs returned per query
    max_results: usize,

    /// Pairs in insertion order
    pairs: Vec<(String, String)>,
}

impl ReferencePool {
    /// Create an empty pool
    pub fn new(max_results: usize) -> Self {
        ReferencePool {
            max_results,
            pairs: Vec::new(),
        }
    }

    /// Populate the pool from already-translated catalog entries.
    ///
    /// Picks up non-obsolete, non-fuzzy entries with a non-empty translation.
    pub fn seed_from_catalog(&mut self, catalog: &Catalog) {
        for entry in catalog.entries() {
            if entry.obsolete || entry.fuzzy || !entry.is_translated() {
                continue;
            }
            self.pairs.push((entry.msgid.clone(), entry.msgstr.clone()));
        }
    }

    /// Append one (source, translation) pair
    pub fn add(&mut self, source: impl Into<String>, translation: impl Into<String>) {
        self.pairs.push((source.into(), translation.into()));
    }

    /// Return the top-K most similar pairs, most similar first.
    ///
    /// Pairs whose source equals the query exactly are excluded (a unit must
    /// not use itself as its own example). Ties keep insertion order.
    pub fn find_similar(&self, source_text: &str) -> Vec<(String, String)> {
        if self.pairs.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(f64, &(String, String))> = self
            .pairs
            .iter()
            .filter(|(source, _)| source != source_text)
            .map(|pair| (sequence_ratio(source_text, &pair.0), pair))
            .collect();

        // Stable sort: equal scores keep insertion order
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        scored
            .into_iter()
            .take(self.max_results)
            .map(|(_, pair)| pair.clone())
            .collect()
    }

    /// Number of pairs in the pool
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the pool holds no pairs
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Similarity of two strings in `[0, 1]`.
///
/// Ratcliff/Obershelp: twice the total length of matched contiguous runs
/// divided by the combined length. Symmetric, 1.0 for identical strings
/// (including two empty strings), and monotone in shared-substring length.
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let combined = a_chars.len() + b_chars.len();
    if combined == 0 {
        return 1.0;
    }
    let matched = matching_chars(&a_chars, &b_chars);
    2.0 * matched as f64 / combined as f64
}

/// Total matched characters: longest common run, then recurse on both sides
fn matching_chars(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let (a_start, b_start, len) = longest_common_run(a, b);
    if len == 0 {
        return 0;
    }
    len + matching_chars(&a[..a_start], &b[..b_start])
        + matching_chars(&a[a_start + len..], &b[b_start + len..])
}

/// Longest common contiguous run of characters between two slices.
///
/// Returns (start in a, start in b, length); the earliest run wins among
/// equal lengths. Dynamic programming over one row keeps memory at O(len b).
fn longest_common_run(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0usize, 0usize, 0usize);
    let mut prev = vec![0usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        let mut curr = vec![0usize; b.len() + 1];
        for (j, &cb) in b.iter().enumerate() {
            if ca == cb {
                let run = prev[j] + 1;
                curr[j + 1] = run;
                if run > best.2 {
                    best = (i + 1 - run, j + 1 - run, run);
                }
            }
        }
        prev = curr;
    }

    best
}
