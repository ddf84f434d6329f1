/*!
 * Markdown document handling.
 *
 * This module splits a document into stable, identifiable blocks and merges
 * catalog translations back into the original document shape:
 *
 * - `segmenter`: single-pass block recognition and context identity
 * - `reconstructor`: document rebuild and coverage reporting
 */

// Re-export main types for easier usage
pub use self::reconstructor::{CoverageReport, DocumentReconstructor, KindCoverage};
pub use self::segmenter::{Block, BlockKind, MarkdownSegmenter};

// Submodules
pub mod reconstructor;
pub mod segmenter;
