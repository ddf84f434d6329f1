use std::collections::HashMap;
use std::fmt;
use once_cell::sync::Lazy;
use regex::Regex;

// @module: Markdown segmentation into translation blocks

// @const: ATX heading prefix
static HEADING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(#{1,6})\s+(.*)").unwrap()
});

// @const: Code fence opener (``` or ~~~)
static FENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(```|~~~)").unwrap()
});

// @const: List item marker with captured indentation
static LIST_ITEM_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\s*)([-*+]|\d+\.)\s+").unwrap()
});

// @const: Ordered list marker
static ORDERED_MARKER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\d+\.").unwrap()
});

// @const: Table row opener
static TABLE_START_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\|").unwrap()
});

// @const: Characters that cannot appear in a heading slug
static NON_SLUG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\w\s-]").unwrap()
});

// @const: Whitespace runs collapsed into a single hyphen
static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").unwrap()
});

/// The structural kind of a markdown block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// ATX heading (`#` through `######`)
    Heading,
    /// Plain paragraph
    Paragraph,
    /// Bulleted list (`-`, `*`, `+`)
    UnorderedList,
    /// Numbered list (`1.`, `2.`, ...)
    OrderedList,
    /// Blockquote (`>`)
    Quote,
    /// Pipe table
    Table,
    /// Fenced code block
    Code,
    /// Horizontal rule
    Rule,
}

impl BlockKind {
    /// Short identifier used inside persisted context IDs.
    ///
    /// These strings are part of the catalog key format; renaming one
    /// invalidates every existing catalog.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Heading => "heading",
            BlockKind::Paragraph => "para",
            BlockKind::UnorderedList => "ulist",
            BlockKind::OrderedList => "olist",
            BlockKind::Quote => "quote",
            BlockKind::Table => "table",
            BlockKind::Code => "code",
            BlockKind::Rule => "hr",
        }
    }

    /// All kinds, in starter priority order
    pub fn all() -> &'static [BlockKind] {
        &[
            BlockKind::Code,
            BlockKind::Heading,
            BlockKind::Rule,
            BlockKind::Quote,
            BlockKind::UnorderedList,
            BlockKind::OrderedList,
            BlockKind::Table,
            BlockKind::Paragraph,
        ]
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// @struct: One contiguous span of source lines recognized as a unit
#[derive(Debug, Clone)]
pub struct Block {
    // @field: Structural kind
    pub kind: BlockKind,

    // @field: Verbatim text span (original interior line breaks, no trailing newline)
    pub text: String,

    // @field: Heading slug path at the point this block appears
    pub path: Vec<String>,

    // @field: First line offset in the source (inclusive)
    pub start: usize,

    // @field: One past the last line offset (exclusive)
    pub end: usize,

    // @field: Zero-based index among blocks sharing (path, kind)
    pub idx_in_section: usize,
}

impl Block {
    /// Stable identity of this block across runs.
    ///
    /// Derived from heading path, kind, and per-section index only, never
    /// from the text, so the same structural position maps to the same key
    /// even when the content changes.
    pub fn context_id(&self) -> String {
        format!("{}::{}:{}", self.path.join("/"), self.kind.as_str(), self.idx_in_section)
    }
}

/// Convert a heading title to a URL-friendly slug.
///
/// Lowercases, strips everything that is not a word character, whitespace or
/// hyphen, collapses whitespace runs into single hyphens, and trims hyphens.
/// An empty result falls back to `"section"`.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let cleaned = NON_SLUG_REGEX.replace_all(&lowered, "");
    let dashed = WHITESPACE_REGEX.replace_all(&cleaned, "-");
    let trimmed = dashed.trim_matches('-');
    if trimmed.is_empty() {
        "section".to_string()
    } else {
        trimmed.to_string()
    }
}

/// A line of >= 3 identical rule characters (`-`, `*`, `_`), optionally
/// space-separated. Hand-rolled because the regex crate has no backreferences.
fn is_rule(line: &str) -> bool {
    let trimmed = line.trim();
    let mut chars = trimmed.chars();
    let marker = match chars.next() {
        Some(c @ ('-' | '*' | '_')) => c,
        _ => return false,
    };
    let mut count = 1;
    for ch in chars {
        if ch == marker {
            count += 1;
        } else if ch.is_whitespace() {
            continue;
        } else {
            return false;
        }
    }
    count >= 3
}

/// Whether this line opens a block kind other than list or paragraph.
///
/// Used to decide when a list stops absorbing continuation lines.
fn is_other_block_start(line: &str) -> bool {
    FENCE_REGEX.is_match(line.trim())
        || HEADING_REGEX.is_match(line)
        || line.trim_start().starts_with('>')
        || is_rule(line)
        || (line.contains('|') && TABLE_START_REGEX.is_match(line))
}

/// Character count of the leading-whitespace capture of a list marker line
fn marker_indent(line: &str) -> usize {
    LIST_ITEM_REGEX
        .captures(line)
        .map(|caps| caps[1].chars().count())
        .unwrap_or(0)
}

/// Segments markdown documents into typed, non-overlapping blocks.
///
/// The segmenter itself is stateless: every call to [`segment`](Self::segment)
/// allocates its own slug counters and heading path, so one value can serve
/// concurrent documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownSegmenter;

impl MarkdownSegmenter {
    /// Create a new segmenter
    pub fn new() -> Self {
        MarkdownSegmenter
    }

    /// Parse markdown lines (without trailing newlines) into blocks.
    ///
    /// Blocks cover the input in disjoint, order-preserving line ranges.
    /// Blank-line-only spans are not emitted; the reconstructor copies them
    /// back verbatim from the raw lines. Nothing here is fatal: any span not
    /// recognized as a more specific kind degrades to a paragraph.
    pub fn segment(&self, lines: &[&str]) -> Vec<Block> {
        let mut blocks: Vec<Block> = Vec::new();
        let mut path: Vec<String> = Vec::new();
        let mut slug_counters: HashMap<usize, HashMap<String, usize>> = HashMap::new();
        let mut i = 0;

        while i < lines.len() {
            let line = lines[i];

            // Code fences first: their interior must never be re-scanned
            if FENCE_REGEX.is_match(line.trim()) {
                i = Self::parse_code_block(lines, i, &mut blocks, &path);
                continue;
            }

            if let Some(caps) = HEADING_REGEX.captures(line) {
                i = Self::parse_heading(lines, i, &mut blocks, &mut path, &mut slug_counters, &caps);
                continue;
            }

            if is_rule(line) {
                blocks.push(Block {
                    kind: BlockKind::Rule,
                    text: line.to_string(),
                    path: path.clone(),
                    start: i,
                    end: i + 1,
                    idx_in_section: 0,
                });
                i += 1;
                continue;
            }

            if line.trim_start().starts_with('>') {
                i = Self::parse_blockquote(lines, i, &mut blocks, &path);
                continue;
            }

            if LIST_ITEM_REGEX.is_match(line) {
                i = Self::parse_list(lines, i, &mut blocks, &path);
                continue;
            }

            if line.contains('|') && TABLE_START_REGEX.is_match(line) {
                i = Self::parse_table(lines, i, &mut blocks, &path);
                continue;
            }

            if line.trim().is_empty() {
                i += 1;
            } else {
                i = Self::parse_paragraph(lines, i, &mut blocks, &path);
            }
        }

        Self::assign_section_indices(&mut blocks);
        blocks
    }

    /// Consume a fenced code block, through the matching closing fence or to
    /// end of input if the fence is never closed.
    fn parse_code_block(lines: &[&str], start: usize, blocks: &mut Vec<Block>, path: &[String]) -> usize {
        let fence: String = lines[start].trim().chars().take(3).collect();
        let mut i = start + 1;
        while i < lines.len() && !lines[i].trim().starts_with(&fence) {
            i += 1;
        }
        i = (i + 1).min(lines.len());
        blocks.push(Block {
            kind: BlockKind::Code,
            text: lines[start..i].join("\n"),
            path: path.to_vec(),
            start,
            end: i,
            idx_in_section: 0,
        });
        i
    }

    /// Consume a heading line and update the slug path.
    ///
    /// Per-depth counters keep sibling slugs unique (`setup`, `setup-1`).
    /// Counters for depths below the new heading are discarded so that
    /// returning to a shallower depth resets deeper numbering.
    fn parse_heading(
        lines: &[&str],
        start: usize,
        blocks: &mut Vec<Block>,
        path: &mut Vec<String>,
        slug_counters: &mut HashMap<usize, HashMap<String, usize>>,
        caps: &regex::Captures,
    ) -> usize {
        let level = caps[1].len();
        let title = caps[2].trim();
        let base_slug = slugify(title);

        let level_counters = slug_counters.entry(level).or_default();
        let unique_slug = match level_counters.get(&base_slug).copied() {
            None => {
                level_counters.insert(base_slug.clone(), 0);
                base_slug
            }
            Some(count) => {
                level_counters.insert(base_slug.clone(), count + 1);
                format!("{}-{}", base_slug, count + 1)
            }
        };

        slug_counters.retain(|depth, _| *depth <= level);

        path.truncate((level - 1).min(path.len()));
        path.push(unique_slug);

        blocks.push(Block {
            kind: BlockKind::Heading,
            text: lines[start].to_string(),
            path: path.clone(),
            start,
            end: start + 1,
            idx_in_section: 0,
        });
        start + 1
    }

    /// Consume contiguous `>`-prefixed lines
    fn parse_blockquote(lines: &[&str], start: usize, blocks: &mut Vec<Block>, path: &[String]) -> usize {
        let mut i = start + 1;
        while i < lines.len() && lines[i].trim_start().starts_with('>') {
            i += 1;
        }
        blocks.push(Block {
            kind: BlockKind::Quote,
            text: lines[start..i].join("\n"),
            path: path.to_vec(),
            start,
            end: i,
            idx_in_section: 0,
        });
        i
    }

    /// Consume one list, tolerating blank-separated items and continuation
    /// prose.
    ///
    /// The continuation heuristic is intentionally permissive: any non-blank
    /// line that does not start another block kind is absorbed when it is
    /// indented at least two columns past the base marker, or when it is
    /// unindented prose (text in scripts without conventional wrapping).
    /// Existing catalogs depend on these exact boundary conditions.
    fn parse_list(lines: &[&str], start: usize, blocks: &mut Vec<Block>, path: &[String]) -> usize {
        let mut chunk: Vec<&str> = vec![lines[start]];
        let mut i = start + 1;

        let is_ordered = ORDERED_MARKER_REGEX.is_match(lines[start]);
        let kind = if is_ordered { BlockKind::OrderedList } else { BlockKind::UnorderedList };
        let base_indent = marker_indent(lines[start]);

        while i < lines.len() {
            let line = lines[i];

            if LIST_ITEM_REGEX.is_match(line) {
                let indent = marker_indent(line);
                let current_is_ordered = ORDERED_MARKER_REGEX.is_match(line);

                // A different orderedness at the base indentation starts a
                // sibling list; shallower indentation returns to the parent
                if indent == base_indent && current_is_ordered != is_ordered {
                    break;
                }
                if indent < base_indent {
                    break;
                }

                chunk.push(line);
                i += 1;
                continue;
            }

            if line.trim().is_empty() {
                // Look past further blank lines for another item of this list
                let mut next_i = i + 1;
                while next_i < lines.len() && lines[next_i].trim().is_empty() {
                    next_i += 1;
                }

                if next_i < lines.len() && LIST_ITEM_REGEX.is_match(lines[next_i]) {
                    let next_is_ordered = ORDERED_MARKER_REGEX.is_match(lines[next_i]);
                    let next_indent = marker_indent(lines[next_i]);

                    if next_indent == base_indent && next_is_ordered != is_ordered {
                        break;
                    }

                    chunk.push(line);
                    i += 1;
                    continue;
                } else {
                    break;
                }
            }

            if !line.trim().is_empty() && !is_other_block_start(line) {
                let explicit_continuation = line.chars().count() > base_indent
                    && line.starts_with(&" ".repeat(base_indent + 2));
                if explicit_continuation {
                    chunk.push(line);
                    i += 1;
                    continue;
                } else if !LIST_ITEM_REGEX.is_match(line) && !line.starts_with('#') {
                    chunk.push(line);
                    i += 1;
                    continue;
                }
            }

            break;
        }

        blocks.push(Block {
            kind,
            text: chunk.join("\n"),
            path: path.to_vec(),
            start,
            end: i,
            idx_in_section: 0,
        });
        i
    }

    /// Consume contiguous lines containing a pipe
    fn parse_table(lines: &[&str], start: usize, blocks: &mut Vec<Block>, path: &[String]) -> usize {
        let mut i = start + 1;
        while i < lines.len() && lines[i].contains('|') {
            i += 1;
        }
        blocks.push(Block {
            kind: BlockKind::Table,
            text: lines[start..i].join("\n"),
            path: path.to_vec(),
            start,
            end: i,
            idx_in_section: 0,
        });
        i
    }

    /// Consume contiguous non-blank lines that start no other block kind
    fn parse_paragraph(lines: &[&str], start: usize, blocks: &mut Vec<Block>, path: &[String]) -> usize {
        let mut i = start + 1;
        while i < lines.len()
            && !lines[i].trim().is_empty()
            && !FENCE_REGEX.is_match(lines[i].trim())
            && !HEADING_REGEX.is_match(lines[i])
            && !LIST_ITEM_REGEX.is_match(lines[i])
            && !lines[i].trim_start().starts_with('>')
            && !is_rule(lines[i])
            && !(lines[i].contains('|') && TABLE_START_REGEX.is_match(lines[i]))
        {
            i += 1;
        }
        blocks.push(Block {
            kind: BlockKind::Paragraph,
            text: lines[start..i].join("\n"),
            path: path.to_vec(),
            start,
            end: i,
            idx_in_section: 0,
        });
        i
    }

    /// Assign per-(path, kind) running indices in document order.
    ///
    /// This second pass is what keeps context IDs stable while line offsets
    /// drift between edits.
    fn assign_section_indices(blocks: &mut [Block]) {
        let mut counters: HashMap<(Vec<String>, BlockKind), usize> = HashMap::new();
        for block in blocks.iter_mut() {
            let key = (block.path.clone(), block.kind);
            let counter = counters.entry(key).or_insert(0);
            block.idx_in_section = *counter;
            *counter += 1;
        }
    }
}
