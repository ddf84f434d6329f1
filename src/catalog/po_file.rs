/*!
 * Gettext PO file parsing and serialization.
 *
 * The catalog persists as a plain-text bilingual message catalog: one entry
 * per translation unit, `msgctxt` holding the unit's context ID, `msgid` the
 * source text, `msgstr` the translation, a `#, fuzzy` flag for entries whose
 * source changed since translation, and `#~` prefixes for obsolete entries.
 * The subset implemented here round-trips everything this tool writes and is
 * tolerant about what it reads (unknown comments are skipped).
 */

use crate::errors::CatalogError;

/// A single PO catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoEntry {
    /// Unique context key (never empty for non-header entries)
    pub msgctxt: String,

    /// Source text
    pub msgid: String,

    /// Translated text, empty until the unit has been processed
    pub msgstr: String,

    /// Source text changed after the translation was produced
    pub fuzzy: bool,

    /// Context ID no longer appears in the current segmentation
    pub obsolete: bool,
}

impl PoEntry {
    /// Create a fresh untranslated entry
    pub fn new(msgctxt: impl Into<String>, msgid: impl Into<String>) -> Self {
        PoEntry {
            msgctxt: msgctxt.into(),
            msgid: msgid.into(),
            msgstr: String::new(),
            fuzzy: false,
            obsolete: false,
        }
    }

    /// Whether this entry carries a translation (fuzzy or not)
    pub fn is_translated(&self) -> bool {
        !self.msgstr.is_empty()
    }
}

/// An in-memory PO file: ordered metadata header plus ordered entries
#[derive(Debug, Clone, Default)]
pub struct PoFile {
    /// Header metadata in file order (`Language`, `Content-Type`, ...)
    pub metadata: Vec<(String, String)>,

    /// Entries in file order (document order after reconciliation)
    pub entries: Vec<PoEntry>,
}

impl PoFile {
    /// Create an empty PO file with fresh metadata.
    ///
    /// The language tag is stamped into the header when given; existing
    /// files loaded from disk keep whatever metadata they carried.
    pub fn new(language: Option<&str>) -> Self {
        let revision_date = chrono::Local::now().format("%Y-%m-%d %H:%M%z").to_string();
        let mut metadata = vec![
            ("Project-Id-Version".to_string(), format!("yamtwai {}", env!("CARGO_PKG_VERSION"))),
            ("PO-Revision-Date".to_string(), revision_date),
            ("MIME-Version".to_string(), "1.0".to_string()),
            ("Content-Type".to_string(), "text/plain; charset=UTF-8".to_string()),
            ("Content-Transfer-Encoding".to_string(), "8bit".to_string()),
        ];
        if let Some(lang) = language {
            metadata.push(("Language".to_string(), lang.to_string()));
        }
        PoFile { metadata, entries: Vec::new() }
    }

    /// Look up a metadata value by key
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Parse PO file content.
    ///
    /// Preserves entry order, flags, and obsolete markers. The header entry
    /// (empty `msgid`) becomes the metadata map.
    pub fn parse(content: &str) -> Result<PoFile, CatalogError> {
        let mut parser = PoParser::default();
        for (idx, raw_line) in content.lines().enumerate() {
            parser.feed(idx + 1, raw_line)?;
        }
        parser.finish()
    }

    /// Serialize back to PO text.
    ///
    /// Multi-line texts use the conventional wrapping: an empty first string
    /// followed by one quoted chunk per source line. Obsolete entries are
    /// prefixed with `#~`.
    pub fn render(&self) -> String {
        let mut out = String::new();

        // Header entry
        out.push_str("msgid \"\"\n");
        out.push_str("msgstr \"\"\n");
        for (key, value) in &self.metadata {
            out.push_str(&format!("\"{}: {}\\n\"\n", escape(key), escape(value)));
        }
        out.push('\n');

        for entry in &self.entries {
            let prefix = if entry.obsolete { "#~ " } else { "" };
            if entry.fuzzy {
                out.push_str("#, fuzzy\n");
            }
            write_field(&mut out, prefix, "msgctxt", &entry.msgctxt);
            write_field(&mut out, prefix, "msgid", &entry.msgid);
            write_field(&mut out, prefix, "msgstr", &entry.msgstr);
            out.push('\n');
        }

        out
    }
}

/// Write one `keyword "text"` field, wrapping multi-line text polib-style
fn write_field(out: &mut String, prefix: &str, keyword: &str, text: &str) {
    if !text.contains('\n') {
        out.push_str(&format!("{}{} \"{}\"\n", prefix, keyword, escape(text)));
        return;
    }

    out.push_str(&format!("{}{} \"\"\n", prefix, keyword));
    let parts: Vec<&str> = text.split('\n').collect();
    for (idx, part) in parts.iter().enumerate() {
        if idx + 1 < parts.len() {
            out.push_str(&format!("{}\"{}\\n\"\n", prefix, escape(part)));
        } else if !part.is_empty() {
            out.push_str(&format!("{}\"{}\"\n", prefix, escape(part)));
        }
    }
}

/// Escape a string for a quoted PO field
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out
}

/// Unescape a quoted PO string body
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Which field a continuation string attaches to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Msgctxt,
    Msgid,
    Msgstr,
}

/// Line-oriented PO parser state
#[derive(Debug)]
struct PoParser {
    file: PoFile,
    msgctxt: String,
    msgid: String,
    msgstr: String,
    fuzzy: bool,
    obsolete: bool,
    section: Section,
    seen_header: bool,
    in_entry: bool,
}

impl Default for PoParser {
    fn default() -> Self {
        PoParser {
            file: PoFile::default(),
            msgctxt: String::new(),
            msgid: String::new(),
            msgstr: String::new(),
            fuzzy: false,
            obsolete: false,
            section: Section::None,
            seen_header: false,
            in_entry: false,
        }
    }
}

impl PoParser {
    fn feed(&mut self, line_no: usize, raw_line: &str) -> Result<(), CatalogError> {
        let mut line = raw_line.trim();

        if line.is_empty() {
            self.flush();
            return Ok(());
        }

        // Obsolete entries carry a `#~` prefix on every line. The marker is
        // applied after branch processing: a field line may flush the
        // previous entry first, and the flag belongs to the new one.
        let mut line_obsolete = false;
        if let Some(rest) = line.strip_prefix("#~") {
            line_obsolete = true;
            line = rest.trim_start();
            if line.is_empty() {
                self.obsolete = true;
                return Ok(());
            }
        }

        let result = self.feed_content(line_no, line, raw_line);
        if result.is_ok() && line_obsolete {
            self.obsolete = true;
        }
        result
    }

    fn feed_content(&mut self, line_no: usize, line: &str, raw_line: &str) -> Result<(), CatalogError> {
        if let Some(flags) = line.strip_prefix("#,") {
            // A flags line always belongs to the entry that follows it
            if self.section == Section::Msgstr {
                self.flush();
            }
            if flags.split(',').any(|flag| flag.trim() == "fuzzy") {
                self.fuzzy = true;
            }
            return Ok(());
        }

        // Translator/extracted comments and references are not tracked
        if line.starts_with('#') {
            return Ok(());
        }

        if let Some(rest) = line.strip_prefix("msgctxt") {
            self.flush();
            self.msgctxt = parse_quoted(line_no, rest)?;
            self.section = Section::Msgctxt;
            self.in_entry = true;
            return Ok(());
        }

        if let Some(rest) = line.strip_prefix("msgstr") {
            self.msgstr = parse_quoted(line_no, rest)?;
            self.section = Section::Msgstr;
            self.in_entry = true;
            return Ok(());
        }

        if let Some(rest) = line.strip_prefix("msgid") {
            if self.section == Section::Msgstr {
                self.flush();
            }
            self.msgid = parse_quoted(line_no, rest)?;
            self.section = Section::Msgid;
            self.in_entry = true;
            return Ok(());
        }

        if line.starts_with('"') {
            let chunk = parse_quoted(line_no, line)?;
            match self.section {
                Section::Msgctxt => self.msgctxt.push_str(&chunk),
                Section::Msgid => self.msgid.push_str(&chunk),
                Section::Msgstr => self.msgstr.push_str(&chunk),
                Section::None => {
                    return Err(CatalogError::Malformed {
                        line: line_no,
                        message: "continuation string outside any field".to_string(),
                    });
                }
            }
            return Ok(());
        }

        Err(CatalogError::Malformed {
            line: line_no,
            message: format!("unrecognized line: {}", raw_line.trim()),
        })
    }

    fn finish(mut self) -> Result<PoFile, CatalogError> {
        self.flush();
        Ok(self.file)
    }

    fn flush(&mut self) {
        if !self.in_entry {
            // A dangling flags line before the next entry still applies to it
            return;
        }

        if self.msgid.is_empty() && self.msgctxt.is_empty() && !self.seen_header {
            // Header entry: msgstr holds `Key: value\n` metadata lines
            for meta_line in self.msgstr.split('\n') {
                if let Some((key, value)) = meta_line.split_once(':') {
                    self.file
                        .metadata
                        .push((key.trim().to_string(), value.trim().to_string()));
                }
            }
            self.seen_header = true;
        } else {
            self.file.entries.push(PoEntry {
                msgctxt: std::mem::take(&mut self.msgctxt),
                msgid: std::mem::take(&mut self.msgid),
                msgstr: std::mem::take(&mut self.msgstr),
                fuzzy: self.fuzzy,
                obsolete: self.obsolete,
            });
        }

        self.msgctxt.clear();
        self.msgid.clear();
        self.msgstr.clear();
        self.fuzzy = false;
        self.obsolete = false;
        self.section = Section::None;
        self.in_entry = false;
    }
}

/// Extract the body of a `"..."` quoted string
fn parse_quoted(line_no: usize, rest: &str) -> Result<String, CatalogError> {
    let trimmed = rest.trim();
    let body = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or_else(|| CatalogError::Malformed {
            line: line_no,
            message: format!("expected quoted string, got: {}", trimmed),
        })?;
    Ok(unescape(body))
}
