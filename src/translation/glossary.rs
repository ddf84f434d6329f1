/*!
 * Glossary support for terminology consistency.
 *
 * A glossary maps source terms to fixed translations (or to "do not
 * translate"). Terms can come from a JSON file, an inline map, or both;
 * inline entries win. Only the terms actually present in a given source
 * text are rendered into the prompt.
 */

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

/// How a glossary term must be handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermPolicy {
    /// Use this exact translation
    Translate(String),

    /// Keep the term untranslated
    KeepAsIs,
}

/// Term-to-policy mapping for one target language
#[derive(Debug, Clone, Default)]
pub struct Glossary {
    terms: BTreeMap<String, TermPolicy>,
}

impl Glossary {
    /// Create an empty glossary
    pub fn new() -> Self {
        Glossary::default()
    }

    /// Load a glossary file and/or merge inline terms for a target language.
    ///
    /// File format is JSON: values may be a plain string (exact translation),
    /// `null` (do not translate), or an object keyed by language code. Inline
    /// terms are merged on top of file terms. Returns `None` when the result
    /// holds no terms.
    pub fn resolve(
        glossary_path: Option<&Path>,
        inline: Option<&BTreeMap<String, Option<String>>>,
        target_language: &str,
    ) -> Result<Option<Glossary>> {
        let mut glossary = Glossary::new();

        if let Some(path) = glossary_path {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read glossary file: {}", path.display()))?;
            let parsed: BTreeMap<String, Value> = serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse glossary file: {}", path.display()))?;

            for (term, value) in parsed {
                match value {
                    Value::Null => {
                        glossary.terms.insert(term, TermPolicy::KeepAsIs);
                    }
                    Value::String(translation) => {
                        glossary.terms.insert(term, TermPolicy::Translate(translation));
                    }
                    Value::Object(by_locale) => {
                        // Per-locale object: only the target language applies
                        match by_locale.get(target_language) {
                            Some(Value::String(translation)) => {
                                glossary
                                    .terms
                                    .insert(term, TermPolicy::Translate(translation.clone()));
                            }
                            Some(Value::Null) => {
                                glossary.terms.insert(term, TermPolicy::KeepAsIs);
                            }
                            _ => {}
                        }
                    }
                    _ => {}
                }
            }
        }

        if let Some(inline_terms) = inline {
            for (term, value) in inline_terms {
                let policy = match value {
                    Some(translation) => TermPolicy::Translate(translation.clone()),
                    None => TermPolicy::KeepAsIs,
                };
                glossary.terms.insert(term.clone(), policy);
            }
        }

        if glossary.terms.is_empty() {
            Ok(None)
        } else {
            Ok(Some(glossary))
        }
    }

    /// Number of terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the glossary holds no terms
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Render a prompt block containing only the terms found in the source.
    ///
    /// Returns `None` when no glossary term occurs in the text.
    pub fn prompt_block(&self, source_text: &str) -> Option<String> {
        let relevant: Vec<(&String, &TermPolicy)> = self
            .terms
            .iter()
            .filter(|(term, _)| source_text.contains(term.as_str()))
            .collect();

        if relevant.is_empty() {
            return None;
        }

        let mut block = String::from("Glossary (use these exact forms, do not alter):\n");
        for (term, policy) in relevant {
            match policy {
                TermPolicy::Translate(translation) => {
                    let _ = writeln!(block, "- \"{}\" → \"{}\"", term, translation);
                }
                TermPolicy::KeepAsIs => {
                    let _ = writeln!(block, "- \"{}\" → do not translate", term);
                }
            }
        }
        // Drop the final newline added by writeln
        block.truncate(block.trim_end().len());
        Some(block)
    }
}
