use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// This module provides functions for validating, normalizing, and matching
/// ISO 639-1 (2-letter) and ISO 639-3 (3-letter) language codes. The catalog
/// header and output filenames carry the primary subtag only, so a regional
/// code like `pt-BR` validates through its `pt` prefix.
/// Extract the primary subtag of a BCP 47 locale string (`zh-CN` → `zh`)
pub fn primary_subtag(code: &str) -> String {
    code.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or("")
        .to_lowercase()
}

/// Resolve a language code to an isolang Language
fn resolve(code: &str) -> Option<Language> {
    let subtag = primary_subtag(code);
    match subtag.len() {
        2 => Language::from_639_1(&subtag),
        3 => Language::from_639_3(&subtag),
        _ => None,
    }
}

/// Validate that a code is a recognized ISO 639-1 or 639-3 language code
pub fn validate_language_code(code: &str) -> Result<()> {
    resolve(code)
        .map(|_| ())
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// Normalize a language code to its ISO 639-1 (2-letter) form when one
/// exists, falling back to ISO 639-3
pub fn normalize_to_part1(code: &str) -> Result<String> {
    let language = resolve(code).ok_or_else(|| anyhow!("Invalid language code: {}", code))?;
    Ok(language
        .to_639_1()
        .map(|part1| part1.to_string())
        .unwrap_or_else(|| language.to_639_3().to_string()))
}

/// Whether two codes refer to the same language (`ko` matches `kor`)
pub fn language_codes_match(a: &str, b: &str) -> bool {
    match (resolve(a), resolve(b)) {
        (Some(lang_a), Some(lang_b)) => lang_a == lang_b,
        _ => primary_subtag(a) == primary_subtag(b),
    }
}

/// English name of a language code, for messages and reports
pub fn get_language_name(code: &str) -> Result<String> {
    let language = resolve(code).ok_or_else(|| anyhow!("Invalid language code: {}", code))?;
    Ok(language.to_name().to_string())
}
