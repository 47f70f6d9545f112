// ABOUTME: URL slug normalization for recipe titles and catalog entity names
// ABOUTME: Folds diacritics to base Latin letters and collapses separators into single hyphens
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Slug normalization
//!
//! Turns free-form display text into a lowercase `[a-z0-9-]` token sequence:
//!
//! 1. lower-case the input
//! 2. decompose (NFD) and drop combining marks, so `á` becomes `a`
//! 3. drop every character that is not `[a-z0-9]`, whitespace, or a hyphen
//! 4. collapse runs of whitespace and hyphens into one hyphen
//! 5. trim leading and trailing hyphens
//!
//! The function is total: text made only of disallowed characters yields an
//! empty string, and an absent input yields an absent output.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalize optional text into a slug, preserving absence
///
/// Callers that derive a slug from a possibly-missing title must check for
/// `None` before storing the result.
#[must_use]
pub fn normalize(text: Option<&str>) -> Option<String> {
    text.map(slugify)
}

/// Normalize text into a URL-safe slug
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;

    for c in text.to_lowercase().nfd().filter(|c| !is_combining_mark(*c)) {
        let c = fold_stroked_letter(c);
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '-' {
            pending_separator = true;
        }
    }

    slug
}

/// Letters whose base form is not reachable through canonical decomposition
fn fold_stroked_letter(c: char) -> char {
    match c {
        'đ' => 'd',
        'ł' => 'l',
        'ø' => 'o',
        'ħ' => 'h',
        'ı' => 'i',
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vietnamese_title_folds_to_ascii() {
        assert_eq!(slugify("Bánh Mì Kẹp Thịt"), "banh-mi-kep-thit");
        assert_eq!(slugify("Phở Bò Hà Nội"), "pho-bo-ha-noi");
        assert_eq!(slugify("Đậu Hũ Sốt Cà"), "dau-hu-sot-ca");
    }

    #[test]
    fn test_separators_collapse_and_trim() {
        assert_eq!(slugify("  --Hello   World--  "), "hello-world");
        assert_eq!(slugify("a - - b"), "a-b");
        assert_eq!(slugify("tab\tand\nnewline"), "tab-and-newline");
    }

    #[test]
    fn test_disallowed_characters_are_removed_without_separating() {
        assert_eq!(slugify("Mac & Cheese!"), "mac-cheese");
        assert_eq!(slugify("50% off"), "50-off");
        assert_eq!(slugify("rock'n'roll"), "rocknroll");
    }

    #[test]
    fn test_only_disallowed_characters_yield_empty() {
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("   "), "");
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("寿司"), "");
    }

    #[test]
    fn test_absent_input_stays_absent() {
        assert_eq!(normalize(None), None);
        assert_eq!(normalize(Some("")), Some(String::new()));
        assert_eq!(
            normalize(Some("Crème Brûlée")),
            Some("creme-brulee".to_owned())
        );
    }

    #[test]
    fn test_output_alphabet_holds_for_mixed_inputs() {
        let inputs = [
            "Bánh Mì Kẹp Thịt",
            "  Ñoquis  con  salsa ",
            "--x--",
            "Smørrebrød & Øl",
            "Grüße aus Köln - 2024",
            "-",
            "a\u{0301}\u{0301}b",
        ];
        for input in inputs {
            let slug = slugify(input);
            assert!(
                slug.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
                "unexpected character in {slug:?}"
            );
            assert!(!slug.starts_with('-'), "{slug:?} starts with hyphen");
            assert!(!slug.ends_with('-'), "{slug:?} ends with hyphen");
            assert!(!slug.contains("--"), "{slug:?} has consecutive hyphens");
        }
    }

    #[test]
    fn test_slugify_is_idempotent() {
        let once = slugify("Grüße aus Köln - 2024");
        assert_eq!(once, "grue-aus-koln-2024");
        assert_eq!(slugify(&once), once);
    }
}
