// src/matching/name.rs - Name normalization and lexical similarity

use once_cell::sync::Lazy;
use regex::Regex;
use strsim::levenshtein;

/// Common Latin diacritics folded to ASCII before punctuation stripping, so
/// "Cañon City Park" and "Canon City Park" normalize identically across
/// catalogs with different encoding habits.
const DIACRITIC_SUBSTITUTIONS: [(&str, &str); 24] = [
    ("á", "a"), ("à", "a"), ("â", "a"), ("ä", "a"), ("ã", "a"), ("å", "a"),
    ("é", "e"), ("è", "e"), ("ê", "e"), ("ë", "e"),
    ("í", "i"), ("ì", "i"), ("î", "i"), ("ï", "i"),
    ("ó", "o"), ("ò", "o"), ("ô", "o"), ("ö", "o"), ("õ", "o"),
    ("ú", "u"), ("ù", "u"), ("û", "u"), ("ü", "u"),
    ("ñ", "n"),
];

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static NON_ALPHANUMERIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Canonicalizes a free-text place name for comparison.
///
/// Lowercases, folds diacritics, collapses repeated whitespace, then strips
/// apostrophes, punctuation, and the remaining interior spaces. The result is
/// a tightly packed `[a-z0-9]*` string: the similarity metric operates on
/// packed text, not word tokens. Empty or blank input yields an empty string.
pub fn normalize_name(name: &str) -> String {
    let mut normalized = name.to_lowercase();
    for (pattern, replacement) in &DIACRITIC_SUBSTITUTIONS {
        if normalized.contains(pattern) {
            normalized = normalized.replace(pattern, replacement);
        }
    }
    let collapsed = WHITESPACE_RE.replace_all(normalized.trim(), " ");
    NON_ALPHANUMERIC_RE.replace_all(&collapsed, "").into_owned()
}

/// Lexical similarity in [0,1] between two raw names.
///
/// Both names are normalized, then scored as
/// `1 - levenshtein / max(len)` over the packed strings. Either side
/// normalizing to empty scores 0.0; identical normalized names score exactly
/// 1.0. Edit distance over the full packed string is an imprecise but
/// directionally useful signal for abbreviated variants ("Yellowstone NP"
/// vs. the full name lands above 0.5, not near 1.0).
pub fn name_similarity(a: &str, b: &str) -> f64 {
    let norm_a = normalize_name(a);
    let norm_b = normalize_name(b);
    if norm_a.is_empty() || norm_b.is_empty() {
        return 0.0;
    }
    if norm_a == norm_b {
        return 1.0;
    }
    let distance = levenshtein(&norm_a, &norm_b) as f64;
    let max_len = norm_a.chars().count().max(norm_b.chars().count()) as f64;
    (1.0 - distance / max_len).clamp(0.0, 1.0)
}
