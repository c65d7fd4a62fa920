use lazy_static::lazy_static;
use regex::Regex;
use unidecode::unidecode;

lazy_static! {
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// Trims a free-text label and collapses inner whitespace runs to one space.
pub fn normalize_label(raw: &str) -> String {
    WHITESPACE_RE.replace_all(raw.trim(), " ").into_owned()
}

/// Accent- and case-insensitive key used to compare labels
/// ("Matemática" and "matematica" fold to the same key).
pub fn fold_label(raw: &str) -> String {
    unidecode(&normalize_label(raw)).to_lowercase()
}
