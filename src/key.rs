//! Key normalization.
//!
//! Keys are compared as text. A [`Symbol`](crate::Symbol) and a string with
//! the same name address the same entry. Two key shapes are recognised:
//! indexed scalars (`born_on(1i)`, the multi-part fields a date select posts)
//! and fields-for indices (`"0"`, `"-1"`).

use regex::Regex;
use std::sync::LazyLock;

static FIELDS_FOR_INDEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A-?[0-9]+\z").unwrap_or_else(|e| unreachable!("static pattern: {e}"))
});

/// Canonical form of a key given as text or symbolic name.
pub fn normalize_key(key: impl AsRef<str>) -> String {
    key.as_ref().to_string()
}

/// Whether `key` is a (possibly negative) decimal index.
pub fn is_fields_for_index(key: &str) -> bool {
    FIELDS_FOR_INDEX.is_match(key)
}

/// Recognises `<name>(<digits>[i|f])` siblings of a scalar declaration.
#[derive(Debug, Clone, Copy)]
pub struct IndexedKeyMatcher<'a> {
    name: &'a str,
}

impl<'a> IndexedKeyMatcher<'a> {
    pub fn new(name: &'a str) -> Self {
        Self { name }
    }

    pub fn matches(&self, key: &str) -> bool {
        let Some(part) = key
            .strip_prefix(self.name)
            .and_then(|rest| rest.strip_prefix('('))
            .and_then(|rest| rest.strip_suffix(')'))
        else {
            return false;
        };
        let digits = part.strip_suffix(|c| c == 'i' || c == 'f').unwrap_or(part);
        !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
    }
}
