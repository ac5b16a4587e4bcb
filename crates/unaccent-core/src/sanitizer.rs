use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// Maps arbitrary text to an ASCII approximation.
///
/// Must be total: characters without a mapping are dropped, never an error.
pub type Transliterate = fn(&str) -> String;

/// Default transliteration backed by `deunicode`, dropping unmapped characters.
pub fn deunicode_transliterate(value: &str) -> String {
    deunicode::deunicode_with_tofu(value, "")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SanitizeConfig {
    /// Turn every remaining space into `_` after whitespace has been collapsed.
    pub replace_spaces: bool,
}

// Both patterns are literals; compilation cannot fail.
fn forbidden_chars() -> &'static Regex {
    static FORBIDDEN: OnceLock<Regex> = OnceLock::new();
    FORBIDDEN.get_or_init(|| Regex::new(r#"[\\/:*?"<>|]"#).unwrap())
}

fn whitespace_runs() -> &'static Regex {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

pub struct Sanitizer {
    config: SanitizeConfig,
    transliterate: Transliterate,
}

impl Sanitizer {
    pub fn new(config: SanitizeConfig) -> Self {
        Self::with_transliterator(config, deunicode_transliterate)
    }

    pub fn with_transliterator(config: SanitizeConfig, transliterate: Transliterate) -> Self {
        Self { config, transliterate }
    }

    pub fn config(&self) -> SanitizeConfig {
        self.config
    }

    /// Produce the normalized, filesystem-safe form of a single name.
    ///
    /// # Steps
    /// - Transliterate to ASCII (`"Báo cáo"` becomes `"Bao cao"`).
    /// - Decode literal `%20` sequences to a space.
    /// - Replace each of `\ / : * ? " < > |` with `_`, whatever the host platform.
    /// - Collapse whitespace runs to one space and trim both ends.
    /// - With `replace_spaces`, turn the remaining spaces into `_`.
    ///
    /// The result is stable under repeated application.
    pub fn sanitize(&self, name: &str) -> String {
        let transliterated = (self.transliterate)(name);
        let decoded = transliterated.replace("%20", " ");
        let replaced = forbidden_chars().replace_all(&decoded, "_");
        let collapsed = whitespace_runs().replace_all(&replaced, " ");
        let trimmed = collapsed.trim();

        let sanitized = if self.config.replace_spaces {
            trimmed.replace(' ', "_")
        } else {
            trimmed.to_string()
        };

        if sanitized != name {
            debug!("Sanitized name: '{}' -> '{}'", name, sanitized);
        }
        sanitized
    }
}

/// Convenience wrapper for one-off sanitization with the default transliterator.
///
/// The patterns are compiled once per process, so calling this in a loop only
/// costs the transliteration itself.
pub fn sanitize(name: &str, config: SanitizeConfig) -> String {
    Sanitizer::new(config).sanitize(name)
}
