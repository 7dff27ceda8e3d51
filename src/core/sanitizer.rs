//! Name sanitization for library paths.
//!
//! Both flavors share one pipeline:
//! 1. Delete configured prefixes (every occurrence, not only a leading one)
//! 2. Replace forbidden characters and ellipsis tokens with a space
//! 3. Replace `4k` (any case) with `UHD`
//! 4. Collapse whitespace and trim
//!
//! The directory flavor keeps `[` and `]`; the file flavor replaces them too.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

use crate::config::NamingConfig;

/// Characters that break paths on at least one supported filesystem
pub const FORBIDDEN_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Characters only file names reject
pub const BRACKET_CHARS: &[char] = &['[', ']'];

/// Ellipsis tokens removed from names
pub const ELLIPSIS_TOKENS: &[&str] = &["...", "\u{2026}"];

static QUALITY_TOKEN: OnceLock<Regex> = OnceLock::new();

fn quality_token() -> &'static Regex {
    QUALITY_TOKEN.get_or_init(|| Regex::new(r"(?i)4k").expect("quality token pattern is valid"))
}

/// Which path component a name is sanitized for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameFlavor {
    /// Directory component; brackets are kept
    Directory,

    /// File stem; brackets are replaced as well
    File,
}

impl NameFlavor {
    /// Whether `c` must not appear in a name of this flavor
    pub fn is_forbidden(self, c: char) -> bool {
        FORBIDDEN_CHARS.contains(&c)
            || c.is_control()
            || (self == NameFlavor::File && BRACKET_CHARS.contains(&c))
    }
}

/// Sanitizes display names and group labels into path components
#[derive(Debug, Clone, Default)]
pub struct NameSanitizer {
    prefixes: Vec<String>,
}

impl NameSanitizer {
    /// Create a sanitizer that deletes the given prefixes
    pub fn new(prefixes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            prefixes: prefixes
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.is_empty())
                .collect(),
        }
    }

    /// Create a sanitizer from the naming section of the configuration
    pub fn from_config(naming: &NamingConfig) -> Self {
        Self::new(naming.strip_prefixes.iter().cloned())
    }

    /// Prefixes deleted from every name
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Sanitize a directory component
    pub fn directory(&self, name: &str) -> String {
        self.sanitize(name, NameFlavor::Directory)
    }

    /// Sanitize a file stem
    pub fn file(&self, name: &str) -> String {
        self.sanitize(name, NameFlavor::File)
    }

    /// Run the full pipeline. The result may be empty for degenerate input.
    pub fn sanitize(&self, name: &str, flavor: NameFlavor) -> String {
        let mut name = Cow::Borrowed(name);

        for prefix in &self.prefixes {
            if name.contains(prefix.as_str()) {
                name = Cow::Owned(name.replace(prefix.as_str(), ""));
            }
        }

        for token in ELLIPSIS_TOKENS {
            if name.contains(token) {
                name = Cow::Owned(name.replace(token, " "));
            }
        }

        let replaced: String = name
            .chars()
            .map(|c| if flavor.is_forbidden(c) { ' ' } else { c })
            .collect();

        quality_token()
            .replace_all(&replaced, "UHD")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }
}
