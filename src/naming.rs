//! Identifier conversion.
//!
//! The compiler never invents casing rules of its own: every identifier goes
//! through a [`NamingConvention`] supplied by the caller, wrapped in a [`Namer`]
//! that applies the configured type prefix/suffix.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Converts a schema name into a target identifier.
///
/// `transform_underscore` asks the convention to treat `_` as a word
/// separator instead of preserving it.
pub trait NamingConvention: Send + Sync {
    fn convert(&self, name: &str, transform_underscore: bool) -> String;
}

impl<F> NamingConvention for F
where
    F: Fn(&str, bool) -> String + Send + Sync,
{
    fn convert(&self, name: &str, transform_underscore: bool) -> String {
        self(name, transform_underscore)
    }
}

/// Built-in conventions selectable from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BuiltinConvention {
    #[default]
    PascalCase,
    Keep,
}

impl NamingConvention for BuiltinConvention {
    fn convert(&self, name: &str, transform_underscore: bool) -> String {
        match self {
            BuiltinConvention::Keep => name.to_string(),
            BuiltinConvention::PascalCase if transform_underscore => pascal_case(name),
            BuiltinConvention::PascalCase => {
                name.split('_').map(pascal_case).collect::<Vec<_>>().join("_")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertOptions {
    pub use_types_prefix: bool,
    pub use_types_suffix: bool,
    pub transform_underscore: bool,
}

impl ConvertOptions {
    /// Prefix and suffix both applied; the default for type names.
    pub fn types() -> Self {
        Self { use_types_prefix: true, use_types_suffix: true, transform_underscore: false }
    }
    pub fn bare() -> Self {
        Self::default()
    }
}

pub struct Namer<'a> {
    convention: &'a dyn NamingConvention,
    types_prefix: &'a str,
    types_suffix: &'a str,
}

impl<'a> Namer<'a> {
    pub fn new(convention: &'a dyn NamingConvention, types_prefix: &'a str, types_suffix: &'a str) -> Self {
        Self { convention, types_prefix, types_suffix }
    }

    pub fn convert(&self, name: &str, opts: ConvertOptions) -> String {
        let mut out = String::new();
        if opts.use_types_prefix {
            out.push_str(self.types_prefix);
        }
        out.push_str(&self.convention.convert(name, opts.transform_underscore));
        if opts.use_types_suffix {
            out.push_str(self.types_suffix);
        }
        out
    }

    pub fn type_name(&self, name: &str) -> String {
        self.convert(name, ConvertOptions::types())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

static LOWER_UPPER: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").unwrap());
static UPPER_UPPER_LOWER: Lazy<Regex> = Lazy::new(|| Regex::new(r"([A-Z])([A-Z][a-z])").unwrap());
static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9]+").unwrap());

fn split_words(input: &str) -> Vec<String> {
    let spaced = LOWER_UPPER.replace_all(input, "$1\u{0}$2");
    let spaced = UPPER_UPPER_LOWER.replace_all(&spaced, "$1\u{0}$2");
    let spaced = NON_ALNUM.replace_all(&spaced, "\u{0}");
    spaced
        .split('\u{0}')
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// `user_profile` → `UserProfile`, `HTTPServer` → `HttpServer`, `v 1` → `V_1`.
pub fn pascal_case(input: &str) -> String {
    split_words(input)
        .iter()
        .enumerate()
        .map(|(index, word)| {
            let mut chars = word.chars();
            let Some(first) = chars.next() else { return String::new() };
            let rest = chars.as_str().to_lowercase();
            if index > 0 && first.is_ascii_digit() {
                format!("_{first}{rest}")
            } else {
                format!("{}{rest}", first.to_uppercase())
            }
        })
        .collect()
}
