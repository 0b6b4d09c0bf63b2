//! Rename rule tables: CUDA names to their HIP/ROC equivalents.
//!
//! Three tables share one entry shape: identifiers (types, functions,
//! enumerators), include filenames, and device-function names that are
//! only safe to rename once a call has been resolved to device code.
//! Tables are built once, optionally extended from a user TOML file, and
//! immutable afterwards; lookup is pure.

mod custom;
mod device;
mod identifiers;
mod includes;

pub use custom::RulesError;

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;

/// Which output dialect names are active for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TranslationMode {
    #[default]
    Hip,
    Roc,
}

/// What a table row converts. Mirrors the statistics buckets; the include
/// rewriter branches on the two include kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvKind {
    /// Plain identifier rename.
    Identifier,
    /// Name matched inside a string literal.
    Literal,
    /// Header substitution for an API's main header, deduplicated per
    /// category and satisfying the runtime-header requirement.
    IncludeMainHeader,
    /// Ordinary header substitution.
    Include,
    /// Kernel-launch conversion (synthetic counter).
    Execution,
    /// Memory-space conversion (synthetic counter).
    Memory,
}

/// API family a rule belongs to. Header deduplication is keyed on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiCategory {
    Driver,
    Runtime,
    Blas,
    Rand,
    Dnn,
    Fft,
    Complex,
    Sparse,
}

impl ApiCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiCategory::Driver => "driver",
            ApiCategory::Runtime => "runtime",
            ApiCategory::Blas => "blas",
            ApiCategory::Rand => "rand",
            ApiCategory::Dnn => "dnn",
            ApiCategory::Fft => "fft",
            ApiCategory::Complex => "complex",
            ApiCategory::Sparse => "sparse",
        }
    }
}

/// How completely the target dialect covers a source name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportDegree {
    Supported,
    /// Translated, but the construct is deprecated; a warning is emitted.
    Deprecated,
    /// No translation exists; a warning is emitted and nothing is patched.
    Unsupported,
}

/// One rename rule. `roc` may be empty, meaning the HIP name is also the
/// ROC name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleEntry {
    pub hip: Cow<'static, str>,
    pub roc: Cow<'static, str>,
    pub kind: ConvKind,
    pub api: ApiCategory,
    pub support: SupportDegree,
}

impl RuleEntry {
    /// The replacement name under the given translation mode.
    pub fn target(&self, mode: TranslationMode) -> &str {
        match mode {
            TranslationMode::Hip => &self.hip,
            TranslationMode::Roc => {
                if self.roc.is_empty() {
                    &self.hip
                } else {
                    &self.roc
                }
            }
        }
    }

    pub fn is_unsupported(&self) -> bool {
        self.support == SupportDegree::Unsupported
    }
}

/// The three lookup tables for one process.
#[derive(Debug, Clone)]
pub struct RuleSet {
    identifiers: HashMap<Cow<'static, str>, RuleEntry>,
    includes: HashMap<Cow<'static, str>, RuleEntry>,
    device_functions: HashMap<Cow<'static, str>, RuleEntry>,
}

impl RuleSet {
    /// The built-in tables.
    pub fn builtin() -> Self {
        Self {
            identifiers: identifiers::table(),
            includes: includes::table(),
            device_functions: device::table(),
        }
    }

    /// Merge user rules from a TOML file on top of the built-in tables.
    /// User rules win on name collision.
    pub fn extend_from_toml(&mut self, path: &Path) -> Result<usize, RulesError> {
        custom::extend(self, path)
    }

    pub fn lookup(&self, name: &str) -> Option<&RuleEntry> {
        self.identifiers.get(name)
    }

    pub fn lookup_include(&self, filename: &str) -> Option<&RuleEntry> {
        self.includes.get(filename)
    }

    pub fn lookup_device_function(&self, name: &str) -> Option<&RuleEntry> {
        self.device_functions.get(name)
    }

    pub fn identifier_count(&self) -> usize {
        self.identifiers.len()
    }

    /// All rules for listing, tagged with the table they live in and
    /// sorted by table then source name.
    pub fn iter_all(&self) -> Vec<(&'static str, &str, &RuleEntry)> {
        let mut rows: Vec<(&'static str, &str, &RuleEntry)> = Vec::new();
        rows.extend(
            self.identifiers
                .iter()
                .map(|(k, v)| ("identifier", k.as_ref(), v)),
        );
        rows.extend(self.includes.iter().map(|(k, v)| ("include", k.as_ref(), v)));
        rows.extend(
            self.device_functions
                .iter()
                .map(|(k, v)| ("device", k.as_ref(), v)),
        );
        rows.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        rows
    }

    pub(crate) fn insert_identifier(&mut self, name: String, entry: RuleEntry) {
        self.identifiers.insert(Cow::Owned(name), entry);
    }

    pub(crate) fn insert_include(&mut self, name: String, entry: RuleEntry) {
        self.includes.insert(Cow::Owned(name), entry);
    }

    pub(crate) fn insert_device_function(&mut self, name: String, entry: RuleEntry) {
        self.device_functions.insert(Cow::Owned(name), entry);
    }
}

/// Shorthand used by the static tables.
pub(crate) const fn entry(
    hip: &'static str,
    roc: &'static str,
    kind: ConvKind,
    api: ApiCategory,
    support: SupportDegree,
) -> RuleEntry {
    RuleEntry {
        hip: Cow::Borrowed(hip),
        roc: Cow::Borrowed(roc),
        kind,
        api,
        support,
    }
}
