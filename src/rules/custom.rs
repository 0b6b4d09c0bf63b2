//! User-supplied rename rules loaded from a TOML file.
//!
//! ```toml
//! [[rules]]
//! cuda = "cudaFancyAlloc"
//! hip = "hipFancyAlloc"
//! roc = "roc_fancy_alloc"   # optional
//! table = "identifier"      # identifier | include | device
//! api = "runtime"           # optional, defaults to runtime
//! support = "supported"     # supported | deprecated | unsupported
//! main-header = false       # include table only
//! ```

use super::{ApiCategory, ConvKind, RuleEntry, RuleSet, SupportDegree};
use serde::Deserialize;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RulesError {
    #[error("failed to read rule file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse rule file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("rule for {cuda:?}: unknown table {table:?} (expected identifier, include, or device)")]
    UnknownTable { cuda: String, table: String },

    #[error("rule for {cuda:?}: unknown api category {api:?}")]
    UnknownApi { cuda: String, api: String },

    #[error("rule for {cuda:?}: unknown support degree {support:?}")]
    UnknownSupport { cuda: String, support: String },

    #[error("rule for {cuda:?}: supported rule needs a non-empty hip name")]
    EmptyTarget { cuda: String },
}

#[derive(Debug, Deserialize)]
struct RuleFile {
    #[serde(default)]
    rules: Vec<RawRule>,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    cuda: String,
    #[serde(default)]
    hip: String,
    #[serde(default)]
    roc: String,
    #[serde(default = "default_table")]
    table: String,
    #[serde(default = "default_api")]
    api: String,
    #[serde(default = "default_support")]
    support: String,
    #[serde(default, rename = "main-header")]
    main_header: bool,
}

fn default_table() -> String {
    "identifier".to_string()
}

fn default_api() -> String {
    "runtime".to_string()
}

fn default_support() -> String {
    "supported".to_string()
}

impl RawRule {
    fn api(&self) -> Result<ApiCategory, RulesError> {
        match self.api.as_str() {
            "driver" => Ok(ApiCategory::Driver),
            "runtime" => Ok(ApiCategory::Runtime),
            "blas" => Ok(ApiCategory::Blas),
            "rand" => Ok(ApiCategory::Rand),
            "dnn" => Ok(ApiCategory::Dnn),
            "fft" => Ok(ApiCategory::Fft),
            "complex" => Ok(ApiCategory::Complex),
            "sparse" => Ok(ApiCategory::Sparse),
            _ => Err(RulesError::UnknownApi {
                cuda: self.cuda.clone(),
                api: self.api.clone(),
            }),
        }
    }

    fn support(&self) -> Result<SupportDegree, RulesError> {
        match self.support.as_str() {
            "supported" => Ok(SupportDegree::Supported),
            "deprecated" => Ok(SupportDegree::Deprecated),
            "unsupported" => Ok(SupportDegree::Unsupported),
            _ => Err(RulesError::UnknownSupport {
                cuda: self.cuda.clone(),
                support: self.support.clone(),
            }),
        }
    }

    fn into_entry(self) -> Result<(String, String, RuleEntry), RulesError> {
        let api = self.api()?;
        let support = self.support()?;
        if support != SupportDegree::Unsupported && self.hip.is_empty() && self.table != "include" {
            return Err(RulesError::EmptyTarget { cuda: self.cuda });
        }
        let kind = match self.table.as_str() {
            "identifier" | "device" => ConvKind::Identifier,
            "include" => {
                if self.main_header {
                    ConvKind::IncludeMainHeader
                } else {
                    ConvKind::Include
                }
            }
            _ => {
                return Err(RulesError::UnknownTable {
                    cuda: self.cuda,
                    table: self.table,
                })
            }
        };
        let entry = RuleEntry {
            hip: Cow::Owned(self.hip),
            roc: Cow::Owned(self.roc),
            kind,
            api,
            support,
        };
        Ok((self.table, self.cuda, entry))
    }
}

/// Parse `path` and merge its rules into `rules`. Returns how many rules
/// were added.
pub(super) fn extend(rules: &mut RuleSet, path: &Path) -> Result<usize, RulesError> {
    let text = fs::read_to_string(path).map_err(|source| RulesError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let file: RuleFile = toml_edit::de::from_str(&text).map_err(|e| RulesError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let count = file.rules.len();
    for raw in file.rules {
        let (table, cuda, entry) = raw.into_entry()?;
        match table.as_str() {
            "identifier" => rules.insert_identifier(cuda, entry),
            "include" => rules.insert_include(cuda, entry),
            "device" => rules.insert_device_function(cuda, entry),
            // into_entry rejected anything else already
            _ => unreachable!(),
        }
    }
    Ok(count)
}
