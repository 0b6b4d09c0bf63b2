//! Built-in device-function table.
//!
//! Names here are only renamed once a call has been resolved to a device
//! or kernel function; they never participate in the lexical identifier
//! pass. The warp-level `_sync` primitives translate to their pre-Volta
//! forms with a deprecation warning (the mask argument has no HIP
//! counterpart); primitives with no equivalent at all are unsupported.

use super::ApiCategory::Runtime;
use super::ConvKind::Identifier;
use super::SupportDegree::*;
use super::{entry, RuleEntry};
use std::borrow::Cow;
use std::collections::HashMap;

type Row = (&'static str, RuleEntry);

#[rustfmt::skip]
const DEVICE_FUNCTIONS: &[Row] = &[
    ("__shfl_sync",      entry("__shfl", "", Identifier, Runtime, Deprecated)),
    ("__shfl_up_sync",   entry("__shfl_up", "", Identifier, Runtime, Deprecated)),
    ("__shfl_down_sync", entry("__shfl_down", "", Identifier, Runtime, Deprecated)),
    ("__shfl_xor_sync",  entry("__shfl_xor", "", Identifier, Runtime, Deprecated)),
    ("__ballot_sync",    entry("__ballot", "", Identifier, Runtime, Deprecated)),
    ("__any_sync",       entry("__any", "", Identifier, Runtime, Deprecated)),
    ("__all_sync",       entry("__all", "", Identifier, Runtime, Deprecated)),

    ("__syncwarp",        entry("", "", Identifier, Runtime, Unsupported)),
    ("__activemask",      entry("", "", Identifier, Runtime, Unsupported)),
    ("__match_any_sync",  entry("", "", Identifier, Runtime, Unsupported)),
    ("__match_all_sync",  entry("", "", Identifier, Runtime, Unsupported)),
    ("__nanosleep",       entry("", "", Identifier, Runtime, Unsupported)),
];

pub(super) fn table() -> HashMap<Cow<'static, str>, RuleEntry> {
    DEVICE_FUNCTIONS
        .iter()
        .map(|(name, e)| (Cow::Borrowed(*name), e.clone()))
        .collect()
}
