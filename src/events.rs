//! The interface between a source-file frontend and the rewriting engine.
//!
//! The original tooling delivers these as virtual callbacks from the
//! compiler frontend; here they are plain data handed to the one
//! [`SourceCallbacks`] implementation, [`crate::engine::Hipifier`].
//! Frontends (the built-in [`crate::scan`] scanner, or an embedder with a
//! real semantic frontend) are pure adapters with no rewrite logic.
//!
//! Contract: tokens arrive in source order and the whole token pass is
//! delivered before the first structural match; preprocessing events may
//! interleave with structural matches.

use crate::span::{Span, SpanInfo};

/// Lexical class of a raw token. The raw tokenizer does not interpret
/// preprocessor directives, so tokens inside disabled regions still
/// arrive (dead code gets translated too).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    /// A string literal, span covering the quotes.
    StringLiteral,
    /// Anything else the rewriter does not care about.
    Other,
}

/// One raw token.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// Raw text, including quotes for string literals.
    pub text: String,
}

/// An `#include` directive written in the main file. Directives reached
/// only through macro expansion are not reported.
#[derive(Debug, Clone)]
pub struct InclusionEvent {
    /// Offset of the `#`.
    pub hash_offset: usize,
    /// The included filename, without delimiters.
    pub filename: String,
    /// `<...>` rather than `"..."`.
    pub is_angled: bool,
    /// Span of the filename including its delimiters.
    pub filename_span: Span,
}

/// A `#pragma` directive in the main file.
#[derive(Debug, Clone)]
pub struct PragmaEvent {
    /// Offset of the token following `#pragma`.
    pub offset: usize,
    /// First token after `#pragma` (`once`, `unroll`, ...).
    pub first_token: String,
    /// Offset just past that token.
    pub first_token_end: usize,
}

/// An `#ifndef MACRO` directive in the main file.
#[derive(Debug, Clone)]
pub struct IfndefEvent {
    pub macro_name: String,
    /// Offset just past the macro name.
    pub name_end: usize,
}

/// A kernel-launch expression `callee<<<grid, block[, shmem[, stream]]>>>(args)`.
#[derive(Debug, Clone)]
pub struct LaunchMatch {
    /// The whole launch expression, end at the last token's start; the
    /// rewrite extends through that token.
    pub expr: SpanInfo,
    /// Length of the final token of the expression (usually `)`).
    pub last_token_len: usize,
    /// The callee expression.
    pub callee: SpanInfo,
    /// Whether the callee resolved to a template instantiation (the
    /// rewritten callee gets parenthesized to keep `<` out of the macro
    /// argument list).
    pub callee_is_template: bool,
    /// The four launch-configuration arguments: grid, block, then the two
    /// optional trailing ones.
    pub config: [ConfigArg; 4],
    /// Ordinary call arguments: span from the first argument's start to
    /// the last argument's end, if any.
    pub args: Option<SpanInfo>,
}

/// One launch-configuration argument.
#[derive(Debug, Clone)]
pub enum ConfigArg {
    /// Written in the source.
    Given(SpanInfo),
    /// Compiler-supplied default; renders as literal `0`.
    Defaulted,
}

/// An `extern`-linkage variable declaration attributed as shared memory
/// with an incomplete array type.
#[derive(Debug, Clone)]
pub struct SharedArrayMatch {
    /// Whether the declaration has external formal linkage.
    pub has_external_linkage: bool,
    /// Offset of the start of the declaration (storage class included).
    pub decl_start: usize,
    /// Offset of the last character of the type's source representation.
    pub type_end: usize,
    /// Resolved element type of the incomplete array.
    pub element_type: ElementType,
    /// Declared variable name.
    pub var_name: String,
}

/// Element type of a shared incomplete array.
#[derive(Debug, Clone)]
pub enum ElementType {
    /// A builtin type; the name is its canonical spelling with the GPU
    /// extension types enabled.
    Builtin(String),
    /// Any other type, spelled as written.
    Named(String),
    /// The frontend could not name the type; the rewrite declines.
    Unresolved,
}

impl ElementType {
    pub fn name(&self) -> Option<&str> {
        match self {
            ElementType::Builtin(n) | ElementType::Named(n) if !n.is_empty() => Some(n),
            _ => None,
        }
    }
}

/// A call whose callee resolved to a device or kernel function (and not
/// also a host function).
#[derive(Debug, Clone)]
pub struct DeviceCallMatch {
    /// The callee's declared name.
    pub callee_name: String,
    /// Offset of the start of the call expression.
    pub call_start: usize,
}

/// One structural match event. A single event may carry several candidate
/// matches for related nodes; the engine resolves them in fixed priority
/// order (launch, shared array, device call) and the first rewrite that
/// fires wins.
#[derive(Debug, Clone, Default)]
pub struct MatchEvent {
    pub launch: Option<LaunchMatch>,
    pub shared_array: Option<SharedArrayMatch>,
    pub device_call: Option<DeviceCallMatch>,
}

impl MatchEvent {
    pub fn launch(m: LaunchMatch) -> Self {
        Self {
            launch: Some(m),
            ..Self::default()
        }
    }

    pub fn shared_array(m: SharedArrayMatch) -> Self {
        Self {
            shared_array: Some(m),
            ..Self::default()
        }
    }

    pub fn device_call(m: DeviceCallMatch) -> Self {
        Self {
            device_call: Some(m),
            ..Self::default()
        }
    }
}

/// Event sink a frontend drives. The engine is the only implementation in
/// this crate; the trait exists so frontends never see engine internals.
pub trait SourceCallbacks {
    fn token(&mut self, token: &Token);
    fn inclusion_directive(&mut self, event: &InclusionEvent);
    fn pragma_directive(&mut self, event: &PragmaEvent);
    fn macro_ifndef(&mut self, event: &IfndefEvent);
    fn structural_match(&mut self, event: &MatchEvent);
}
