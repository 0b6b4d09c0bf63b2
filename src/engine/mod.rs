//! The per-file rewriting engine.
//!
//! One [`Hipifier`] is constructed per source file, fed the whole token
//! stream, then the structural matches and preprocessing events, and
//! finally consumed by [`Hipifier::finish`], which settles the deferred
//! header-injection decision and hands back the ordered patch set,
//! diagnostics, and statistics.

mod guard;
mod includes;
mod ledger;
mod lexical;
mod structural;

pub use ledger::PatchLedger;

use crate::edit::{self, Edit, EditError};
use crate::events::{
    IfndefEvent, InclusionEvent, MatchEvent, PragmaEvent, SourceCallbacks, Token,
};
use crate::rules::{RuleSet, TranslationMode};
use crate::span::LineIndex;
use crate::stats::RunStats;
use std::collections::HashMap;

/// A warning tied to a source location.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
    pub message: String,
}

/// Per-category "already inserted" flags for header substitution.
#[derive(Debug, Default)]
struct InsertedHeaders {
    runtime: bool,
    blas: bool,
    rand: bool,
    rand_kernel: bool,
    dnn: bool,
    fft: bool,
    complex: bool,
    sparse: bool,
}

/// The engine: owns all per-file state.
pub struct Hipifier<'a> {
    source: &'a str,
    rules: &'a RuleSet,
    mode: TranslationMode,
    lines: LineIndex,
    ledger: PatchLedger,
    stats: RunStats,
    diagnostics: Vec<Diagnostic>,

    // Guard-tracker state.
    pragma_once: Option<usize>,
    ifndefs: HashMap<String, usize>,
    first_include_end: Option<usize>,
    inserted: InsertedHeaders,
}

/// Everything a finished run produces.
#[derive(Debug)]
pub struct Translation {
    /// Ordered, non-overlapping patch set.
    pub edits: Vec<Edit>,
    pub stats: RunStats,
    pub diagnostics: Vec<Diagnostic>,
}

impl Translation {
    /// Apply the patch set to the source it was produced from.
    pub fn apply(&self, source: &str) -> Result<String, EditError> {
        edit::apply_all(source, &self.edits)
    }
}

impl<'a> Hipifier<'a> {
    pub fn new(source: &'a str, rules: &'a RuleSet, mode: TranslationMode) -> Self {
        Self {
            source,
            rules,
            mode,
            lines: LineIndex::new(source),
            ledger: PatchLedger::new(),
            stats: RunStats::new(),
            diagnostics: Vec::new(),
            pragma_once: None,
            ifndefs: HashMap::new(),
            first_include_end: None,
            inserted: InsertedHeaders::default(),
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn mode(&self) -> TranslationMode {
        self.mode
    }

    /// Finalize: decide the deferred runtime-header injection, then hand
    /// the results over.
    pub fn finish(mut self, controlling_macro: Option<&str>) -> Translation {
        guard::finalize(&mut self, controlling_macro);
        Translation {
            edits: self.ledger.into_edits(),
            stats: self.stats,
            diagnostics: self.diagnostics,
        }
    }

    /// Accept a patch into the ledger and book its statistics.
    fn insert_edit(&mut self, edit: Edit) {
        self.stats.line_touched(self.lines.line(edit.byte_start));
        self.stats.bytes_changed(edit.new_text.len());
        self.ledger.push(edit);
    }

    /// Record a warning at a byte offset.
    fn warn(&mut self, offset: usize, message: impl Into<String>) {
        let (line, column) = self.lines.position(offset);
        self.stats.count_warning();
        self.diagnostics.push(Diagnostic {
            line,
            column,
            offset,
            message: message.into(),
        });
    }

    /// Target-dialect name for warning texts.
    fn dialect_name(&self) -> &'static str {
        match self.mode {
            TranslationMode::Hip => "HIP",
            TranslationMode::Roc => "ROC",
        }
    }
}

impl SourceCallbacks for Hipifier<'_> {
    fn token(&mut self, token: &Token) {
        lexical::rewrite_token(self, token);
    }

    fn inclusion_directive(&mut self, event: &InclusionEvent) {
        includes::inclusion_directive(self, event);
    }

    fn pragma_directive(&mut self, event: &PragmaEvent) {
        guard::pragma_directive(self, event);
    }

    fn macro_ifndef(&mut self, event: &IfndefEvent) {
        guard::macro_ifndef(self, event);
    }

    fn structural_match(&mut self, event: &MatchEvent) {
        structural::handle(self, event);
    }
}
