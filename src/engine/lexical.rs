//! The lexical pass: identifier and string-literal rewriting over the raw
//! token stream.
//!
//! The raw stream ignores preprocessor structure, so identifiers inside
//! disabled `#if` regions are translated like any other — dead code ports
//! too.

use super::Hipifier;
use crate::edit::Edit;
use crate::events::{Token, TokenKind};
use crate::span::Span;

/// Which rule table a name is resolved against.
#[derive(Debug, Clone, Copy)]
pub(super) enum Table {
    Identifiers,
    DeviceFunctions,
}

pub(super) fn rewrite_token(hip: &mut Hipifier, token: &Token) {
    match token.kind {
        TokenKind::StringLiteral => rewrite_string(hip, token),
        TokenKind::Identifier => {
            find_and_replace(hip, &token.text, token.span.start, Table::Identifiers)
        }
        TokenKind::Other => {}
    }
}

/// Look `name` up and patch it in place if a supported rename exists.
/// Unsupported names warn and stay untouched; deprecated names warn and
/// are renamed anyway. Every hit is counted.
pub(super) fn find_and_replace(hip: &mut Hipifier, name: &str, offset: usize, table: Table) {
    let entry = match table {
        Table::Identifiers => hip.rules.lookup(name),
        Table::DeviceFunctions => hip.rules.lookup_device_function(name),
    };
    let Some(entry) = entry else {
        // An identifier, but not CUDA.
        return;
    };
    let entry = entry.clone();

    hip.stats.count_occurrence(name);

    if entry.is_unsupported() {
        let dialect = hip.dialect_name();
        hip.warn(
            offset,
            format!("CUDA identifier {name:?} is unsupported in {dialect}"),
        );
        return;
    }

    let target = entry.target(hip.mode).to_string();
    if entry.support == crate::rules::SupportDegree::Deprecated {
        hip.warn(
            offset,
            format!("CUDA identifier {name:?} is deprecated; translated to {target:?}"),
        );
    }

    let span = Span::new(offset, name.len());
    hip.insert_edit(Edit::replacing(span, hip.source, target));
}

/// Scan a string literal's content for embedded CUDA names.
///
/// A candidate starts at each `"cu"` and runs to the next space searched
/// from four characters in, or to the end of the string. The patch offset
/// is shifted by one for the opening quote.
fn rewrite_string(hip: &mut Hipifier, token: &Token) {
    let content = unquote(&token.text);
    let mut begin = 0;
    loop {
        let Some(found) = content[begin..].find("cu") else {
            break;
        };
        begin += found;

        let mut search_from = (begin + 4).min(content.len());
        while !content.is_char_boundary(search_from) {
            search_from += 1;
        }
        let end = content[search_from..].find(' ').map(|i| search_from + i);
        let name = &content[begin..end.unwrap_or(content.len())];

        if let Some(entry) = hip.rules.lookup(name) {
            let entry = entry.clone();
            hip.stats.count_occurrence(name);
            if !entry.is_unsupported() {
                let target = entry.target(hip.mode).to_string();
                let span = Span::new(token.span.start + 1 + begin, name.len());
                hip.insert_edit(Edit::replacing(span, hip.source, target));
            }
        }

        // Advance past this candidate; at end-of-string we are done.
        match end {
            Some(e) => begin = e + 1,
            None => break,
        }
    }
}

/// Strip the surrounding quotes from a string-literal token.
fn unquote(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::SourceCallbacks;
    use crate::rules::{RuleSet, TranslationMode};

    fn token(kind: TokenKind, start: usize, text: &str) -> Token {
        Token {
            kind,
            span: Span::new(start, text.len()),
            text: text.to_string(),
        }
    }

    fn run_tokens(source: &str, tokens: &[Token]) -> (String, Vec<String>) {
        let rules = RuleSet::builtin();
        let mut hip = Hipifier::new(source, &rules, TranslationMode::Hip);
        for t in tokens {
            hip.token(t);
        }
        let translation = hip.finish(None);
        let diags = translation
            .diagnostics
            .iter()
            .map(|d| d.message.clone())
            .collect();
        (translation.apply(source).unwrap(), diags)
    }

    #[test]
    fn identifier_is_renamed_in_place() {
        let source = "x = cudaMalloc(&p, n);";
        let (out, diags) = run_tokens(
            source,
            &[token(TokenKind::Identifier, 4, "cudaMalloc")],
        );
        // The injected runtime header lands at file start; the rename is
        // exact otherwise.
        assert!(out.contains("hipMalloc(&p, n);"));
        assert!(!out.contains("cudaMalloc"));
        assert!(diags.is_empty());
    }

    #[test]
    fn unknown_identifier_is_untouched() {
        let source = "memcpy(dst, src, n);";
        let (out, diags) = run_tokens(source, &[token(TokenKind::Identifier, 0, "memcpy")]);
        assert!(out.contains("memcpy(dst, src, n);"));
        assert!(diags.is_empty());
    }

    #[test]
    fn unsupported_identifier_warns_and_keeps_text() {
        let source = "cudaGraphLaunch(g, s);";
        let (out, diags) = run_tokens(
            source,
            &[token(TokenKind::Identifier, 0, "cudaGraphLaunch")],
        );
        assert!(out.contains("cudaGraphLaunch(g, s);"));
        assert_eq!(diags.len(), 1);
        assert!(diags[0].contains("unsupported"));
    }

    #[test]
    fn deprecated_identifier_warns_and_renames() {
        let source = "cudaThreadSynchronize();";
        let (out, diags) = run_tokens(
            source,
            &[token(TokenKind::Identifier, 0, "cudaThreadSynchronize")],
        );
        assert!(out.contains("hipDeviceSynchronize();"));
        assert_eq!(diags.len(), 1);
        assert!(diags[0].contains("deprecated"));
    }

    #[test]
    fn string_literal_embedded_name() {
        let source = r#"puts("run cudaMalloc now");"#;
        let lit = r#""run cudaMalloc now""#;
        let (out, _) = run_tokens(source, &[token(TokenKind::StringLiteral, 5, lit)]);
        assert!(out.contains(r#""run hipMalloc now""#));
    }

    #[test]
    fn string_literal_name_at_end_of_string() {
        let source = r#"puts("calling cudaFree");"#;
        let lit = r#""calling cudaFree""#;
        let (out, _) = run_tokens(source, &[token(TokenKind::StringLiteral, 5, lit)]);
        assert!(out.contains(r#""calling hipFree""#));
    }

    #[test]
    fn string_literal_multiple_names() {
        let source = r#"s = "cudaMalloc cudaFree done";"#;
        let lit = r#""cudaMalloc cudaFree done""#;
        let (out, _) = run_tokens(source, &[token(TokenKind::StringLiteral, 4, lit)]);
        assert!(out.contains(r#""hipMalloc hipFree done""#));
    }

    #[test]
    fn string_literal_repeated_prefix_terminates() {
        // "cucucu" never matches a rule; the scan must still terminate.
        let source = r#"s = "cucucu cu cu";"#;
        let lit = r#""cucucu cu cu""#;
        let (out, _) = run_tokens(source, &[token(TokenKind::StringLiteral, 4, lit)]);
        assert!(out.contains("cucucu cu cu"));
    }

    #[test]
    fn rewriting_is_idempotent() {
        let source = "cudaMalloc(&p, n); cudaFree(p);";
        let rules = RuleSet::builtin();

        let mut hip = Hipifier::new(source, &rules, TranslationMode::Hip);
        hip.token(&token(TokenKind::Identifier, 0, "cudaMalloc"));
        hip.token(&token(TokenKind::Identifier, 19, "cudaFree"));
        let first = hip.finish(None);
        let ported = first.apply(source).unwrap();

        // A second pass over the rewritten text finds nothing to change:
        // hip names are not in the source table.
        let mut hip = Hipifier::new(&ported, &rules, TranslationMode::Hip);
        hip.token(&token(TokenKind::Identifier, 0, "hipMalloc"));
        // Offsets shifted by the earlier renames; locate dynamically.
        let free_at = ported.find("hipFree").unwrap();
        hip.token(&token(TokenKind::Identifier, free_at, "hipFree"));
        let second = hip.finish(None);
        // Only the injected-header patch may exist; no renames.
        assert!(second.edits.iter().all(|e| e.byte_start == e.byte_end));
    }
}
