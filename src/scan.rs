//! A raw, frontend-free scanner for CUDA C++ sources.
//!
//! This is the built-in implementation of the collaborator side of
//! [`crate::events`]: a raw tokenizer (no preprocessor interpretation, so
//! code inside disabled `#if` regions is still seen and translated), a
//! line-oriented preprocessor-event scanner, and a lexical matcher for
//! kernel-launch sites and shared incomplete-array declarations.
//!
//! Being lexical, it has known limits compared to a semantic frontend:
//! include directives inside disabled regions are still reported, and
//! calls are never resolved to device functions, so device-call matches
//! must come from an embedder. Raw string literals (`R"(...)"`) are
//! lexed as ordinary tokens.
//! TODO: lex raw string literals as single tokens.

use crate::engine::{Hipifier, Translation};
use crate::events::{
    ConfigArg, ElementType, IfndefEvent, InclusionEvent, LaunchMatch, MatchEvent, PragmaEvent,
    SharedArrayMatch, SourceCallbacks, Token, TokenKind,
};
use crate::rules::{RuleSet, TranslationMode};
use crate::span::{Span, SpanInfo};

/// Run the full two-pass translation of one source file: token pass,
/// then preprocessing events and structural matches in source order,
/// then finalization.
pub fn translate_source(source: &str, rules: &RuleSet, mode: TranslationMode) -> Translation {
    let tokens = tokenize(source);
    let directives = scan_directives(source);
    let controlling = controlling_macro(&directives);

    let mut hip = Hipifier::new(source, rules, mode);

    for token in &tokens {
        hip.token(token);
    }

    // Preprocessing events and structural matches, interleaved by
    // position the way a frontend would deliver them.
    let mut events: Vec<(usize, Event)> = Vec::new();
    for d in directives {
        match d {
            Directive::Include(ev) => events.push((ev.hash_offset, Event::Include(ev))),
            Directive::Pragma(ev) => events.push((ev.offset, Event::Pragma(ev))),
            Directive::Ifndef(ev) => events.push((ev.name_end, Event::Ifndef(ev))),
        }
    }
    for m in find_launches(&tokens) {
        events.push((m.expr.expansion.start, Event::Match(MatchEvent::launch(m))));
    }
    for m in find_shared_arrays(source, &tokens) {
        events.push((m.decl_start, Event::Match(MatchEvent::shared_array(m))));
    }
    events.sort_by_key(|(offset, _)| *offset);

    for (_, event) in events {
        match event {
            Event::Include(ev) => hip.inclusion_directive(&ev),
            Event::Pragma(ev) => hip.pragma_directive(&ev),
            Event::Ifndef(ev) => hip.macro_ifndef(&ev),
            Event::Match(ev) => hip.structural_match(&ev),
        }
    }

    hip.finish(controlling.as_deref())
}

enum Event {
    Include(InclusionEvent),
    Pragma(PragmaEvent),
    Ifndef(IfndefEvent),
    Match(MatchEvent),
}

// ---------------------------------------------------------------------------
// Raw tokenizer

/// Tokenize C-family source. Comments and whitespace produce no tokens;
/// preprocessor directives are lexed like ordinary text.
pub fn tokenize(source: &str) -> Vec<Token> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];

        if b.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        // Comments.
        if b == b'/' && i + 1 < bytes.len() {
            if bytes[i + 1] == b'/' {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                continue;
            }
            if bytes[i + 1] == b'*' {
                i += 2;
                while i + 1 < bytes.len() && !(bytes[i] == b'*' && bytes[i + 1] == b'/') {
                    i += 1;
                }
                i = (i + 2).min(bytes.len());
                continue;
            }
        }

        // Header name after `#include`: a single opaque token, the way a
        // raw lexer in directive mode produces it. Keeps the filename out
        // of the identifier and string passes; the include rewriter owns
        // that text.
        if (b == b'<' || b == b'"') && in_include_directive(&tokens) {
            let close = if b == b'<' { b'>' } else { b'"' };
            let start = i;
            i += 1;
            while i < bytes.len() && bytes[i] != close && bytes[i] != b'\n' {
                i += 1;
            }
            if i < bytes.len() && bytes[i] == close {
                i += 1;
            }
            tokens.push(other(source, start, i));
            continue;
        }

        // String literal.
        if b == b'"' {
            let start = i;
            i += 1;
            while i < bytes.len() && bytes[i] != b'"' {
                if bytes[i] == b'\\' {
                    i += 1;
                }
                i += 1;
            }
            i = (i + 1).min(bytes.len());
            tokens.push(Token {
                kind: TokenKind::StringLiteral,
                span: Span::between(start, i),
                text: source[start..i].to_string(),
            });
            continue;
        }

        // Character literal: opaque.
        if b == b'\'' {
            let start = i;
            i += 1;
            while i < bytes.len() && bytes[i] != b'\'' {
                if bytes[i] == b'\\' {
                    i += 1;
                }
                i += 1;
            }
            i = (i + 1).min(bytes.len());
            tokens.push(other(source, start, i));
            continue;
        }

        // Identifier.
        if b.is_ascii_alphabetic() || b == b'_' {
            let start = i;
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Identifier,
                span: Span::between(start, i),
                text: source[start..i].to_string(),
            });
            continue;
        }

        // Number (pp-number: digits, dots, suffixes, exponent signs).
        if b.is_ascii_digit() {
            let start = i;
            while i < bytes.len() {
                let c = bytes[i];
                if c.is_ascii_alphanumeric() || c == b'.' {
                    i += 1;
                } else if (c == b'+' || c == b'-')
                    && matches!(bytes[i - 1], b'e' | b'E' | b'p' | b'P')
                {
                    i += 1;
                } else {
                    break;
                }
            }
            tokens.push(other(source, start, i));
            continue;
        }

        // Everything else: one punctuation character per token.
        let char_len = source[i..]
            .chars()
            .next()
            .map(char::len_utf8)
            .unwrap_or(1);
        tokens.push(other(source, i, i + char_len));
        i += char_len;
    }

    tokens
}

/// The last two tokens are `#` `include`.
fn in_include_directive(tokens: &[Token]) -> bool {
    let n = tokens.len();
    n >= 2 && tokens[n - 1].text == "include" && tokens[n - 2].text == "#"
}

fn other(source: &str, start: usize, end: usize) -> Token {
    Token {
        kind: TokenKind::Other,
        span: Span::between(start, end),
        text: source[start..end].to_string(),
    }
}

// ---------------------------------------------------------------------------
// Preprocessor directives

enum Directive {
    Include(InclusionEvent),
    Pragma(PragmaEvent),
    Ifndef(IfndefEvent),
}

fn scan_directives(source: &str) -> Vec<Directive> {
    let mut directives = Vec::new();
    let mut offset = 0;

    for line in source.split_inclusive('\n') {
        if let Some(d) = parse_directive(line, offset) {
            directives.push(d);
        }
        offset += line.len();
    }

    directives
}

fn parse_directive(line: &str, line_offset: usize) -> Option<Directive> {
    let trimmed = line.trim_start();
    let hash_offset = line_offset + (line.len() - trimmed.len());
    let body = trimmed.strip_prefix('#')?.trim_start();

    if let Some(rest) = body.strip_prefix("include") {
        let rest = rest.trim_start();
        let open = rest.chars().next()?;
        let close = match open {
            '<' => '>',
            '"' => '"',
            _ => return None,
        };
        let close_rel = rest[1..].find(close)? + 1;
        let filename = rest[1..close_rel].to_string();
        let open_offset = line_offset + (line.len() - rest.len());
        return Some(Directive::Include(InclusionEvent {
            hash_offset,
            filename,
            is_angled: open == '<',
            filename_span: Span::between(open_offset, open_offset + close_rel + 1),
        }));
    }

    if let Some(rest) = body.strip_prefix("pragma") {
        let rest_trimmed = rest.trim_start();
        let token: String = rest_trimmed
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        if token.is_empty() {
            return None;
        }
        let token_offset = line_offset + (line.len() - rest_trimmed.len());
        return Some(Directive::Pragma(PragmaEvent {
            offset: token_offset,
            first_token_end: token_offset + token.len(),
            first_token: token,
        }));
    }

    if let Some(rest) = body.strip_prefix("ifndef") {
        let rest_trimmed = rest.trim_start();
        let name: String = rest_trimmed
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        if name.is_empty() {
            return None;
        }
        let name_offset = line_offset + (line.len() - rest_trimmed.len());
        return Some(Directive::Ifndef(IfndefEvent {
            name_end: name_offset + name.len(),
            macro_name: name,
        }));
    }

    None
}

/// Infer the file's controlling include-guard macro: a leading `#ifndef X`
/// immediately followed by `#define X`.
fn controlling_macro(directives: &[Directive]) -> Option<String> {
    // The ifndef must be the first directive other than pragmas; whether
    // the matching #define follows is checked textually by the caller
    // having produced the ifndef at all, which is close enough for guard
    // placement (a stray leading #ifndef without #define guards nothing,
    // and inserting inside it is still correct for reinclusion).
    directives.iter().find_map(|d| match d {
        Directive::Include(_) => Some(None),
        Directive::Ifndef(ev) => Some(Some(ev.macro_name.clone())),
        Directive::Pragma(_) => None,
    })?
}

// ---------------------------------------------------------------------------
// Launch-site matching

/// Find `callee<<<...>>>(...)` sites in the token stream.
fn find_launches(tokens: &[Token]) -> Vec<LaunchMatch> {
    let mut matches = Vec::new();
    let mut i = 0;

    while i + 2 < tokens.len() {
        if !is_adjacent_run(tokens, i, "<") {
            i += 1;
            continue;
        }

        if let Some(m) = match_launch_at(tokens, i) {
            matches.push(m);
        }
        i += 3;
    }

    matches
}

/// Three consecutive single-char tokens of `text` with touching spans.
fn is_adjacent_run(tokens: &[Token], i: usize, text: &str) -> bool {
    tokens[i].text == text
        && tokens[i + 1].text == text
        && tokens[i + 2].text == text
        && tokens[i].span.end() == tokens[i + 1].span.start
        && tokens[i + 1].span.end() == tokens[i + 2].span.start
}

fn match_launch_at(tokens: &[Token], open: usize) -> Option<LaunchMatch> {
    let (callee_first, callee_is_template) = walk_back_callee(tokens, open)?;
    let callee_span = Span::between(tokens[callee_first].span.start, tokens[open - 1].span.end());

    // Collect the configuration arguments up to the matching `>>>`.
    let mut depth = 0usize;
    let mut arg_start = open + 3;
    let mut config_spans: Vec<Span> = Vec::new();
    let mut j = open + 3;
    let close = loop {
        if j + 2 >= tokens.len() {
            return None;
        }
        let t = &tokens[j];
        match t.text.as_str() {
            "(" | "[" | "{" => depth += 1,
            ")" | "]" | "}" => depth = depth.checked_sub(1)?,
            "," if depth == 0 => {
                config_spans.push(token_range(tokens, arg_start, j)?);
                arg_start = j + 1;
            }
            ">" if depth == 0 && is_adjacent_run(tokens, j, ">") => {
                config_spans.push(token_range(tokens, arg_start, j)?);
                break j;
            }
            _ => {}
        }
        j += 1;
    };

    if config_spans.len() < 2 || config_spans.len() > 4 {
        return None;
    }

    // The ordinary argument list follows the closing `>>>`.
    let paren = close + 3;
    if tokens.get(paren)?.text != "(" {
        return None;
    }
    let mut depth = 1usize;
    let mut k = paren + 1;
    while depth > 0 {
        let t = tokens.get(k)?;
        match t.text.as_str() {
            "(" => depth += 1,
            ")" => depth -= 1,
            _ => {}
        }
        k += 1;
    }
    let close_paren = k - 1;
    let args = token_range(tokens, paren + 1, close_paren);

    let mut config = [
        ConfigArg::Defaulted,
        ConfigArg::Defaulted,
        ConfigArg::Defaulted,
        ConfigArg::Defaulted,
    ];
    for (slot, span) in config.iter_mut().zip(config_spans) {
        *slot = ConfigArg::Given(SpanInfo::plain(span));
    }

    Some(LaunchMatch {
        expr: SpanInfo::plain(Span::between(
            callee_span.start,
            tokens[close_paren].span.start,
        )),
        last_token_len: tokens[close_paren].span.len,
        callee: SpanInfo::plain(callee_span),
        callee_is_template,
        config,
        args: args.map(SpanInfo::plain),
    })
}

/// Walk back from the `<<<` over the callee expression: an identifier
/// path (`ns::kern`), optionally carrying template arguments.
fn walk_back_callee(tokens: &[Token], open: usize) -> Option<(usize, bool)> {
    let mut i = open.checked_sub(1)?;
    let mut is_template = false;

    if tokens[i].text == ">" {
        // Balance template arguments backwards.
        is_template = true;
        let mut depth = 1usize;
        loop {
            i = i.checked_sub(1)?;
            match tokens[i].text.as_str() {
                ">" => depth += 1,
                "<" => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }
        i = i.checked_sub(1)?;
    }

    if tokens[i].kind != TokenKind::Identifier {
        return None;
    }

    // Swallow a qualified path: `ns :: name`.
    let mut first = i;
    while first >= 2
        && tokens[first - 1].text == ":"
        && tokens[first - 2].text == ":"
        && first >= 3
        && tokens[first - 3].kind == TokenKind::Identifier
    {
        first -= 3;
    }

    Some((first, is_template))
}

/// Span from the first to the last token of `[start, end)`, None if empty.
fn token_range(tokens: &[Token], start: usize, end: usize) -> Option<Span> {
    if start >= end {
        return None;
    }
    Some(Span::between(
        tokens[start].span.start,
        tokens[end - 1].span.end(),
    ))
}

// ---------------------------------------------------------------------------
// Shared incomplete-array matching

/// Find `extern __shared__ T name[];` declarations.
fn find_shared_arrays(source: &str, tokens: &[Token]) -> Vec<SharedArrayMatch> {
    let mut matches = Vec::new();

    for i in 0..tokens.len() {
        if tokens[i].text != "extern" {
            continue;
        }
        let Some(m) = match_shared_at(source, tokens, i) else {
            continue;
        };
        matches.push(m);
    }

    matches
}

/// Builtin C/CUDA scalar type keywords (multi-keyword types allowed).
fn is_builtin_type_word(word: &str) -> bool {
    matches!(
        word,
        "void"
            | "bool"
            | "char"
            | "short"
            | "int"
            | "long"
            | "float"
            | "double"
            | "signed"
            | "unsigned"
            | "uint"
            | "uchar"
            | "ushort"
            | "ulong"
            | "size_t"
    )
}

fn match_shared_at(source: &str, tokens: &[Token], at: usize) -> Option<SharedArrayMatch> {
    if tokens.get(at + 1)?.text != "__shared__" {
        return None;
    }

    // Scan forward for `name [ ] ;` and treat everything between the
    // attribute and the name as the element type.
    let mut j = at + 2;
    while tokens.get(j)?.text != "[" {
        j += 1;
        // Unreasonably long declarations are something else.
        if j > at + 10 {
            return None;
        }
    }
    if tokens.get(j + 1)?.text != "]" {
        return None;
    }

    let name_tok = &tokens[j - 1];
    if name_tok.kind != TokenKind::Identifier || j - 1 < at + 3 {
        return None;
    }

    let type_first = at + 2;
    let type_last = j - 2;
    let type_text = source
        [tokens[type_first].span.start..tokens[type_last].span.end()]
        .to_string();

    let all_builtin = (type_first..=type_last)
        .all(|k| is_builtin_type_word(&tokens[k].text) || tokens[k].text == "*");
    let element_type = if type_text.is_empty() {
        ElementType::Unresolved
    } else if all_builtin {
        ElementType::Builtin(type_text)
    } else {
        ElementType::Named(type_text)
    };

    Some(SharedArrayMatch {
        has_external_linkage: true,
        decl_start: tokens[at].span.start,
        type_end: tokens[j + 1].span.start,
        element_type,
        var_name: name_tok.text.clone(),
    })
}
