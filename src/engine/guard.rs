//! Include-guard tracking and the end-of-file header injection.
//!
//! Numerous CUDA headers are implicitly included by the CUDA compiler, so
//! substitution alone cannot guarantee the HIP runtime header is present.
//! If no substitution provided it, exactly one unconditional include is
//! injected — after any guard that would skip the file on reinclusion,
//! and before any code that might need it.

use super::Hipifier;
use crate::edit::Edit;
use crate::events::{IfndefEvent, PragmaEvent};

pub(super) const RUNTIME_HEADER_INCLUDE: &str = "\n#include <hip/hip_runtime.h>\n";

pub(super) fn pragma_directive(hip: &mut Hipifier, event: &PragmaEvent) {
    if hip.pragma_once.is_some() {
        return;
    }
    if event.first_token == "once" {
        hip.pragma_once = Some(event.first_token_end);
    }
}

pub(super) fn macro_ifndef(hip: &mut Hipifier, event: &IfndefEvent) {
    // First sighting of a macro wins; nested re-checks of the same guard
    // must not move the recorded location.
    hip.ifndefs
        .entry(event.macro_name.clone())
        .or_insert(event.name_end);
}

/// Decide where the injected runtime header goes, if anywhere.
///
/// Placement precedence: the earlier of the controlling-macro `#ifndef`
/// and `pragma once` when both were seen, whichever one was seen
/// otherwise, then just past the first include directive, then file
/// start.
pub(super) fn finalize(hip: &mut Hipifier, controlling_macro: Option<&str>) {
    if hip.inserted.runtime {
        return;
    }

    let guard_loc = controlling_macro.and_then(|name| hip.ifndefs.get(name).copied());
    let place = match (guard_loc, hip.pragma_once) {
        (Some(guard), Some(pragma)) => Some(guard.min(pragma)),
        (Some(guard), None) => Some(guard),
        (None, Some(pragma)) => Some(pragma),
        (None, None) => None,
    };
    let offset = place.or(hip.first_include_end).unwrap_or(0);

    hip.insert_edit(Edit::inserting(offset, RUNTIME_HEADER_INCLUDE));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{InclusionEvent, SourceCallbacks};
    use crate::rules::{RuleSet, TranslationMode};
    use crate::span::Span;

    fn ifndef(source: &str, name: &str) -> IfndefEvent {
        let at = source.find(name).unwrap();
        IfndefEvent {
            macro_name: name.to_string(),
            name_end: at + name.len(),
        }
    }

    fn pragma_once(source: &str) -> PragmaEvent {
        let at = source.find("once").unwrap();
        PragmaEvent {
            offset: at,
            first_token: "once".to_string(),
            first_token_end: at + 4,
        }
    }

    #[test]
    fn injects_at_file_start_without_guards_or_includes() {
        let source = "int main() { return 0; }\n";
        let rules = RuleSet::builtin();
        let hip = Hipifier::new(source, &rules, TranslationMode::Hip);
        let out = hip.finish(None).apply(source).unwrap();
        assert!(out.starts_with(RUNTIME_HEADER_INCLUDE));
    }

    #[test]
    fn injects_after_ifndef_guard_macro() {
        let source = "#ifndef FOO_H\n#define FOO_H\nvoid f();\n#endif\n";
        let rules = RuleSet::builtin();
        let mut hip = Hipifier::new(source, &rules, TranslationMode::Hip);
        hip.macro_ifndef(&ifndef(source, "FOO_H"));
        let out = hip.finish(Some("FOO_H")).apply(source).unwrap();
        assert!(out.starts_with("#ifndef FOO_H\n#include <hip/hip_runtime.h>\n\n#define FOO_H\n"));
    }

    #[test]
    fn guard_macro_without_controlling_macro_is_ignored() {
        let source = "#ifndef SOMETHING_ELSE\n#endif\nint x;\n";
        let rules = RuleSet::builtin();
        let mut hip = Hipifier::new(source, &rules, TranslationMode::Hip);
        hip.macro_ifndef(&ifndef(source, "SOMETHING_ELSE"));
        // The file has no controlling macro, so the guard is not a safe
        // insertion point.
        let out = hip.finish(None).apply(source).unwrap();
        assert!(out.starts_with(RUNTIME_HEADER_INCLUDE));
    }

    #[test]
    fn pragma_once_is_an_insertion_point() {
        let source = "#pragma once\nvoid f();\n";
        let rules = RuleSet::builtin();
        let mut hip = Hipifier::new(source, &rules, TranslationMode::Hip);
        hip.pragma_directive(&pragma_once(source));
        let out = hip.finish(None).apply(source).unwrap();
        assert!(out.starts_with("#pragma once\n#include <hip/hip_runtime.h>\n\nvoid f();\n"));
    }

    #[test]
    fn earlier_of_pragma_and_guard_wins() {
        let source = "#pragma once\n#ifndef FOO_H\n#define FOO_H\n#endif\n";
        let rules = RuleSet::builtin();
        let mut hip = Hipifier::new(source, &rules, TranslationMode::Hip);
        hip.pragma_directive(&pragma_once(source));
        hip.macro_ifndef(&ifndef(source, "FOO_H"));
        let out = hip.finish(Some("FOO_H")).apply(source).unwrap();
        // pragma once comes first in the file.
        assert!(out.starts_with("#pragma once\n#include <hip/hip_runtime.h>\n"));
    }

    #[test]
    fn falls_back_to_first_include() {
        let source = "#include <vector>\nint x;\n";
        let rules = RuleSet::builtin();
        let mut hip = Hipifier::new(source, &rules, TranslationMode::Hip);
        hip.inclusion_directive(&InclusionEvent {
            hash_offset: 0,
            filename: "vector".to_string(),
            is_angled: true,
            filename_span: Span::between(9, 17),
        });
        let out = hip.finish(None).apply(source).unwrap();
        assert!(out.starts_with("#include <vector>\n#include <hip/hip_runtime.h>\n\nint x;\n"));
    }

    #[test]
    fn no_injection_after_runtime_substitution() {
        let source = "#include <cuda_runtime.h>\n";
        let rules = RuleSet::builtin();
        let mut hip = Hipifier::new(source, &rules, TranslationMode::Hip);
        hip.inclusion_directive(&InclusionEvent {
            hash_offset: 0,
            filename: "cuda_runtime.h".to_string(),
            is_angled: true,
            filename_span: Span::between(9, 25),
        });
        let out = hip.finish(None).apply(source).unwrap();
        assert_eq!(out, "#include <hip/hip_runtime.h>\n");
        assert_eq!(out.matches("hip_runtime").count(), 1);
    }

    #[test]
    fn repeated_pragma_keeps_first_location() {
        let source = "#pragma once\n#pragma once\n";
        let rules = RuleSet::builtin();
        let mut hip = Hipifier::new(source, &rules, TranslationMode::Hip);
        hip.pragma_directive(&pragma_once(source));
        let second = PragmaEvent {
            offset: 21,
            first_token: "once".to_string(),
            first_token_end: 25,
        };
        hip.pragma_directive(&second);
        assert_eq!(hip.pragma_once, Some(source.find("once").unwrap() + 4));
        let _ = hip.finish(None);
    }
}
