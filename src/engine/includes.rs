//! Include-directive rewriting with per-category deduplication.
//!
//! Replacing CUDA headers one-for-one is not enough: several of them are
//! implicitly injected by the CUDA compiler, so every main header is
//! substituted at most once per category and repeat occurrences are
//! deleted outright. Whether the runtime header got substituted here
//! decides the end-of-file injection in `guard`.

use super::Hipifier;
use crate::edit::Edit;
use crate::events::InclusionEvent;
use crate::rules::{ApiCategory, ConvKind, RuleEntry};
use crate::span::Span;

pub(super) fn inclusion_directive(hip: &mut Hipifier, event: &InclusionEvent) {
    // Track the first directive regardless of what it includes; the
    // header injection falls back to this spot.
    if hip.first_include_end.is_none() {
        hip.first_include_end = Some(event.filename_span.end());
    }

    let Some(entry) = hip.rules.lookup_include(&event.filename) else {
        return;
    };
    let entry = entry.clone();

    let exclude = exclude(hip, &entry);
    hip.stats.count_occurrence(&event.filename);

    if entry.is_unsupported() {
        hip.warn(event.filename_span.start, "unsupported CUDA header");
        return;
    }

    let edit = if exclude {
        // Delete the whole directive, from the `#` through the filename.
        let span = Span::between(event.hash_offset, event.filename_span.end());
        Edit::replacing(span, hip.source, "")
    } else {
        // Keep the include style the user wrote.
        let name = entry.target(hip.mode);
        let replacement = if event.is_angled {
            format!("<{name}>")
        } else {
            format!("\"{name}\"")
        };
        Edit::replacing(event.filename_span, hip.source, replacement)
    };
    hip.insert_edit(edit);
}

/// Decide whether this include is suppressed rather than substituted,
/// updating the per-category flags as a side effect.
fn exclude(hip: &mut Hipifier, entry: &RuleEntry) -> bool {
    match entry.kind {
        ConvKind::IncludeMainHeader => match entry.api {
            // Driver and runtime main headers both collapse into the one
            // hip runtime header.
            ApiCategory::Driver | ApiCategory::Runtime => {
                already_inserted(&mut hip.inserted.runtime)
            }
            ApiCategory::Blas => already_inserted(&mut hip.inserted.blas),
            ApiCategory::Rand => {
                if is_rand_kernel_header(entry) {
                    already_inserted(&mut hip.inserted.rand_kernel)
                } else {
                    already_inserted(&mut hip.inserted.rand)
                }
            }
            ApiCategory::Dnn => already_inserted(&mut hip.inserted.dnn),
            ApiCategory::Fft => already_inserted(&mut hip.inserted.fft),
            ApiCategory::Complex => already_inserted(&mut hip.inserted.complex),
            ApiCategory::Sparse => already_inserted(&mut hip.inserted.sparse),
        },
        ConvKind::Include => {
            if entry.hip.is_empty() {
                // No target header at all: always delete.
                return true;
            }
            // Device-side RNG pieces share the kernel-header flag, so a
            // plain include never duplicates an already-substituted one.
            if entry.api == ApiCategory::Rand && is_rand_kernel_header(entry) {
                return already_inserted(&mut hip.inserted.rand_kernel);
            }
            false
        }
        _ => false,
    }
}

/// First call claims the flag and keeps the include; later calls exclude.
fn already_inserted(flag: &mut bool) -> bool {
    if *flag {
        true
    } else {
        *flag = true;
        false
    }
}

/// The device/host RNG header variants are told apart by target filename.
fn is_rand_kernel_header(entry: &RuleEntry) -> bool {
    entry.hip == "hiprand_kernel.h"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::SourceCallbacks;
    use crate::rules::{RuleSet, TranslationMode};

    fn include_event(source: &str, nth: usize) -> InclusionEvent {
        // Build the event for the nth #include line of `source`.
        let mut seen = 0;
        let mut offset = 0;
        for line in source.split_inclusive('\n') {
            let trimmed = line.trim_start();
            if trimmed.starts_with("#include") {
                if seen == nth {
                    let hash = offset + (line.len() - trimmed.len());
                    let open = line
                        .find(['<', '"'])
                        .expect("include line has a delimiter");
                    let close = line.rfind(['>', '"']).expect("closing delimiter");
                    let filename = line[open + 1..close].to_string();
                    return InclusionEvent {
                        hash_offset: hash,
                        filename,
                        is_angled: line.as_bytes()[open] == b'<',
                        filename_span: Span::between(offset + open, offset + close + 1),
                    };
                }
                seen += 1;
            }
            offset += line.len();
        }
        panic!("no include #{nth} in source");
    }

    fn run_includes(source: &str) -> (String, Vec<String>) {
        let rules = RuleSet::builtin();
        let mut hip = Hipifier::new(source, &rules, TranslationMode::Hip);
        let count = source
            .lines()
            .filter(|l| l.trim_start().starts_with("#include"))
            .count();
        for i in 0..count {
            hip.inclusion_directive(&include_event(source, i));
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
    fn runtime_header_substituted_once() {
        let source = "#include <cuda_runtime.h>\nint main() {}\n";
        let (out, _) = run_includes(source);
        assert_eq!(
            out.matches("#include <hip/hip_runtime.h>").count(),
            1
        );
        assert!(!out.contains("cuda_runtime.h"));
    }

    #[test]
    fn repeated_main_headers_are_deleted() {
        let source = "#include <cuda_runtime.h>\n#include <cuda.h>\n#include <cuda_runtime.h>\n";
        let (out, _) = run_includes(source);
        // One substitution; the other two directives are emptied.
        assert_eq!(out.matches("hip/hip_runtime.h").count(), 1);
        assert!(!out.contains("cuda"));
    }

    #[test]
    fn quoted_style_is_preserved() {
        let source = "#include \"cublas_v2.h\"\n";
        let (out, _) = run_includes(source);
        assert!(out.contains("#include \"hipblas.h\""));
    }

    #[test]
    fn category_dedup_three_occurrences() {
        let source =
            "#include <cublas_v2.h>\n#include <cublas_v2.h>\n#include <cublas_v2.h>\n";
        let (out, _) = run_includes(source);
        assert_eq!(out.matches("hipblas.h").count(), 1);
    }

    #[test]
    fn empty_target_is_always_deleted() {
        let source = "#include <device_launch_parameters.h>\nint x;\n";
        let (out, _) = run_includes(source);
        assert!(!out.contains("device_launch_parameters"));
        assert!(out.contains("int x;"));
    }

    #[test]
    fn rand_kernel_and_host_variants_have_separate_flags() {
        let source = "#include <curand.h>\n#include <curand_kernel.h>\n";
        let (out, _) = run_includes(source);
        assert!(out.contains("<hiprand.h>"));
        assert!(out.contains("<hiprand_kernel.h>"));
    }

    #[test]
    fn device_rand_piece_dedups_against_kernel_header() {
        let source = "#include <curand_kernel.h>\n#include <curand_uniform.h>\n";
        let (out, _) = run_includes(source);
        assert_eq!(out.matches("hiprand_kernel.h").count(), 1);
        assert!(!out.contains("curand_uniform"));
    }

    #[test]
    fn device_rand_piece_alone_is_substituted() {
        let source = "#include <curand_uniform.h>\n";
        let (out, _) = run_includes(source);
        assert!(out.contains("#include <hiprand_kernel.h>"));
    }

    #[test]
    fn unsupported_header_warns_and_stays() {
        let source = "#include <nvml.h>\n";
        let (out, diags) = run_includes(source);
        assert!(out.contains("#include <nvml.h>"));
        assert_eq!(diags.len(), 1);
        assert!(diags[0].contains("unsupported CUDA header"));
    }

    #[test]
    fn unrelated_header_untouched() {
        let source = "#include <vector>\n#include <cuda_runtime.h>\n";
        let (out, _) = run_includes(source);
        assert!(out.contains("#include <vector>"));
        assert!(out.contains("#include <hip/hip_runtime.h>"));
    }
}
