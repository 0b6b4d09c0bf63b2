//! Structural rewrites: kernel launches, shared incomplete arrays, and
//! resolved device-function calls.
//!
//! One match event can carry candidates for all three; they are resolved
//! in that fixed order and the first rewrite that fires wins. A rewrite
//! missing a required piece declines and the next candidate gets its
//! turn.

use super::lexical::{self, Table};
use super::Hipifier;
use crate::edit::Edit;
use crate::events::{ConfigArg, DeviceCallMatch, LaunchMatch, MatchEvent, SharedArrayMatch};
use crate::span::{Span, SpanInfo};

pub(super) fn handle(hip: &mut Hipifier, event: &MatchEvent) {
    if let Some(m) = &event.launch {
        if launch(hip, m) {
            return;
        }
    }
    if let Some(m) = &event.shared_array {
        if shared_array(hip, m) {
            return;
        }
    }
    if let Some(m) = &event.device_call {
        if device_call(hip, m) {
            return;
        }
    }
}

/// `kern<<<grid, block, shmem, stream>>>(args)` becomes
/// `hipLaunchKernelGGL(kern, dim3(grid), dim3(block), shmem, stream, args)`.
fn launch(hip: &mut Hipifier, m: &LaunchMatch) -> bool {
    // Grid and block dimensions are mandatory; a match without them is
    // malformed and declines.
    let (grid, block) = match (&m.config[0], &m.config[1]) {
        (ConfigArg::Given(grid), ConfigArg::Given(block)) => (grid, block),
        _ => return false,
    };

    let mut out = String::from("hipLaunchKernelGGL(");
    if m.callee_is_template {
        out.push('(');
    }
    out.push_str(read_text(hip, &m.callee));
    if m.callee_is_template {
        out.push(')');
    }
    out.push_str(", ");

    // The two dimension arguments are copied verbatim into dim3
    // constructor calls; the stream/shared-memory pair defaults to zero
    // when the source left them implicit.
    out.push_str(&format!("dim3({})", read_text(hip, grid)));
    out.push_str(", ");
    out.push_str(&format!("dim3({})", read_text(hip, block)));
    out.push_str(", ");
    out.push_str(zero_defaulted(hip, &m.config[2]));
    out.push_str(", ");
    out.push_str(zero_defaulted(hip, &m.config[3]));

    if let Some(args) = &m.args {
        out.push_str(", ");
        out.push_str(read_text(hip, args));
    }
    out.push(')');

    let write = m.expr.write_range();
    let span = Span::between(write.start, write.end() + m.last_token_len);
    hip.insert_edit(Edit::replacing(span, hip.source, out));
    hip.stats.count_occurrence("hipLaunchKernelGGL");
    true
}

/// `extern __shared__ T name[];` becomes `HIP_DYNAMIC_SHARED(T, name);`.
fn shared_array(hip: &mut Hipifier, m: &SharedArrayMatch) -> bool {
    if !m.has_external_linkage {
        return false;
    }

    // An unnameable element type means there is nothing sensible to
    // expand the macro with; the match is consumed without a patch.
    let Some(type_name) = m.element_type.name() else {
        return true;
    };

    let span = Span::between(m.decl_start, m.type_end + 1);
    let replacement = format!("HIP_DYNAMIC_SHARED({type_name}, {})", m.var_name);
    hip.insert_edit(Edit::replacing(span, hip.source, replacement));
    hip.stats.count_occurrence("HIP_DYNAMIC_SHARED");
    true
}

/// A call resolved to a device/kernel function: rename the callee via the
/// device-function table.
fn device_call(hip: &mut Hipifier, m: &DeviceCallMatch) -> bool {
    lexical::find_and_replace(hip, &m.callee_name, m.call_start, Table::DeviceFunctions);
    true
}

fn read_text<'a>(hip: &Hipifier<'a>, info: &SpanInfo) -> &'a str {
    info.read_range().text(hip.source)
}

fn zero_defaulted<'a>(hip: &Hipifier<'a>, arg: &ConfigArg) -> &'a str {
    match arg {
        ConfigArg::Given(info) => read_text(hip, info),
        ConfigArg::Defaulted => "0",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{ElementType, SourceCallbacks};
    use crate::rules::{RuleSet, TranslationMode};

    fn plain(source: &str, text: &str) -> SpanInfo {
        let at = source.find(text).unwrap();
        SpanInfo::plain(Span::new(at, text.len()))
    }

    fn launch_match(source: &str, callee: &str, grid: &str, block: &str) -> LaunchMatch {
        let expr_start = source.find(callee).unwrap();
        let close = source.rfind(')').unwrap();
        LaunchMatch {
            expr: SpanInfo::plain(Span::between(expr_start, close)),
            last_token_len: 1,
            callee: plain(source, callee),
            callee_is_template: false,
            config: [
                ConfigArg::Given(plain(source, grid)),
                ConfigArg::Given(plain(source, block)),
                ConfigArg::Defaulted,
                ConfigArg::Defaulted,
            ],
            args: None,
        }
    }

    fn run(source: &str, event: MatchEvent) -> (String, Vec<String>) {
        let rules = RuleSet::builtin();
        let mut hip = Hipifier::new(source, &rules, TranslationMode::Hip);
        hip.structural_match(&event);
        let translation = hip.finish(None);
        let diags = translation
            .diagnostics
            .iter()
            .map(|d| d.message.clone())
            .collect();
        (translation.apply(source).unwrap(), diags)
    }

    #[test]
    fn launch_defaults_stream_and_shmem_to_zero() {
        let source = "kernel<<<grid, block>>>(a, b);";
        let mut m = launch_match(source, "kernel", "grid", "block");
        let args_start = source.find("a, b").unwrap();
        m.args = Some(SpanInfo::plain(Span::new(args_start, 4)));
        let (out, _) = run(source, MatchEvent::launch(m));
        assert!(out
            .contains("hipLaunchKernelGGL(kernel, dim3(grid), dim3(block), 0, 0, a, b);"));
    }

    #[test]
    fn launch_with_explicit_config_copies_it() {
        let source = "kernel<<<g, b, shmem, stream>>>(x);";
        let mut m = launch_match(source, "kernel", "g", "b");
        m.config[2] = ConfigArg::Given(plain(source, "shmem"));
        m.config[3] = ConfigArg::Given(plain(source, "stream"));
        m.args = Some(plain(source, "x"));
        let (out, _) = run(source, MatchEvent::launch(m));
        assert!(out.contains(
            "hipLaunchKernelGGL(kernel, dim3(g), dim3(b), shmem, stream, x);"
        ));
    }

    #[test]
    fn launch_without_args_has_no_trailing_comma() {
        let source = "kernel<<<g, b>>>();";
        let m = launch_match(source, "kernel", "g", "b");
        let (out, _) = run(source, MatchEvent::launch(m));
        assert!(out.contains("hipLaunchKernelGGL(kernel, dim3(g), dim3(b), 0, 0);"));
    }

    #[test]
    fn template_callee_is_parenthesized() {
        let source = "reduce<float, 256><<<g, b>>>(in, out);";
        let mut m = launch_match(source, "reduce<float, 256>", "g", "b");
        m.callee_is_template = true;
        m.args = Some(plain(source, "in, out"));
        let (out, _) = run(source, MatchEvent::launch(m));
        assert!(out.contains(
            "hipLaunchKernelGGL((reduce<float, 256>), dim3(g), dim3(b), 0, 0, in, out);"
        ));
    }

    #[test]
    fn launch_missing_dimensions_declines_to_later_candidates() {
        let source = "__any_sync(mask, p);";
        let launch = LaunchMatch {
            expr: SpanInfo::plain(Span::new(0, 10)),
            last_token_len: 1,
            callee: SpanInfo::plain(Span::new(0, 10)),
            callee_is_template: false,
            config: [
                ConfigArg::Defaulted,
                ConfigArg::Defaulted,
                ConfigArg::Defaulted,
                ConfigArg::Defaulted,
            ],
            args: None,
        };
        let event = MatchEvent {
            launch: Some(launch),
            shared_array: None,
            device_call: Some(DeviceCallMatch {
                callee_name: "__any_sync".to_string(),
                call_start: 0,
            }),
        };
        let (out, diags) = run(source, event);
        // The malformed launch declined; the device-call candidate ran
        // and translated the deprecated primitive.
        assert!(out.contains("__any(mask, p);"));
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn shared_array_rewrite() {
        let source = "extern __shared__ uint sRadix1[];";
        let m = SharedArrayMatch {
            has_external_linkage: true,
            decl_start: 0,
            type_end: source.find(']').unwrap(),
            element_type: ElementType::Builtin("uint".to_string()),
            var_name: "sRadix1".to_string(),
        };
        let (out, _) = run(source, MatchEvent::shared_array(m));
        assert!(out.contains("HIP_DYNAMIC_SHARED(uint, sRadix1);"));
    }

    #[test]
    fn shared_array_without_external_linkage_declines() {
        let source = "static __shared__ float tile[];";
        let m = SharedArrayMatch {
            has_external_linkage: false,
            decl_start: 0,
            type_end: source.find(']').unwrap(),
            element_type: ElementType::Builtin("float".to_string()),
            var_name: "tile".to_string(),
        };
        let (out, _) = run(source, MatchEvent::shared_array(m));
        assert!(out.contains("static __shared__ float tile[];"));
    }

    #[test]
    fn shared_array_unresolved_type_is_silently_skipped() {
        let source = "extern __shared__ mystery_t buf[];";
        let m = SharedArrayMatch {
            has_external_linkage: true,
            decl_start: 0,
            type_end: source.find(']').unwrap(),
            element_type: ElementType::Unresolved,
            var_name: "buf".to_string(),
        };
        let (out, diags) = run(source, MatchEvent::shared_array(m));
        assert!(out.contains("extern __shared__ mystery_t buf[];"));
        assert!(diags.is_empty());
    }

    #[test]
    fn device_call_unsupported_warns_only() {
        let source = "unsigned m = __activemask();";
        let m = DeviceCallMatch {
            callee_name: "__activemask".to_string(),
            call_start: source.find("__activemask").unwrap(),
        };
        let (out, diags) = run(source, MatchEvent::device_call(m));
        assert!(out.contains("__activemask();"));
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn launch_wins_over_device_call() {
        let source = "kern<<<g, b>>>(p);";
        let launch = launch_match(source, "kern", "g", "b");
        let event = MatchEvent {
            launch: Some(launch),
            shared_array: None,
            device_call: Some(DeviceCallMatch {
                callee_name: "__any_sync".to_string(),
                call_start: 0,
            }),
        };
        let (out, diags) = run(source, event);
        assert!(out.contains("hipLaunchKernelGGL(kern"));
        // The device-call candidate never ran.
        assert!(diags.is_empty());
    }
}
