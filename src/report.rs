//! The outcome block shown to the pushing user.

use std::fmt::Write as _;

use crate::backends::BackendResult;

/// Renders one labeled line per backend, in dispatch order, bracketed by
/// blank lines. The git server relays this block to the pusher's terminal,
/// so it is produced whether the triggers succeeded or not.
pub fn render(results: &[BackendResult]) -> String {
    let mut out = String::from("\n");
    for result in results {
        let _ = writeln!(out, "\t{}: {}", result.backend, result.summary);
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(backend: &'static str, succeeded: bool, summary: &str) -> BackendResult {
        BackendResult {
            backend,
            succeeded,
            summary: summary.to_string(),
        }
    }

    #[test]
    fn one_line_per_backend_in_order() {
        let report = render(&[
            result("buildkite", true, "scheduled:\thttps://x/y"),
            result("tekton", false, "Missing credential: no TEKTON_TRIGGERS_ENDPOINT found"),
        ]);
        assert_eq!(
            report,
            "\n\tbuildkite: scheduled:\thttps://x/y\n\ttekton: Missing credential: no TEKTON_TRIGGERS_ENDPOINT found\n\n"
        );
    }

    #[test]
    fn failures_are_reported_like_successes() {
        let report = render(&[result("tekton", false, "connection refused")]);
        assert!(report.contains("\ttekton: connection refused\n"));
    }

    #[test]
    fn block_is_bracketed_by_blank_lines() {
        let report = render(&[result("buildkite", true, "ok")]);
        assert!(report.starts_with('\n'));
        assert!(report.ends_with("\n\n"));
    }
}
