//! Textual run reports
//!
//! Rendering is a pure function over [`RunResults`] so it can be tested
//! without I/O. Every driven cell gets a pass/fail marker, a confidence
//! percentage, and bounded evidence; cells that went through feedback also
//! list the per-iteration constraints and the termination reason.

use crate::outcome::{CellResult, CellStatus, RunResults};
use std::fmt::Write;

/// Render a full run report
pub fn render_report(results: &RunResults) -> String {
    let mut out = String::new();
    for cell in &results.cells {
        render_cell(&mut out, cell);
    }

    let summary = results.summary();
    let _ = writeln!(
        out,
        "{} cells: {} passed, {} failed, {} skipped",
        summary.total(),
        summary.passed,
        summary.failed,
        summary.skipped
    );
    out
}

fn render_cell(out: &mut String, cell: &CellResult) {
    let functions = cell.functions.join(", ");

    if cell.status == CellStatus::Skipped {
        let _ = writeln!(
            out,
            "[SKIP] {} :: {} ({})",
            cell.law,
            functions,
            cell.reason.describe()
        );
        return;
    }

    let marker = if cell.status == CellStatus::Passed {
        "[PASS]"
    } else {
        "[FAIL]"
    };
    let (percent, attempted, succeeded) = cell.verdict.as_ref().map_or((0.0, 0, 0), |v| {
        (
            v.stats.confidence() * 100.0,
            v.stats.total_count,
            v.stats.success_count,
        )
    });
    let _ = writeln!(
        out,
        "{} {} :: {} (confidence {:.1}%, {}/{})",
        marker, cell.law, functions, percent, succeeded, attempted
    );

    if let Some(verdict) = &cell.verdict {
        let evidence = if cell.status == CellStatus::Passed {
            &verdict.successes
        } else {
            &verdict.counterexamples
        };
        for line in evidence {
            let _ = writeln!(out, "    {}", line);
        }
    }

    if cell.attempts > 1 || !cell.iterations.is_empty() {
        let _ = writeln!(
            out,
            "    feedback: {} after {} attempt(s)",
            cell.reason.describe(),
            cell.attempts
        );
        for record in &cell.iterations {
            let _ = writeln!(
                out,
                "      iteration {}: +{:?} (cumulative {:?})",
                record.iteration, record.inferred, record.cumulative
            );
        }
        if cell.iterations.is_empty() && !cell.constraints.is_empty() {
            let _ = writeln!(out, "      constraints: {:?}", cell.constraints);
        }
    }
}
