use crate::solving::solver::{SolverResult, Statistics};
use ssp_instance::Instance;
use std::io::{self, Write};

/// Results with fewer solutions than this are listed one per line, larger ones are only counted.
pub const LISTING_THRESHOLD: usize = 10;

/// Writes the instance summary that precedes a search.
pub fn write_instance(out: &mut impl Write, instance: &Instance) -> io::Result<()> {
    writeln!(out, "{instance}")?;
    writeln!(out, "Original set = {}", format_values(instance.elements()))?;
    writeln!(out, "Target is {}", instance.target())?;
    writeln!(out)
}

pub fn write_result(
    out: &mut impl Write,
    result: &SolverResult,
    statistics: &Statistics,
) -> io::Result<()> {
    if result.solutions.len() < LISTING_THRESHOLD {
        for solution in &result.solutions {
            writeln!(out, "{}", format_values(solution))?;
        }
    } else {
        writeln!(out, "bp found {} solutions", result.solutions.len())?;
    }
    if result.truncated {
        writeln!(
            out,
            "solution limit reached, {} further solutions were not kept",
            statistics.solutions_dropped
        )?;
    }
    writeln!(out, "elapsed time {} ms", statistics.time_to_compute)?;
    writeln!(out)
}

fn format_values(values: &[i64]) -> String {
    let values: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", values.join(", "))
}
