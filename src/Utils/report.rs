/*
Pretty printing of the catalog, of a mean-value solution, of its bisection trace and of the
frame schedule of its staged replay.
*/
use crate::numerical::frame_clock::ReplayFrame;
use crate::numerical::function_registry::FunctionInfo;
use crate::numerical::mean_value_solver::MeanValueSolution;
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Debug, PartialEq, Tabled)]
pub struct ReportRow {
    quantity: &'static str,
    value: String,
}

pub fn solution_rows(solution: &MeanValueSolution, estimate: Option<f64>) -> Vec<ReportRow> {
    let mut rows = vec![
        ReportRow {
            quantity: "mean value",
            value: format!("{:.6}", solution.mean_value),
        },
        ReportRow {
            quantity: "c",
            value: format!("{:.6}", solution.point),
        },
        ReportRow {
            quantity: "f(c)",
            value: format!("{:.6}", solution.function_value),
        },
        ReportRow {
            quantity: "|f(c) - mean|",
            value: format!("{:.2e}", solution.residual()),
        },
        ReportRow {
            quantity: "iterations",
            value: solution.iterations.to_string(),
        },
        ReportRow {
            quantity: "converged",
            value: solution.converged.to_string(),
        },
    ];
    if let Some(estimate) = estimate {
        rows.push(ReportRow {
            quantity: "your c",
            value: format!("{:.6}", estimate),
        });
        rows.push(ReportRow {
            quantity: "|your c - c|",
            value: format!("{:.6}", solution.estimate_error(estimate)),
        });
    }
    rows
}

pub fn solution_table(solution: &MeanValueSolution, estimate: Option<f64>) -> String {
    let mut table = Table::new(solution_rows(solution, estimate));
    table.with(Style::modern_rounded());
    table.to_string()
}

pub fn trace_table(solution: &MeanValueSolution) -> String {
    let mut builder = Builder::default();
    builder.push_record(["iteration", "low", "high", "c", "f(c) - mean"]);
    for step in &solution.trace {
        builder.push_record([
            step.iteration.to_string(),
            format!("{:.6}", step.low),
            format!("{:.6}", step.high),
            format!("{:.6}", step.c),
            format!("{:+.3e}", step.diff),
        ]);
    }
    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.to_string()
}

/// When each step of the trace shows up in a staged replay.
pub fn replay_table(solution: &MeanValueSolution, schedule: &[ReplayFrame]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["frame", "time, ms", "steps shown", "c"]);
    for frame in schedule {
        let c = frame
            .steps_shown
            .checked_sub(1)
            .and_then(|i| solution.trace.get(i))
            .map_or_else(|| "-".to_string(), |step| format!("{:.6}", step.c));
        builder.push_record([
            frame.frame.to_string(),
            format!("{:.0}", frame.elapsed_ms),
            frame.steps_shown.to_string(),
            c,
        ]);
    }
    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.to_string()
}

pub fn catalog_table(functions: &[FunctionInfo]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["id", "f(x)", "family F(x) + C"]);
    for info in functions {
        builder.push_record([
            info.id.to_string(),
            info.display_name.to_string(),
            info.antiderivative_name.unwrap_or("-").to_string(),
        ]);
    }
    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerical::frame_clock::{FrameClock, REPLAY_DELAY_MS, SolverReplay, replay_schedule};
    use crate::numerical::function_registry::FunctionRegistry;
    use crate::numerical::mean_value_solver::MeanValueSolver;
    use crate::numerical::scalar_function::ClosureFunction;

    fn square_solution() -> MeanValueSolution {
        let f = ClosureFunction::new(|x| x * x, "x^2");
        MeanValueSolver::new().solve(&f, 0.0, 3.0).unwrap()
    }

    #[test]
    fn test_solution_table() {
        let solution = square_solution();
        let rows = solution_rows(&solution, Some(1.5));
        assert_eq!(rows.len(), 8);
        assert_eq!(rows[4].value, "9");
        let table = solution_table(&solution, None);
        assert!(table.contains("mean value"));
        assert!(table.contains("2.9955"));
        assert!(table.contains("1.728516"));
        assert!(!table.contains("your c"));
    }

    #[test]
    fn test_trace_table() {
        let solution = square_solution();
        let table = trace_table(&solution);
        // header, then one line per step, plus borders
        assert!(table.lines().count() > solution.trace.len());
        assert!(table.contains("f(c) - mean"));
    }

    #[test]
    fn test_replay_table() {
        let solution = square_solution();
        let replay = SolverReplay::new(solution.trace.clone(), REPLAY_DELAY_MS);
        let schedule = replay_schedule(&replay, &mut FrameClock::default());
        assert_eq!(schedule.len(), solution.trace.len());
        let table = replay_table(&solution, &schedule);
        assert!(table.contains("steps shown"));
        // the last revealed midpoint is the answer
        assert!(table.contains("1.728516"));
    }

    #[test]
    fn test_catalog_table() {
        let functions = FunctionRegistry::new().list_functions();
        let table = catalog_table(&functions);
        assert!(table.contains("quadratic"));
        assert!(table.contains("custom"));
    }
}
