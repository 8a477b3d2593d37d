//! Reconciliation of the plan against the results that were actually seen.
//!
//! Runs once, after input ends. The report is always produced, even when the
//! run fails, so callers can inspect whatever was parsed.

use crate::core::ranges::format_ranges;
use crate::core::table::ResultTable;
use crate::core::types::{Plan, Report, RunReport};
use crate::error::TapError;

/// Arrange `table` into numbered slots and check it against `plan`.
///
/// - No plan and no results: [`TapError::NoTests`].
/// - A result numbered beyond `plan.max`: [`TapError::UnexpectedExtraResult`]
///   for the lowest such number; results within the plan are still placed.
/// - A number reported twice: [`TapError::UnexpectedExtraResult`].
/// - Planned numbers with no result: [`TapError::MissingResults`].
///
/// Allocates one slot per planned number; the line grammar caps numbers at
/// [`MAX_TEST_NUM`](crate::core::grammar::MAX_TEST_NUM).
pub fn reconcile(plan: Option<Plan>, table: ResultTable) -> (RunReport, Option<TapError>) {
    let duplicate = table.duplicate();

    let Some(plan) = plan else {
        if table.is_empty() {
            return (RunReport::default(), Some(TapError::NoTests));
        }
        let len = table.max_num().unwrap_or(0);
        let mut tests = empty_slots(len);
        for report in table.into_reports() {
            place(&mut tests, report);
        }
        let report = RunReport { plan: None, tests };
        return (report, duplicate.map(TapError::UnexpectedExtraResult));
    };

    let mut tests = empty_slots(plan.max);
    let mut extra = None;
    for report in table.into_reports() {
        if report.num > plan.max {
            extra = Some(report.num);
            break;
        }
        place(&mut tests, report);
    }
    let report = RunReport {
        plan: Some(plan),
        tests,
    };

    if let Some(num) = extra.or(duplicate) {
        return (report, Some(TapError::UnexpectedExtraResult(num)));
    }

    let ranges = format_ranges(
        (plan.min.max(1)..=plan.max).filter(|num| slot(&report.tests, *num).is_none()),
    );
    if !ranges.is_empty() {
        return (report, Some(TapError::MissingResults(ranges)));
    }

    (report, None)
}

fn empty_slots(len: u32) -> Vec<Option<Report>> {
    vec![None; len as usize]
}

fn place(tests: &mut [Option<Report>], report: Report) {
    let Some(idx) = report.num.checked_sub(1) else {
        return;
    };
    if let Some(entry) = tests.get_mut(idx as usize) {
        *entry = Some(report);
    }
}

fn slot(tests: &[Option<Report>], num: u32) -> Option<&Report> {
    tests.get((num - 1) as usize).and_then(Option::as_ref)
}
