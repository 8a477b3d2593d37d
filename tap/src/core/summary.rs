//! Tallies over a reconciled run, used by `tap check`.

use serde::Serialize;

use crate::core::types::{Report, RunReport, TestResult};

/// Which non-failing outcomes still count against a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuccessPolicy {
    pub fail_on_skip: bool,
    pub fail_on_bonus: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub planned: Option<u32>,
    pub passed: usize,
    /// Failures that were not marked TODO.
    pub failed: usize,
    pub skipped: usize,
    /// TODO tests that failed, as expected.
    pub todo: usize,
    /// TODO tests that unexpectedly passed.
    pub bonus: usize,
    pub missing: usize,
}

impl Summary {
    pub fn from_report(run: &RunReport) -> Self {
        let mut summary = Summary {
            planned: run.plan.map(|plan| plan.max),
            ..Summary::default()
        };
        for slot in &run.tests {
            let Some(report) = slot else {
                summary.missing += 1;
                continue;
            };
            match (report.result, report.todo) {
                (TestResult::Skip, _) => summary.skipped += 1,
                (TestResult::Pass, true) => summary.bonus += 1,
                (TestResult::Pass, false) => summary.passed += 1,
                (TestResult::Fail, true) => summary.todo += 1,
                (TestResult::Fail, false) => summary.failed += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped + self.todo + self.bonus
    }

    pub fn is_success(&self, policy: SuccessPolicy) -> bool {
        self.failed == 0
            && self.missing == 0
            && !(policy.fail_on_skip && self.skipped > 0)
            && !(policy.fail_on_bonus && self.bonus > 0)
    }

    /// Stable single-line rendering.
    pub fn render(&self) -> String {
        let planned = self
            .planned
            .map_or_else(|| "none".to_string(), |max| max.to_string());
        format!(
            "planned={} total={} passed={} failed={} skipped={} todo={} bonus={} missing={}",
            planned,
            self.total(),
            self.passed,
            self.failed,
            self.skipped,
            self.todo,
            self.bonus,
            self.missing
        )
    }
}

/// Non-TODO failures, in test-number order.
pub fn failures(run: &RunReport) -> impl Iterator<Item = &Report> {
    run.reports()
        .filter(|report| report.result == TestResult::Fail && !report.todo)
}
