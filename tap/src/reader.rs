//! Pull-based TAP reader.
//!
//! [`Reader::advance`] consumes lines until a new result is parsed or input
//! stops. Plans may arrive before or after results, diagnostics attach to the
//! next result, and `Bail out!` halts reading immediately.

use std::io::BufRead;

use tracing::{debug, trace, warn};

use crate::core::grammar::{Directive, Line, ResultLine, classify_line};
use crate::core::reconcile::reconcile;
use crate::core::table::ResultTable;
use crate::core::types::{Plan, Report, RunReport, TestResult};
use crate::error::TapError;
use crate::io::source::LineSource;

/// Outcome of one [`Reader::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// A new result was recorded under this test number.
    Produced(u32),
    /// Input ended and the run reconciled cleanly.
    Finished,
    /// Reading stopped on an error; see [`Reader::err`].
    Failed,
}

enum State {
    Reading,
    Done {
        report: RunReport,
        error: Option<TapError>,
    },
}

/// Parses TAP from a [`LineSource`].
pub struct Reader<S> {
    source: S,
    plan: Option<Plan>,
    pending: Vec<String>,
    next_num: u32,
    table: ResultTable,
    state: State,
}

impl<S: LineSource> Reader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            plan: None,
            pending: Vec::new(),
            next_num: 1,
            table: ResultTable::new(),
            state: State::Reading,
        }
    }

    /// Block until a new result is available or there are no more to read.
    ///
    /// After this stops returning [`Advance::Produced`] it keeps returning the
    /// same terminal value without touching the source again.
    pub fn advance(&mut self) -> Advance {
        if let State::Done { error, .. } = &self.state {
            return terminal(error.as_ref());
        }

        loop {
            let line = match self.source.next_line() {
                Some(Ok(line)) => line,
                Some(Err(err)) => {
                    warn!(err = %err, "line source failed");
                    return self.finish(Some(TapError::Io(err)));
                }
                None => return self.finish(None),
            };

            match classify_line(&line) {
                Line::Plan(plan) => self.record_plan(plan),
                Line::Diagnostic(text) => self.pending.push(text.to_string()),
                Line::Result(result) => {
                    if let Some(num) = self.record_result(result) {
                        return Advance::Produced(num);
                    }
                }
                Line::BailOut(reason) => {
                    debug!(reason, "bail out");
                    return self.finish(Some(TapError::Aborted(reason.to_string())));
                }
                Line::Unrecognized => trace!(line = %line, "ignoring unrecognized line"),
            }
        }
    }

    /// Consume all remaining results and return the report with the outcome.
    pub fn read_all(mut self) -> (RunReport, Result<(), TapError>) {
        while let Advance::Produced(_) = self.advance() {}
        match self.state {
            State::Done { report, error } => (report, error.map_or(Ok(()), Err)),
            State::Reading => {
                let (report, error) = reconcile(self.plan, self.table);
                (report, error.map_or(Ok(()), Err))
            }
        }
    }

    /// Reconciled view of the run so far.
    ///
    /// Incomplete if called before reading has finished. While reading, each
    /// call clones the result table and reconciles it again; once reading has
    /// finished the stored report is cloned instead.
    pub fn report(&self) -> RunReport {
        match &self.state {
            State::Done { report, .. } => report.clone(),
            State::Reading => reconcile(self.plan, self.table.clone()).0,
        }
    }

    /// Error that stopped reading, if any.
    ///
    /// `None` while reading is still in progress or when the run ended cleanly.
    pub fn err(&self) -> Option<&TapError> {
        match &self.state {
            State::Done { error, .. } => error.as_ref(),
            State::Reading => None,
        }
    }

    pub fn plan(&self) -> Option<Plan> {
        self.plan
    }

    /// Report recorded for test `num`.
    pub fn get(&self, num: u32) -> Option<&Report> {
        self.table.get(num)
    }

    fn record_plan(&mut self, plan: Plan) {
        match self.plan {
            Some(existing) => {
                warn!(
                    min = plan.min,
                    max = plan.max,
                    existing_max = existing.max,
                    "ignoring additional plan line"
                );
            }
            None => {
                debug!(min = plan.min, max = plan.max, "plan recorded");
                self.plan = Some(plan);
            }
        }
    }

    fn record_result(&mut self, line: ResultLine<'_>) -> Option<u32> {
        let num = line.num.unwrap_or(self.next_num);
        self.next_num = self.next_num.max(num).saturating_add(1);

        let result = if line.ok {
            TestResult::Pass
        } else {
            TestResult::Fail
        };
        let mut report = Report::new(num, result);
        report.name = line.name.into_owned();
        match line.directive {
            Some(Directive::Skip(reason)) => {
                report.result = TestResult::Skip;
                report.skip_reason = reason.map(str::to_string);
            }
            Some(Directive::Todo(reason)) => {
                report.todo = true;
                report.todo_reason = reason.map(str::to_string);
            }
            None => {}
        }
        report.diagnostics = std::mem::take(&mut self.pending);

        if !self.table.insert(report) {
            warn!(num, "duplicate result for test number");
            return None;
        }
        trace!(num, "result recorded");
        Some(num)
    }

    fn finish(&mut self, cause: Option<TapError>) -> Advance {
        if !self.pending.is_empty() {
            debug!(
                count = self.pending.len(),
                "discarding diagnostics with no following result"
            );
            self.pending.clear();
        }
        let (report, reconciled) = reconcile(self.plan, self.table.clone());
        // Source failures and bail-outs outrank plan mismatches.
        let error = cause.or(reconciled);
        let advance = terminal(error.as_ref());
        debug!(
            results = self.table.len(),
            failed = error.is_some(),
            "reading finished"
        );
        self.state = State::Done { report, error };
        advance
    }
}

fn terminal(error: Option<&TapError>) -> Advance {
    match error {
        Some(_) => Advance::Failed,
        None => Advance::Finished,
    }
}

/// Read a whole TAP stream from `input`.
///
/// Convenience for callers that don't need streaming access to results.
pub fn read<R: BufRead>(input: R) -> (RunReport, Result<(), TapError>) {
    Reader::new(input.lines()).read_all()
}
