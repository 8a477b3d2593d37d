//! TAP encoder.
//!
//! Every call writes its lines to the sink immediately, in call order. The
//! writer never reorders or reconciles anything.

use std::borrow::Cow;
use std::io;

use tracing::{debug, instrument};

use crate::core::types::{Plan, Report, RunReport, TestResult};
use crate::io::sink::LineSink;

/// Writes TAP lines to a [`LineSink`].
///
/// Holds its own auto-number counter; share one writer across callers only
/// with external synchronization.
pub struct Writer<K> {
    sink: K,
    next_num: u32,
}

impl<K: LineSink> Writer<K> {
    pub fn new(sink: K) -> Self {
        Self { sink, next_num: 1 }
    }

    /// Emit `min..max`.
    pub fn plan(&mut self, plan: &Plan) -> io::Result<()> {
        self.sink.write_line(&format!("{}..{}", plan.min, plan.max))
    }

    /// Emit one result line.
    ///
    /// A `num` of zero takes the next number from the writer's counter and
    /// advances it. Explicit numbers are written as given and leave the
    /// counter alone.
    pub fn report(&mut self, report: &Report) -> io::Result<()> {
        let num = if report.num == 0 {
            let num = self.next_num;
            self.next_num = self.next_num.saturating_add(1);
            num
        } else {
            report.num
        };
        self.sink.write_line(&result_line(num, report))
    }

    /// Emit `# text`, one line per line of `text`.
    pub fn diagnostic(&mut self, text: &str) -> io::Result<()> {
        if text.is_empty() {
            return self.sink.write_line("#");
        }
        for line in text.lines() {
            if line.is_empty() {
                self.sink.write_line("#")?;
            } else {
                self.sink.write_line(&format!("# {line}"))?;
            }
        }
        Ok(())
    }

    /// Emit `Bail out! reason`. Meant to be the last call, though not enforced.
    pub fn bail_out(&mut self, reason: &str) -> io::Result<()> {
        if reason.is_empty() {
            return self.sink.write_line("Bail out!");
        }
        self.sink.write_line(&format!("Bail out! {reason}"))
    }

    /// Emit a whole run: the plan first, then each recorded test preceded by
    /// its diagnostics. Empty slots are skipped.
    #[instrument(skip_all, fields(tests = run.tests.len()))]
    pub fn run(&mut self, run: &RunReport) -> io::Result<()> {
        if let Some(plan) = &run.plan {
            self.plan(plan)?;
        }
        for report in run.reports() {
            for line in &report.diagnostics {
                self.diagnostic(line)?;
            }
            self.report(report)?;
        }
        debug!("run written");
        Ok(())
    }

    /// Flush the sink and hand it back.
    pub fn close(mut self) -> io::Result<K> {
        self.sink.flush()?;
        Ok(self.sink)
    }
}

fn result_line(num: u32, report: &Report) -> String {
    let mut line = match report.result {
        TestResult::Pass | TestResult::Skip => format!("ok {num}"),
        TestResult::Fail => format!("not ok {num}"),
    };
    if !report.name.is_empty() {
        let name = escape_name(&report.name);
        line.push(' ');
        // A leading `-` would be read back as the `- ` separator.
        if name.starts_with('-') {
            line.push_str("- ");
        }
        line.push_str(&name);
    }
    if report.result == TestResult::Skip {
        push_directive(&mut line, "SKIP", report.skip_reason.as_deref());
    } else if report.todo {
        push_directive(&mut line, "TODO", report.todo_reason.as_deref());
    }
    line
}

/// Escape `\` and `#` so the name never reads back as a directive.
fn escape_name(name: &str) -> Cow<'_, str> {
    if !name.contains(['\\', '#']) {
        return Cow::Borrowed(name);
    }
    let mut out = String::with_capacity(name.len() + 2);
    for c in name.chars() {
        if matches!(c, '\\' | '#') {
            out.push('\\');
        }
        out.push(c);
    }
    Cow::Owned(out)
}

fn push_directive(line: &mut String, keyword: &str, reason: Option<&str>) {
    line.push_str(" # ");
    line.push_str(keyword);
    if let Some(reason) = reason.filter(|reason| !reason.is_empty()) {
        line.push_str(": ");
        line.push_str(reason);
    }
}
