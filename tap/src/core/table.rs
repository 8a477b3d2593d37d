//! Sparse per-number store of parsed results.

use std::collections::BTreeMap;

use crate::core::types::Report;

/// Reports keyed by test number, built up while reading.
#[derive(Debug, Clone, Default)]
pub struct ResultTable {
    reports: BTreeMap<u32, Report>,
    duplicate: Option<u32>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `report` under its number.
    ///
    /// A second report for a number already present is not stored; the first
    /// such number is remembered so reconciliation can report it as an extra
    /// result. Returns whether the report was stored.
    pub fn insert(&mut self, report: Report) -> bool {
        let num = report.num;
        if self.reports.contains_key(&num) {
            self.duplicate.get_or_insert(num);
            return false;
        }
        self.reports.insert(num, report);
        true
    }

    pub fn get(&self, num: u32) -> Option<&Report> {
        self.reports.get(&num)
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Highest test number recorded.
    pub fn max_num(&self) -> Option<u32> {
        self.reports.keys().next_back().copied()
    }

    /// First number that was reported more than once.
    pub fn duplicate(&self) -> Option<u32> {
        self.duplicate
    }

    /// Consume the table, yielding reports in ascending number order.
    pub fn into_reports(self) -> impl Iterator<Item = Report> {
        self.reports.into_values()
    }
}
