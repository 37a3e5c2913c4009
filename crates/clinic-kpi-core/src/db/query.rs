//! Typed filters for collection queries and their SQL rendering.

use chrono::NaiveDate;
use rusqlite::types::Value;

use crate::models::{DateRange, RecordState};

/// Predicate on a date column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilter {
    /// No restriction
    Any,
    /// Inclusive on both ends
    Between(NaiveDate, NaiveDate),
    /// `<= date`
    OnOrBefore(NaiveDate),
    /// `< date`
    Before(NaiveDate),
}

impl Default for DateFilter {
    fn default() -> Self {
        DateFilter::Any
    }
}

impl DateFilter {
    /// Evaluate the predicate in memory.
    pub fn matches(&self, date: NaiveDate) -> bool {
        match *self {
            DateFilter::Any => true,
            DateFilter::Between(from, to) => from <= date && date <= to,
            DateFilter::OnOrBefore(limit) => date <= limit,
            DateFilter::Before(limit) => date < limit,
        }
    }
}

impl From<DateRange> for DateFilter {
    fn from(range: DateRange) -> Self {
        DateFilter::Between(range.date_from, range.date_to)
    }
}

/// Predicate on a state/status column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateFilter<S> {
    /// No restriction
    Any,
    /// State is one of the listed values
    In(Vec<S>),
    /// State is none of the listed values
    NotIn(Vec<S>),
}

impl<S> Default for StateFilter<S> {
    fn default() -> Self {
        StateFilter::Any
    }
}

impl<S> StateFilter<S> {
    /// Shorthand for a single-state equality predicate.
    pub fn only(state: S) -> Self {
        StateFilter::In(vec![state])
    }
}

impl<S: PartialEq> StateFilter<S> {
    /// Evaluate the predicate in memory.
    pub fn matches(&self, state: &S) -> bool {
        match self {
            StateFilter::Any => true,
            StateFilter::In(states) => states.contains(state),
            StateFilter::NotIn(states) => !states.contains(state),
        }
    }
}

/// Format a date the way it is stored.
pub(crate) fn date_to_sql(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Accumulates `AND`-joined predicates with positional parameters.
#[derive(Debug, Default)]
pub(crate) struct WhereClause {
    clauses: Vec<String>,
    params: Vec<Value>,
}

impl WhereClause {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict a date expression (a column or e.g. `date(created_at)`).
    pub fn date(&mut self, expr: &str, filter: &DateFilter) -> &mut Self {
        match filter {
            DateFilter::Any => {}
            DateFilter::Between(from, to) => {
                self.clauses.push(format!("{expr} >= ? AND {expr} <= ?"));
                self.params.push(Value::Text(date_to_sql(*from)));
                self.params.push(Value::Text(date_to_sql(*to)));
            }
            DateFilter::OnOrBefore(date) => {
                self.clauses.push(format!("{expr} <= ?"));
                self.params.push(Value::Text(date_to_sql(*date)));
            }
            DateFilter::Before(date) => {
                self.clauses.push(format!("{expr} < ?"));
                self.params.push(Value::Text(date_to_sql(*date)));
            }
        }
        self
    }

    /// Restrict a state column.
    pub fn states<S: RecordState>(&mut self, column: &str, filter: &StateFilter<S>) -> &mut Self {
        match filter {
            StateFilter::Any => {}
            StateFilter::In(states) if states.is_empty() => {
                self.clauses.push("0 = 1".to_string());
            }
            StateFilter::In(states) => {
                self.clauses
                    .push(format!("{column} IN ({})", placeholders(states.len())));
                self.push_states(states);
            }
            StateFilter::NotIn(states) if states.is_empty() => {}
            StateFilter::NotIn(states) => {
                self.clauses
                    .push(format!("{column} NOT IN ({})", placeholders(states.len())));
                self.push_states(states);
            }
        }
        self
    }

    /// Restrict a boolean column when a value is given.
    pub fn flag(&mut self, column: &str, value: Option<bool>) -> &mut Self {
        if let Some(value) = value {
            self.clauses.push(format!("{column} = ?"));
            self.params.push(Value::Integer(value as i64));
        }
        self
    }

    /// `WHERE ...` fragment, empty when unrestricted.
    pub fn sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.clauses.join(" AND "))
        }
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    fn push_states<S: RecordState>(&mut self, states: &[S]) {
        self.params
            .extend(states.iter().map(|s| Value::Text(s.as_str().to_string())));
    }
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}
