//! Dynamic WHERE / ORDER BY / LIMIT / SET fragments.
//!
//! All builders share one placeholder numbering scheme: numbers are
//! contiguous and start at a caller-supplied offset. Field filters are
//! visited in ascending field-name order, so a given key set always yields
//! the same text and numbering; [`crate::params`] extracts the matching
//! values in the same order.

mod filter;
mod raw;

pub use filter::{Assignments, Conjunction, Filter, Filters, Op, RawClause};

use crate::error::{BuilderError, BuilderResult};
use crate::schema::Schema;
use crate::templates::placeholders;
use raw::RawTemplate;

/// Running `$n` counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Placeholders {
    next: usize,
}

impl Placeholders {
    pub(crate) fn starting_at(first: usize) -> Self {
        Self { next: first }
    }

    /// Take one number.
    pub(crate) fn take(&mut self) -> usize {
        let n = self.next;
        self.next += 1;
        n
    }

    /// Take `count` numbers rendered as `$a,$b,...`.
    pub(crate) fn run(&mut self, count: usize) -> String {
        let out = placeholders(self.next, count);
        self.next += count;
        out
    }
}

impl Schema {
    /// Build the boolean expression for `filters`, numbering from `first`.
    ///
    /// Returns the text without a `WHERE` keyword, or an empty string when
    /// there is nothing to filter on. With both field filters and a raw
    /// clause, each side is parenthesized and joined by the raw clause's
    /// conjunction; a raw clause alone is still parenthesized.
    pub fn filter_clause(&self, filters: &Filters, first: usize) -> BuilderResult<String> {
        let mut counter = Placeholders::starting_at(first);

        let mut conditions = Vec::new();
        for (field, filter) in filters.iter() {
            let column = self
                .column(field)
                .ok_or_else(|| BuilderError::invalid_field("filters", field))?;

            let expr = if column.flags.non_text && filter.op.is_textual() {
                format!("CAST({} AS TEXT)", column.quoted())
            } else {
                column.quoted()
            };
            conditions.push(filter.op.render(&expr, counter.take()));
        }
        let fields = conditions.join(" AND ");

        let Some(raw) = filters.raw_clause() else {
            return Ok(fields);
        };
        let raw_sql = RawTemplate::parse(self, &raw.template)?.render(&raw.args, &mut counter)?;

        if fields.is_empty() {
            Ok(format!("({raw_sql})"))
        } else {
            Ok(format!(
                "({fields}){}({raw_sql})",
                raw.conjunction.separator()
            ))
        }
    }

    /// Build an ORDER BY list from alternating field / direction entries.
    ///
    /// `desc` (exactly) sorts descending, any other direction ascending; a
    /// trailing field without a direction sorts ascending.
    pub fn order_clause(&self, order: &[&str]) -> BuilderResult<String> {
        let mut parts = Vec::with_capacity(order.len() / 2 + 1);
        for pair in order.chunks(2) {
            let field = pair[0];
            let column = self
                .column(field)
                .ok_or_else(|| BuilderError::invalid_field("order", field))?;
            let direction = match pair.get(1) {
                Some(&"desc") => "DESC",
                _ => "ASC",
            };
            parts.push(format!("{} {direction}", column.quoted()));
        }
        Ok(parts.join(","))
    }

    /// Build a SET list numbered from `$1`, sorted by field name.
    ///
    /// Returns the text and the number of placeholders used, so a following
    /// WHERE clause can start at `count + 1`.
    pub fn set_clause(&self, values: &Assignments) -> BuilderResult<(String, usize)> {
        if values.is_empty() {
            return Err(BuilderError::EmptySet { op: "set" });
        }

        let mut counter = Placeholders::starting_at(1);
        let mut parts = Vec::with_capacity(values.len());
        for (field, _) in values.iter() {
            let column = self
                .column(field)
                .ok_or_else(|| BuilderError::invalid_field("set", field))?;
            parts.push(format!("{}=${}", column.quoted(), counter.take()));
        }
        Ok((parts.join(","), parts.len()))
    }
}

/// `LIMIT L [OFFSET O]`, or nothing when `limit` is 0.
pub fn limit_offset_clause(limit: u64, offset: u64) -> String {
    match (limit, offset) {
        (0, _) => String::new(),
        (limit, 0) => format!("LIMIT {limit}"),
        (limit, offset) => format!("LIMIT {limit} OFFSET {offset}"),
    }
}

#[cfg(test)]
mod tests;
