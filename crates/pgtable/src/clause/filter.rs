//! Filter and assignment inputs for the dynamic clause builders.

use crate::value::{Arg, Value};
use std::collections::BTreeMap;

/// Comparison operator of a filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Op {
    /// `col=$n`
    #[default]
    Equal,
    /// `col!=$n`
    NotEqual,
    /// `col LIKE $n`
    Like,
    /// `col ~ $n` (POSIX regular expression)
    Match,
    /// `col>$n`
    Greater,
    /// `col<$n`
    Lower,
    /// `col>=$n`
    GreaterOrEqual,
    /// `col<=$n`
    LowerOrEqual,
    /// `col&$n>0`
    Bit,
}

impl Op {
    /// Render the condition for an already-quoted column expression.
    pub fn render(self, column: &str, n: usize) -> String {
        match self {
            Op::Equal => format!("{column}=${n}"),
            Op::NotEqual => format!("{column}!=${n}"),
            Op::Like => format!("{column} LIKE ${n}"),
            Op::Match => format!("{column} ~ ${n}"),
            Op::Greater => format!("{column}>${n}"),
            Op::Lower => format!("{column}<${n}"),
            Op::GreaterOrEqual => format!("{column}>=${n}"),
            Op::LowerOrEqual => format!("{column}<=${n}"),
            Op::Bit => format!("{column}&${n}>0"),
        }
    }

    /// Whether the operator compares text and needs non-text columns cast.
    pub fn is_textual(self) -> bool {
        matches!(self, Op::Like | Op::Match)
    }
}

/// How the raw clause joins the ordinary filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Conjunction {
    #[default]
    And,
    Or,
}

impl Conjunction {
    pub(crate) fn separator(self) -> &'static str {
        match self {
            Conjunction::And => " AND ",
            Conjunction::Or => " OR ",
        }
    }
}

/// One field condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub op: Op,
    pub value: Value,
}

impl Filter {
    pub fn new(op: Op, value: impl Into<Value>) -> Self {
        Self {
            op,
            value: value.into(),
        }
    }
}

/// Hand-written SQL condition with `.Field` references and `?` markers.
///
/// ```
/// use pgtable::{Conjunction, RawClause};
///
/// let raw = RawClause::new(".Price=? OR .Age IN (?)")
///     .arg(10)
///     .arg(vec![18, 21])
///     .conjunction(Conjunction::Or);
/// assert_eq!(raw.args.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawClause {
    pub conjunction: Conjunction,
    pub template: String,
    pub args: Vec<Arg>,
}

impl RawClause {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            conjunction: Conjunction::And,
            template: template.into(),
            args: Vec::new(),
        }
    }

    /// Append an argument; a `Vec` expands to one placeholder per element.
    ///
    /// The `Vec` must not be empty: building the clause fails with
    /// [`BuilderError::EmptyList`](crate::BuilderError::EmptyList).
    pub fn arg(mut self, arg: impl Into<Arg>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn conjunction(mut self, conjunction: Conjunction) -> Self {
        self.conjunction = conjunction;
        self
    }

    /// An empty template contributes nothing.
    pub fn is_empty(&self) -> bool {
        self.template.is_empty()
    }
}

/// Field filters plus an optional raw clause.
///
/// Fields are kept sorted by name; clause text and extracted values follow
/// that order regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    fields: BTreeMap<String, Filter>,
    raw: Option<RawClause>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field condition, replacing any previous one for the field.
    pub fn filter(mut self, field: impl Into<String>, op: Op, value: impl Into<Value>) -> Self {
        self.insert(field, Filter::new(op, value));
        self
    }

    /// Set the raw clause.
    pub fn raw(mut self, raw: RawClause) -> Self {
        self.raw = Some(raw);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, filter: Filter) -> &mut Self {
        self.fields.insert(field.into(), filter);
        self
    }

    pub fn set_raw(&mut self, raw: RawClause) -> &mut Self {
        self.raw = Some(raw);
        self
    }

    /// Field conditions in ascending field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Filter)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The raw clause, unless absent or empty.
    pub fn raw_clause(&self) -> Option<&RawClause> {
        self.raw.as_ref().filter(|raw| !raw.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.raw_clause().is_none()
    }
}

/// Field → new value mapping for UPDATE ... SET.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assignments(BTreeMap<String, Value>);

impl Assignments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Assignments in ascending field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Assignments {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
