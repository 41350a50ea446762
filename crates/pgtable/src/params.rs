//! Parameter lists matching the placeholders of the clause builders.
//!
//! Each function walks its input in the same order as the corresponding
//! builder in [`crate::clause`], so value `i` always binds to `$first+i`.

use crate::clause::{Assignments, Filters};
use crate::value::{Arg, Value};

/// Values for [`Schema::filter_clause`](crate::Schema::filter_clause): field
/// filters by ascending name, then the raw clause arguments with lists
/// expanded element by element.
pub fn filter_values(filters: &Filters) -> Vec<Value> {
    let mut out: Vec<Value> = filters.iter().map(|(_, f)| f.value.clone()).collect();

    if let Some(raw) = filters.raw_clause() {
        for arg in &raw.args {
            match arg {
                Arg::Scalar(v) => out.push(v.clone()),
                Arg::List(values) => out.extend(values.iter().cloned()),
            }
        }
    }
    out
}

/// Values for [`Schema::set_clause`](crate::Schema::set_clause), by ascending field name.
pub fn set_values(values: &Assignments) -> Vec<Value> {
    values.iter().map(|(_, v)| v.clone()).collect()
}

/// Values for an UPDATE: the SET values followed by the WHERE values.
pub fn update_values(values: &Assignments, filters: &Filters) -> Vec<Value> {
    let mut out = set_values(values);
    out.extend(filter_values(filters));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::{Conjunction, Op, RawClause};

    #[test]
    fn filter_values_follow_sorted_fields_then_raw() {
        let filters = Filters::new()
            .filter("Price", Op::Equal, 33)
            .filter("PostCode2", Op::Equal, "11-111")
            .raw(
                RawClause::new(".Price=? OR .Age IN (?)")
                    .arg(7)
                    .arg(vec![1, 2, 3])
                    .conjunction(Conjunction::Or),
            );

        assert_eq!(
            filter_values(&filters),
            vec![
                Value::Text("11-111".into()),
                Value::Int(33),
                Value::Int(7),
                Value::Int(1),
                Value::Int(2),
                Value::Int(3),
            ]
        );
    }

    #[test]
    fn empty_raw_template_contributes_no_values() {
        let filters = Filters::new()
            .filter("Age", Op::Greater, 1)
            .raw(RawClause::new("").arg(5));
        assert_eq!(filter_values(&filters), vec![Value::Int(1)]);
    }

    #[test]
    fn update_values_put_set_first() {
        let values = Assignments::new().set("Price", 1234).set("PostCode2", "12-345");
        let filters = Filters::new().filter("PrimaryEmail", Op::Equal, "a@example.com");

        assert_eq!(
            update_values(&values, &filters),
            vec![
                Value::Text("12-345".into()),
                Value::Int(1234),
                Value::Text("a@example.com".into()),
            ]
        );
    }
}
