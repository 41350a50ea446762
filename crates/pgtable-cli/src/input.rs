//! JSON filter and assignment input.
//!
//! ```text
//! {
//!   "Price": {"op": "gt", "value": 10},
//!   "Email": "a@example.com",
//!   "_": {"conjunction": "or", "args": [".Age IN (?)", [18, 21]]}
//! }
//! ```
//!
//! A bare scalar is an `eq` filter. The `_` entry is the raw clause: its first
//! argument is the template, the rest are scalars or arrays of scalars.

use pgtable::{Arg, Assignments, Conjunction, Filter, Filters, Op, RawClause, Value};
use serde_json::{Map, Value as Json};

/// Key of the raw clause entry.
pub const RAW_KEY: &str = "_";

fn parse_op(name: &str) -> anyhow::Result<Op> {
    Ok(match name {
        "eq" => Op::Equal,
        "ne" => Op::NotEqual,
        "like" => Op::Like,
        "match" => Op::Match,
        "gt" => Op::Greater,
        "lt" => Op::Lower,
        "ge" => Op::GreaterOrEqual,
        "le" => Op::LowerOrEqual,
        "bit" => Op::Bit,
        other => anyhow::bail!("unknown operator: {other}"),
    })
}

fn scalar(json: &Json) -> anyhow::Result<Value> {
    match json {
        Json::Bool(b) => Ok(Value::Bool(*b)),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::UInt(u))
            } else if let Some(f) = n.as_f64() {
                Ok(Value::Float(f))
            } else {
                anyhow::bail!("unsupported number: {n}")
            }
        }
        Json::String(s) => Ok(Value::Text(s.clone())),
        other => anyhow::bail!("expected a scalar, got {other}"),
    }
}

fn object(input: &str, what: &str) -> anyhow::Result<Map<String, Json>> {
    match serde_json::from_str::<Json>(input) {
        Ok(Json::Object(map)) => Ok(map),
        Ok(_) => anyhow::bail!("{what} must be a JSON object"),
        Err(e) => anyhow::bail!("invalid {what} JSON: {e}"),
    }
}

fn raw_clause(json: &Json) -> anyhow::Result<RawClause> {
    let Json::Object(map) = json else {
        anyhow::bail!("raw clause must be an object");
    };
    let conjunction = match map.get("conjunction").and_then(Json::as_str) {
        Some(c) if c.eq_ignore_ascii_case("or") => Conjunction::Or,
        _ => Conjunction::And,
    };
    let Some(Json::Array(args)) = map.get("args") else {
        anyhow::bail!("raw clause requires an \"args\" array");
    };
    let Some((Json::String(template), rest)) = args.split_first() else {
        anyhow::bail!("raw clause args must start with the template string");
    };

    let mut raw = RawClause::new(template.as_str()).conjunction(conjunction);
    for arg in rest {
        let arg = match arg {
            Json::Array(items) => Arg::List(items.iter().map(scalar).collect::<anyhow::Result<_>>()?),
            other => Arg::Scalar(scalar(other)?),
        };
        raw = raw.arg(arg);
    }
    Ok(raw)
}

/// Parse the `--filters` JSON object.
pub fn parse_filters(input: &str) -> anyhow::Result<Filters> {
    let mut filters = Filters::new();
    for (field, entry) in object(input, "filters")? {
        if field == RAW_KEY {
            filters.set_raw(raw_clause(&entry)?);
            continue;
        }
        let filter = match &entry {
            Json::Object(map) => {
                let op = match map.get("op") {
                    Some(Json::String(name)) => parse_op(name)?,
                    Some(other) => anyhow::bail!("{field}: op must be a string, got {other}"),
                    None => Op::Equal,
                };
                let Some(value) = map.get("value") else {
                    anyhow::bail!("{field}: missing \"value\"");
                };
                Filter::new(op, scalar(value).map_err(|e| anyhow::anyhow!("{field}: {e}"))?)
            }
            other => Filter::new(Op::Equal, scalar(other).map_err(|e| anyhow::anyhow!("{field}: {e}"))?),
        };
        filters.insert(field, filter);
    }
    Ok(filters)
}

/// Parse the `--set` JSON object.
pub fn parse_assignments(input: &str) -> anyhow::Result<Assignments> {
    let mut values = Assignments::new();
    for (field, json) in object(input, "set")? {
        let value = scalar(&json).map_err(|e| anyhow::anyhow!("{field}: {e}"))?;
        values.insert(field, value);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_with_ops_and_shorthand() {
        let filters = parse_filters(r#"{"Price": {"op": "gt", "value": 10}, "Email": "a@b.c", "Age": {"value": 3}}"#)
            .unwrap();
        let fields: Vec<(&str, &Filter)> = filters.iter().collect();

        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0], ("Age", &Filter::new(Op::Equal, 3i64)));
        assert_eq!(fields[1], ("Email", &Filter::new(Op::Equal, "a@b.c")));
        assert_eq!(fields[2], ("Price", &Filter::new(Op::Greater, 10i64)));
        assert!(filters.raw_clause().is_none());
    }

    #[test]
    fn raw_entry() {
        let filters = parse_filters(r#"{"_": {"conjunction": "or", "args": [".Age IN (?) OR .Price=?", [1, 2], 5]}}"#)
            .unwrap();
        let raw = filters.raw_clause().unwrap();

        assert_eq!(raw.conjunction, Conjunction::Or);
        assert_eq!(raw.template, ".Age IN (?) OR .Price=?");
        assert_eq!(
            raw.args,
            vec![
                Arg::List(vec![Value::Int(1), Value::Int(2)]),
                Arg::Scalar(Value::Int(5)),
            ]
        );
    }

    #[test]
    fn raw_conjunction_defaults_to_and() {
        let filters = parse_filters(r#"{"_": {"conjunction": "xor", "args": [".Age=1"]}}"#).unwrap();
        assert_eq!(filters.raw_clause().unwrap().conjunction, Conjunction::And);
    }

    #[test]
    fn bad_filters() {
        assert!(parse_filters("[1]").is_err());
        assert!(parse_filters("{").is_err());
        assert!(parse_filters(r#"{"Age": {"op": "between", "value": 1}}"#).is_err());
        assert!(parse_filters(r#"{"Age": {"op": "eq"}}"#).is_err());
        assert!(parse_filters(r#"{"Age": null}"#).is_err());
        assert!(parse_filters(r#"{"_": {"args": [1]}}"#).is_err());
    }

    #[test]
    fn assignments() {
        let values = parse_assignments(r#"{"Price": 12.5, "Active": true, "Name": "x"}"#).unwrap();
        assert_eq!(values.get("Price"), Some(&Value::Float(12.5)));
        assert_eq!(values.get("Active"), Some(&Value::Bool(true)));
        assert_eq!(values.get("Name"), Some(&Value::Text("x".into())));
        assert!(parse_assignments(r#"{"Price": [1]}"#).is_err());
    }
}
