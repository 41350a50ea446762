//! Parameter values bound to `$n` placeholders.

use crate::entity::FieldKind;
use bytes::BytesMut;
use std::error::Error;
use std::fmt;
use tokio_postgres::types::{IsNull, ToSql, Type};

/// A scalar parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
            Self::UInt(_) => "unsigned integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
        }
    }

    /// Parse textual input as a value of `kind`.
    ///
    /// Signed integers accept an optional `-` followed by digits, unsigned
    /// integers digits only. Floats additionally
    /// accept a decimal part, booleans accept `true`/`false` in any case and
    /// text is taken verbatim. Anything else yields `None`.
    pub fn parse(kind: &FieldKind, input: &str) -> Option<Self> {
        match kind {
            k if k.is_unsigned() => {
                if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                input.parse::<u64>().ok().map(Self::UInt)
            }
            k if k.is_integer() => {
                if !is_integer_literal(input) {
                    return None;
                }
                input.parse::<i64>().ok().map(Self::Int)
            }
            FieldKind::F32 | FieldKind::F64 => {
                if !is_integer_literal(input) && !is_decimal_literal(input) {
                    return None;
                }
                input.parse::<f64>().ok().map(Self::Float)
            }
            FieldKind::Bool => match input.to_ascii_lowercase().as_str() {
                "true" => Some(Self::Bool(true)),
                "false" => Some(Self::Bool(false)),
                _ => None,
            },
            FieldKind::String => Some(Self::Text(input.to_string())),
            _ => None,
        }
    }
}

fn is_integer_literal(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

// `-?\d*\.\d+`
fn is_decimal_literal(s: &str) -> bool {
    let body = s.strip_prefix('-').unwrap_or(s);
    let Some((int, frac)) = body.split_once('.') else {
        return false;
    };
    int.bytes().all(|b| b.is_ascii_digit())
        && !frac.is_empty()
        && frac.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v:?}"),
        }
    }
}

macro_rules! value_from {
    ($variant:ident: $($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v.into())
                }
            }
        )*
    };
}

value_from!(Int: i8, i16, i32, i64);
value_from!(UInt: u8, u16, u32, u64);
value_from!(Float: f32, f64);
value_from!(Bool: bool);
value_from!(Text: String, &str);

impl From<isize> for Value {
    fn from(v: isize) -> Self {
        Value::Int(v as i64)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::UInt(v as u64)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

// ─── ToSql ──────────────────────────────────────────────────────────────────

fn encode_int(
    v: i64,
    ty: &Type,
    out: &mut BytesMut,
) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
    match *ty {
        Type::INT2 => i16::try_from(v)?.to_sql_checked(ty, out),
        Type::INT4 => i32::try_from(v)?.to_sql_checked(ty, out),
        Type::FLOAT4 => {
            let f = v as f32;
            if f as i128 != i128::from(v) {
                return Err(format!("integer {v} is not exactly representable as float4").into());
            }
            f.to_sql_checked(ty, out)
        }
        Type::FLOAT8 => {
            let f = v as f64;
            if f as i128 != i128::from(v) {
                return Err(format!("integer {v} is not exactly representable as float8").into());
            }
            f.to_sql_checked(ty, out)
        }
        _ => v.to_sql_checked(ty, out),
    }
}

fn encode_float(
    v: f64,
    ty: &Type,
    out: &mut BytesMut,
) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
    match *ty {
        Type::FLOAT4 => {
            let f = v as f32;
            if v.is_finite() && !f.is_finite() {
                return Err(format!("float {v} is out of range for float4").into());
            }
            f.to_sql_checked(ty, out)
        }
        _ => v.to_sql_checked(ty, out),
    }
}

impl ToSql for Value {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Value::Bool(v) => v.to_sql_checked(ty, out),
            Value::Int(v) => encode_int(*v, ty, out),
            Value::UInt(v) => encode_int(i64::try_from(*v)?, ty, out),
            Value::Float(v) => encode_float(*v, ty, out),
            Value::Text(v) => v.to_sql_checked(ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        matches!(
            *ty,
            Type::BOOL
                | Type::INT2
                | Type::INT4
                | Type::INT8
                | Type::FLOAT4
                | Type::FLOAT8
                | Type::TEXT
                | Type::VARCHAR
                | Type::BPCHAR
                | Type::NAME
                | Type::UNKNOWN
        )
    }

    tokio_postgres::types::to_sql_checked!();
}

// ─── Conversions back into Rust scalars ─────────────────────────────────────

/// Conversion from a [`Value`] into a Rust field type.
///
/// Integers convert between widths when the value fits, integers widen into
/// floats, floats convert between widths.
pub trait FromValue: Sized {
    /// Kind name reported when the conversion fails.
    const EXPECTED: &'static str;

    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! from_value_int {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                const EXPECTED: &'static str = stringify!($ty);

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::Int(v) => <$ty>::try_from(v).ok(),
                        Value::UInt(v) => <$ty>::try_from(v).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

from_value_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl FromValue for f64 {
    const EXPECTED: &'static str = "f64";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Float(v) => Some(v),
            Value::Int(v) => Some(v as f64),
            Value::UInt(v) => Some(v as f64),
            _ => None,
        }
    }
}

impl FromValue for f32 {
    const EXPECTED: &'static str = "f32";

    fn from_value(value: Value) -> Option<Self> {
        f64::from_value(value).map(|v| v as f32)
    }
}

impl FromValue for bool {
    const EXPECTED: &'static str = "bool";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(v),
            _ => None,
        }
    }
}

impl FromValue for String {
    const EXPECTED: &'static str = "String";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }
}

/// An argument of a raw clause: one value, or a list expanded into a run of
/// placeholders.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Scalar(Value),
    List(Vec<Value>),
}

impl Arg {
    /// Number of placeholders the argument occupies.
    pub fn placeholder_count(&self) -> usize {
        match self {
            Arg::Scalar(_) => 1,
            Arg::List(values) => values.len(),
        }
    }
}

impl From<Value> for Arg {
    fn from(v: Value) -> Self {
        Arg::Scalar(v)
    }
}

impl From<Vec<Value>> for Arg {
    fn from(values: Vec<Value>) -> Self {
        Arg::List(values)
    }
}

macro_rules! arg_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Arg {
                fn from(v: $ty) -> Self {
                    Arg::Scalar(v.into())
                }
            }

            impl From<Vec<$ty>> for Arg {
                fn from(values: Vec<$ty>) -> Self {
                    Arg::List(values.into_iter().map(Value::from).collect())
                }
            }
        )*
    };
}

arg_from!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, String, &str);
