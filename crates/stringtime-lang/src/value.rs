use std::fmt::{self, Display, Formatter};

use itertools::Itertools;
use smol_str::SmolStr;

/// A value a [`crate::Context`] hands to the renderer.
#[derive(Clone, PartialEq, Debug)]
pub enum Value {
    String(String),
    Int(i128),
    UInt(u128),
    Bool(bool),
    Float(f64),
    /// The symbolic tag of an enumeration, rendered as its name.
    Enum(SmolStr),
    /// Only usable as the subject of a `for (list)` directive.
    Sequence(Vec<Value>),
    /// A value with no text form, such as a JSON object. It can be counted
    /// as a loop element but neither substituted nor iterated.
    Unsupported(&'static str),
}

macro_rules! impl_from_int {
    ($variant:ident, $target:ty, $($t:ty),+) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::$variant(n as $target)
                }
            }
        )+
    };
}

impl_from_int!(Int, i128, i8, i16, i32, i64, i128, isize);
impl_from_int!(UInt, u128, u8, u16, u32, u64, u128, usize);

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(n as f64)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::Sequence(values.into_iter().map(Into::into).collect())
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Int(n) => write!(f, "{}", n),
            Value::UInt(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Float(n) => fmt_float(f, *n),
            Value::Enum(tag) => write!(f, "{}", tag),
            Value::Sequence(values) => write!(f, "[{}]", values.iter().join(", ")),
            Value::Unsupported(type_name) => write!(f, "<{}>", type_name),
        }
    }
}

/// Scientific notation with 15 fractional digits and a signed, at least two
/// digit exponent, e.g. `3.141592653589793e+00`.
fn fmt_float(f: &mut Formatter<'_>, n: f64) -> Result<(), fmt::Error> {
    if n.is_nan() {
        return write!(f, "nan");
    }

    if n.is_infinite() {
        return write!(f, "{}", if n.is_sign_negative() { "-inf" } else { "inf" });
    }

    let formatted = format!("{:.15e}", n);

    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().map_err(|_| fmt::Error)?;
            let sign = if exponent < 0 { '-' } else { '+' };
            write!(f, "{}e{}{:02}", mantissa, sign, exponent.unsigned_abs())
        }
        None => write!(f, "{}", formatted),
    }
}

impl Value {
    pub fn is_sequence(&self) -> bool {
        matches!(self, Value::Sequence(_))
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(values) => Some(values),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Int(_) | Value::UInt(_) => "integer",
            Value::Bool(_) => "bool",
            Value::Float(_) => "float",
            Value::Enum(_) => "enum",
            Value::Sequence(_) => "sequence",
            Value::Unsupported(type_name) => type_name,
        }
    }

    /// Converts a JSON value. A top-level `null` yields `None`; objects, and
    /// `null` inside an array, become [`Value::Unsupported`].
    pub fn from_json(json: &serde_json::Value) -> Option<Value> {
        match json {
            serde_json::Value::String(s) => Some(Value::String(s.clone())),
            serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
            serde_json::Value::Number(n) => n
                .as_u64()
                .map(Value::from)
                .or_else(|| n.as_i64().map(Value::from))
                .or_else(|| n.as_f64().map(Value::Float)),
            serde_json::Value::Array(values) => Some(Value::Sequence(
                values
                    .iter()
                    .map(|value| Value::from_json(value).unwrap_or(Value::Unsupported("null")))
                    .collect(),
            )),
            serde_json::Value::Object(_) => Some(Value::Unsupported("object")),
            serde_json::Value::Null => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case::string(Value::from("Zig stringtime"), "Zig stringtime")]
    #[case::multi_byte(Value::from("こんにちは"), "こんにちは")]
    #[case::positive_int(Value::from(42i32), "42")]
    #[case::negative_int(Value::from(-7i64), "-7")]
    #[case::zero(Value::from(0u8), "0")]
    #[case::max_u64(Value::from(u64::MAX), "18446744073709551615")]
    #[case::min_i128(Value::from(i128::MIN), "-170141183460469231731687303715884105728")]
    #[case::bool_true(Value::from(true), "true")]
    #[case::bool_false(Value::from(false), "false")]
    #[case::pi(Value::from(std::f64::consts::PI), "3.141592653589793e+00")]
    #[case::float_zero(Value::from(0.0), "0.000000000000000e+00")]
    #[case::float_large(Value::from(1234.5), "1.234500000000000e+03")]
    #[case::float_small(Value::from(-0.001), "-1.000000000000000e-03")]
    #[case::float_three_digit_exponent(Value::from(1e100), "1.000000000000000e+100")]
    #[case::float_f32(Value::from(0.5f32), "5.000000000000000e-01")]
    #[case::nan(Value::from(f64::NAN), "nan")]
    #[case::inf(Value::from(f64::INFINITY), "inf")]
    #[case::neg_inf(Value::from(f64::NEG_INFINITY), "-inf")]
    #[case::enum_tag(Value::Enum("Published".into()), "Published")]
    #[case::sequence(Value::from(vec![1, 2]), "[1, 2]")]
    #[case::unsupported(Value::Unsupported("object"), "<object>")]
    fn test_display(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(value.to_string(), expected);
    }

    #[rstest]
    #[case::string(json!("text"), Some(Value::from("text")))]
    #[case::unsigned(json!(3), Some(Value::UInt(3)))]
    #[case::signed(json!(-3), Some(Value::Int(-3)))]
    #[case::float(json!(1.5), Some(Value::Float(1.5)))]
    #[case::bool(json!(true), Some(Value::Bool(true)))]
    #[case::array(json!(["a", "b"]), Some(Value::from(vec!["a", "b"])))]
    #[case::null(json!(null), None)]
    #[case::object(json!({"a": 1}), Some(Value::Unsupported("object")))]
    #[case::array_with_object(
        json!(["a", {"b": 1}]),
        Some(Value::Sequence(vec![Value::from("a"), Value::Unsupported("object")]))
    )]
    #[case::array_with_null(
        json!([null, 1]),
        Some(Value::Sequence(vec![Value::Unsupported("null"), Value::UInt(1)]))
    )]
    fn test_from_json(#[case] json: serde_json::Value, #[case] expected: Option<Value>) {
        assert_eq!(Value::from_json(&json), expected);
    }

    #[test]
    fn test_as_sequence() {
        let value = Value::from(vec!["First", "Second"]);
        assert!(value.is_sequence());
        assert_eq!(value.as_sequence().map(|s| s.len()), Some(2));
        assert_eq!(Value::from("x").as_sequence(), None);
        assert_eq!(value.type_name(), "sequence");
    }
}
