use serde_json::Value;
use std::time::Duration;

/// Typed value carried by a structured field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    /// Rendered as whole milliseconds
    Duration(Duration),
    /// Rendered as the error's display text
    Error(String),
}

impl FieldValue {
    /// JSON representation shared by the machine and console encoders
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Str(s) | FieldValue::Error(s) => Value::String(s.clone()),
            FieldValue::Int(i) => Value::from(*i),
            FieldValue::Uint(u) => Value::from(*u),
            FieldValue::Float(f) => float_to_json(*f),
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Duration(d) => Value::from(d.as_millis() as u64),
        }
    }
}

fn float_to_json(f: f64) -> Value {
    if f.is_nan() {
        Value::String("NaN".to_string())
    } else if f.is_infinite() {
        let text = if f > 0.0 { "+Inf" } else { "-Inf" };
        Value::String(text.to_string())
    } else {
        // from_f64 only fails on non-finite input
        serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

/// A structured key/value pair attached to a record
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: String,
    pub value: FieldValue,
}

impl Field {
    pub fn new(key: impl Into<String>, value: FieldValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, FieldValue::Str(value.into()))
    }

    pub fn int(key: impl Into<String>, value: i64) -> Self {
        Self::new(key, FieldValue::Int(value))
    }

    pub fn float(key: impl Into<String>, value: f64) -> Self {
        Self::new(key, FieldValue::Float(value))
    }

    pub fn duration(key: impl Into<String>, value: Duration) -> Self {
        Self::new(key, FieldValue::Duration(value))
    }

    /// Error field under the conventional `error` key
    pub fn error(err: &dyn std::error::Error) -> Self {
        Self::named_error("error", err)
    }

    pub fn named_error(key: impl Into<String>, err: &dyn std::error::Error) -> Self {
        Self::new(key, FieldValue::Error(err.to_string()))
    }
}

/// Shorthand for building a field from any convertible value
pub fn field(key: impl Into<String>, value: impl Into<FieldValue>) -> Field {
    Field::new(key, value.into())
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for FieldValue {
            fn from(v: $t) -> Self {
                FieldValue::Int(v as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for FieldValue {
            fn from(v: $t) -> Self {
                FieldValue::Uint(v as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for FieldValue {
    fn from(v: f32) -> Self {
        FieldValue::Float(v as f64)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Str(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Str(v)
    }
}

impl From<Duration> for FieldValue {
    fn from(v: Duration) -> Self {
        FieldValue::Duration(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_shorthand_picks_variant() {
        assert_eq!(field("port", 8080).value, FieldValue::Int(8080));
        assert_eq!(field("bytes", 12u64).value, FieldValue::Uint(12));
        assert_eq!(field("user", "ana").value, FieldValue::Str("ana".into()));
        assert_eq!(field("ok", true).value, FieldValue::Bool(true));
    }

    #[test]
    fn test_duration_renders_whole_millis() {
        let f = field("elapsed", Duration::from_micros(2_750_900));
        assert_eq!(f.value.to_json(), json!(2750));
    }

    #[test]
    fn test_non_finite_floats_render_as_strings() {
        assert_eq!(FieldValue::Float(f64::NAN).to_json(), json!("NaN"));
        assert_eq!(FieldValue::Float(f64::INFINITY).to_json(), json!("+Inf"));
        assert_eq!(FieldValue::Float(f64::NEG_INFINITY).to_json(), json!("-Inf"));
        assert_eq!(FieldValue::Float(0.5).to_json(), json!(0.5));
    }

    #[test]
    fn test_error_field() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let f = Field::error(&err);
        assert_eq!(f.key, "error");
        assert_eq!(f.value.to_json(), json!("disk gone"));
    }
}
