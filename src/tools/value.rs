use std::fmt;

/// A positional tool argument or return value.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolValue {
    Int(i64),
    Float(f64),
    Str(String),
}

impl ToolValue {
    /// Coerce a raw argument token: integer first, then float, else the token itself.
    pub fn coerce(token: &str) -> Self {
        if let Ok(i) = token.parse::<i64>() {
            return ToolValue::Int(i);
        }
        if let Ok(f) = token.parse::<f64>() {
            return ToolValue::Float(f);
        }
        ToolValue::Str(token.to_string())
    }

    /// Coerce every whitespace-separated token of `args`.
    pub fn coerce_all(args: &str) -> Vec<Self> {
        args.split_whitespace().map(Self::coerce).collect()
    }

    /// Convert a JSON argument from the structured tool-call channel.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => ToolValue::Int(i),
                None => ToolValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => ToolValue::Str(s.clone()),
            other => ToolValue::Str(other.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ToolValue::Int(i) => Some(*i as f64),
            ToolValue::Float(f) => Some(*f),
            ToolValue::Str(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ToolValue::Int(_) => "int",
            ToolValue::Float(_) => "float",
            ToolValue::Str(_) => "str",
        }
    }
}

impl fmt::Display for ToolValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolValue::Int(i) => write!(f, "{i}"),
            ToolValue::Float(x) => fmt_float(*x, f),
            ToolValue::Str(s) => write!(f, "{s}"),
        }
    }
}

/// Shortest round-trip digits. Decimal exponents below -4 or from 16 up switch to
/// `1.5e-05` / `1e+16` form; integral floats otherwise keep their ".0".
fn fmt_float(x: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if x.is_nan() {
        return write!(f, "nan");
    }
    if x.is_infinite() {
        return write!(f, "{}", if x > 0.0 { "inf" } else { "-inf" });
    }
    let sci = format!("{x:e}");
    if let Some((mantissa, exp)) = sci.split_once('e')
        && let Ok(exp) = exp.parse::<i32>()
        && !(-4..16).contains(&exp)
    {
        let sign = if exp < 0 { '-' } else { '+' };
        return write!(f, "{mantissa}e{sign}{:02}", exp.unsigned_abs());
    }
    if x.fract() == 0.0 {
        write!(f, "{x:.1}")
    } else {
        write!(f, "{x}")
    }
}
