use super::{Tool, ToolError, ToolParam, ToolValue};

const OPERANDS: &[ToolParam] = &[
    ToolParam {
        name: "a",
        kind: "number",
        variadic: false,
    },
    ToolParam {
        name: "b",
        kind: "number",
        variadic: false,
    },
];

fn operands<'a>(
    tool: &str,
    args: &'a [ToolValue],
) -> Result<(&'a ToolValue, &'a ToolValue), ToolError> {
    match args {
        [a, b] => Ok((a, b)),
        _ => Err(ToolError::Arity {
            tool: tool.to_string(),
            expected: 2,
            got: args.len(),
        }),
    }
}

fn type_error(tool: &str, a: &ToolValue, b: &ToolValue) -> ToolError {
    ToolError::Type {
        tool: tool.to_string(),
        detail: format!("'{}' and '{}'", a.kind(), b.kind()),
    }
}

/// Shared numeric promotion: int op int stays int, anything touching a float becomes float.
fn numeric(
    tool: &str,
    a: &ToolValue,
    b: &ToolValue,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<ToolValue, ToolError> {
    match (a, b) {
        (ToolValue::Int(x), ToolValue::Int(y)) => int_op(*x, *y)
            .map(ToolValue::Int)
            .ok_or_else(|| ToolError::Overflow {
                tool: tool.to_string(),
            }),
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => Ok(ToolValue::Float(float_op(x, y))),
            _ => Err(type_error(tool, a, b)),
        },
    }
}

pub struct Add;

impl Tool for Add {
    fn name(&self) -> &'static str {
        "add"
    }

    fn description(&self) -> &'static str {
        "Add two numbers (two strings are concatenated)."
    }

    fn params(&self) -> &'static [ToolParam] {
        OPERANDS
    }

    fn call(&self, args: &[ToolValue]) -> Result<ToolValue, ToolError> {
        let (a, b) = operands(self.name(), args)?;
        if let (ToolValue::Str(x), ToolValue::Str(y)) = (a, b) {
            return Ok(ToolValue::Str(format!("{x}{y}")));
        }
        numeric(self.name(), a, b, i64::checked_add, |x, y| x + y)
    }
}

pub struct Subtract;

impl Tool for Subtract {
    fn name(&self) -> &'static str {
        "subtract"
    }

    fn description(&self) -> &'static str {
        "Subtract b from a."
    }

    fn params(&self) -> &'static [ToolParam] {
        OPERANDS
    }

    fn call(&self, args: &[ToolValue]) -> Result<ToolValue, ToolError> {
        let (a, b) = operands(self.name(), args)?;
        numeric(self.name(), a, b, i64::checked_sub, |x, y| x - y)
    }
}

/// Upper bound on the byte length of a repeated string.
const MAX_REPEAT_BYTES: usize = 1 << 20;

pub struct Multiply;

impl Tool for Multiply {
    fn name(&self) -> &'static str {
        "multiply"
    }

    fn description(&self) -> &'static str {
        "Multiply two numbers (a string times an integer repeats it)."
    }

    fn params(&self) -> &'static [ToolParam] {
        OPERANDS
    }

    fn call(&self, args: &[ToolValue]) -> Result<ToolValue, ToolError> {
        let (a, b) = operands(self.name(), args)?;
        match (a, b) {
            (ToolValue::Str(s), ToolValue::Int(n)) | (ToolValue::Int(n), ToolValue::Str(s)) => {
                let count = usize::try_from((*n).max(0)).unwrap_or(usize::MAX);
                match s.len().checked_mul(count) {
                    Some(len) if len <= MAX_REPEAT_BYTES => Ok(ToolValue::Str(s.repeat(count))),
                    _ => Err(ToolError::Overflow {
                        tool: self.name().to_string(),
                    }),
                }
            }
            _ => numeric(self.name(), a, b, i64::checked_mul, |x, y| x * y),
        }
    }
}

pub struct Divide;

impl Tool for Divide {
    fn name(&self) -> &'static str {
        "divide"
    }

    fn description(&self) -> &'static str {
        "Divide a by b; the result is always a float."
    }

    fn params(&self) -> &'static [ToolParam] {
        OPERANDS
    }

    fn call(&self, args: &[ToolValue]) -> Result<ToolValue, ToolError> {
        let (a, b) = operands(self.name(), args)?;
        match (a.as_f64(), b.as_f64()) {
            (Some(_), Some(y)) if y == 0.0 => Err(ToolError::DivisionByZero {
                tool: self.name().to_string(),
            }),
            (Some(x), Some(y)) => Ok(ToolValue::Float(x / y)),
            _ => Err(type_error(self.name(), a, b)),
        }
    }
}
