use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    #[error("{tool}() takes {expected} positional arguments but {got} were given")]
    Arity {
        tool: String,
        expected: usize,
        got: usize,
    },

    #[error("{tool}(): unsupported operand types: {detail}")]
    Type { tool: String, detail: String },

    #[error("{tool}(): division by zero")]
    DivisionByZero { tool: String },

    #[error("{tool}(): result too large")]
    Overflow { tool: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error_display() {
        let error = ToolError::Arity {
            tool: "add".into(),
            expected: 2,
            got: 1,
        };
        assert_eq!(
            format!("{}", error),
            "add() takes 2 positional arguments but 1 were given"
        );

        let error = ToolError::DivisionByZero {
            tool: "divide".into(),
        };
        assert_eq!(format!("{}", error), "divide(): division by zero");
    }
}
