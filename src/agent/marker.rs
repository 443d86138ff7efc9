//! Textual tool-call convention: `TOOL_CALL: <name> <args...>` anywhere in the model's reply.

use std::sync::LazyLock;

use regex::Regex;

use crate::tools::ToolValue;

static TOOL_CALL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)TOOL_CALL:\s*(\w+)(.*)").expect("tool call pattern"));

#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    pub name: String,
    pub args: Vec<ToolValue>,
}

/// Find the first tool-call marker. Arguments are the rest of that line, coerced per token.
pub fn scan(text: &str) -> Option<ToolInvocation> {
    let caps = TOOL_CALL_RE.captures(text)?;
    let name = caps.get(1)?.as_str().to_string();
    let rest = caps.get(2).map_or("", |m| m.as_str());
    Some(ToolInvocation {
        name,
        args: ToolValue::coerce_all(rest),
    })
}
