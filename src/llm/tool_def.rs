use crate::llm::types::{ToolDef, ToolFunctionDef};
use crate::tools::ToolRegistry;

/// Function definitions advertised on the structured tool channel.
pub fn tool_defs(registry: &ToolRegistry) -> Vec<ToolDef> {
    registry
        .iter()
        .map(|tool| ToolDef {
            kind: "function".into(),
            function: ToolFunctionDef {
                name: tool.name().into(),
                description: tool.description().into(),
                parameters: ToolRegistry::parameters_schema(tool.as_ref()),
            },
        })
        .collect()
}
