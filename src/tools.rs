use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::json;
use tracing::debug;

pub mod error;
pub mod math;
pub mod text;
pub mod value;

pub use error::ToolError;
pub use value::ToolValue;

/// A declared positional parameter, used for the structured tool channel and `/tools`.
#[derive(Debug, Clone, Copy)]
pub struct ToolParam {
    pub name: &'static str,
    /// JSON Schema type name.
    pub kind: &'static str,
    /// Swallows every remaining argument.
    pub variadic: bool,
}

pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn params(&self) -> &'static [ToolParam];
    fn call(&self, args: &[ToolValue]) -> Result<ToolValue, ToolError>;
}

/// Read-only name -> tool table built once at startup.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<&'static str, Arc<dyn Tool>>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.tools.keys()).finish()
    }
}

impl ToolRegistry {
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::default()
    }

    /// The static tool set shipped with the agent.
    pub fn with_defaults() -> Self {
        Self::builder()
            .tool(math::Add)
            .tool(math::Subtract)
            .tool(math::Multiply)
            .tool(math::Divide)
            .tool(text::WordCount)
            .tool(text::CharCount)
            .tool(text::Slugify)
            .build()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.values()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Invoke a registered tool. Returns `None` when `name` is not registered.
    pub fn dispatch(
        &self,
        name: &str,
        args: &[ToolValue],
    ) -> Option<Result<ToolValue, ToolError>> {
        let tool = self.tools.get(name)?;
        debug!(tool = name, ?args, "dispatching tool call");
        Some(tool.call(args))
    }

    /// Map named JSON arguments onto a tool's declared positional parameters.
    pub fn positional_args(
        &self,
        name: &str,
        arguments: &serde_json::Value,
    ) -> Vec<ToolValue> {
        match arguments {
            serde_json::Value::Array(items) => items.iter().map(ToolValue::from_json).collect(),
            serde_json::Value::Object(obj) => {
                let Some(tool) = self.tools.get(name) else {
                    return obj.values().map(ToolValue::from_json).collect();
                };
                let mut out = Vec::new();
                for p in tool.params() {
                    match obj.get(p.name) {
                        Some(serde_json::Value::Array(items)) if p.variadic => {
                            out.extend(items.iter().map(ToolValue::from_json))
                        }
                        Some(v) => out.push(ToolValue::from_json(v)),
                        None => {}
                    }
                }
                out
            }
            serde_json::Value::Null => Vec::new(),
            other => vec![ToolValue::from_json(other)],
        }
    }

    /// JSON Schema for a tool's parameters, in the `function.parameters` shape.
    pub fn parameters_schema(tool: &dyn Tool) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();
        for p in tool.params() {
            properties.insert(p.name.to_string(), json!({ "type": p.kind }));
            if !p.variadic {
                required.push(p.name);
            }
        }
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

#[derive(Default)]
pub struct ToolRegistryBuilder {
    tools: BTreeMap<&'static str, Arc<dyn Tool>>,
}

impl ToolRegistryBuilder {
    /// Later registrations under the same name replace earlier ones.
    pub fn tool(mut self, tool: impl Tool + 'static) -> Self {
        self.tools.insert(tool.name(), Arc::new(tool));
        self
    }

    pub fn build(self) -> ToolRegistry {
        ToolRegistry { tools: self.tools }
    }
}
