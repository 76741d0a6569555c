pub mod base;
pub mod web_search;

use crate::config::Config;
use base::Tool;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

/// Tool registry - manages all available tools
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new tool registry with the core tools registered
    pub fn new(config: Config) -> Self {
        let mut tools: HashMap<String, Arc<dyn Tool>> = HashMap::new();

        tools.insert(
            "web_search".to_string(),
            Arc::new(web_search::WebSearchTool::new(config)),
        );

        Self { tools }
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    /// Get all tool definitions for the host model API
    pub fn list_tool_definitions(&self) -> Vec<serde_json::Value> {
        self.tools
            .values()
            .map(|tool| {
                json!({
                    "name": tool.id(),
                    "description": tool.description(),
                    "input_schema": tool.input_schema(),
                })
            })
            .collect()
    }

    /// Get all tool names
    pub fn list_names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    /// Dynamically insert a tool into the registry
    ///
    /// Used by hosts that supply tools with runtime dependencies.
    pub fn insert_tool(&mut self, name: String, tool: Arc<dyn Tool>) {
        self.tools.insert(name, tool);
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
