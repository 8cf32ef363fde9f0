//! Tool catalogue — MCP-compatible definitions for the reader operations.
//!
//! Each tool has a name, a description and a JSON Schema for its arguments.
//! [`ToolRequest`] turns a named call with JSON arguments into a typed
//! request the reader can answer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::build_info;
use crate::policy::ReadMode;

/// Name the catalogue is published under.
pub const SERVER_NAME: &str = "smartread";

/// A tool an agent can call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name (e.g. "smart_read").
    pub name: String,
    /// Human-readable description of what the tool does.
    pub description: String,
    /// JSON Schema for the tool's input parameters.
    pub parameters: serde_json::Value,
}

/// Errors from interpreting a tool call.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid arguments for {tool}: {source}")]
    InvalidArguments {
        tool: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A typed tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", content = "arguments", rename_all = "snake_case")]
pub enum ToolRequest {
    SmartRead {
        file_path: String,
        #[serde(default)]
        mode: Option<ReadMode>,
        #[serde(default)]
        summary_style: Option<String>,
    },
    ReadSection {
        file_path: String,
        section_heading: String,
    },
    ListSections {
        file_path: String,
    },
}

impl ToolRequest {
    /// Build a request from a tool name and its JSON arguments.
    pub fn parse(name: &str, arguments: serde_json::Value) -> Result<Self, ToolError> {
        if !matches!(name, "smart_read" | "read_section" | "list_sections") {
            return Err(ToolError::UnknownTool(name.to_string()));
        }
        serde_json::from_value(serde_json::json!({ "name": name, "arguments": arguments }))
            .map_err(|source| ToolError::InvalidArguments {
                tool: name.to_string(),
                source,
            })
    }

    /// The document every request refers to.
    pub fn file_path(&self) -> &str {
        match self {
            ToolRequest::SmartRead { file_path, .. }
            | ToolRequest::ReadSection { file_path, .. }
            | ToolRequest::ListSections { file_path } => file_path,
        }
    }

    /// The tool this request calls.
    pub fn tool_name(&self) -> &'static str {
        match self {
            ToolRequest::SmartRead { .. } => "smart_read",
            ToolRequest::ReadSection { .. } => "read_section",
            ToolRequest::ListSections { .. } => "list_sections",
        }
    }
}

/// Registry of the tools the reader exposes, keyed by name.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, ToolDefinition>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the three reader tools.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_defaults();
        registry
    }

    /// Register a tool, replacing any tool with the same name.
    pub fn register(&mut self, definition: ToolDefinition) {
        self.tools.insert(definition.name.clone(), definition);
    }

    /// Tool definitions, sorted by name.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut definitions: Vec<_> = self.tools.values().cloned().collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    /// Server identity plus the definitions, as published to clients.
    pub fn catalogue(&self) -> serde_json::Value {
        serde_json::json!({
            "server": {
                "name": SERVER_NAME,
                "version": build_info::version_string(),
            },
            "tools": self.definitions(),
        })
    }

    fn register_defaults(&mut self) {
        self.register(ToolDefinition {
            name: "smart_read".to_string(),
            description: "Read a file, summarizing it automatically when it exceeds the \
                          token threshold. Summaries carry coverage and confidence metadata."
                .to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "file_path": {
                        "type": "string",
                        "description": "Path to the file to read"
                    },
                    "mode": {
                        "type": "string",
                        "enum": ["auto", "full", "summary"],
                        "description": "auto summarizes above the threshold; \
                                        full never summarizes; summary always does"
                    },
                    "summary_style": {
                        "type": "string",
                        "description": "Summary style (default: structured)"
                    }
                },
                "required": ["file_path"]
            }),
        });

        self.register(ToolDefinition {
            name: "read_section".to_string(),
            description: "Extract one section of a document by a case-insensitive \
                          fragment of its heading (e.g. \"3.1\", \"Methods\")."
                .to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "file_path": {
                        "type": "string",
                        "description": "Path to the file"
                    },
                    "section_heading": {
                        "type": "string",
                        "description": "Heading fragment to search for"
                    }
                },
                "required": ["file_path", "section_heading"]
            }),
        });

        self.register(ToolDefinition {
            name: "list_sections".to_string(),
            description: "List every heading in a document, in order.".to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "file_path": {
                        "type": "string",
                        "description": "Path to the file"
                    }
                },
                "required": ["file_path"]
            }),
        });
    }
}
