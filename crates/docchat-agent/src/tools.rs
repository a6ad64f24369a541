//! Tools exposed to the agent. Arithmetic runs locally; `Search` and `Web`
//! are described here but executed by the backend that owns the index and the
//! web search client.
use serde::{Deserialize, Serialize};
use serde_json::Value;

use docchat_core::error::{Error, Result};

pub const SEARCH_TOOL: &str = "Search";
pub const WEB_TOOL: &str = "Web";

pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    /// Run the tool on JSON arguments and return its textual output.
    fn call(&self, args: &Value) -> Result<String>;
}

/// Name and description as handed to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Multiply,
}

/// Integer tool over arguments `x` and `y`.
pub struct ArithmeticTool {
    op: ArithmeticOp,
}

impl ArithmeticTool {
    pub fn new(op: ArithmeticOp) -> Self { Self { op } }

    fn arg(&self, args: &Value, key: &str) -> Result<i64> {
        args.get(key).and_then(Value::as_i64).ok_or_else(|| Error::Tool {
            tool: self.name().to_string(),
            reason: format!("missing integer argument '{key}'"),
        })
    }
}

impl Tool for ArithmeticTool {
    fn name(&self) -> &str {
        match self.op {
            ArithmeticOp::Add => "add",
            ArithmeticOp::Multiply => "multiply",
        }
    }

    fn description(&self) -> &str {
        match self.op {
            ArithmeticOp::Add => "Useful function to add two numbers.",
            ArithmeticOp::Multiply => "Useful function to multiply two numbers.",
        }
    }

    fn call(&self, args: &Value) -> Result<String> {
        let (x, y) = (self.arg(args, "x")?, self.arg(args, "y")?);
        let out = match self.op {
            ArithmeticOp::Add => x.checked_add(y),
            ArithmeticOp::Multiply => x.checked_mul(y),
        };
        out.map(|v| v.to_string())
            .ok_or_else(|| Error::Tool { tool: self.name().to_string(), reason: "integer overflow".into() })
    }
}

/// A tool whose execution happens in the backend.
pub struct DelegatedTool {
    spec: ToolSpec,
}

impl DelegatedTool {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self { spec: ToolSpec { name: name.into(), description: description.into() } }
    }

    pub fn search() -> Self {
        Self::new(
            SEARCH_TOOL,
            "Useful for answering questions. Do not use if questions are about you. Try not to condense the question and provide a detailed answer.",
        )
    }

    /// Web search; `today` is embedded so the model can reason about recency.
    pub fn web(today: chrono::NaiveDate) -> Self {
        Self::new(
            WEB_TOOL,
            format!("Useful when 'web, google' keywords are mentioned. Today's date is {}", today.format("%Y-%m-%d")),
        )
    }
}

impl Tool for DelegatedTool {
    fn name(&self) -> &str { &self.spec.name }

    fn description(&self) -> &str { &self.spec.description }

    fn call(&self, _args: &Value) -> Result<String> {
        Err(Error::Tool { tool: self.spec.name.clone(), reason: "executed by the chat backend".into() })
    }
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self { Self::default() }

    /// `multiply`, `add`, `Search`, `Web` in the order the agent sees them.
    pub fn standard(today: chrono::NaiveDate) -> Self {
        let mut reg = Self::new();
        reg.register(Box::new(ArithmeticTool::new(ArithmeticOp::Multiply)));
        reg.register(Box::new(ArithmeticTool::new(ArithmeticOp::Add)));
        reg.register(Box::new(DelegatedTool::search()));
        reg.register(Box::new(DelegatedTool::web(today)));
        reg
    }

    /// Registering a name twice replaces the earlier tool in place.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        match self.tools.iter().position(|t| t.name() == tool.name()) {
            Some(i) => self.tools[i] = tool,
            None => self.tools.push(tool),
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> { self.tools.iter().find(|t| t.name() == name).map(|t| &**t) }

    pub fn call(&self, name: &str, args: &Value) -> Result<String> {
        self.get(name).ok_or_else(|| Error::NotFound(format!("tool '{name}'")))?.call(args)
    }

    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools
            .iter()
            .map(|t| ToolSpec { name: t.name().to_string(), description: t.description().to_string() })
            .collect()
    }
}
