use docchat_core::types::RawHit;

use crate::session::AgentSpec;

/// What the external LLM/index stack returns for one user message.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BackendResponse {
    /// Answer tokens in streaming order. May be empty for direct queries.
    #[serde(default)]
    pub tokens: Vec<String>,
    /// Retrieved nodes the answer was grounded on.
    #[serde(default)]
    pub source_nodes: Vec<RawHit>,
}

/// The chat backend: agent runtime, query engine and index live behind this.
pub trait ChatBackend: Send + Sync {
    /// Run the tool-using agent described by `spec` on `message`.
    fn stream_chat(&self, spec: &AgentSpec, message: &str) -> anyhow::Result<BackendResponse>;
    /// Answer `message` straight from the query engine.
    fn query(&self, spec: &AgentSpec, message: &str) -> anyhow::Result<BackendResponse>;
}
