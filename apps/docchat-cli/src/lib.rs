//! Command implementations for the `docchat` binary. Each command returns the
//! text to print so it can be exercised without a terminal.
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};

use docchat_agent::settings::ChatSettings;
use docchat_agent::{AgentSpec, AppContext, BackendResponse, ChatBackend, ChatSession};
use docchat_core::references::{aggregate, render_sources_markdown};
use docchat_core::types::RawHit;

/// Replays a backend response captured earlier, whatever the question.
pub struct RecordedBackend {
    response: BackendResponse,
}

impl RecordedBackend {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let response = serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
        Ok(Self { response })
    }
}

impl ChatBackend for RecordedBackend {
    fn stream_chat(&self, _spec: &AgentSpec, _message: &str) -> Result<BackendResponse> { Ok(self.response.clone()) }
    fn query(&self, _spec: &AgentSpec, _message: &str) -> Result<BackendResponse> { Ok(self.response.clone()) }
}

pub fn personas(ctx: &AppContext) -> String {
    let mut out = String::new();
    for p in ctx.personas.iter() {
        out.push_str(&format!("{} [{}]\n  {}\n", p.name, p.key, p.markdown_description));
    }
    out
}

pub fn starters(ctx: &AppContext) -> String {
    let mut out = String::new();
    for s in &ctx.app.starters {
        out.push_str(&format!("{}: {}\n", s.label, s.message));
    }
    out
}

pub fn spec(ctx: &AppContext, persona: &str, model: Option<String>, temperature: Option<f32>) -> Result<String> {
    let initial = ctx.settings_schema.initial();
    let settings = ChatSettings {
        model: model.unwrap_or(initial.model),
        temperature: temperature.unwrap_or(initial.temperature),
    };
    let session = ChatSession::start(ctx, persona, Some(settings))?;
    Ok(serde_json::to_string_pretty(session.spec())?)
}

pub fn references(ctx: &AppContext, hits_file: &Path, as_json: bool) -> Result<String> {
    let raw = fs::read_to_string(hits_file).with_context(|| format!("reading {}", hits_file.display()))?;
    let raw_hits: Vec<RawHit> = serde_json::from_str(&raw).with_context(|| format!("parsing {}", hits_file.display()))?;
    let summaries = aggregate(&ctx.normalizer().normalize_all(&raw_hits));
    if as_json {
        return Ok(serde_json::to_string_pretty(&summaries)?);
    }
    Ok(render_sources_markdown(&summaries, &ctx.layout()))
}

pub fn replay(ctx: &AppContext, persona: &str, response_file: &Path, message: &str) -> Result<String> {
    let backend = RecordedBackend::from_file(response_file)?;
    let session = ChatSession::start(ctx, persona, None)?;
    let reply = session.handle_message(&backend, message)?;
    let mut out = format!("[{}]\n", reply.author);
    if let Some(answer) = &reply.answer {
        out.push_str(answer);
        out.push('\n');
    }
    if let Some(body) = &reply.operator_body {
        out.push_str(body);
    }
    if let Some(sources) = &reply.sources_markdown {
        out.push('\n');
        out.push_str(sources);
    }
    Ok(out)
}

pub fn parse_temperature(value: &str) -> Result<f32> {
    value.parse::<f32>().map_err(|_| anyhow!("--temperature requires a number, got '{value}'"))
}
