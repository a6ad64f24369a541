use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use docchat_core::config::{AppConfig, Config};
use docchat_core::error::{Error, Result};
use docchat_core::metadata::HitNormalizer;
use docchat_core::references::{aggregate, display_elements, operator_body, render_sources_markdown, ReferenceLayout};
use docchat_core::types::{DocumentSummary, Element};

use crate::personas::{Persona, PersonaMode, PersonaRegistry};
use crate::settings::{ChatSettings, ChatSettingsSchema};
use crate::tools::{ToolRegistry, ToolSpec};
use crate::traits::ChatBackend;

/// Everything a session needs, built once at startup and passed by reference.
pub struct AppContext {
    pub app: AppConfig,
    pub personas: PersonaRegistry,
    pub settings_schema: ChatSettingsSchema,
    normalizer: HitNormalizer,
}

impl AppContext {
    pub fn new(app: AppConfig, personas: PersonaRegistry, settings_schema: ChatSettingsSchema) -> Result<Self> {
        app.validate()?;
        let normalizer = HitNormalizer::new(&app.data)?;
        Ok(Self { app, personas, settings_schema, normalizer })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.app()?, PersonaRegistry::from_config(config)?, ChatSettingsSchema::from_config(config)?)
    }

    pub fn builtin() -> Result<Self> {
        Self::new(AppConfig::default(), PersonaRegistry::builtin(), ChatSettingsSchema::default())
    }

    pub fn normalizer(&self) -> &HitNormalizer { &self.normalizer }

    pub fn layout(&self) -> ReferenceLayout { ReferenceLayout::from_data(&self.app.data) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryEngineOptions {
    pub similarity_top_k: usize,
    pub response_mode: String,
    pub embed_model: String,
    pub streaming: bool,
}

/// Full description of the agent a backend should run for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSpec {
    pub persona: String,
    pub mode: PersonaMode,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub streaming: bool,
    pub system_prompt: String,
    pub query_engine: QueryEngineOptions,
    pub tools: Vec<ToolSpec>,
}

impl AgentSpec {
    pub fn build(app: &AppConfig, persona: &Persona, settings: &ChatSettings, tools: &ToolRegistry) -> Self {
        Self {
            persona: persona.name.clone(),
            mode: persona.mode,
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: app.llm.max_tokens,
            streaming: app.llm.streaming,
            system_prompt: persona.prompt.clone(),
            query_engine: QueryEngineOptions {
                similarity_top_k: app.retrieval.similarity_top_k,
                response_mode: app.retrieval.response_mode.clone(),
                embed_model: app.llm.embed_model.clone(),
                streaming: app.llm.streaming,
            },
            tools: tools.specs(),
        }
    }
}

/// Display payload produced for one user message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub author: String,
    /// Streamed agent answer; `None` for direct-query personas.
    pub answer: Option<String>,
    pub references: Vec<DocumentSummary>,
    /// `None` when the backend returned no source nodes.
    pub sources_markdown: Option<String>,
    pub elements: Vec<Element>,
    /// Retrieved text shown as the answer for direct-query personas.
    pub operator_body: Option<String>,
}

pub struct ChatSession<'a> {
    ctx: &'a AppContext,
    persona: &'a Persona,
    settings: ChatSettings,
    tools: ToolRegistry,
    spec: AgentSpec,
}

impl<'a> ChatSession<'a> {
    /// Start a session for the persona named `persona_name`. `None` settings
    /// means the schema's initial values.
    pub fn start(ctx: &'a AppContext, persona_name: &str, settings: Option<ChatSettings>) -> Result<Self> {
        Self::start_on(ctx, persona_name, settings, chrono::Local::now().date_naive())
    }

    /// As [`ChatSession::start`] with an explicit date for the web tool.
    pub fn start_on(
        ctx: &'a AppContext,
        persona_name: &str,
        settings: Option<ChatSettings>,
        today: chrono::NaiveDate,
    ) -> Result<Self> {
        let persona = ctx
            .personas
            .find_by_name(persona_name)
            .ok_or_else(|| Error::NotFound(format!("persona '{persona_name}'")))?;
        let settings = settings.unwrap_or_else(|| ctx.settings_schema.initial());
        ctx.settings_schema.validate(&settings)?;
        let tools = ToolRegistry::standard(today);
        let spec = AgentSpec::build(&ctx.app, persona, &settings, &tools);
        info!(persona = %persona.name, model = %settings.model, temperature = settings.temperature, "starting chat");
        Ok(Self { ctx, persona, settings, tools, spec })
    }

    pub fn persona(&self) -> &Persona { self.persona }

    pub fn settings(&self) -> &ChatSettings { &self.settings }

    pub fn spec(&self) -> &AgentSpec { &self.spec }

    pub fn tools(&self) -> &ToolRegistry { &self.tools }

    pub fn update_settings(&mut self, settings: ChatSettings) -> Result<()> {
        self.ctx.settings_schema.validate(&settings)?;
        info!(persona = %self.persona.name, model = %settings.model, temperature = settings.temperature, "settings updated");
        self.spec = AgentSpec::build(&self.ctx.app, self.persona, &settings, &self.tools);
        self.settings = settings;
        Ok(())
    }

    pub fn handle_message(&self, backend: &dyn ChatBackend, message: &str) -> Result<Reply> {
        if message.trim().is_empty() {
            return Err(Error::Operation("message must not be empty".into()));
        }
        let response = match self.persona.mode {
            PersonaMode::DirectQuery => backend.query(&self.spec, message),
            PersonaMode::Agent => backend.stream_chat(&self.spec, message),
        }
        .map_err(Error::Backend)?;
        debug!(tokens = response.tokens.len(), sources = response.source_nodes.len(), "backend responded");

        let hits = self.ctx.normalizer().normalize_all(&response.source_nodes);
        let references = aggregate(&hits);
        let sources_markdown =
            (!response.source_nodes.is_empty()).then(|| render_sources_markdown(&references, &self.ctx.layout()));
        let elements = display_elements(&references);

        let (answer, body_text) = match self.persona.mode {
            PersonaMode::Agent => (Some(response.tokens.concat()), None),
            PersonaMode::DirectQuery => (None, Some(operator_body(&references))),
        };
        info!(persona = %self.persona.name, documents = references.len(), "reply ready");

        Ok(Reply { author: self.persona.name.clone(), answer, references, sources_markdown, elements, operator_body: body_text })
    }
}
