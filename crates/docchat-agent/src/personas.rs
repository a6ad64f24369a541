//! Role-based personas offered as chat profiles.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use docchat_core::config::Config;
use docchat_core::error::{Error, Result};

/// How a persona produces its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PersonaMode {
    /// Tool-using agent with a streamed answer.
    #[default]
    Agent,
    /// The query engine answers and the retrieved text is shown as the body.
    DirectQuery,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub key: String,
    pub name: String,
    pub markdown_description: String,
    pub icon: String,
    pub prompt: String,
    #[serde(default)]
    pub mode: PersonaMode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonaRegistry {
    personas: Vec<Persona>,
}

impl PersonaRegistry {
    pub fn new(personas: Vec<Persona>) -> Result<Self> {
        if personas.is_empty() {
            return Err(Error::InvalidConfig("at least one persona is required".into()));
        }
        let mut names = HashSet::new();
        let mut keys = HashSet::new();
        for p in &personas {
            if !names.insert(p.name.as_str()) {
                return Err(Error::InvalidConfig(format!("duplicate persona name '{}'", p.name)));
            }
            if !keys.insert(p.key.as_str()) {
                return Err(Error::InvalidConfig(format!("duplicate persona key '{}'", p.key)));
            }
        }
        Ok(Self { personas })
    }

    /// Personas from the `personas` config key, or the built-in set.
    pub fn from_config(config: &Config) -> Result<Self> {
        match config.get_opt::<Vec<Persona>>("personas")? {
            Some(list) => Self::new(list),
            None => Ok(Self::builtin()),
        }
    }

    pub fn builtin() -> Self { Self { personas: builtin_personas() } }

    pub fn find_by_name(&self, name: &str) -> Option<&Persona> { self.personas.iter().find(|p| p.name == name) }

    pub fn get(&self, key: &str) -> Option<&Persona> { self.personas.iter().find(|p| p.key == key) }

    pub fn iter(&self) -> impl Iterator<Item = &Persona> { self.personas.iter() }

    pub fn len(&self) -> usize { self.personas.len() }

    pub fn is_empty(&self) -> bool { self.personas.is_empty() }
}

fn builtin_personas() -> Vec<Persona> {
    vec![
        Persona {
            key: "ANALYST_MULTI_MODAL_AGENT".into(),
            name: "Analyst Persona".into(),
            markdown_description: "This is a **Multi-modal Analyst Agent** which helps in efficiently analyzing documents to troubleshoot issues.".into(),
            icon: "/public/images/analyst.jpg".into(),
            prompt: concat!(
                "You are an Analyst who troubleshoots laboratory instruments and optimizes method performance. ",
                "Analyze the available documents and data to diagnose technical problems. ",
                "Give detailed, step-by-step guidance and explain each step in clear professional language."
            )
            .into(),
            mode: PersonaMode::Agent,
        },
        Persona {
            key: "OPERATOR_MULTI_MODAL_AGENT".into(),
            name: "Operator Persona".into(),
            markdown_description: "This is a **Multi-modal Operator Agent** which helps with instructions to operate the instrument correctly and address common issues without expert help.".into(),
            icon: "/public/images/operator.jpg".into(),
            prompt: concat!(
                "You are an Operator experienced in running laboratory instruments day to day. ",
                "Help users operate instruments correctly and resolve common issues without expert help. ",
                "Use straightforward, easy-to-follow instructions suitable for non-experts."
            )
            .into(),
            mode: PersonaMode::DirectQuery,
        },
        Persona {
            key: "MANAGER_MULTI_MODAL_AGENT".into(),
            name: "Manager Persona".into(),
            markdown_description: "This is a **Multi-modal Manager Agent** which helps with information to help ensure smooth lab operations, minimize instrument downtime, and maximize productivity.".into(),
            icon: "/public/images/manager.jpg".into(),
            prompt: concat!(
                "You are a Laboratory Manager focused on smooth lab operations and minimal instrument downtime. ",
                "Advise on lab management practice, maintenance scheduling and workflow optimization. ",
                "Offer strategic, practical advice in language suited to managers."
            )
            .into(),
            mode: PersonaMode::Agent,
        },
        Persona {
            key: "SCIENTIST_MULTI_MODAL_AGENT".into(),
            name: "Scientist Persona".into(),
            markdown_description: "This is a **Multi-modal Scientist Agent** which helps in research to develop new methods and applications for chromatography.".into(),
            icon: "/public/images/scientist.jpg".into(),
            prompt: concat!(
                "You are a Scientist developing new analytical methods and applications. ",
                "Assist with advanced scientific questions, discuss research ideas and point to relevant findings. ",
                "Use precise technical language and explore complex topics in depth."
            )
            .into(),
            mode: PersonaMode::Agent,
        },
    ]
}
