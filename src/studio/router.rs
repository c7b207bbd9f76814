//! Agent router
//!
//! Picks which label persona answers a visitor's message with a single
//! classification call.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use super::client::{generate_json, GenerativeModel};
use super::{Result, StudioError};

/// A persona the site chat can hand a message to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl Persona {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RouteAnswer {
    agent_id: String,
}

/// Persona id to answer `prompt`
pub async fn route_agent(
    model: &dyn GenerativeModel,
    prompt: &str,
    personas: &[Persona],
) -> Result<String> {
    let first = personas
        .first()
        .ok_or_else(|| StudioError::InvalidStage("no personas to route to".into()))?;
    if personas.len() == 1 {
        return Ok(first.id.clone());
    }

    let roster: Vec<String> = personas
        .iter()
        .map(|p| format!("- {} ({}): {}", p.id, p.name, p.description))
        .collect();
    let routing_prompt = format!(
        "Choose the agent best suited to answer this message.\n\nAgents:\n{}\n\nMessage: \"{}\"",
        roster.join("\n"),
        prompt
    );
    let schema = json!({
        "type": "OBJECT",
        "properties": { "agentId": { "type": "STRING" } },
        "required": ["agentId"]
    });

    let answer: RouteAnswer = generate_json(model, &routing_prompt, &schema).await?;
    Ok(pick_persona(&answer.agent_id, personas)?.id.clone())
}

/// Persona matching `answer`, or the first persona when nothing matches
pub fn pick_persona<'a>(answer: &str, personas: &'a [Persona]) -> Result<&'a Persona> {
    let answer = answer.trim();
    if let Some(persona) = personas
        .iter()
        .find(|p| p.id.eq_ignore_ascii_case(answer))
    {
        debug!("Routed to {}", persona.id);
        return Ok(persona);
    }

    let first = personas
        .first()
        .ok_or_else(|| StudioError::InvalidStage("no personas to route to".into()))?;
    warn!("Unknown agent '{}', falling back to {}", answer, first.id);
    Ok(first)
}
