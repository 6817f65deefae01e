//! Spoken and card output for both outcomes of the pipeline.

use serde::Serialize;

use crate::pipeline::{PipelineContext, PipelineError};
use crate::translate;

pub const CARD_TITLE: &str = "Created task in Asana";
const FALLBACK_DESTINATION: &str = "Asana";
const FALLBACK_TASK_NAME: &str = "Your task";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmationView {
    pub speech: String,
    pub card_title: String,
    pub card_body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpokenError {
    pub speech: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub title: String,
    pub content: String,
}

/// What the skill host speaks (and optionally shows) back to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillResponse {
    pub speech: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    pub should_end_session: bool,
}

impl SkillResponse {
    /// Speak and end the session.
    pub fn tell(speech: impl Into<String>) -> Self {
        Self {
            speech: speech.into(),
            reprompt: None,
            card: None,
            should_end_session: true,
        }
    }

    /// Speak and keep listening, repeating `reprompt` if the user is silent.
    pub fn ask(speech: impl Into<String>, reprompt: impl Into<String>) -> Self {
        Self {
            speech: speech.into(),
            reprompt: Some(reprompt.into()),
            card: None,
            should_end_session: false,
        }
    }
}

impl From<ConfirmationView> for SkillResponse {
    fn from(view: ConfirmationView) -> Self {
        Self {
            speech: view.speech,
            reprompt: None,
            card: Some(Card {
                title: view.card_title,
                content: view.card_body,
            }),
            should_end_session: true,
        }
    }
}

impl From<SpokenError> for SkillResponse {
    fn from(error: SpokenError) -> Self {
        Self::tell(error.speech)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Where the task ended up: the project if one was resolved, otherwise the
/// workspace. Falls back to ever less specific names, never fails.
pub fn destination_name(ctx: &PipelineContext) -> String {
    let project = non_blank(ctx.target_project.as_ref().map(|p| p.name.as_str()));
    let workspace = non_blank(
        ctx.created_task
            .as_ref()
            .and_then(|t| t.workspace.as_ref())
            .map(|w| w.name.as_str()),
    );
    let workspace_id = non_blank(ctx.workspace_id.as_deref());

    project
        .or(workspace)
        .or(workspace_id)
        .unwrap_or(FALLBACK_DESTINATION)
        .to_string()
}

fn task_display_name(ctx: &PipelineContext) -> String {
    non_blank(ctx.created_task.as_ref().map(|t| t.name.as_str()))
        .or_else(|| non_blank(ctx.task_name()))
        .unwrap_or(FALLBACK_TASK_NAME)
        .to_string()
}

pub fn format_success(ctx: &PipelineContext) -> ConfirmationView {
    let destination = destination_name(ctx);
    ConfirmationView {
        speech: format!("I've added that task to {}.", destination),
        card_title: CARD_TITLE.to_string(),
        card_body: format!("{} added to {}", task_display_name(ctx), destination),
    }
}

pub fn format_failure(error: &PipelineError) -> SpokenError {
    SpokenError {
        speech: translate::spoken_error(error),
    }
}
