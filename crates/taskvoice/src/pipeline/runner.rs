use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::config::SkillConfig;
use crate::remote::{RemoteClient, TaskOptions};
use crate::response::{self, ConfirmationView, SpokenError};
use crate::sanitize;

use super::config::PipelineConfig;
use super::context::PipelineContext;
use super::error::{DomainError, PipelineError};
use super::resolve;

type StageResult = Result<PipelineContext, PipelineError>;

pub struct Pipeline {
    config: Arc<PipelineConfig>,
}

impl Pipeline {
    pub fn new(config: Arc<PipelineConfig>) -> Self {
        Self { config }
    }

    pub fn from_config(config: &SkillConfig) -> Self {
        Self::new(Arc::new(PipelineConfig::from_config(config)))
    }

    /// Creates one task and renders the outcome for the user.
    pub async fn create_task(
        &self,
        client: Arc<dyn RemoteClient>,
        task_name_slot: Option<String>,
        project_name_slot: Option<String>,
    ) -> Result<ConfirmationView, SpokenError> {
        let ctx = PipelineContext::new(client, task_name_slot, project_name_slot);
        match self.run(ctx).await {
            Ok(ctx) => Ok(response::format_success(&ctx)),
            Err(e) => Err(response::format_failure(&e)),
        }
    }

    /// Runs every stage in order. The first failure wins and nothing after
    /// it runs. A panic anywhere in the chain becomes `Unexpected`.
    pub async fn run(&self, ctx: PipelineContext) -> StageResult {
        let span = info_span!(
            "pipeline",
            task_name = %ctx.task_name().map(sanitize::redact_text).unwrap_or_default(),
            has_project = ctx.project_name().is_some(),
        );

        let stages = async move {
            let ctx = stage("validate_task_name", self.step_validate_task_name(ctx)).await?;
            let ctx = stage("resolve_identity", self.step_resolve_identity(ctx)).await?;
            let ctx = stage("resolve_workspace", self.step_resolve_workspace(ctx)).await?;
            let ctx = stage("resolve_project", self.step_resolve_project(ctx)).await?;
            let ctx = stage("create_task", self.step_create_task(ctx)).await?;
            stage("attach_project", self.step_attach_project(ctx)).await
        };

        AssertUnwindSafe(stages)
            .catch_unwind()
            .instrument(span)
            .await
            .unwrap_or_else(|panic| {
                let message = panic_message(panic.as_ref());
                warn!("Pipeline panicked: {}", message);
                Err(PipelineError::Unexpected(message))
            })
    }

    async fn step_validate_task_name(&self, ctx: PipelineContext) -> StageResult {
        if ctx.task_name().is_none() {
            return Err(DomainError::MissingTaskName.into());
        }
        Ok(ctx)
    }

    async fn step_resolve_identity(&self, mut ctx: PipelineContext) -> StageResult {
        let user = ctx.client.current_user().await?;
        debug!(
            user_id = %user.gid,
            workspaces = user.workspaces.len(),
            "Resolved current user"
        );
        ctx.user = Some(user);
        Ok(ctx)
    }

    async fn step_resolve_workspace(&self, mut ctx: PipelineContext) -> StageResult {
        let workspace_id = resolve::select_workspace(
            self.config.default_workspace_id.as_deref(),
            ctx.user.as_ref(),
        )
        .ok_or(DomainError::MissingWorkspace)?;

        debug!(workspace_id = %workspace_id, "Resolved workspace");
        ctx.workspace_id = Some(workspace_id);
        Ok(ctx)
    }

    async fn step_resolve_project(&self, mut ctx: PipelineContext) -> StageResult {
        let project = match ctx.project_name() {
            None => None,
            Some(query) => {
                let workspace_id = ctx
                    .workspace_id
                    .as_deref()
                    .ok_or(DomainError::MissingWorkspace)?;
                let found =
                    resolve::find_best_project(ctx.client.as_ref(), workspace_id, query).await?;
                if found.is_none() {
                    info!("No project matched; task will be assigned to the user");
                }
                found
            }
        };

        ctx.target_project = project;
        Ok(ctx)
    }

    async fn step_create_task(&self, mut ctx: PipelineContext) -> StageResult {
        let workspace_id = ctx
            .workspace_id
            .clone()
            .ok_or(DomainError::MissingWorkspace)?;
        let name = ctx
            .task_name()
            .map(str::to_string)
            .ok_or(DomainError::MissingTaskName)?;

        // Project membership or an assignee, never neither.
        let assignee = match &ctx.target_project {
            Some(_) => None,
            None => {
                let user = ctx.user.as_ref().ok_or(DomainError::MissingAssignee)?;
                Some(user.gid.clone())
            }
        };

        let options = TaskOptions { name, assignee };
        let task = ctx.client.create_task(&workspace_id, &options).await?;

        info!(
            task_id = %task.gid,
            workspace_id = %workspace_id,
            assigned = options.assignee.is_some(),
            "Created task"
        );
        ctx.created_task = Some(task);
        Ok(ctx)
    }

    async fn step_attach_project(&self, ctx: PipelineContext) -> StageResult {
        if ctx.workspace_id.is_none() {
            return Err(DomainError::MissingWorkspace.into());
        }

        if let Some(project) = &ctx.target_project {
            let task = ctx
                .created_task
                .as_ref()
                .ok_or(DomainError::MissingCreatedTask)?;
            ctx.client
                .attach_project_to_task(&task.gid, &project.gid)
                .await?;
            info!(task_id = %task.gid, project_id = %project.gid, "Attached task to project");
        }

        Ok(ctx)
    }
}

/// Runs one stage inside its own span and logs the outcome.
async fn stage<F>(name: &'static str, step: F) -> StageResult
where
    F: Future<Output = StageResult>,
{
    let result = step.instrument(info_span!("stage", stage = name)).await;
    match &result {
        Ok(_) => debug!(stage = name, "Stage completed"),
        Err(e) => warn!(stage = name, category = e.category(), "Stage failed: {}", e),
    }
    result
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// One-shot entry point: build a pipeline from `config` and create a task.
pub async fn run_create_task_pipeline(
    client: Arc<dyn RemoteClient>,
    config: PipelineConfig,
    task_name_slot: Option<String>,
    project_name_slot: Option<String>,
) -> Result<ConfirmationView, SpokenError> {
    Pipeline::new(Arc::new(config))
        .create_task(client, task_name_slot, project_name_slot)
        .await
}
