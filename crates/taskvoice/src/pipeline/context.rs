use std::sync::Arc;

use crate::remote::{Project, RemoteClient, Task, User};

/// Facts accumulated while creating one task.
///
/// Owned by a single invocation and moved through every stage.
pub struct PipelineContext {
    // Input
    pub client: Arc<dyn RemoteClient>,
    pub task_name_slot: Option<String>,
    pub project_name_slot: Option<String>,

    // Set by step_resolve_identity
    pub user: Option<User>,

    // Set by step_resolve_workspace; required before step_create_task
    pub workspace_id: Option<String>,

    // Set by step_resolve_project; None means "assign to the user instead"
    pub target_project: Option<Project>,

    // Set by step_create_task
    pub created_task: Option<Task>,
}

impl PipelineContext {
    /// Blank slot values are treated as absent; others are trimmed.
    pub fn new(
        client: Arc<dyn RemoteClient>,
        task_name_slot: Option<String>,
        project_name_slot: Option<String>,
    ) -> Self {
        Self {
            client,
            task_name_slot: normalize_slot(task_name_slot),
            project_name_slot: normalize_slot(project_name_slot),
            user: None,
            workspace_id: None,
            target_project: None,
            created_task: None,
        }
    }

    pub fn task_name(&self) -> Option<&str> {
        self.task_name_slot.as_deref()
    }

    pub fn project_name(&self) -> Option<&str> {
        self.project_name_slot.as_deref()
    }
}

impl std::fmt::Debug for PipelineContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineContext")
            .field("task_name_slot", &self.task_name_slot)
            .field("project_name_slot", &self.project_name_slot)
            .field("user", &self.user.as_ref().map(|u| &u.gid))
            .field("workspace_id", &self.workspace_id)
            .field("target_project", &self.target_project)
            .field("created_task", &self.created_task.as_ref().map(|t| &t.gid))
            .finish()
    }
}

fn normalize_slot(slot: Option<String>) -> Option<String> {
    slot.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
