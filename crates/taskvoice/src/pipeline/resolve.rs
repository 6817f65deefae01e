//! Workspace and project resolution.

use tracing::debug;

use crate::remote::{Project, RemoteClient, RemoteError, User};
use crate::sanitize;

/// Only the single best typeahead match is ever used.
pub const PROJECT_MATCH_LIMIT: u32 = 1;

/// Configured default wins; otherwise the user's first workspace.
pub fn select_workspace(default_workspace_id: Option<&str>, user: Option<&User>) -> Option<String> {
    if let Some(id) = default_workspace_id.map(str::trim).filter(|id| !id.is_empty()) {
        return Some(id.to_string());
    }

    user.and_then(|u| u.workspaces.first())
        .map(|workspace| workspace.gid.clone())
}

/// Best-guess project for a spoken name. `Ok(None)` when nothing matches.
pub async fn find_best_project(
    client: &dyn RemoteClient,
    workspace_id: &str,
    query: &str,
) -> Result<Option<Project>, RemoteError> {
    let matches = client
        .find_project_by_name(workspace_id, query, PROJECT_MATCH_LIMIT)
        .await?;

    debug!(
        workspace_id,
        query = %sanitize::redact_text(query),
        matches = matches.len(),
        "Project typeahead finished"
    );

    Ok(matches.into_iter().next())
}
