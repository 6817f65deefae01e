//! In-memory stand-in for the Asana API.
//!
//! Backs `taskvoice create --dry-run` and the test suites. Every call is
//! recorded so callers can assert exactly which requests were made, and any
//! operation can be scripted to fail with a given remote error.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::error::RemoteError;
use super::types::{Project, Task, TaskOptions, User, UserRef, Workspace};
use super::RemoteClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CurrentUser,
    FindProject,
    CreateTask,
    AttachProject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CurrentUser,
    FindProject {
        workspace_id: String,
        query: String,
        limit: u32,
    },
    CreateTask {
        workspace_id: String,
        options: TaskOptions,
    },
    AttachProject {
        task_id: String,
        project_id: String,
    },
}

impl Call {
    pub fn operation(&self) -> Operation {
        match self {
            Call::CurrentUser => Operation::CurrentUser,
            Call::FindProject { .. } => Operation::FindProject,
            Call::CreateTask { .. } => Operation::CreateTask,
            Call::AttachProject { .. } => Operation::AttachProject,
        }
    }
}

#[derive(Default)]
pub struct MemoryClient {
    user: Option<User>,
    workspaces: HashMap<String, Workspace>,
    projects: HashMap<String, Vec<Project>>,
    failures: HashMap<Operation, RemoteError>,
    calls: Mutex<Vec<Call>>,
    next_task: AtomicU64,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the identity and registers its workspaces.
    pub fn with_user(mut self, user: User) -> Self {
        for workspace in &user.workspaces {
            self.workspaces
                .insert(workspace.gid.clone(), workspace.clone());
        }
        self.user = Some(user);
        self
    }

    pub fn with_workspace(mut self, workspace: Workspace) -> Self {
        self.workspaces.insert(workspace.gid.clone(), workspace);
        self
    }

    pub fn with_projects(mut self, workspace_id: &str, projects: Vec<Project>) -> Self {
        self.projects
            .entry(workspace_id.to_string())
            .or_default()
            .extend(projects);
        self
    }

    /// Makes every call to `operation` fail with `error`.
    pub fn fail_on(mut self, operation: Operation, error: RemoteError) -> Self {
        self.failures.insert(operation, error);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn count(&self, operation: Operation) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.operation() == operation)
            .count()
    }

    fn record(&self, call: Call) -> Result<(), RemoteError> {
        let operation = call.operation();
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        match self.failures.get(&operation) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

/// Typeahead-style ranking: exact, then prefix, then word prefix, then
/// substring. Case-insensitive. `None` means no match.
fn match_rank(name: &str, query: &str) -> Option<u8> {
    let name = name.to_lowercase();
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }
    if name == query {
        Some(0)
    } else if name.starts_with(&query) {
        Some(1)
    } else if name.split_whitespace().any(|word| word.starts_with(&query)) {
        Some(2)
    } else if name.contains(&query) {
        Some(3)
    } else {
        None
    }
}

#[async_trait]
impl RemoteClient for MemoryClient {
    async fn current_user(&self) -> Result<User, RemoteError> {
        self.record(Call::CurrentUser)?;
        self.user
            .clone()
            .ok_or_else(|| RemoteError::no_authorization("No user configured"))
    }

    async fn find_project_by_name(
        &self,
        workspace_id: &str,
        query: &str,
        limit: u32,
    ) -> Result<Vec<Project>, RemoteError> {
        self.record(Call::FindProject {
            workspace_id: workspace_id.to_string(),
            query: query.to_string(),
            limit,
        })?;

        let mut ranked: Vec<(u8, usize, &Project)> = self
            .projects
            .get(workspace_id)
            .map(|projects| {
                projects
                    .iter()
                    .enumerate()
                    .filter_map(|(i, p)| match_rank(&p.name, query).map(|rank| (rank, i, p)))
                    .collect()
            })
            .unwrap_or_default();
        ranked.sort_by_key(|(rank, i, _)| (*rank, *i));

        Ok(ranked
            .into_iter()
            .take(limit as usize)
            .map(|(_, _, p)| p.clone())
            .collect())
    }

    async fn create_task(
        &self,
        workspace_id: &str,
        options: &TaskOptions,
    ) -> Result<Task, RemoteError> {
        self.record(Call::CreateTask {
            workspace_id: workspace_id.to_string(),
            options: options.clone(),
        })?;

        let id = self.next_task.fetch_add(1, Ordering::SeqCst) + 1;
        let workspace = self
            .workspaces
            .get(workspace_id)
            .cloned()
            .unwrap_or_else(|| Workspace {
                gid: workspace_id.to_string(),
                name: String::new(),
            });

        Ok(Task {
            gid: format!("T{}", id),
            name: options.name.clone(),
            workspace: Some(workspace),
            assignee: options.assignee.clone().map(|gid| UserRef { gid }),
            created_at: Some(Utc::now()),
            permalink_url: None,
        })
    }

    async fn attach_project_to_task(
        &self,
        task_id: &str,
        project_id: &str,
    ) -> Result<(), RemoteError> {
        self.record(Call::AttachProject {
            task_id: task_id.to_string(),
            project_id: project_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::RemoteErrorKind;

    fn project(gid: &str, name: &str) -> Project {
        Project {
            gid: gid.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_match_rank_order() {
        assert_eq!(match_rank("Groceries", "groceries"), Some(0));
        assert_eq!(match_rank("Groceries List", "groceries"), Some(1));
        assert_eq!(match_rank("Weekly Groceries", "groc"), Some(2));
        assert_eq!(match_rank("Supergroceries", "groceries"), Some(3));
        assert_eq!(match_rank("Work", "groceries"), None);
        assert_eq!(match_rank("Work", "  "), None);
    }

    #[tokio::test]
    async fn test_typeahead_ranks_and_limits() {
        let client = MemoryClient::new().with_projects(
            "W1",
            vec![
                project("P1", "Weekly Groceries"),
                project("P2", "Groceries List"),
                project("P3", "Groceries"),
            ],
        );

        let best = client.find_project_by_name("W1", "groceries", 1).await.unwrap();
        assert_eq!(best, vec![project("P3", "Groceries")]);

        let all = client.find_project_by_name("W1", "groceries", 10).await.unwrap();
        let ids: Vec<&str> = all.iter().map(|p| p.gid.as_str()).collect();
        assert_eq!(ids, vec!["P3", "P2", "P1"]);

        let other = client.find_project_by_name("W2", "groceries", 1).await.unwrap();
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn test_scripted_failure_is_recorded() {
        let client = MemoryClient::new()
            .fail_on(Operation::CurrentUser, RemoteError::from_status(500, "boom"));

        let err = client.current_user().await.unwrap_err();
        assert_eq!(err.kind, RemoteErrorKind::ServerError);
        assert_eq!(client.calls(), vec![Call::CurrentUser]);
    }

    #[tokio::test]
    async fn test_created_tasks_get_distinct_ids() {
        let client = MemoryClient::new().with_workspace(Workspace {
            gid: "W1".to_string(),
            name: "Home".to_string(),
        });
        let options = TaskOptions {
            name: "Buy milk".to_string(),
            assignee: None,
        };

        let first = client.create_task("W1", &options).await.unwrap();
        let second = client.create_task("W1", &options).await.unwrap();
        assert_ne!(first.gid, second.gid);
        assert_eq!(first.workspace.unwrap().name, "Home");
        assert_eq!(client.count(Operation::CreateTask), 2);
    }
}
