//! Shared test utilities for taskvoice integration tests.
//!
//! `AccountBuilder` seeds an in-memory Asana account so scenarios can be
//! described as data rather than setup code.

#![allow(dead_code)]

use std::sync::Arc;

use taskvoice::pipeline::PipelineConfig;
use taskvoice::remote::{
    MemoryClient, Operation, Project, RemoteError, StaticClientProvider, User, Workspace,
};
use taskvoice::{Pipeline, Skill};

pub const USER_ID: &str = "12";
pub const HOME_WORKSPACE: &str = "1200";
pub const WORK_WORKSPACE: &str = "1300";

pub fn workspace(gid: &str, name: &str) -> Workspace {
    Workspace {
        gid: gid.to_string(),
        name: name.to_string(),
    }
}

pub fn project(gid: &str, name: &str) -> Project {
    Project {
        gid: gid.to_string(),
        name: name.to_string(),
    }
}

/// Builder for a seeded [`MemoryClient`].
pub struct AccountBuilder {
    workspaces: Vec<Workspace>,
    projects: Vec<(String, Project)>,
    failures: Vec<(Operation, RemoteError)>,
}

impl AccountBuilder {
    /// A user with a "Home" and a "Work" workspace, Home first.
    pub fn new() -> Self {
        Self {
            workspaces: vec![
                workspace(HOME_WORKSPACE, "Home"),
                workspace(WORK_WORKSPACE, "Work"),
            ],
            projects: vec![],
            failures: vec![],
        }
    }

    pub fn without_workspaces(mut self) -> Self {
        self.workspaces.clear();
        self
    }

    pub fn project(mut self, workspace_id: &str, gid: &str, name: &str) -> Self {
        self.projects
            .push((workspace_id.to_string(), project(gid, name)));
        self
    }

    pub fn fail_on(mut self, operation: Operation, error: RemoteError) -> Self {
        self.failures.push((operation, error));
        self
    }

    pub fn build(self) -> Arc<MemoryClient> {
        let mut client = MemoryClient::new().with_user(User {
            gid: USER_ID.to_string(),
            name: "Ada Lovelace".to_string(),
            email: Some("ada@example.com".to_string()),
            workspaces: self.workspaces,
        });
        for (workspace_id, project) in self.projects {
            client = client.with_projects(&workspace_id, vec![project]);
        }
        for (operation, error) in self.failures {
            client = client.fail_on(operation, error);
        }
        Arc::new(client)
    }
}

impl Default for AccountBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn pipeline() -> Pipeline {
    Pipeline::new(Arc::new(PipelineConfig::default()))
}

pub fn pipeline_with_default_workspace(workspace_id: &str) -> Pipeline {
    Pipeline::new(Arc::new(PipelineConfig::with_default_workspace(
        workspace_id,
    )))
}

pub fn skill(client: Arc<MemoryClient>) -> Skill {
    Skill::new(pipeline(), Arc::new(StaticClientProvider::new(client)))
}

pub fn some(value: &str) -> Option<String> {
    Some(value.to_string())
}
