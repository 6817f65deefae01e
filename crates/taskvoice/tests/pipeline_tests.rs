//! End-to-end pipeline behaviour against an in-memory Asana account.
//!
//! Covers the voice scenarios (plain task, task in a project, missing name,
//! rate limiting) and failure propagation at every remote stage.

mod common;

use std::time::Duration;

use common::{pipeline, pipeline_with_default_workspace, some, AccountBuilder, HOME_WORKSPACE};
use taskvoice::remote::{Call, Operation, RemoteError, RemoteErrorKind, TaskOptions};
use taskvoice::PipelineContext;

#[tokio::test]
async fn test_task_without_project_lands_in_first_workspace() {
    let client = AccountBuilder::new().build();

    let view = pipeline()
        .create_task(client.clone(), some("Buy milk"), None)
        .await
        .unwrap();

    assert_eq!(view.speech, "I've added that task to Home.");
    assert_eq!(view.card_title, "Created task in Asana");
    assert_eq!(view.card_body, "Buy milk added to Home");
    assert_eq!(
        client.calls(),
        vec![
            Call::CurrentUser,
            Call::CreateTask {
                workspace_id: HOME_WORKSPACE.to_string(),
                options: TaskOptions {
                    name: "Buy milk".to_string(),
                    assignee: Some(common::USER_ID.to_string()),
                },
            },
        ]
    );
}

#[tokio::test]
async fn test_task_with_matching_project_is_attached() {
    let client = AccountBuilder::new()
        .project(HOME_WORKSPACE, "P1", "Groceries List")
        .project(HOME_WORKSPACE, "P2", "Garden")
        .build();

    let view = pipeline()
        .create_task(client.clone(), some("Buy milk"), some("Groceries"))
        .await
        .unwrap();

    assert_eq!(view.speech, "I've added that task to Groceries List.");
    assert_eq!(view.card_body, "Buy milk added to Groceries List");

    let calls = client.calls();
    assert_eq!(
        calls[1],
        Call::FindProject {
            workspace_id: HOME_WORKSPACE.to_string(),
            query: "Groceries".to_string(),
            limit: 1,
        }
    );
    match &calls[2] {
        Call::CreateTask { options, .. } => assert_eq!(options.assignee, None),
        other => panic!("expected task creation, got {:?}", other),
    }
    assert_eq!(
        calls[3],
        Call::AttachProject {
            task_id: "T1".to_string(),
            project_id: "P1".to_string(),
        }
    );
}

#[tokio::test]
async fn test_unmatched_project_falls_back_to_assignee() {
    let client = AccountBuilder::new()
        .project(HOME_WORKSPACE, "P2", "Garden")
        .build();

    let view = pipeline()
        .create_task(client.clone(), some("Buy milk"), some("Groceries"))
        .await
        .unwrap();

    assert_eq!(view.speech, "I've added that task to Home.");
    assert_eq!(client.count(Operation::FindProject), 1);
    assert_eq!(client.count(Operation::AttachProject), 0);
    let assigned = client.calls().iter().any(|call| {
        matches!(call, Call::CreateTask { options, .. } if options.assignee.as_deref() == Some(common::USER_ID))
    });
    assert!(assigned);
}

#[tokio::test]
async fn test_missing_task_name_makes_no_remote_calls() {
    let inputs = [None, some(""), some("   ")];

    for task_name in inputs {
        let client = AccountBuilder::new().build();
        let err = pipeline()
            .create_task(client.clone(), task_name.clone(), some("Groceries"))
            .await
            .unwrap_err();

        assert_eq!(
            err.speech,
            "I wasn't able to create the task, Cannot create a task without a name.",
            "input {:?}",
            task_name
        );
        assert!(client.calls().is_empty(), "input {:?}", task_name);
    }
}

#[tokio::test]
async fn test_rate_limited_identity_stops_the_pipeline() {
    let client = AccountBuilder::new()
        .fail_on(
            Operation::CurrentUser,
            RemoteError::from_status(429, "Too many requests")
                .with_retry_after(Some(Duration::from_secs(30))),
        )
        .build();

    let err = pipeline()
        .create_task(client.clone(), some("Buy milk"), None)
        .await
        .unwrap_err();

    assert!(err.speech.contains("rate limited"));
    assert!(err.speech.ends_with("try again later."));
    assert_eq!(client.calls(), vec![Call::CurrentUser]);
}

#[tokio::test]
async fn test_repeated_requests_create_distinct_tasks() {
    let client = AccountBuilder::new().build();
    let pipeline = pipeline();

    for _ in 0..2 {
        pipeline
            .create_task(client.clone(), some("Buy milk"), None)
            .await
            .unwrap();
    }

    assert_eq!(client.count(Operation::CreateTask), 2);
}

#[tokio::test]
async fn test_configured_workspace_overrides_identity() {
    let client = AccountBuilder::new().build();

    let view = pipeline_with_default_workspace(common::WORK_WORKSPACE)
        .create_task(client.clone(), some("Buy milk"), None)
        .await
        .unwrap();

    assert_eq!(view.speech, "I've added that task to Work.");
}

#[tokio::test]
async fn test_user_without_workspaces() {
    let client = AccountBuilder::new().without_workspaces().build();

    let err = pipeline()
        .create_task(client.clone(), some("Buy milk"), None)
        .await
        .unwrap_err();

    assert_eq!(
        err.speech,
        "I wasn't able to create the task, Cannot create a task without a workspace ID."
    );
    assert_eq!(client.calls(), vec![Call::CurrentUser]);
}

/// A remote failure injected at one stage.
struct StageFailureCase {
    name: &'static str,
    operation: Operation,
    status: u16,
    expected_speech: &'static str,
    /// Operations that must have run, in order, including the failing one.
    expected_operations: &'static [Operation],
}

const STAGE_FAILURES: &[StageFailureCase] = &[
    StageFailureCase {
        name: "identity_unauthorized",
        operation: Operation::CurrentUser,
        status: 401,
        expected_speech:
            "I wasn't able to create the task, your Asana credentials are missing or expired.",
        expected_operations: &[Operation::CurrentUser],
    },
    StageFailureCase {
        name: "project_lookup_forbidden",
        operation: Operation::FindProject,
        status: 403,
        expected_speech: "I wasn't able to create the task, the request to Asana wasn't allowed.",
        expected_operations: &[Operation::CurrentUser, Operation::FindProject],
    },
    StageFailureCase {
        name: "task_creation_invalid",
        operation: Operation::CreateTask,
        status: 400,
        expected_speech: "I wasn't able to create the task, the request to Asana was invalid.",
        expected_operations: &[
            Operation::CurrentUser,
            Operation::FindProject,
            Operation::CreateTask,
        ],
    },
    StageFailureCase {
        name: "attach_not_found",
        operation: Operation::AttachProject,
        status: 404,
        expected_speech: "I wasn't able to create the task, the Asana resource wasn't found.",
        expected_operations: &[
            Operation::CurrentUser,
            Operation::FindProject,
            Operation::CreateTask,
            Operation::AttachProject,
        ],
    },
    StageFailureCase {
        name: "attach_server_error",
        operation: Operation::AttachProject,
        status: 502,
        expected_speech: "I wasn't able to create the task, the Asana server experienced an error.",
        expected_operations: &[
            Operation::CurrentUser,
            Operation::FindProject,
            Operation::CreateTask,
            Operation::AttachProject,
        ],
    },
];

#[tokio::test]
async fn test_failure_at_each_remote_stage() {
    for case in STAGE_FAILURES {
        let client = AccountBuilder::new()
            .project(HOME_WORKSPACE, "P1", "Groceries")
            .fail_on(
                case.operation,
                RemoteError::from_status(case.status, "detail from Asana"),
            )
            .build();

        let err = pipeline()
            .create_task(client.clone(), some("Buy milk"), some("Groceries"))
            .await
            .unwrap_err();

        assert_eq!(err.speech, case.expected_speech, "case {}", case.name);
        let operations: Vec<Operation> = client.calls().iter().map(Call::operation).collect();
        assert_eq!(operations, case.expected_operations, "case {}", case.name);
    }
}

#[tokio::test]
async fn test_run_exposes_resolved_context() {
    let client = AccountBuilder::new()
        .project(HOME_WORKSPACE, "P1", "Groceries")
        .build();
    let ctx = PipelineContext::new(client, some("  Buy milk "), some("groceries"));

    let ctx = pipeline().run(ctx).await.unwrap();

    assert_eq!(ctx.task_name(), Some("Buy milk"));
    assert_eq!(ctx.workspace_id.as_deref(), Some(HOME_WORKSPACE));
    assert_eq!(ctx.target_project.as_ref().map(|p| p.gid.as_str()), Some("P1"));
    let task = ctx.created_task.unwrap();
    assert_eq!(task.name, "Buy milk");
}

#[tokio::test]
async fn test_unknown_status_is_generic_failure() {
    let client = AccountBuilder::new()
        .fail_on(Operation::CreateTask, RemoteError::from_status(418, "teapot"))
        .build();

    let err = pipeline()
        .create_task(client, some("Buy milk"), None)
        .await
        .unwrap_err();

    assert_eq!(
        err.speech,
        "I wasn't able to create the task, a problem has occurred."
    );
    assert_eq!(
        RemoteError::from_status(418, "teapot").kind,
        RemoteErrorKind::Other
    );
}
