//! Command-line entry point: create a task directly or replay a skill request.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use taskvoice::logging::{init_logging, DEFAULT_LOG_LEVEL};
use taskvoice::remote::{
    AuthContext, ClientProvider, MemoryClient, Project, StaticClientProvider, User, Workspace,
};
use taskvoice::{
    load_config, IntentRequest, Pipeline, SkillConfig, SkillResponse, Skill, TaskVoiceError,
};

/// taskvoice - create Asana tasks from voice intents
#[derive(Parser)]
#[command(name = "taskvoice")]
#[command(about = "Create Asana tasks the way the voice skill does")]
#[command(long_about = r#"
Runs the same pipeline the voice skill uses: validate the task name, resolve
the caller, pick a workspace, optionally find a project, create the task.

EXAMPLES:
  # Create a task in the default workspace
  taskvoice create --task "Buy milk"

  # Create a task and add it to the best-matching project
  taskvoice create --task "Buy milk" --project groceries

  # Try it without touching Asana
  taskvoice create --task "Buy milk" --project groceries --dry-run

  # Replay a skill request from a file
  taskvoice invoke request.json

CONFIGURATION:
  Without --config, settings come from ASANA_ACCESS_TOKEN,
  ASANA_ACCESS_TOKEN_FILE, ASANA_DEFAULT_WORKSPACE_ID and ASANA_API_BASE_URL.
"#)]
#[command(version)]
struct Cli {
    /// Path to a JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, overridden by RUST_LOG
    #[arg(long, global = true, default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create one task
    Create {
        /// Task name, as it would be spoken
        #[arg(long)]
        task: Option<String>,

        /// Project name to search for
        #[arg(long)]
        project: Option<String>,

        /// Linked-account token to act as instead of the service token
        #[arg(long, env = "TASKVOICE_USER_TOKEN", hide_env_values = true)]
        user_token: Option<String>,

        /// Print the response as JSON
        #[arg(long)]
        json: bool,

        /// Use an in-memory Asana with demo data
        #[arg(long)]
        dry_run: bool,
    },

    /// Handle one skill request read from a JSON file ("-" for stdin)
    Invoke {
        request: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli.log_level, cli.log_json) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, TaskVoiceError> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => SkillConfig::from_env()?,
    };

    match cli.command {
        Commands::Create {
            task,
            project,
            user_token,
            json,
            dry_run,
        } => {
            let skill = if dry_run {
                info!("Dry run: using in-memory Asana");
                demo_skill(&config)
            } else {
                Skill::from_config(config)?
            };
            let auth = match user_token {
                Some(token) => AuthContext::delegated(token),
                None => AuthContext::anonymous(),
            };

            let response = skill.create_task(task, project, &auth).await;
            let created = response.card.is_some();
            print_response(&response, json)?;
            Ok(if created {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Invoke { request } => {
            let request = read_request(&request)?;
            let skill = Skill::from_config(config)?;
            let response = skill.handle(request).await;
            print_response(&response, true)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn read_request(path: &Path) -> Result<IntentRequest, TaskVoiceError> {
    let content = if path == Path::new("-") {
        std::io::read_to_string(std::io::stdin())
    } else {
        std::fs::read_to_string(path)
    }
    .map_err(|source| TaskVoiceError::ReadRequest {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(TaskVoiceError::ParseRequest)
}

fn print_response(response: &SkillResponse, json: bool) -> Result<(), TaskVoiceError> {
    if json {
        let rendered =
            serde_json::to_string_pretty(response).map_err(TaskVoiceError::RenderResponse)?;
        println!("{}", rendered);
        return Ok(());
    }

    println!("{}", response.speech);
    if let Some(card) = &response.card {
        println!();
        println!("{}", card.title);
        println!("  {}", card.content);
    }
    Ok(())
}

/// A skill wired to an in-memory service seeded with a demo user.
fn demo_skill(config: &SkillConfig) -> Skill {
    let workspace = Workspace {
        gid: config.default_workspace().unwrap_or("1000").to_string(),
        name: "My Workspace".to_string(),
    };
    let client = MemoryClient::new()
        .with_user(User {
            gid: "42".to_string(),
            name: "Demo User".to_string(),
            email: Some("demo@example.com".to_string()),
            workspaces: vec![workspace.clone()],
        })
        .with_projects(
            &workspace.gid,
            vec![
                Project {
                    gid: "2001".to_string(),
                    name: "Groceries".to_string(),
                },
                Project {
                    gid: "2002".to_string(),
                    name: "Home Improvements".to_string(),
                },
                Project {
                    gid: "2003".to_string(),
                    name: "Work".to_string(),
                },
            ],
        );

    let provider: Arc<dyn ClientProvider> = Arc::new(StaticClientProvider::new(Arc::new(client)));
    Skill::new(Pipeline::from_config(config), provider)
}
