// SPDX-License-Identifier: MIT

//! Command-line interface over the client library.

use std::io::Write as _;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use prettytable::{row, Table};
use uuid::Uuid;

use crate::api::ApiClient;
use crate::config::Config;
use crate::models::{
    EntryFilter, ManualEntry, ProjectDraft, ProjectPatch, RegisterRequest, ReportFilter,
    StartTimer, TagDraft, TaskDraft, UserPatch, UserRole,
};
use crate::store::{FileStore, StateStore};
use crate::timer::{format_elapsed, TimerEngine, TimerState};

#[derive(Parser)]
#[command(name = "esclavizador", version, about = "Time tracking from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Authenticate and store session tokens locally
    Login {
        email: String,
        password: String,
    },
    /// Create an account and organization, then log in
    Register {
        email: String,
        password: String,
        /// Role within the new organization
        #[arg(long, value_enum, default_value_t = RoleArg::Worker)]
        role: RoleArg,
        /// Organization to create (name must be unique)
        #[arg(long)]
        organization: String,
    },
    /// Revoke the session and clear local credentials
    Logout,
    /// Show the authenticated user
    Whoami,
    /// Show the running timer, reconciled with the server
    Status,
    /// Start a timer on a project
    Start {
        project_id: Uuid,
        #[arg(long)]
        task: Option<Uuid>,
        #[arg(long)]
        description: Option<String>,
        /// Mark the entry as non-billable
        #[arg(long)]
        non_billable: bool,
        /// Tag to attach (repeatable)
        #[arg(long = "tag")]
        tags: Vec<Uuid>,
    },
    /// Stop the running timer
    Stop,
    /// Follow the running timer live (Ctrl-C to exit)
    Watch,
    /// List time entries
    Entries(EntriesArgs),
    /// Record an already-completed interval
    Log {
        project_id: Uuid,
        /// Start of the interval (RFC 3339, e.g. 2026-08-27T09:00:00Z)
        start: chrono::DateTime<chrono::Utc>,
        /// End of the interval (RFC 3339)
        end: chrono::DateTime<chrono::Utc>,
        #[arg(long)]
        task: Option<Uuid>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        non_billable: bool,
    },
    /// Manage projects
    #[command(subcommand)]
    Projects(ProjectCommand),
    /// Manage tasks
    #[command(subcommand)]
    Tasks(TaskCommand),
    /// Manage tags
    #[command(subcommand)]
    Tags(TagCommand),
    /// Manage organization members (boss only)
    #[command(subcommand)]
    Users(UserCommand),
    /// Per-project time report (boss only)
    Report {
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(long)]
        user: Option<Uuid>,
    },
}

#[derive(Args)]
struct EntriesArgs {
    #[arg(long)]
    project: Option<Uuid>,
    #[arg(long)]
    user: Option<Uuid>,
    #[arg(long)]
    from: Option<NaiveDate>,
    #[arg(long)]
    to: Option<NaiveDate>,
    /// Only running entries
    #[arg(long)]
    running: bool,
    /// Entries carrying this tag (repeatable, OR logic)
    #[arg(long = "tag")]
    tags: Vec<Uuid>,
    #[arg(long, default_value_t = 50)]
    limit: u32,
    #[arg(long, default_value_t = 0)]
    offset: u32,
}

#[derive(Subcommand)]
enum ProjectCommand {
    List,
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Hex color, e.g. #3B82F6
        #[arg(long)]
        color: Option<String>,
    },
    Rename {
        project_id: Uuid,
        name: String,
    },
    Archive {
        project_id: Uuid,
    },
    Delete {
        project_id: Uuid,
    },
}

#[derive(Subcommand)]
enum TaskCommand {
    List {
        #[arg(long)]
        project: Option<Uuid>,
    },
    Create {
        name: String,
        #[arg(long)]
        project: Uuid,
        #[arg(long)]
        description: Option<String>,
    },
    Delete {
        task_id: Uuid,
    },
}

#[derive(Subcommand)]
enum TagCommand {
    List,
    Create {
        name: String,
    },
    Rename {
        tag_id: Uuid,
        name: String,
    },
    Delete {
        tag_id: Uuid,
    },
}

#[derive(Subcommand)]
enum UserCommand {
    List,
    SetRole {
        user_id: Uuid,
        #[arg(value_enum)]
        role: RoleArg,
    },
    Deactivate {
        user_id: Uuid,
    },
    Delete {
        user_id: Uuid,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    Boss,
    Worker,
}

impl From<RoleArg> for UserRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Boss => UserRole::Boss,
            RoleArg::Worker => UserRole::Worker,
        }
    }
}

/// Execute a parsed command.
pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    let store: Arc<dyn StateStore> = Arc::new(FileStore::open(&config.state_dir)?);
    let api = ApiClient::new(&config, Arc::clone(&store))?;

    match cli.command {
        Command::Login { email, password } => {
            api.login(&email, &password).await?;
            let user = api.me().await?;
            println!("Logged in as {} ({})", user.email, user.role);
        }
        Command::Register {
            email,
            password,
            role,
            organization,
        } => {
            let user = api
                .register(&RegisterRequest {
                    email: email.clone(),
                    password: password.clone(),
                    role: role.into(),
                    organization_name: organization,
                })
                .await?;
            println!("Registered {} ({})", user.email, user.role);
            api.login(&email, &password).await?;
            println!("Logged in");
        }
        Command::Logout => {
            api.logout().await?;
            println!("Logged out");
        }
        Command::Whoami => {
            let user = api.me().await?;
            println!("{} ({}) org={}", user.email, user.role, user.organization_id);
        }
        Command::Status => {
            let engine = TimerEngine::new(api, store);
            engine.restore_snapshot();
            match engine.sync().await {
                Ok(state) => print_state(&state),
                Err(e) => {
                    eprintln!("warning: could not reach the server ({e})");
                    print_state(&engine.state());
                }
            }
        }
        Command::Start {
            project_id,
            task,
            description,
            non_billable,
            tags,
        } => {
            let engine = TimerEngine::new(api, store);
            engine.sync().await?;
            let entry = engine
                .start(StartTimer {
                    project_id,
                    task_id: task,
                    is_billable: !non_billable,
                    description,
                    tag_ids: tags,
                })
                .await?;
            println!(
                "Timer started on {} at {}",
                entry.project_name,
                entry.start_time.format("%H:%M:%S")
            );
        }
        Command::Stop => {
            let engine = TimerEngine::new(api, store);
            engine.sync().await?;
            let duration = engine.stop().await?;
            println!("Stopped after {}", format_elapsed(duration));
        }
        Command::Watch => {
            let engine = TimerEngine::new(api, store);
            engine.restore_snapshot();
            engine.sync().await?;
            watch_loop(&engine).await?;
        }
        Command::Entries(args) => {
            let page = api
                .list_entries(&EntryFilter {
                    project_id: args.project,
                    user_id: args.user,
                    start_date: args.from,
                    end_date: args.to,
                    is_running: args.running.then_some(true),
                    tag_ids: args.tags,
                    limit: Some(args.limit),
                    offset: Some(args.offset),
                    ..Default::default()
                })
                .await?;

            let mut table = Table::new();
            table.add_row(row!["START", "DURATION", "PROJECT", "TASK", "DESCRIPTION"]);
            for entry in &page.items {
                let duration = match entry.duration_seconds {
                    Some(secs) => format_elapsed(secs),
                    None => "running".to_string(),
                };
                table.add_row(row![
                    entry.start_time.format("%Y-%m-%d %H:%M"),
                    duration,
                    entry.project_name,
                    entry.task_name.as_deref().unwrap_or("-"),
                    entry.description.as_deref().unwrap_or("-"),
                ]);
            }
            table.printstd();
            println!(
                "{} of {} entries (offset {})",
                page.items.len(),
                page.total,
                page.offset
            );
        }
        Command::Log {
            project_id,
            start,
            end,
            task,
            description,
            non_billable,
        } => {
            let entry = api
                .create_manual_entry(&ManualEntry {
                    project_id,
                    task_id: task,
                    start_time: start,
                    end_time: end,
                    is_billable: !non_billable,
                    description,
                    tag_ids: Vec::new(),
                })
                .await?;
            println!(
                "Logged {} on {}",
                format_elapsed(entry.duration_seconds.unwrap_or(0)),
                entry.project_name
            );
        }
        Command::Projects(cmd) => run_projects(&api, cmd).await?,
        Command::Tasks(cmd) => run_tasks(&api, cmd).await?,
        Command::Tags(cmd) => run_tags(&api, cmd).await?,
        Command::Users(cmd) => run_users(&api, cmd).await?,
        Command::Report { from, to, user } => {
            let report = api
                .project_report(&ReportFilter {
                    start_date: from,
                    end_date: to,
                    user_id: user,
                })
                .await?;

            let mut table = Table::new();
            table.add_row(row!["PROJECT", "TIME", "ENTRIES"]);
            for agg in &report.items {
                table.add_row(row![
                    agg.project_name,
                    format_elapsed(agg.total_duration_seconds),
                    agg.entry_count,
                ]);
            }
            table.printstd();
        }
    }

    Ok(())
}

async fn run_projects(api: &ApiClient, cmd: ProjectCommand) -> anyhow::Result<()> {
    match cmd {
        ProjectCommand::List => {
            let page = api.list_projects(None, None).await?;
            let mut table = Table::new();
            table.add_row(row!["ID", "NAME", "TASKS", "ACTIVE"]);
            for project in &page.items {
                table.add_row(row![
                    project.id,
                    project.name,
                    project.task_count,
                    project.is_active,
                ]);
            }
            table.printstd();
        }
        ProjectCommand::Create {
            name,
            description,
            color,
        } => {
            let project = api
                .create_project(&ProjectDraft {
                    name,
                    description,
                    color,
                })
                .await?;
            println!("Created project {} ({})", project.name, project.id);
        }
        ProjectCommand::Rename { project_id, name } => {
            let project = api
                .update_project(
                    project_id,
                    &ProjectPatch {
                        name: Some(name),
                        ..Default::default()
                    },
                )
                .await?;
            println!("Renamed to {}", project.name);
        }
        ProjectCommand::Archive { project_id } => {
            api.update_project(
                project_id,
                &ProjectPatch {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await?;
            println!("Archived {}", project_id);
        }
        ProjectCommand::Delete { project_id } => {
            api.delete_project(project_id).await?;
            println!("Deleted {}", project_id);
        }
    }
    Ok(())
}

async fn run_tasks(api: &ApiClient, cmd: TaskCommand) -> anyhow::Result<()> {
    match cmd {
        TaskCommand::List { project } => {
            let page = api.list_tasks(project).await?;
            let mut table = Table::new();
            table.add_row(row!["ID", "NAME", "PROJECT", "ACTIVE"]);
            for task in &page.items {
                table.add_row(row![task.id, task.name, task.project_name, task.is_active]);
            }
            table.printstd();
        }
        TaskCommand::Create {
            name,
            project,
            description,
        } => {
            let task = api
                .create_task(&TaskDraft {
                    name,
                    description,
                    project_id: project,
                })
                .await?;
            println!("Created task {} ({})", task.name, task.id);
        }
        TaskCommand::Delete { task_id } => {
            api.delete_task(task_id).await?;
            println!("Deleted {}", task_id);
        }
    }
    Ok(())
}

async fn run_tags(api: &ApiClient, cmd: TagCommand) -> anyhow::Result<()> {
    match cmd {
        TagCommand::List => {
            let page = api.list_tags(None, None).await?;
            let mut table = Table::new();
            table.add_row(row!["ID", "NAME"]);
            for tag in &page.items {
                table.add_row(row![tag.id, tag.name]);
            }
            table.printstd();
        }
        TagCommand::Create { name } => {
            let tag = api.create_tag(&TagDraft::new(name)).await?;
            println!("Created tag {} ({})", tag.name, tag.id);
        }
        TagCommand::Rename { tag_id, name } => {
            let tag = api.update_tag(tag_id, &TagDraft::new(name)).await?;
            println!("Renamed to {}", tag.name);
        }
        TagCommand::Delete { tag_id } => {
            api.delete_tag(tag_id).await?;
            println!("Deleted {}", tag_id);
        }
    }
    Ok(())
}

async fn run_users(api: &ApiClient, cmd: UserCommand) -> anyhow::Result<()> {
    match cmd {
        UserCommand::List => {
            let page = api.list_users().await?;
            let mut table = Table::new();
            table.add_row(row!["ID", "EMAIL", "ROLE", "ACTIVE"]);
            for user in &page.items {
                table.add_row(row![user.id, user.email, user.role, user.is_active]);
            }
            table.printstd();
        }
        UserCommand::SetRole { user_id, role } => {
            let user = api
                .update_user(
                    user_id,
                    &UserPatch {
                        role: Some(role.into()),
                        ..Default::default()
                    },
                )
                .await?;
            println!("{} is now {}", user.email, user.role);
        }
        UserCommand::Deactivate { user_id } => {
            let user = api
                .update_user(
                    user_id,
                    &UserPatch {
                        is_active: Some(false),
                        ..Default::default()
                    },
                )
                .await?;
            println!("Deactivated {}", user.email);
        }
        UserCommand::Delete { user_id } => {
            api.delete_user(user_id).await?;
            println!("Deleted {}", user_id);
        }
    }
    Ok(())
}

fn print_state(state: &TimerState) {
    match state {
        TimerState::Running {
            entry,
            elapsed_secs,
        } => {
            println!(
                "Running: {} ({}) - {}",
                entry.project_name,
                entry.description.as_deref().unwrap_or("no description"),
                format_elapsed(*elapsed_secs)
            );
        }
        TimerState::Idle => println!("No timer running"),
        TimerState::Unknown => println!("Timer state unknown (not yet synced)"),
    }
}

/// Print the live elapsed time until the timer stops or Ctrl-C.
async fn watch_loop(engine: &TimerEngine) -> anyhow::Result<()> {
    let mut rx = engine.subscribe();
    loop {
        match &*rx.borrow() {
            TimerState::Running {
                entry,
                elapsed_secs,
            } => {
                print!(
                    "\r{} on {}   ",
                    format_elapsed(*elapsed_secs),
                    entry.project_name
                );
                std::io::stdout().flush()?;
            }
            _ => {
                println!("No timer running");
                return Ok(());
            }
        }
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                return Ok(());
            }
        }
    }
}
