//! Seed the database with a demo team.
//!
//! Safe to re-run: existing users are reused and demo content is only
//! inserted into an empty board.

use anyhow::Result;
use chrono::{Duration, Utc};
use tracing::info;

use server::auth::{AuthManager, NewUser};
use server::config::ServerConfig;
use server::models::{Priority, TaskStatus, User};
use server::store::{self, NewAnnouncement, NewComment, NewFile, NewTask, TaskFilter, TaskPatch, TeamStore};

fn demo_users() -> Vec<NewUser> {
    vec![
        NewUser {
            username: "admin".to_string(),
            email: "admin@crewdeck.dev".to_string(),
            password: "admin123".to_string(),
            role: "admin".to_string(),
            department: "Management".to_string(),
            skills: "Leadership,Strategy,Project Management".to_string(),
            avatar: None,
            location: Some("New York, NY".to_string()),
            phone: Some("+1 (555) 000-0001".to_string()),
        },
        NewUser {
            username: "john_doe".to_string(),
            email: "john@crewdeck.dev".to_string(),
            password: "password123".to_string(),
            role: "Lead Developer".to_string(),
            department: "Engineering".to_string(),
            skills: "Rust,TypeScript,AWS".to_string(),
            avatar: None,
            location: Some("San Francisco, CA".to_string()),
            phone: Some("+1 (555) 123-4567".to_string()),
        },
        NewUser {
            username: "jane_smith".to_string(),
            email: "jane@crewdeck.dev".to_string(),
            password: "password123".to_string(),
            role: "UI/UX Designer".to_string(),
            department: "Design".to_string(),
            skills: "Figma,Sketch,Prototyping".to_string(),
            avatar: None,
            location: Some("Austin, TX".to_string()),
            phone: Some("+1 (555) 234-5678".to_string()),
        },
    ]
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_env_filter("info").init();

    let config = ServerConfig::from_env();
    info!("Seeding {}", config.database_url);

    let pool = store::connect(&config.database_url).await?;
    let auth = AuthManager::new(pool.clone()).await?;
    let team = TeamStore::new(pool).await?;

    let mut users: Vec<User> = Vec::new();
    for new in demo_users() {
        let email = new.email.clone();
        match auth.user_by_email(&email).await? {
            Some(user) => {
                info!("user {} already present, skipping", user.username);
                users.push(user);
            }
            None => {
                let user = auth.register(new).await?;
                info!("created user {} ({})", user.username, user.email);
                users.push(user);
            }
        }
    }

    let board_empty = team
        .list_tasks(TaskFilter {
            limit: 1,
            ..Default::default()
        })
        .await?
        .is_empty();
    if !board_empty {
        info!("board already has tasks, leaving demo content alone");
        return Ok(());
    }

    let admin = &users[0];
    let john = &users[1];
    let jane = &users[2];

    let onboarding = team
        .create_task(
            admin.id,
            NewTask {
                title: "Set up the staging environment".to_string(),
                description: "Provision the staging box and wire up deploys.".to_string(),
                priority: Priority::High,
                assignee_id: Some(john.id),
                due_date: Some(Utc::now() + Duration::days(7)),
                tags: "infra,deploy".to_string(),
            },
        )
        .await?;

    let design = team
        .create_task(
            john.id,
            NewTask {
                title: "Dashboard redesign".to_string(),
                description: "New layout for the team dashboard.".to_string(),
                priority: Priority::Medium,
                assignee_id: Some(jane.id),
                due_date: Some(Utc::now() + Duration::days(14)),
                tags: "design".to_string(),
            },
        )
        .await?;

    team.create_task(
        jane.id,
        NewTask {
            title: "Write onboarding notes".to_string(),
            description: String::new(),
            priority: Priority::Low,
            assignee_id: None,
            due_date: None,
            tags: String::new(),
        },
    )
    .await?;

    // Put the board into a believable state
    team.update_task(
        design.id,
        TaskPatch {
            status: Some(TaskStatus::InProgress),
            ..Default::default()
        },
    )
    .await?;

    team.create_announcement(
        admin.id,
        NewAnnouncement {
            title: "Welcome to Crewdeck".to_string(),
            content: "Tasks, announcements and files for the whole team live here.".to_string(),
            priority: Priority::High,
            pinned: true,
        },
    )
    .await?;

    team.create_announcement(
        john.id,
        NewAnnouncement {
            title: "Standup moved to 9:30".to_string(),
            content: "Starting Monday the daily standup moves to 9:30.".to_string(),
            priority: Priority::Medium,
            pinned: false,
        },
    )
    .await?;

    team.create_comment(
        john.id,
        NewComment {
            content: "Staging box is ordered, waiting on access.".to_string(),
            task_id: onboarding.id,
        },
    )
    .await?;

    team.create_comment(
        admin.id,
        NewComment {
            content: "Ping me if access takes more than a day.".to_string(),
            task_id: onboarding.id,
        },
    )
    .await?;

    team.create_file(
        jane.id,
        NewFile {
            name: "dashboard-mockups.fig".to_string(),
            file_type: "figma".to_string(),
            size: Some(2_400_000),
            url: Some("https://files.crewdeck.dev/dashboard-mockups.fig".to_string()),
            description: Some("First pass at the new dashboard".to_string()),
        },
    )
    .await?;

    info!("seed complete: {} users", users.len());

    Ok(())
}
