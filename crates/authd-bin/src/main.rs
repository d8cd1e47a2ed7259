//! Interactive front end for the `authd` core.
//!
//! Plays the presentation adapter role: it renders auth state changes it
//! receives over the broadcast channel and drives the service from stdin
//! commands. All real logic lives in `authd-lib`.
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use authd_common::{ProfilePatch, RegisterInput};
use authd_lib::auth::AuthStateChanged;
use authd_lib::config::Settings;
use authd_lib::storage::FlatFileStorage;
use authd_lib::AuthSystem;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load().unwrap_or_else(|e| {
        eprintln!("no usable config ({e}), falling back to defaults");
        Settings::default()
    });

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.log_level.clone())),
        )
        .init();

    let storage = Arc::new(FlatFileStorage::new(&settings.data_dir)?);
    let system = AuthSystem::open(storage, settings).await?;

    // render every state transition, exactly what a UI adapter would do
    let mut events = system.auth.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                AuthStateChanged::Anonymous => println!("* signed out"),
                AuthStateChanged::Authenticated(account) => {
                    println!("* signed in as {} <{}>", account.full_name, account.email);
                },
            }
        }
    });

    // pick up a session persisted by a previous run
    match system.auth.resume().await? {
        Some(account) => tracing::info!(account_id = %account.id, "resumed session"),
        None => tracing::info!("no active session"),
    }

    println!("commands: register | login | logout | whoami | profile | passwd | stats | quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.as_slice() {
            [] => {},
            ["quit"] | ["exit"] => break,
            ["register", username, email, password, full_name @ ..] => {
                let input = RegisterInput {
                    full_name: full_name.join(" "),
                    email: (*email).to_string(),
                    username: (*username).to_string(),
                    password: (*password).to_string(),
                    confirm_password: (*password).to_string(),
                };
                match system.auth.register(input).await {
                    Ok(session) => println!("registered, token {}", session.token),
                    Err(e) => println!("error [{}]: {}", e.error_code(), e.user_message()),
                }
            },
            ["login", email, password] => match system.auth.login(email, password).await {
                Ok(session) => println!("logged in, token {}", session.token),
                Err(e) => println!("error [{}]: {}", e.error_code(), e.user_message()),
            },
            ["logout"] => {
                system.auth.logout().await?;
            },
            ["whoami"] => match system.auth.current_account().await {
                Some(account) => println!(
                    "{} <{}> (username {}, last login {:?})",
                    account.full_name, account.email, account.username, account.last_login_at
                ),
                None => println!("anonymous"),
            },
            ["profile", "bio", rest @ ..] => {
                apply_patch(&system, ProfilePatch { bio: Some(rest.join(" ")), ..Default::default() }).await;
            },
            ["profile", "location", rest @ ..] => {
                apply_patch(&system, ProfilePatch { location: Some(rest.join(" ")), ..Default::default() }).await;
            },
            ["profile", "skills", csv] => {
                let skills = csv.split(',').map(str::to_string).collect();
                apply_patch(&system, ProfilePatch { skills: Some(skills), ..Default::default() }).await;
            },
            ["profile", "avatar", url] => {
                apply_patch(&system, ProfilePatch { avatar: Some((*url).to_string()), ..Default::default() }).await;
            },
            ["passwd", current, next] => match system.auth.change_password(current, next).await {
                Ok(()) => println!("password changed"),
                Err(e) => println!("error [{}]: {}", e.error_code(), e.user_message()),
            },
            ["stats"] => match system.auth.account_stats().await {
                Some(stats) => println!(
                    "{} accounts total; registered {} days ago; last login {:?} days ago",
                    stats.total_accounts,
                    stats.days_since_registration,
                    stats.days_since_last_login
                ),
                None => println!("anonymous"),
            },
            _ => println!("unrecognized command"),
        }
    }

    Ok(())
}

async fn apply_patch(system: &AuthSystem, patch: ProfilePatch) {
    match system.auth.update_profile(patch).await {
        Ok(profile) => println!("profile updated: {profile:?}"),
        Err(e) => println!("error [{}]: {}", e.error_code(), e.user_message()),
    }
}
