use std::path::Path;

use serde::Serialize;
use spotter_core::models::display_avatar;
use spotter_core::User;

use crate::cli::ProfileCommands;
use crate::commands::common::{open_app, print_json, resolve_user, short_id};
use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct ProfileListItem {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub active: bool,
}

pub async fn run_profile(
    command: ProfileCommands,
    db_path: &Path,
    config_path: &Path,
) -> Result<(), CliError> {
    let mut app = open_app(db_path, config_path).await?;
    let service = &mut app.service;

    match command {
        ProfileCommands::List { json } => {
            let active = service.current_user().map(|user| user.id.clone());
            let items = service
                .users()
                .iter()
                .map(|user| ProfileListItem {
                    id: user.id.to_string(),
                    name: user.name.clone(),
                    avatar: display_avatar(&user.avatar).to_string(),
                    active: active.as_ref() == Some(&user.id),
                })
                .collect::<Vec<_>>();
            if json {
                return print_json(&items);
            }
            if items.is_empty() {
                println!("No profiles in sync group {}.", service.sync_code());
            }
            for item in items {
                let marker = if item.active { "*" } else { " " };
                println!("{marker} {:<13}  {}", short_id(&item.id), item.name);
            }
        }
        ProfileCommands::Create { name, avatar } => {
            let user = service
                .create_profile(&name, avatar.as_deref())
                .await
                .map_err(CliError::from_core)?;
            println!("{}", user.id);
        }
        ProfileCommands::Select { profile } => {
            let user = resolve_user(service.users(), &profile)?;
            let user = service
                .select_profile(&user.id)
                .await
                .map_err(CliError::from_core)?;
            println!("Now acting as {}", user.name);
        }
        ProfileCommands::Edit {
            profile,
            name,
            avatar,
        } => {
            if name.is_none() && avatar.is_none() {
                return Err(CliError::NothingToUpdate);
            }
            let user = resolve_user(service.users(), &profile)?;
            let name = name.unwrap_or_else(|| user.name.clone());
            let user = service
                .edit_profile(&user.id, &name, avatar.as_deref())
                .await
                .map_err(CliError::from_core)?;
            println!("{}", user.id);
        }
        ProfileCommands::Delete { profile, yes } => {
            let user = resolve_user(service.users(), &profile)?;
            service
                .delete_profile(&user.id, yes)
                .await
                .map_err(CliError::from_core)?;
            println!("{}", user.id);
        }
        ProfileCommands::Whoami => match service.current_user() {
            Some(user) => println!("{}", describe_user(user, service.sync_code())),
            None => return Err(CliError::NoActiveProfile),
        },
        ProfileCommands::Logout => {
            service.switch_user().await.map_err(CliError::from_core)?;
            println!("Logged out; the roster stays cached on this device.");
        }
    }

    Ok(())
}

pub fn describe_user(user: &User, sync_code: &str) -> String {
    format!(
        "{} ({}) in sync group {sync_code}, avatar {}",
        user.name,
        user.id,
        user.display_avatar()
    )
}
