use std::env;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use spotter_core::config::ClientConfig;
use spotter_core::db::{Database, LibSqlLocalStateRepository};
use spotter_core::services::{open_record_store, AnyRecordStore, GroupService};
use spotter_core::{Session, User};

use crate::config_file::effective_config;
use crate::error::CliError;

pub type Service = GroupService<AnyRecordStore, LibSqlLocalStateRepository>;

/// Everything a data command needs, refreshed from the record store
pub struct App {
    pub service: Service,
    pub config: ClientConfig,
    _db: Database,
}

impl App {
    pub fn active_user(&self) -> Result<&User, CliError> {
        self.service.current_user().ok_or(CliError::NoActiveProfile)
    }

    /// `query` resolved against the roster, or the active profile when absent
    pub fn user_or_active(&self, query: Option<&str>) -> Result<User, CliError> {
        match query {
            Some(query) => resolve_user(self.service.users(), query),
            None => self.active_user().cloned(),
        }
    }
}

pub async fn open_app(db_path: &Path, config_path: &Path) -> Result<App, CliError> {
    let config = effective_config(config_path)?;
    let db = Database::open(db_path).await?;
    let store = open_record_store(&config, &db)?;
    let mut service = GroupService::load(store, db.local_state()).await?;
    service.set_sync_code(&config.sync_code).await?;
    service.refresh_all().await?;
    Ok(App {
        service,
        config,
        _db: db,
    })
}

pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> PathBuf {
    cli_db_path
        .or_else(|| env::var_os("SPOTTER_DB_PATH").map(PathBuf::from))
        .unwrap_or_else(default_db_path)
}

pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("spotter")
        .join("spotter.db")
}

pub fn short_id(id: &str) -> String {
    id.chars().take(13).collect()
}

/// Find a profile by exact id, case-insensitive name, or unique id prefix
pub fn resolve_user(users: &[User], query: &str) -> Result<User, CliError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(CliError::ProfileNotFound(query.to_string()));
    }
    if let Some(user) = users.iter().find(|user| user.id.as_str() == query) {
        return Ok(user.clone());
    }

    let by_name: Vec<&User> = users
        .iter()
        .filter(|user| user.name.eq_ignore_ascii_case(query))
        .collect();
    let candidates = if by_name.is_empty() {
        users
            .iter()
            .filter(|user| user.id.as_str().starts_with(query))
            .collect()
    } else {
        by_name
    };

    match candidates.as_slice() {
        [] => Err(CliError::ProfileNotFound(query.to_string())),
        [user] => Ok((*user).clone()),
        many => {
            let options = many
                .iter()
                .take(3)
                .map(|user| format!("{} ({})", user.name, short_id(user.id.as_str())))
                .collect::<Vec<_>>()
                .join(", ");
            Err(CliError::Ambiguous(format!(
                "Profile '{query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

/// Find a session by exact id or unique id prefix
pub fn resolve_session<'a>(sessions: &'a [Session], query: &str) -> Result<&'a Session, CliError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(CliError::SessionNotFound(query.to_string()));
    }
    if let Some(session) = sessions.iter().find(|session| session.id.as_str() == query) {
        return Ok(session);
    }

    let matches: Vec<&Session> = sessions
        .iter()
        .filter(|session| session.id.as_str().starts_with(query))
        .collect();
    match matches.as_slice() {
        [] => Err(CliError::SessionNotFound(query.to_string())),
        [session] => Ok(session),
        many => {
            let options = many
                .iter()
                .take(3)
                .map(|session| short_id(session.id.as_str()))
                .collect::<Vec<_>>()
                .join(", ");
            Err(CliError::Ambiguous(format!(
                "ID prefix '{query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

pub fn parse_date(value: Option<&str>, today: NaiveDate) -> Result<NaiveDate, CliError> {
    match value.map(str::trim) {
        None | Some("" | "today") => Ok(today),
        Some("yesterday") => today
            .pred_opt()
            .ok_or_else(|| CliError::InvalidDate("yesterday".to_string())),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map_err(|_| CliError::InvalidDate(value.to_string())),
    }
}

/// Whole kilograms print without decimals
pub fn format_weight(weight: f64) -> String {
    if weight.fract() == 0.0 {
        format!("{weight:.0}")
    } else {
        format!("{weight}")
    }
}

pub fn format_session_line(session: &Session) -> String {
    let names = session
        .participants
        .iter()
        .map(|participant| participant.user_name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let reactions = session
        .reactions
        .iter()
        .map(|reaction| reaction.emoji.as_str())
        .collect::<String>();

    let line = format!(
        "{:<13}  {}  {:<10}  {}",
        short_id(session.id.as_str()),
        session.date,
        session.body_part,
        names
    );
    if reactions.is_empty() {
        line
    } else {
        format!("{line}  {reactions}")
    }
}

pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
