//! Services shared by every client.

mod group;

pub use group::{GroupService, SessionBatch};

use crate::config::ClientConfig;
use crate::db::{Database, LibSqlRecordStore};
use crate::error::Result;
use crate::models::{CustomExerciseRow, Reaction, Session, SessionId, User, UserId};
use crate::store::{RecordStore, SupabaseRecordStore};

/// The record store picked at startup
#[derive(Clone)]
pub enum AnyRecordStore {
    /// Local-only mode: the group lives in this device's database file
    Local(LibSqlRecordStore),
    Supabase(SupabaseRecordStore),
}

impl std::fmt::Debug for AnyRecordStore {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local(_) => formatter.write_str("Local"),
            Self::Supabase(store) => formatter.debug_tuple("Supabase").field(store).finish(),
        }
    }
}

impl AnyRecordStore {
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Supabase(_))
    }
}

/// Use the hosted store when `config` has credentials, else the local database
pub fn open_record_store(config: &ClientConfig, db: &Database) -> Result<AnyRecordStore> {
    if let Some((url, anon_key)) = config.remote_credentials() {
        tracing::info!("Using hosted record store at {url}");
        Ok(AnyRecordStore::Supabase(SupabaseRecordStore::new(
            url, anon_key,
        )?))
    } else {
        tracing::info!("Running in local-only mode (no Supabase config)");
        Ok(AnyRecordStore::Local(db.record_store()))
    }
}

impl RecordStore for AnyRecordStore {
    async fn list_users(&self, sync_code: &str) -> Result<Vec<User>> {
        match self {
            Self::Local(store) => store.list_users(sync_code).await,
            Self::Supabase(store) => store.list_users(sync_code).await,
        }
    }

    async fn insert_user(&self, sync_code: &str, user: &User) -> Result<()> {
        match self {
            Self::Local(store) => store.insert_user(sync_code, user).await,
            Self::Supabase(store) => store.insert_user(sync_code, user).await,
        }
    }

    async fn update_user(&self, sync_code: &str, user: &User) -> Result<()> {
        match self {
            Self::Local(store) => store.update_user(sync_code, user).await,
            Self::Supabase(store) => store.update_user(sync_code, user).await,
        }
    }

    async fn delete_user(&self, sync_code: &str, id: &UserId) -> Result<()> {
        match self {
            Self::Local(store) => store.delete_user(sync_code, id).await,
            Self::Supabase(store) => store.delete_user(sync_code, id).await,
        }
    }

    async fn list_sessions(&self, sync_code: &str) -> Result<Vec<Session>> {
        match self {
            Self::Local(store) => store.list_sessions(sync_code).await,
            Self::Supabase(store) => store.list_sessions(sync_code).await,
        }
    }

    async fn insert_session(&self, session: &Session) -> Result<()> {
        match self {
            Self::Local(store) => store.insert_session(session).await,
            Self::Supabase(store) => store.insert_session(session).await,
        }
    }

    async fn delete_session(&self, sync_code: &str, id: &SessionId) -> Result<()> {
        match self {
            Self::Local(store) => store.delete_session(sync_code, id).await,
            Self::Supabase(store) => store.delete_session(sync_code, id).await,
        }
    }

    async fn list_custom_exercises(&self, sync_code: &str) -> Result<Vec<CustomExerciseRow>> {
        match self {
            Self::Local(store) => store.list_custom_exercises(sync_code).await,
            Self::Supabase(store) => store.list_custom_exercises(sync_code).await,
        }
    }

    async fn insert_custom_exercise(&self, sync_code: &str, row: &CustomExerciseRow) -> Result<()> {
        match self {
            Self::Local(store) => store.insert_custom_exercise(sync_code, row).await,
            Self::Supabase(store) => store.insert_custom_exercise(sync_code, row).await,
        }
    }

    async fn list_reactions(
        &self,
        sync_code: &str,
        session_id: Option<&SessionId>,
    ) -> Result<Vec<Reaction>> {
        match self {
            Self::Local(store) => store.list_reactions(sync_code, session_id).await,
            Self::Supabase(store) => store.list_reactions(sync_code, session_id).await,
        }
    }

    async fn insert_reaction(&self, sync_code: &str, reaction: &Reaction) -> Result<()> {
        match self {
            Self::Local(store) => store.insert_reaction(sync_code, reaction).await,
            Self::Supabase(store) => store.insert_reaction(sync_code, reaction).await,
        }
    }
}
