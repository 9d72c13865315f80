//! libSQL implementation of the record store (local-only mode)

use chrono::{DateTime, NaiveDate, Utc};
use libsql::{params, Connection, Row};

use crate::error::{Error, Result};
use crate::models::{CustomExerciseRow, Reaction, Session, SessionId, User, UserId};
use crate::store::RecordStore;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Record store backed by the local database file
#[derive(Clone)]
pub struct LibSqlRecordStore {
    conn: Connection,
}

impl LibSqlRecordStore {
    /// Create a new store with the given connection
    pub const fn new(conn: Connection) -> Self {
        Self { conn }
    }

    fn parse_user(row: &Row) -> Result<User> {
        Ok(User {
            id: row.get::<String>(0)?.parse()?,
            name: row.get(1)?,
            avatar: row.get(2)?,
            created_at: from_millis(row.get(3)?),
        })
    }

    fn parse_session(row: &Row) -> Result<Session> {
        let date: String = row.get(5)?;
        let participants: String = row.get(7)?;
        Ok(Session {
            id: row.get::<String>(0)?.parse()?,
            sync_code: row.get(1)?,
            created_by: row.get::<String>(2)?.parse()?,
            creator_name: row.get(3)?,
            creator_avatar: row.get(4)?,
            date: NaiveDate::parse_from_str(&date, DATE_FORMAT)
                .map_err(|e| Error::Backend(format!("invalid session date {date}: {e}")))?,
            body_part: row.get(6)?,
            participants: serde_json::from_str(&participants)?,
            reactions: Vec::new(),
            created_at: from_millis(row.get(8)?),
        })
    }

    fn parse_reaction(row: &Row) -> Result<Reaction> {
        Ok(Reaction {
            id: row.get::<String>(0)?.parse()?,
            session_id: row.get::<String>(1)?.parse()?,
            user_id: row.get::<String>(2)?.parse()?,
            user_name: row.get(3)?,
            user_avatar: row.get(4)?,
            category: row.get(5)?,
            emoji: row.get(6)?,
            gif_url: row.get(7)?,
            gif_id: row.get(8)?,
            created_at: from_millis(row.get(9)?),
        })
    }
}

fn from_millis(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

impl RecordStore for LibSqlRecordStore {
    async fn list_users(&self, sync_code: &str) -> Result<Vec<User>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, name, avatar, created_at FROM users
                 WHERE sync_code = ? ORDER BY created_at ASC",
                [sync_code],
            )
            .await?;

        let mut users = Vec::new();
        while let Some(row) = rows.next().await? {
            users.push(Self::parse_user(&row)?);
        }
        Ok(users)
    }

    async fn insert_user(&self, sync_code: &str, user: &User) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO users (id, sync_code, name, avatar, created_at) VALUES (?, ?, ?, ?, ?)",
                params![
                    user.id.as_str(),
                    sync_code,
                    user.name.as_str(),
                    user.avatar.as_str(),
                    user.created_at.timestamp_millis()
                ],
            )
            .await?;
        tracing::debug!("Inserted user {}", user.id);
        Ok(())
    }

    async fn update_user(&self, sync_code: &str, user: &User) -> Result<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE users SET name = ?, avatar = ? WHERE id = ? AND sync_code = ?",
                params![
                    user.name.as_str(),
                    user.avatar.as_str(),
                    user.id.as_str(),
                    sync_code
                ],
            )
            .await?;
        if changed == 0 {
            return Err(Error::NotFound(format!("user {}", user.id)));
        }
        Ok(())
    }

    async fn delete_user(&self, sync_code: &str, id: &UserId) -> Result<()> {
        let changed = self
            .conn
            .execute(
                "DELETE FROM users WHERE id = ? AND sync_code = ?",
                [id.as_str(), sync_code],
            )
            .await?;
        if changed == 0 {
            return Err(Error::NotFound(format!("user {id}")));
        }
        Ok(())
    }

    async fn list_sessions(&self, sync_code: &str) -> Result<Vec<Session>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, sync_code, created_by, creator_name, creator_avatar, date, type,
                        participants, created_at
                 FROM sessions
                 WHERE sync_code = ?
                 ORDER BY date DESC, created_at DESC",
                [sync_code],
            )
            .await?;

        let mut sessions = Vec::new();
        while let Some(row) = rows.next().await? {
            sessions.push(Self::parse_session(&row)?);
        }
        tracing::debug!("Loaded {} sessions for {sync_code}", sessions.len());
        Ok(sessions)
    }

    async fn insert_session(&self, session: &Session) -> Result<()> {
        let participants = serde_json::to_string(&session.participants)?;
        self.conn
            .execute(
                "INSERT INTO sessions (
                    id, sync_code, created_by, creator_name, creator_avatar, date, type,
                    participants, created_at
                 ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    session.id.as_str(),
                    session.sync_code.as_str(),
                    session.created_by.as_str(),
                    session.creator_name.as_str(),
                    session.creator_avatar.as_str(),
                    session.date.format(DATE_FORMAT).to_string(),
                    session.body_part.as_str(),
                    participants,
                    session.created_at.timestamp_millis()
                ],
            )
            .await?;
        tracing::debug!("Inserted session {}", session.id);
        Ok(())
    }

    async fn delete_session(&self, sync_code: &str, id: &SessionId) -> Result<()> {
        let changed = self
            .conn
            .execute(
                "DELETE FROM sessions WHERE id = ? AND sync_code = ?",
                [id.as_str(), sync_code],
            )
            .await?;
        if changed == 0 {
            return Err(Error::NotFound(format!("session {id}")));
        }
        Ok(())
    }

    async fn list_custom_exercises(&self, sync_code: &str) -> Result<Vec<CustomExerciseRow>> {
        let mut rows = self
            .conn
            .query(
                "SELECT body_part, exercise_name FROM custom_exercises
                 WHERE sync_code = ? ORDER BY id ASC",
                [sync_code],
            )
            .await?;

        let mut exercises = Vec::new();
        while let Some(row) = rows.next().await? {
            exercises.push(CustomExerciseRow {
                body_part: row.get(0)?,
                exercise_name: row.get(1)?,
            });
        }
        Ok(exercises)
    }

    async fn insert_custom_exercise(&self, sync_code: &str, row: &CustomExerciseRow) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR IGNORE INTO custom_exercises (sync_code, body_part, exercise_name)
                 VALUES (?, ?, ?)",
                [sync_code, row.body_part.as_str(), row.exercise_name.as_str()],
            )
            .await?;
        Ok(())
    }

    async fn list_reactions(
        &self,
        sync_code: &str,
        session_id: Option<&SessionId>,
    ) -> Result<Vec<Reaction>> {
        const COLUMNS: &str = "SELECT id, session_id, user_id, user_name, user_avatar, category,
                                      emoji, gif_url, gif_id, created_at
                               FROM reactions";
        let mut rows = match session_id {
            Some(session_id) => {
                self.conn
                    .query(
                        &format!(
                            "{COLUMNS} WHERE sync_code = ? AND session_id = ? ORDER BY created_at ASC, rowid ASC"
                        ),
                        [sync_code, session_id.as_str()],
                    )
                    .await?
            }
            None => {
                self.conn
                    .query(
                        &format!("{COLUMNS} WHERE sync_code = ? ORDER BY created_at ASC, rowid ASC"),
                        [sync_code],
                    )
                    .await?
            }
        };

        let mut reactions = Vec::new();
        while let Some(row) = rows.next().await? {
            reactions.push(Self::parse_reaction(&row)?);
        }
        Ok(reactions)
    }

    async fn insert_reaction(&self, sync_code: &str, reaction: &Reaction) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO reactions (
                    id, session_id, sync_code, user_id, user_name, user_avatar, category,
                    emoji, gif_url, gif_id, created_at
                 ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    reaction.id.as_str(),
                    reaction.session_id.as_str(),
                    sync_code,
                    reaction.user_id.as_str(),
                    reaction.user_name.as_str(),
                    reaction.user_avatar.as_str(),
                    reaction.category.as_str(),
                    reaction.emoji.as_str(),
                    reaction.gif_url.as_str(),
                    reaction.gif_id.as_str(),
                    reaction.created_at.timestamp_millis()
                ],
            )
            .await?;
        tracing::debug!("Inserted reaction {} on {}", reaction.id, reaction.session_id);
        Ok(())
    }
}
