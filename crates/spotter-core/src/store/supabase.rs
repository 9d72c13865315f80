//! Hosted record store over the Supabase REST (PostgREST) API.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{RecordStore, Resource};
use crate::error::{Error, Result};
use crate::models::{CustomExerciseRow, Reaction, Session, SessionId, User, UserId};
use crate::util::{compact_text, is_http_url};

/// `RecordStore` backed by the group's hosted tables
#[derive(Clone)]
pub struct SupabaseRecordStore {
    rest_url: String,
    anon_key: String,
    client: Client,
}

impl std::fmt::Debug for SupabaseRecordStore {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("SupabaseRecordStore")
            .field("rest_url", &self.rest_url)
            .field("anon_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl SupabaseRecordStore {
    pub fn new(url: impl AsRef<str>, anon_key: impl Into<String>) -> Result<Self> {
        let rest_url = normalize_rest_url(url.as_ref())?;
        let anon_key = anon_key.into().trim().to_string();
        if anon_key.is_empty() {
            return Err(Error::InvalidInput(
                "Supabase anon key must not be empty".to_string(),
            ));
        }

        Ok(Self {
            rest_url,
            anon_key,
            client: Client::builder().build()?,
        })
    }

    fn table_url(&self, resource: Resource, filters: &[String]) -> String {
        let base = format!("{}/{}", self.rest_url, resource.remote_table());
        if filters.is_empty() {
            base
        } else {
            format!("{base}?{}", filters.join("&"))
        }
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
    }

    async fn select<T: DeserializeOwned>(&self, resource: Resource, filters: &[String]) -> Result<Vec<T>> {
        let url = self.table_url(resource, filters);
        tracing::debug!("GET {url}");
        let request = self
            .authorized(self.client.get(&url))
            .header("Accept", "application/json");
        let response = check(request.send().await?).await?;
        Ok(response.json::<Vec<T>>().await?)
    }

    async fn insert<T: Serialize + ?Sized>(&self, resource: Resource, row: &T) -> Result<()> {
        let url = self.table_url(resource, &[]);
        tracing::debug!("POST {url}");
        let request = self
            .authorized(self.client.post(&url))
            .header("Prefer", "return=minimal")
            .json(row);
        check(request.send().await?).await?;
        Ok(())
    }

    async fn patch<T: Serialize + ?Sized>(
        &self,
        resource: Resource,
        filters: &[String],
        body: &T,
    ) -> Result<()> {
        let url = self.table_url(resource, filters);
        tracing::debug!("PATCH {url}");
        let request = self
            .authorized(self.client.patch(&url))
            .header("Prefer", "return=minimal")
            .json(body);
        check(request.send().await?).await?;
        Ok(())
    }

    async fn delete(&self, resource: Resource, filters: &[String]) -> Result<()> {
        let url = self.table_url(resource, filters);
        tracing::debug!("DELETE {url}");
        let request = self
            .authorized(self.client.delete(&url))
            .header("Prefer", "return=minimal");
        check(request.send().await?).await?;
        Ok(())
    }
}

impl RecordStore for SupabaseRecordStore {
    async fn list_users(&self, sync_code: &str) -> Result<Vec<User>> {
        self.select(
            Resource::Users,
            &[
                eq_filter("sync_code", sync_code),
                "order=created_at.asc".to_string(),
            ],
        )
        .await
    }

    async fn insert_user(&self, sync_code: &str, user: &User) -> Result<()> {
        self.insert(Resource::Users, &[ScopedRow { sync_code, row: user }])
            .await
    }

    async fn update_user(&self, sync_code: &str, user: &User) -> Result<()> {
        self.patch(
            Resource::Users,
            &[
                eq_filter("id", user.id.as_str()),
                eq_filter("sync_code", sync_code),
            ],
            &UserChanges {
                name: &user.name,
                avatar: &user.avatar,
            },
        )
        .await
    }

    async fn delete_user(&self, sync_code: &str, id: &UserId) -> Result<()> {
        self.delete(
            Resource::Users,
            &[eq_filter("id", id.as_str()), eq_filter("sync_code", sync_code)],
        )
        .await
    }

    async fn list_sessions(&self, sync_code: &str) -> Result<Vec<Session>> {
        self.select(
            Resource::Sessions,
            &[
                eq_filter("sync_code", sync_code),
                "order=date.desc,created_at.desc".to_string(),
            ],
        )
        .await
    }

    async fn insert_session(&self, session: &Session) -> Result<()> {
        self.insert(Resource::Sessions, std::slice::from_ref(session))
            .await
    }

    async fn delete_session(&self, sync_code: &str, id: &SessionId) -> Result<()> {
        self.delete(
            Resource::Sessions,
            &[eq_filter("id", id.as_str()), eq_filter("sync_code", sync_code)],
        )
        .await
    }

    async fn list_custom_exercises(&self, sync_code: &str) -> Result<Vec<CustomExerciseRow>> {
        self.select(Resource::CustomExercises, &[eq_filter("sync_code", sync_code)])
            .await
    }

    async fn insert_custom_exercise(&self, sync_code: &str, row: &CustomExerciseRow) -> Result<()> {
        self.insert(Resource::CustomExercises, &[ScopedRow { sync_code, row }])
            .await
    }

    async fn list_reactions(
        &self,
        sync_code: &str,
        session_id: Option<&SessionId>,
    ) -> Result<Vec<Reaction>> {
        let mut filters = vec![eq_filter("sync_code", sync_code)];
        if let Some(session_id) = session_id {
            filters.push(eq_filter("session_id", session_id.as_str()));
        }
        filters.push("order=created_at.asc".to_string());
        self.select(Resource::Reactions, &filters).await
    }

    async fn insert_reaction(&self, sync_code: &str, reaction: &Reaction) -> Result<()> {
        self.insert(
            Resource::Reactions,
            &[ScopedRow {
                sync_code,
                row: reaction,
            }],
        )
        .await
    }
}

/// A record plus the `sync_code` column it is stored under
#[derive(Serialize)]
struct ScopedRow<'a, T: Serialize> {
    sync_code: &'a str,
    #[serde(flatten)]
    row: &'a T,
}

#[derive(Serialize)]
struct UserChanges<'a> {
    name: &'a str,
    avatar: &'a str,
}

#[derive(Debug, Deserialize)]
struct PostgrestErrorResponse {
    message: Option<String>,
    details: Option<String>,
    hint: Option<String>,
    error: Option<String>,
}

async fn check(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(Error::Backend(parse_api_error(status, &body)))
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<PostgrestErrorResponse>(body) {
        if let Some(message) = payload
            .message
            .or(payload.error)
            .or(payload.details)
            .or(payload.hint)
        {
            return format!("{} ({})", compact_text(&message), status.as_u16());
        }
    }

    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}

/// PostgREST equality filter with an encoded value
fn eq_filter(column: &str, value: &str) -> String {
    format!("{column}=eq.{}", urlencoding::encode(value))
}

/// Project URL to its REST root, e.g. `https://x.supabase.co/rest/v1`
pub fn normalize_rest_url(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(Error::InvalidInput(
            "Supabase URL must not be empty".to_string(),
        ));
    }
    if !is_http_url(trimmed) {
        return Err(Error::InvalidInput(
            "Supabase URL must include http:// or https://".to_string(),
        ));
    }
    if trimmed.ends_with("/rest/v1") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{trimmed}/rest/v1"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_rest_url_appends_rest_path() {
        assert_eq!(
            normalize_rest_url("https://demo.supabase.co/").unwrap(),
            "https://demo.supabase.co/rest/v1"
        );
        assert_eq!(
            normalize_rest_url("https://demo.supabase.co/rest/v1").unwrap(),
            "https://demo.supabase.co/rest/v1"
        );
        assert!(normalize_rest_url("demo.supabase.co").is_err());
        assert!(normalize_rest_url("  ").is_err());
    }

    #[test]
    fn table_url_encodes_filters() {
        let store = SupabaseRecordStore::new("https://demo.supabase.co", "anon").unwrap();
        let url = store.table_url(
            Resource::Sessions,
            &[eq_filter("sync_code", "IRON CREW&co")],
        );
        assert_eq!(
            url,
            "https://demo.supabase.co/rest/v1/shared_sessions?sync_code=eq.IRON%20CREW%26co"
        );
    }

    #[test]
    fn empty_anon_key_is_rejected() {
        assert!(SupabaseRecordStore::new("https://demo.supabase.co", " ").is_err());
    }

    #[test]
    fn scoped_row_adds_sync_code_column() {
        let user = User::new("Sam", "/avatars/a.jpg");
        let value = serde_json::to_value(ScopedRow {
            sync_code: "SHARED",
            row: &user,
        })
        .unwrap();
        assert_eq!(value["sync_code"], "SHARED");
        assert_eq!(value["name"], "Sam");
        assert_eq!(value["id"], user.id.as_str());
    }

    #[test]
    fn parse_api_error_prefers_message() {
        let message = parse_api_error(
            StatusCode::CONFLICT,
            r#"{"message":"duplicate key value","details":null}"#,
        );
        assert_eq!(message, "duplicate key value (409)");
        assert_eq!(parse_api_error(StatusCode::BAD_GATEWAY, ""), "HTTP 502");
    }

    #[test]
    fn debug_redacts_anon_key() {
        let store = SupabaseRecordStore::new("https://demo.supabase.co", "secret-key").unwrap();
        assert!(!format!("{store:?}").contains("secret-key"));
    }
}
