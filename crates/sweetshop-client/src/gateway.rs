//! # API Gateway
//!
//! Thin HTTP wrapper over the inventory/auth API.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Inventory / Auth API                              │
//! │                                                                         │
//! │  ShopApi method        HTTP                                            │
//! │  ───────────────────   ───────────────────────────────────────────────  │
//! │  list_sweets           GET    /sweets                                  │
//! │  search_sweets         GET    /sweets/search?name&category&min&max     │
//! │  create_sweet          POST   /sweets                                  │
//! │  update_sweet          PUT    /sweets/{id}                             │
//! │  delete_sweet          DELETE /sweets/{id}                             │
//! │  restock               POST   /sweets/{id}/restock?quantity=N          │
//! │  purchase              POST   /sweets/{id}/purchase?quantity=N         │
//! │  list_accounts         GET    /auth/get                                │
//! │  update_account        PUT    /auth/update                             │
//! │                                                                         │
//! │  Every request carries `Authorization: Bearer <token>` when a session  │
//! │  exists. Nothing is retried.                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::future::Future;
use std::time::Instant;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use sweetshop_core::{AccountUpdate, SearchFilter, Sweet, SweetDraft, UserAccount};

use crate::config::ApiSettings;
use crate::error::{ClientError, ClientResult};
use crate::session::SessionHolder;

// =============================================================================
// ShopApi Trait
// =============================================================================

/// Every backend verb the storefront views use.
///
/// Views are generic over this trait so they can run against
/// [`ApiGateway`] or an in-memory implementation.
pub trait ShopApi: Send + Sync {
    fn list_sweets(&self) -> impl Future<Output = ClientResult<Vec<Sweet>>> + Send;

    /// Server-side filter. Only non-empty filter fields are sent.
    fn search_sweets(
        &self,
        filter: &SearchFilter,
    ) -> impl Future<Output = ClientResult<Vec<Sweet>>> + Send;

    fn create_sweet(&self, draft: &SweetDraft) -> impl Future<Output = ClientResult<()>> + Send;

    fn update_sweet(
        &self,
        id: &str,
        draft: &SweetDraft,
    ) -> impl Future<Output = ClientResult<()>> + Send;

    fn delete_sweet(&self, id: &str) -> impl Future<Output = ClientResult<()>> + Send;

    /// Adds `quantity` units to the stock of `id`.
    fn restock(&self, id: &str, quantity: i64) -> impl Future<Output = ClientResult<()>> + Send;

    /// Removes `quantity` units from the stock of `id`.
    fn purchase(&self, id: &str, quantity: i64)
        -> impl Future<Output = ClientResult<()>> + Send;

    /// Every account the backend knows about.
    fn list_accounts(&self) -> impl Future<Output = ClientResult<Vec<UserAccount>>> + Send;

    fn update_account(
        &self,
        update: &AccountUpdate,
    ) -> impl Future<Output = ClientResult<UserAccount>> + Send;

    /// The account belonging to `email`.
    ///
    /// The API has no "who am I" endpoint, so this scans the full listing.
    fn account_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = ClientResult<UserAccount>> + Send {
        async move {
            self.list_accounts()
                .await?
                .into_iter()
                .find(|account| account.email == email)
                .ok_or(ClientError::AccountNotFound)
        }
    }
}

// =============================================================================
// HTTP Gateway
// =============================================================================

/// [`ShopApi`] over reqwest.
#[derive(Debug, Clone)]
pub struct ApiGateway {
    http: Client,
    base_url: Url,
    session: SessionHolder,
}

impl ApiGateway {
    /// Creates a gateway for `settings.base_url`, reading the bearer token
    /// from `session` on every request.
    pub fn new(settings: &ApiSettings, session: SessionHolder) -> ClientResult<Self> {
        let base_url = Url::parse(&settings.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(settings.base_url.clone()));
        }

        let http = Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| ClientError::InvalidConfig(e.to_string()))?;

        Ok(ApiGateway {
            http,
            base_url,
            session,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends path segments to the base URL, percent-encoding each.
    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn request(&self, method: Method, segments: &[&str]) -> ClientResult<RequestBuilder> {
        let url = self.endpoint(segments)?;
        debug!(%method, path = url.path(), "API request");

        let mut builder = self.http.request(method, url);
        if let Some(token) = self.session.token().await {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    /// Sends the request and returns the response if its status is a success.
    async fn dispatch(&self, builder: RequestBuilder) -> ClientResult<Response> {
        let start = Instant::now();
        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, "API request failed before a response");
            ClientError::Transport(e.to_string())
        })?;

        let status = response.status();
        debug!(
            status = status.as_u16(),
            path = response.url().path(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "API response"
        );

        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let message = error_message(&body);
        warn!(status = status.as_u16(), message = ?message, "API returned an error");

        Err(ClientError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let response = self.dispatch(builder).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn execute(&self, builder: RequestBuilder) -> ClientResult<()> {
        self.dispatch(builder).await.map(drop)
    }
}

/// Pulls `message` (preferred) or `error` out of a JSON error body.
fn error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    ["message", "error"]
        .into_iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .filter(|msg| !msg.is_empty())
        .map(str::to_string)
}

impl ShopApi for ApiGateway {
    async fn list_sweets(&self) -> ClientResult<Vec<Sweet>> {
        let req = self.request(Method::GET, &["sweets"]).await?;
        self.fetch(req).await
    }

    async fn search_sweets(&self, filter: &SearchFilter) -> ClientResult<Vec<Sweet>> {
        let req = self
            .request(Method::GET, &["sweets", "search"])
            .await?
            .query(&filter.query_pairs());
        self.fetch(req).await
    }

    async fn create_sweet(&self, draft: &SweetDraft) -> ClientResult<()> {
        let req = self.request(Method::POST, &["sweets"]).await?.json(draft);
        self.execute(req).await
    }

    async fn update_sweet(&self, id: &str, draft: &SweetDraft) -> ClientResult<()> {
        let req = self.request(Method::PUT, &["sweets", id]).await?.json(draft);
        self.execute(req).await
    }

    async fn delete_sweet(&self, id: &str) -> ClientResult<()> {
        let req = self.request(Method::DELETE, &["sweets", id]).await?;
        self.execute(req).await
    }

    async fn restock(&self, id: &str, quantity: i64) -> ClientResult<()> {
        let req = self
            .request(Method::POST, &["sweets", id, "restock"])
            .await?
            .query(&[("quantity", quantity)]);
        self.execute(req).await
    }

    async fn purchase(&self, id: &str, quantity: i64) -> ClientResult<()> {
        let req = self
            .request(Method::POST, &["sweets", id, "purchase"])
            .await?
            .query(&[("quantity", quantity)]);
        self.execute(req).await
    }

    /// Records that fail to decode (an unknown role, say) are skipped so one
    /// bad account cannot hide every other one.
    async fn list_accounts(&self) -> ClientResult<Vec<UserAccount>> {
        let req = self.request(Method::GET, &["auth", "get"]).await?;
        let records: Vec<Value> = self.fetch(req).await?;
        let total = records.len();

        let accounts: Vec<UserAccount> = records
            .into_iter()
            .filter_map(|record| {
                let id = record.get("id").cloned();
                serde_json::from_value(record)
                    .inspect_err(|e| warn!(id = ?id, error = %e, "Skipping undecodable account"))
                    .ok()
            })
            .collect();

        debug!(total = total, kept = accounts.len(), "Accounts decoded");
        Ok(accounts)
    }

    async fn update_account(&self, update: &AccountUpdate) -> ClientResult<UserAccount> {
        let req = self.request(Method::PUT, &["auth", "update"]).await?.json(update);
        self.fetch(req).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, RawQuery, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post, put};
    use axum::{Json, Router};
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use sweetshop_core::{Money, Role, Session};

    /// Every request the fake backend saw, as "METHOD path?query".
    type Seen = Arc<Mutex<Vec<String>>>;

    #[derive(Clone)]
    struct Backend {
        seen: Seen,
        auth: Arc<Mutex<Vec<Option<String>>>>,
    }

    impl Backend {
        fn record(&self, line: String, headers: &HeaderMap) {
            self.seen.lock().unwrap().push(line);
            self.auth.lock().unwrap().push(
                headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string),
            );
        }
    }

    fn sweets_json() -> serde_json::Value {
        json!([
            {"id": 1, "name": "Dark Truffle", "category": "Chocolate", "price": 45.5, "quantity": 12},
            {"id": "2", "name": "Jalebi", "category": "Traditional", "price": 20, "quantity": 3,
             "description": "Crisp"}
        ])
    }

    fn accounts_json() -> serde_json::Value {
        json!([
            {"id": "u1", "email": "admin@example.com", "role": "ADMIN", "enabled": true},
            {"id": "u2", "username": "asha", "email": "asha@example.com", "role": "USER",
             "enabled": true, "_class": "com.sweetshop.model.User"},
            {"id": "u3", "email": "root@example.com", "role": "SUPERUSER", "enabled": true}
        ])
    }

    fn router(backend: Backend) -> Router {
        Router::new()
            .route(
                "/api/sweets",
                get(|State(b): State<Backend>, headers: HeaderMap| async move {
                    b.record("GET /sweets".into(), &headers);
                    Json(sweets_json())
                })
                .post(|State(b): State<Backend>, headers: HeaderMap, Json(body): Json<serde_json::Value>| async move {
                    b.record(format!("POST /sweets {}", body["price"]), &headers);
                    (StatusCode::CREATED, Json(body))
                }),
            )
            .route(
                "/api/sweets/search",
                get(|State(b): State<Backend>, headers: HeaderMap, RawQuery(q): RawQuery| async move {
                    b.record(format!("GET /sweets/search?{}", q.unwrap_or_default()), &headers);
                    Json(json!([]))
                }),
            )
            .route(
                "/api/sweets/{id}",
                put(|State(b): State<Backend>, headers: HeaderMap, Path(id): Path<String>| async move {
                    b.record(format!("PUT /sweets/{}", id), &headers);
                    StatusCode::OK
                })
                .delete(|State(b): State<Backend>, headers: HeaderMap, Path(id): Path<String>| async move {
                    b.record(format!("DELETE /sweets/{}", id), &headers);
                    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
                }),
            )
            .route(
                "/api/sweets/{id}/restock",
                post(|State(b): State<Backend>, headers: HeaderMap, Path(id): Path<String>, RawQuery(q): RawQuery| async move {
                    b.record(format!("POST /sweets/{}/restock?{}", id, q.unwrap_or_default()), &headers);
                    StatusCode::OK
                }),
            )
            .route(
                "/api/sweets/{id}/purchase",
                post(|State(b): State<Backend>, headers: HeaderMap, Path(id): Path<String>| async move {
                    b.record(format!("POST /sweets/{}/purchase", id), &headers);
                    (StatusCode::BAD_REQUEST, Json(json!({"message": "Insufficient stock"})))
                }),
            )
            .route(
                "/api/auth/get",
                get(|State(b): State<Backend>, headers: HeaderMap| async move {
                    b.record("GET /auth/get".into(), &headers);
                    Json(accounts_json())
                }),
            )
            .route(
                "/api/auth/update",
                put(|State(b): State<Backend>, headers: HeaderMap, Json(body): Json<serde_json::Value>| async move {
                    b.record("PUT /auth/update".into(), &headers);
                    if body.get("password").is_some_and(|p| p == "forbidden") {
                        return (StatusCode::BAD_REQUEST, Json(json!({"error": "Password rejected"})));
                    }
                    (StatusCode::OK, Json(body))
                }),
            )
            .with_state(backend)
    }

    async fn spawn_backend() -> (String, Backend) {
        let backend = Backend {
            seen: Arc::default(),
            auth: Arc::default(),
        };
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(backend.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}/api", addr), backend)
    }

    fn gateway(base_url: String, session: SessionHolder) -> ApiGateway {
        let settings = ApiSettings {
            base_url,
            timeout_secs: 5,
        };
        ApiGateway::new(&settings, session).unwrap()
    }

    fn signed_in() -> SessionHolder {
        SessionHolder::with_session(Session::new(
            "u2",
            "asha@example.com",
            Role::User,
            "test-token",
        ))
    }

    #[tokio::test]
    async fn test_list_sweets_sends_bearer_and_decodes() {
        let (url, backend) = spawn_backend().await;
        let api = gateway(url, signed_in());

        let sweets = api.list_sweets().await.unwrap();
        assert_eq!(sweets.len(), 2);
        assert_eq!(sweets[0].id, "1");
        assert_eq!(sweets[0].price, Money::from_minor(4550));
        assert_eq!(sweets[1].description.as_deref(), Some("Crisp"));

        let auth = backend.auth.lock().unwrap().clone();
        assert_eq!(auth, vec![Some("Bearer test-token".to_string())]);
    }

    #[tokio::test]
    async fn test_no_session_sends_no_authorization() {
        let (url, backend) = spawn_backend().await;
        let api = gateway(url, SessionHolder::new());

        api.list_sweets().await.unwrap();
        assert_eq!(backend.auth.lock().unwrap().clone(), vec![None]);
    }

    #[tokio::test]
    async fn test_search_sends_only_filled_fields() {
        let (url, backend) = spawn_backend().await;
        let api = gateway(url, signed_in());

        let filter = SearchFilter::default().with_category("Chocolate");
        api.search_sweets(&filter).await.unwrap();

        let seen = backend.seen.lock().unwrap().clone();
        assert_eq!(seen, vec!["GET /sweets/search?category=Chocolate".to_string()]);
    }

    #[tokio::test]
    async fn test_mutations_hit_expected_paths() {
        let (url, backend) = spawn_backend().await;
        let api = gateway(url, signed_in());

        let draft = SweetDraft {
            name: "Peda".into(),
            category: "Milk".into(),
            price: Money::from_minor(1250),
            quantity: 10,
            description: None,
        };
        api.create_sweet(&draft).await.unwrap();
        api.update_sweet("7", &draft).await.unwrap();
        api.restock("7", 25).await.unwrap();

        let seen = backend.seen.lock().unwrap().clone();
        assert_eq!(
            seen,
            vec![
                "POST /sweets 12.5".to_string(),
                "PUT /sweets/7".to_string(),
                "POST /sweets/7/restock?quantity=25".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_error_body_message_is_extracted() {
        let (url, _backend) = spawn_backend().await;
        let api = gateway(url, signed_in());

        let err = api.purchase("7", 1).await.unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 400, .. }));
        assert_eq!(err.server_message(), Some("Insufficient stock"));

        // Plain-text bodies carry no message
        let err = api.delete_sweet("7").await.unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 500, message: None }));
    }

    #[tokio::test]
    async fn test_account_lookup_and_update() {
        let (url, _backend) = spawn_backend().await;
        let api = gateway(url, signed_in());

        let account = api.account_by_email("asha@example.com").await.unwrap();
        assert_eq!(account.id, "u2");

        let missing = api.account_by_email("nobody@example.com").await.unwrap_err();
        assert!(matches!(missing, ClientError::AccountNotFound));

        let update = AccountUpdate::from_account(&account, "Asha K", None);
        let updated = api.update_account(&update).await.unwrap();
        assert_eq!(updated.username.as_deref(), Some("Asha K"));
        assert_eq!(updated.class.as_deref(), Some("com.sweetshop.model.User"));

        let rejected = AccountUpdate::from_account(&account, "", Some("forbidden".into()));
        let err = api.update_account(&rejected).await.unwrap_err();
        assert_eq!(err.server_message(), Some("Password rejected"));
    }

    #[tokio::test]
    async fn test_account_with_unknown_role_is_skipped() {
        let (url, _backend) = spawn_backend().await;
        let api = gateway(url, signed_in());

        let accounts = api.list_accounts().await.unwrap();
        let ids: Vec<&str> = accounts.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["u1", "u2"]);

        let account = api.account_by_email("asha@example.com").await.unwrap();
        assert_eq!(account.role, Role::User);
        let missing = api.account_by_email("root@example.com").await.unwrap_err();
        assert!(matches!(missing, ClientError::AccountNotFound));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = gateway(format!("http://{}/api", addr), SessionHolder::new());
        let err = api.list_sweets().await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let api = gateway("http://localhost:8081/api/".into(), SessionHolder::new());
        let url = api.endpoint(&["sweets", "a b/c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8081/api/sweets/a%20b%2Fc");
    }

    #[test]
    fn test_error_message_prefers_message_field() {
        assert_eq!(
            error_message(br#"{"message": "m", "error": "e"}"#).as_deref(),
            Some("m")
        );
        assert_eq!(error_message(br#"{"error": "e"}"#).as_deref(), Some("e"));
        assert_eq!(error_message(b"not json"), None);
        assert_eq!(error_message(br#"{"message": ""}"#), None);
    }
}
