#![allow(dead_code)]

use async_trait::async_trait;
use axum::routing::{get, post};
use axum::{Router, middleware};
use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use shorturl::api;
use shorturl::api::handlers::{health_handler, redirect_handler, shorten_handler};
use shorturl::api::middleware::auth;
use shorturl::application::services::auth_service::hash_token;
use shorturl::prelude::*;

pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const ALICE_TOKEN: &str = "alice-token-0123456789";
pub const BOB_TOKEN: &str = "bob-token-0123456789";
pub const REVOKED_TOKEN: &str = "revoked-token-0123456789";
pub const BASE_URL: &str = "https://s.example.com";

/// In-memory link store honouring the same uniqueness and expiry rules as
/// the PostgreSQL repository. Counts calls so tests can tell cache hits from
/// store round trips.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    links: Mutex<HashMap<String, Link>>,
    next_id: AtomicI64,
    pub availability_checks: AtomicUsize,
    pub lookups: AtomicUsize,
    pub inserts: AtomicUsize,
    pub fail_ping: AtomicBool,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_live(link: &Link, now: DateTime<Utc>) -> bool {
        !link.is_expired_at(now)
    }

    /// Moves a stored link's expiry, e.g. into the past.
    pub fn set_expires_at(&self, code: &str, expires_at: Option<DateTime<Utc>>) {
        let mut links = self.links.lock().unwrap();
        if let Some(link) = links.get_mut(code) {
            link.expires_at = expires_at;
        }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.links.lock().unwrap().contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.links.lock().unwrap().len()
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn is_code_available(&self, code: &str) -> Result<bool, AppError> {
        self.availability_checks.fetch_add(1, Ordering::SeqCst);
        let links = self.links.lock().unwrap();
        Ok(!links
            .get(code)
            .is_some_and(|link| Self::is_live(link, Utc::now())))
    }

    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        let mut links = self.links.lock().unwrap();
        let now = Utc::now();

        if let Some(existing) = links.get(&new_link.code) {
            if Self::is_live(existing, now) {
                return Err(AppError::conflict(
                    "Unique constraint violation",
                    json!({ "constraint": "links_code_key" }),
                ));
            }
            links.remove(&new_link.code);
        }

        let link = Link {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            code: new_link.code,
            original_url: new_link.original_url,
            is_custom: new_link.is_custom,
            expires_at: new_link.expires_at,
            created_by: new_link.created_by,
            created_at: now,
        };
        links.insert(link.code.clone(), link.clone());

        Ok(link)
    }

    async fn get_by_code(&self, code: &str) -> Result<Link, AppError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.links
            .lock()
            .unwrap()
            .get(code)
            .cloned()
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))
    }

    async fn list_by_owner(
        &self,
        owner: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Link>, AppError> {
        let links = self.links.lock().unwrap();
        let mut owned: Vec<Link> = links
            .values()
            .filter(|link| link.is_owned_by(owner))
            .cloned()
            .collect();
        owned.sort_by_key(|link| (link.created_at, link.id));

        Ok(owned
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn delete_by_id(&self, id: i64, owner: &str) -> Result<(), AppError> {
        let mut links = self.links.lock().unwrap();
        let code = links
            .values()
            .find(|link| link.id == id && link.is_owned_by(owner))
            .map(|link| link.code.clone())
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))?;
        links.remove(&code);
        Ok(())
    }

    async fn sweep_expired(&self) -> Result<u64, AppError> {
        let mut links = self.links.lock().unwrap();
        let now = Utc::now();
        let before = links.len();
        links.retain(|_, link| Self::is_live(link, now));
        Ok((before - links.len()) as u64)
    }

    async fn ping(&self) -> Result<(), AppError> {
        if self.fail_ping.load(Ordering::SeqCst) {
            return Err(AppError::Store("connection refused".to_string()));
        }
        Ok(())
    }
}

/// In-memory cache applying the production TTL policy; records the TTL of
/// every write. Entries never lapse on their own.
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, (Link, std::time::Duration)>>,
    ttl_policy: TtlPolicy,
    pub fail: AtomicBool,
    pub writes: AtomicUsize,
}

impl InMemoryCache {
    pub fn new(average_ttl: std::time::Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl_policy: TtlPolicy::new(average_ttl),
            fail: AtomicBool::new(false),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn ttl_of(&self, code: &str) -> Option<std::time::Duration> {
        self.entries.lock().unwrap().get(code).map(|(_, ttl)| *ttl)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.lock().unwrap().contains_key(code)
    }

    pub fn evict(&self, code: &str) {
        self.entries.lock().unwrap().remove(code);
    }

    fn check_failure(&self) -> CacheResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(CacheError::ConnectionError("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheService for InMemoryCache {
    async fn get(&self, code: &str) -> CacheResult<Option<Link>> {
        self.check_failure()?;
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(code)
            .map(|(link, _)| link.clone()))
    }

    async fn put(&self, link: &Link) -> CacheResult<()> {
        self.check_failure()?;
        self.writes.fetch_add(1, Ordering::SeqCst);

        if let Some(ttl) = self.ttl_policy.ttl_for(link, Utc::now()) {
            self.entries
                .lock()
                .unwrap()
                .insert(link.code.clone(), (link.clone(), ttl));
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        !self.fail.load(Ordering::SeqCst)
    }
}

/// In-memory token store keyed by token hash.
#[derive(Default)]
pub struct InMemoryTokenRepository {
    tokens: Mutex<Vec<ApiToken>>,
}

impl InMemoryTokenRepository {
    pub fn with_tokens(entries: &[(&str, &str, bool)]) -> Self {
        let tokens = entries
            .iter()
            .enumerate()
            .map(|(i, (name, raw, revoked))| ApiToken {
                id: i as i64 + 1,
                name: name.to_string(),
                token_hash: hash_token(SIGNING_SECRET, raw).unwrap(),
                created_at: Utc::now(),
                last_used_at: None,
                revoked_at: revoked.then(Utc::now),
            })
            .collect();
        Self {
            tokens: Mutex::new(tokens),
        }
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn find_active_owner(&self, token_hash: &str) -> Result<Option<String>, AppError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.token_hash == token_hash && t.revoked_at.is_none())
            .map(|t| t.name.clone()))
    }

    async fn update_last_used(&self, token_hash: &str) -> Result<(), AppError> {
        if let Some(t) = self
            .tokens
            .lock()
            .unwrap()
            .iter_mut()
            .find(|t| t.token_hash == token_hash)
        {
            t.last_used_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn create_token(&self, name: &str, token_hash: &str) -> Result<ApiToken, AppError> {
        let mut tokens = self.tokens.lock().unwrap();
        let token = ApiToken {
            id: tokens.len() as i64 + 1,
            name: name.to_string(),
            token_hash: token_hash.to_string(),
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at: None,
        };
        tokens.push(token.clone());
        Ok(token)
    }

    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError> {
        Ok(self.tokens.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ApiToken>, AppError> {
        Ok(self.tokens.lock().unwrap().iter().find(|t| t.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, AppError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.name == name)
            .cloned())
    }

    async fn revoke_token(&self, id: i64) -> Result<(), AppError> {
        let mut tokens = self.tokens.lock().unwrap();
        match tokens.iter_mut().find(|t| t.id == id && t.revoked_at.is_none()) {
            Some(t) => {
                t.revoked_at = Some(Utc::now());
                Ok(())
            }
            None => Err(AppError::not_found("Token not found", json!({ "id": id }))),
        }
    }
}

/// Hands out a fixed sequence of codes, then repeats the last one.
pub struct SequenceCodeGenerator {
    codes: Vec<String>,
    next: AtomicUsize,
}

impl SequenceCodeGenerator {
    pub fn new(codes: &[&str]) -> Self {
        Self {
            codes: codes.iter().map(|c| c.to_string()).collect(),
            next: AtomicUsize::new(0),
        }
    }
}

impl CodeGenerator for SequenceCodeGenerator {
    fn generate(&self) -> String {
        let i = self.next.fetch_add(1, Ordering::SeqCst);
        self.codes[i.min(self.codes.len() - 1)].clone()
    }
}

/// Everything a test needs to drive and inspect the service.
pub struct TestContext {
    pub links: Arc<InMemoryLinkRepository>,
    pub cache: Arc<InMemoryCache>,
    pub service: Arc<LinkService<dyn LinkRepository, dyn CacheService>>,
    pub state: AppState,
}

pub struct TestContextBuilder {
    code_generator: Arc<dyn CodeGenerator>,
    default_lifetime: Option<Duration>,
    cache_ttl: std::time::Duration,
}

impl Default for TestContextBuilder {
    fn default() -> Self {
        Self {
            code_generator: Arc::new(RandomCodeGenerator::new(6)),
            default_lifetime: None,
            cache_ttl: std::time::Duration::from_secs(3600),
        }
    }
}

impl TestContextBuilder {
    pub fn code_generator(mut self, generator: impl CodeGenerator + 'static) -> Self {
        self.code_generator = Arc::new(generator);
        self
    }

    pub fn default_lifetime(mut self, lifetime: Duration) -> Self {
        self.default_lifetime = Some(lifetime);
        self
    }

    pub fn cache_ttl(mut self, ttl: std::time::Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn build(self) -> TestContext {
        let links = Arc::new(InMemoryLinkRepository::new());
        let cache = Arc::new(InMemoryCache::new(self.cache_ttl));
        let tokens: Arc<dyn TokenRepository> = Arc::new(InMemoryTokenRepository::with_tokens(&[
            ("alice", ALICE_TOKEN, false),
            ("bob", BOB_TOKEN, false),
            ("mallory", REVOKED_TOKEN, true),
        ]));

        let link_repository: Arc<dyn LinkRepository> = links.clone();
        let cache_service: Arc<dyn CacheService> = cache.clone();

        let service = Arc::new(LinkService::new(
            link_repository,
            cache_service,
            self.code_generator,
            LinkSettings {
                base_url: BASE_URL.to_string(),
                default_lifetime: self.default_lifetime,
            },
        ));
        let auth_service = Arc::new(AuthService::new(tokens, SIGNING_SECRET.to_string()));

        TestContext {
            links,
            cache,
            service: service.clone(),
            state: AppState::new(service, auth_service),
        }
    }
}

pub fn context() -> TestContext {
    TestContextBuilder::default().build()
}

/// Router with the same routes and middleware as production, minus path
/// normalization and request tracing.
pub fn router(state: AppState) -> Router {
    let api_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    Router::new()
        .route("/health", get(health_handler))
        .route("/shorten", post(shorten_handler))
        .route("/{code}", get(redirect_handler))
        .nest("/api", api_router)
        .with_state(state)
}
