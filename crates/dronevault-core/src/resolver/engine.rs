//! Secret resolution: path → vault → item → field value
//!
//! The resolver holds no per-request state. One instance can serve any number
//! of concurrent requests; each makes three sequential store calls because
//! every step needs the previous step's id.

use std::future::Future;
use std::sync::Arc;

use crate::config::ConnectConfig;
use crate::connect::{ConnectClient, ConnectError, ConnectResult, SecretBackend};
use crate::logging::Logger;
use crate::types::{CancellationToken, SecretRequest, SecretValue};
use crate::{log_debug, log_error, log_info, log_warn};
use super::error::{ResolveError, ResolveResult};
use super::path::{parse_path, SecretPath};
use super::selector::select_field;

/// Resolves secret requests against a backend
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use dronevault_core::connect::MemoryBackend;
/// use dronevault_core::logging::NoOpLogger;
/// use dronevault_core::resolver::SecretResolver;
/// use dronevault_core::types::{CancellationToken, Field, Item, SecretRequest, Vault};
///
/// # tokio_test_block_on(async {
/// let backend = MemoryBackend::new()
///     .with_vault(Vault::new("v1", "Production Vault"))
///     .with_item("v1", Item::new("i1", "Database Credentials")
///         .with_field(Field::password("password", "hunter2")));
/// let resolver = SecretResolver::new(Arc::new(backend), Arc::new(NoOpLogger));
///
/// let request = SecretRequest::new("db_password", "Production Vault/Database Credentials");
/// let secret = resolver.resolve(Some(&request), &CancellationToken::new()).await.unwrap();
/// assert_eq!(secret.data, "hunter2");
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Clone)]
pub struct SecretResolver {
    backend: Arc<dyn SecretBackend>,
    logger: Arc<dyn Logger>,
}

impl SecretResolver {
    /// Create a resolver over any backend
    pub fn new(backend: Arc<dyn SecretBackend>, logger: Arc<dyn Logger>) -> Self {
        Self { backend, logger }
    }

    /// Create a resolver talking to the REST store described by `config`
    pub fn connect(config: &ConnectConfig, logger: Arc<dyn Logger>) -> ConnectResult<Self> {
        let client = ConnectClient::new(config)?;
        Ok(Self::new(Arc::new(client), logger))
    }

    /// Name of the backend in use
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Resolve a request to a single secret value
    ///
    /// `None` stands for a request that never arrived intact. Cancelling
    /// `cancel` aborts the in-flight store call and yields
    /// `ResolveError::Cancelled`.
    pub async fn resolve(
        &self,
        request: Option<&SecretRequest>,
        cancel: &CancellationToken,
    ) -> ResolveResult<SecretValue> {
        let request = match request {
            Some(request) => request,
            None => {
                let err = ResolveError::InvalidRequest("missing request".to_string());
                log_error!(self.logger, "secret request failed: {}", err);
                return Err(err);
            }
        };
        log_info!(self.logger, "secret request received: secret={} path={}", request.name, request.path);

        match self.resolve_request(request, cancel).await {
            Ok((path, value)) => {
                log_info!(
                    self.logger,
                    "secret request succeeded: secret={} vault={} item={} field={}",
                    request.name,
                    path.vault,
                    path.item,
                    path.field
                );
                Ok(value)
            }
            Err(err) => {
                let kind = err.kind();
                if kind.is_not_found() || kind.is_ambiguous() {
                    log_warn!(
                        self.logger,
                        "secret request failed: secret={} path={} kind={} error={}",
                        request.name,
                        request.path,
                        kind,
                        err
                    );
                } else {
                    log_error!(
                        self.logger,
                        "secret request failed: secret={} path={} kind={} error={}",
                        request.name,
                        request.path,
                        kind,
                        err
                    );
                }
                Err(err)
            }
        }
    }

    async fn resolve_request(
        &self,
        request: &SecretRequest,
        cancel: &CancellationToken,
    ) -> ResolveResult<(SecretPath, SecretValue)> {
        if request.name.is_empty() {
            return Err(ResolveError::InvalidRequest(
                "secret name must not be empty".to_string(),
            ));
        }
        let path = parse_path(&request.path)?;

        let vault = until_cancelled(cancel, self.backend.find_vault_by_name(&path.vault))
            .await?
            .map_err(|e| ResolveError::vault_lookup(&path.vault, e))?;
        log_debug!(self.logger, "vault resolved: name={} id={}", path.vault, vault.id);

        let summary = until_cancelled(cancel, self.backend.find_item_by_title(&vault.id, &path.item))
            .await?
            .map_err(|e| ResolveError::item_lookup(&path.vault, &path.item, e))?;
        log_debug!(self.logger, "item resolved: title={} id={}", path.item, summary.id);

        let item = until_cancelled(cancel, self.backend.get_item(&vault.id, &summary.id))
            .await?
            .map_err(|e| ResolveError::item_fetch(&path.item, e))?;

        let value = select_field(&item, &path.field)?;
        let secret = SecretValue::new(request.name.clone(), value);
        Ok((path, secret))
    }
}

/// Race a store call against cancellation
async fn until_cancelled<T, F>(cancel: &CancellationToken, call: F) -> ResolveResult<ConnectResult<T>>
where
    F: Future<Output = ConnectResult<T>>,
{
    match cancel.run_until_cancelled(call).await {
        None | Some(Err(ConnectError::Cancelled)) => Err(ResolveError::Cancelled),
        Some(result) => Ok(result),
    }
}

impl std::fmt::Debug for SecretResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretResolver")
            .field("backend", &self.backend.name())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connect::MemoryBackend;
    use crate::logging::NoOpLogger;
    use crate::resolver::ErrorKind;
    use crate::types::{Field, Item, ItemSummary, Vault};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingLogger {
        lines: Mutex<Vec<String>>,
    }

    impl RecordingLogger {
        fn lines(&self) -> Vec<String> {
            self.lines.lock().unwrap().clone()
        }
    }

    impl Logger for RecordingLogger {
        fn debug(&self, message: &str) {
            self.lines.lock().unwrap().push(message.to_string());
        }
        fn info(&self, message: &str) {
            self.lines.lock().unwrap().push(message.to_string());
        }
        fn warn(&self, message: &str) {
            self.lines.lock().unwrap().push(message.to_string());
        }
        fn error(&self, message: &str) {
            self.lines.lock().unwrap().push(message.to_string());
        }
    }

    /// Backend whose calls never complete; counts how many were started
    #[derive(Default)]
    struct StalledBackend {
        started: AtomicUsize,
    }

    #[async_trait]
    impl SecretBackend for StalledBackend {
        fn name(&self) -> &str {
            "stalled"
        }

        async fn find_vault_by_name(&self, _name: &str) -> ConnectResult<Vault> {
            self.started.fetch_add(1, Ordering::SeqCst);
            std::future::pending().await
        }

        async fn find_item_by_title(&self, _vault_id: &str, _title: &str) -> ConnectResult<ItemSummary> {
            std::future::pending().await
        }

        async fn get_item(&self, _vault_id: &str, _item_id: &str) -> ConnectResult<Item> {
            std::future::pending().await
        }
    }

    fn production() -> MemoryBackend {
        MemoryBackend::new()
            .with_vault(Vault::new("v1", "Production Vault"))
            .with_item(
                "v1",
                Item::new("i1", "Database Credentials")
                    .with_field(Field::new("username", "admin"))
                    .with_field(Field::password("password", "hunter2"))
                    .with_field(Field::new("Token", "abc123").in_section("s1"))
                    .with_section("s1", "Service Keys"),
            )
    }

    fn resolver(backend: MemoryBackend) -> SecretResolver {
        SecretResolver::new(Arc::new(backend), Arc::new(NoOpLogger))
    }

    async fn resolve(resolver: &SecretResolver, path: &str) -> ResolveResult<SecretValue> {
        let request = SecretRequest::new("db_password", path);
        resolver.resolve(Some(&request), &CancellationToken::new()).await
    }

    #[tokio::test]
    async fn test_resolves_default_password() {
        let secret = resolve(&resolver(production()), "Production Vault/Database Credentials")
            .await
            .unwrap();
        assert_eq!(secret.name, "db_password");
        assert_eq!(secret.data, "hunter2");
        assert!(!secret.pull_request);
    }

    #[tokio::test]
    async fn test_resolves_explicit_and_section_fields() {
        let resolver = resolver(production());
        let user = resolve(&resolver, "Production Vault/Database Credentials/username").await.unwrap();
        assert_eq!(user.data, "admin");

        let token = resolve(&resolver, "Production Vault / Database Credentials / Service Keys/Token")
            .await
            .unwrap();
        assert_eq!(token.data, "abc123");
    }

    #[test]
    fn test_backend_name() {
        assert_eq!(resolver(production()).backend_name(), "memory");

        let config = ConnectConfig::new("https://connect.example.com", "token");
        let connected = SecretResolver::connect(&config, Arc::new(NoOpLogger)).unwrap();
        assert_eq!(connected.backend_name(), "connect");
    }

    #[tokio::test]
    async fn test_missing_request_and_name() {
        let resolver = resolver(production());
        let err = resolver.resolve(None, &CancellationToken::new()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);

        let request = SecretRequest::new("", "Production Vault/Database Credentials");
        let err = resolver.resolve(Some(&request), &CancellationToken::new()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }

    #[tokio::test]
    async fn test_malformed_path() {
        let err = resolve(&resolver(production()), "OnlyVault").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedPath);
    }

    #[tokio::test]
    async fn test_vault_not_found_and_ambiguous() {
        let err = resolve(&resolver(production()), "Staging/Database Credentials").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::VaultNotFound);
        assert!(err.to_string().contains("\"Staging\""));

        let twice = production().with_vault(Vault::new("v9", "Production Vault"));
        let err = resolve(&resolver(twice), "Production Vault/Database Credentials").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AmbiguousVault);
    }

    #[tokio::test]
    async fn test_item_not_found_and_ambiguous() {
        let err = resolve(&resolver(production()), "Production Vault/Nope").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ItemNotFound);
        assert!(err.to_string().contains("\"Nope\""));
        assert!(err.to_string().contains("\"Production Vault\""));

        let twice = production().with_item("v1", Item::new("i2", "Database Credentials"));
        let err = resolve(&resolver(twice), "Production Vault/Database Credentials").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AmbiguousItem);
    }

    #[tokio::test]
    async fn test_store_api_error_surfaces_status() {
        let failing = production().failing_with(429, "rate limited");
        let err = resolve(&resolver(failing), "Production Vault/Database Credentials").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StoreApi);
        assert_eq!(err.store_status(), Some((429, "rate limited")));
    }

    #[tokio::test]
    async fn test_field_errors_name_the_item() {
        let err = resolve(&resolver(production()), "Production Vault/Database Credentials/api key")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FieldNotFound);
        assert!(err.to_string().contains("\"Database Credentials\""));
    }

    #[tokio::test]
    async fn test_logs_context_but_never_the_value() {
        let logger = Arc::new(RecordingLogger::default());
        let resolver = SecretResolver::new(Arc::new(production()), logger.clone());

        resolve(&resolver, "Production Vault/Database Credentials").await.unwrap();
        resolve(&resolver, "Production Vault/Missing").await.unwrap_err();

        let lines = logger.lines();
        assert!(lines.iter().any(|l| l.contains("secret request received") && l.contains("db_password")));
        assert!(lines.iter().any(|l| l.contains("succeeded") && l.contains("vault=Production Vault")));
        assert!(lines.iter().any(|l| l.contains("failed") && l.contains("kind=item_not_found")));
        assert!(lines.iter().any(|l| l.contains("vault resolved") && l.contains("id=v1")));
        assert!(lines.iter().all(|l| !l.contains("hunter2")));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let backend = Arc::new(StalledBackend::default());
        let resolver = SecretResolver::new(backend.clone(), Arc::new(NoOpLogger));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let request = SecretRequest::new("db_password", "Production Vault/Database Credentials");
        let err = resolver.resolve(Some(&request), &cancel).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert_eq!(backend.started.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cancel_aborts_in_flight_call() {
        let backend = Arc::new(StalledBackend::default());
        let resolver = SecretResolver::new(backend.clone(), Arc::new(NoOpLogger));
        let cancel = CancellationToken::new();

        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let request = SecretRequest::new("db_password", "Production Vault/Database Credentials");
        let err = tokio::time::timeout(Duration::from_secs(5), resolver.resolve(Some(&request), &cancel))
            .await
            .expect("resolution should stop once cancelled")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert_eq!(backend.started.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_resolutions_share_one_resolver() {
        let resolver = Arc::new(resolver(production()));
        let mut handles = Vec::new();
        for i in 0..8 {
            let resolver = Arc::clone(&resolver);
            handles.push(tokio::spawn(async move {
                let request = SecretRequest::new(format!("secret_{}", i), "Production Vault/Database Credentials");
                resolver.resolve(Some(&request), &CancellationToken::new()).await
            }));
        }
        for handle in handles {
            let secret = handle.await.unwrap().unwrap();
            assert_eq!(secret.data, "hunter2");
        }
    }

    #[tokio::test]
    async fn test_resolves_through_rest_client() {
        use serde_json::json;
        use wiremock::matchers::{header, method, path, query_param};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/vaults"))
            .and(query_param("filter", "name eq \"Production Vault\""))
            .and(header("authorization", "Bearer token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "v1", "name": "Production Vault"}
            ])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/vaults/v1/items"))
            .and(query_param("filter", "title eq \"Database Credentials\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "i1", "title": "Database Credentials"}
            ])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/vaults/v1/items/i1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "i1",
                "title": "Database Credentials",
                "fields": [
                    {"id": "username", "label": "username", "value": "admin"},
                    {"id": "password", "label": "password", "value": "hunter2", "purpose": "PASSWORD", "type": "CONCEALED"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = ConnectConfig::new(server.uri(), "token");
        let resolver = SecretResolver::connect(&config, Arc::new(NoOpLogger)).unwrap();
        let secret = resolve(&resolver, "Production Vault/Database Credentials").await.unwrap();

        assert_eq!(secret.name, "db_password");
        assert_eq!(secret.data, "hunter2");
        assert!(!secret.pull_request);
    }
}
