// tests/support/fixtures.rs
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use verification_codes::application::dto::{AuthorizationContext, ChallengeMethod, GrantSubject};
use verification_codes::application::ports::code_generator::CodeGenerator;
use verification_codes::application::ports::persistence::VerificationCodeBackend;
use verification_codes::infrastructure::database::init_sqlite_pool;
use verification_codes::infrastructure::persistence::{
    CodeSchema, InMemoryVerificationCodeBackend, SqliteVerificationCodeBackend,
};
use verification_codes::infrastructure::security::RandomCodeGenerator;
use verification_codes::VerificationCodeService;

/// The minimal grant used in the README-style scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleGrant {
    pub user: String,
    pub scopes: Vec<String>,
}

pub fn alice() -> SimpleGrant {
    SimpleGrant {
        user: "alice".into(),
        scopes: vec!["read".into()],
    }
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub fn authorization_context() -> AuthorizationContext {
    AuthorizationContext::new(
        GrantSubject {
            user_id: 42,
            username: "alice".into(),
        },
        "mobile-app",
        fixed_now(),
    )
    .with_redirect_uri("https://app.example.com/callback")
    .with_scopes(["read", "write"])
    .with_code_challenge("E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM", ChallengeMethod::S256)
    .with_extension("nonce", "n-0S6_WzA2Mj")
    .with_extension("acr", "urn:mace:incommon:iap:silver")
}

pub fn service_with(
    generator: Arc<dyn CodeGenerator>,
    backend: Arc<dyn VerificationCodeBackend>,
) -> VerificationCodeService {
    VerificationCodeService::new(generator, backend)
}

pub fn memory_service() -> VerificationCodeService {
    service_with(
        Arc::new(RandomCodeGenerator::default()),
        Arc::new(InMemoryVerificationCodeBackend::new()),
    )
}

pub async fn sqlite_backend(schema: &CodeSchema) -> SqliteVerificationCodeBackend {
    let pool = init_sqlite_pool("sqlite::memory:", 1)
        .await
        .expect("open in-memory sqlite");
    let backend = SqliteVerificationCodeBackend::new(pool, schema);
    backend.ensure_schema().await.expect("create code table");
    backend
}

pub async fn sqlite_service() -> VerificationCodeService {
    service_with(
        Arc::new(RandomCodeGenerator::default()),
        Arc::new(sqlite_backend(&CodeSchema::default()).await),
    )
}

/// A SQLite database file under the temp dir. The file and its WAL side files
/// are removed on drop.
pub struct TempSqliteFile {
    path: PathBuf,
}

impl TempSqliteFile {
    pub fn new(label: &str) -> Self {
        static NEXT: AtomicUsize = AtomicUsize::new(0);
        let n = NEXT.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "verification-codes-{label}-{}-{n}.db",
            std::process::id()
        ));
        let file = Self { path };
        file.remove();
        file
    }

    pub fn url(&self) -> String {
        format!("sqlite://{}", self.path.display())
    }

    fn remove(&self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut path = self.path.clone().into_os_string();
            path.push(suffix);
            let _ = std::fs::remove_file(path);
        }
    }
}

impl Drop for TempSqliteFile {
    fn drop(&mut self) {
        self.remove();
    }
}

/// Service over a file-backed SQLite pool, so concurrent consumers run on
/// separate connections.
pub async fn file_sqlite_service(file: &TempSqliteFile, connections: u32) -> VerificationCodeService {
    let pool = init_sqlite_pool(&file.url(), connections)
        .await
        .expect("open sqlite file");
    let backend = SqliteVerificationCodeBackend::new(pool, &CodeSchema::default());
    backend.ensure_schema().await.expect("create code table");
    service_with(Arc::new(RandomCodeGenerator::default()), Arc::new(backend))
}
