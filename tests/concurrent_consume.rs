use std::sync::Arc;

use verification_codes::VerificationCodeService;
use verification_codes::application::error::ApplicationError;

mod support;

use support::{
    SimpleGrant, TempSqliteFile, alice, file_sqlite_service, memory_service, sqlite_service,
};

const CONSUMERS: usize = 32;

/// Race `CONSUMERS` tasks on one code and return (successes, invalid-code failures).
async fn race(service: VerificationCodeService) -> (usize, usize) {
    let code = service.store(&alice()).await.expect("store context");
    let code: Arc<str> = Arc::from(code.as_str());

    let mut handles = Vec::with_capacity(CONSUMERS);
    for _ in 0..CONSUMERS {
        let service = service.clone();
        let code = Arc::clone(&code);
        handles.push(tokio::spawn(async move {
            service.consume::<SimpleGrant>(&code).await
        }));
    }

    let mut won = 0;
    let mut lost = 0;
    for handle in handles {
        match handle.await.expect("consumer task panicked") {
            Ok(grant) => {
                assert_eq!(grant, alice());
                won += 1;
            }
            Err(ApplicationError::InvalidCode) => lost += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    (won, lost)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn exactly_one_concurrent_consumer_wins_in_memory() {
    let (won, lost) = race(memory_service()).await;
    assert_eq!(won, 1);
    assert_eq!(lost, CONSUMERS - 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn exactly_one_concurrent_consumer_wins_on_sqlite() {
    let (won, lost) = race(sqlite_service().await).await;
    assert_eq!(won, 1);
    assert_eq!(lost, CONSUMERS - 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn exactly_one_consumer_wins_across_sqlite_connections() {
    let file = TempSqliteFile::new("race");
    let service = file_sqlite_service(&file, 8).await;

    for _ in 0..10 {
        let (won, lost) = race(service.clone()).await;
        assert_eq!(won, 1);
        assert_eq!(lost, CONSUMERS - 1);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn independent_codes_do_not_interfere() {
    let service = memory_service();
    let mut codes = Vec::new();
    for i in 0..16 {
        let grant = SimpleGrant {
            user: format!("user-{i}"),
            scopes: vec!["read".into()],
        };
        codes.push((service.store(&grant).await.unwrap(), grant));
    }

    let mut handles = Vec::new();
    for (code, grant) in codes {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            let restored: SimpleGrant = service.consume(code.as_str()).await.unwrap();
            assert_eq!(restored, grant);
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }
}
