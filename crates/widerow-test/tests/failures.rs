//! Failure relay and batch atomicity.

use std::sync::Arc;
use std::time::Duration;

use widerow_common::{DriverConfig, ErrorCode, MAX_COLUMN_NAME_SIZE, OP_FETCH_DATA, OP_UPDATE};
use widerow_driver::{DriverError, Serializers, TimingHook, WideRowDriver};
use widerow_engine::{ColumnFamilySession, EngineError};
use widerow_test::chaos::FaultySession;
use widerow_test::utils::{
    column, driver_over, memory_engine, names, FjallFixture, TestDriver, TEST_COLUMN_FAMILY,
};

#[tokio::test]
async fn test_failed_batch_leaves_no_trace() {
    let session = Arc::new(FaultySession::new(memory_engine()));
    let driver = driver_over(Arc::clone(&session));
    let row = "atomic".to_string();

    driver
        .update(row.clone(), false, vec![], vec![column("a", "1"), column("b", "2")])
        .await
        .unwrap();

    session.fail_batches(true);
    let err = driver
        .update(
            row.clone(),
            true,
            vec!["a".to_string()],
            vec![column("c", "3"), column("d", "4")],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DriverError::Engine(EngineError::Unavailable(_))));
    assert!(err.is_retryable());
    assert_eq!(session.rejected(), 1);

    session.fail_batches(false);
    let entries = driver.fetch_data(&row, true, None, None, 10).await.unwrap();
    assert_eq!(names(&entries), vec!["a", "b"]);
}

async fn rejected_batch_is_atomic<S: ColumnFamilySession>(driver: &TestDriver<S>) {
    let row = "atomic".to_string();
    let oversized = "x".repeat(MAX_COLUMN_NAME_SIZE + 1);

    driver
        .update(row.clone(), false, vec![], vec![column("keep", "1")])
        .await
        .unwrap();
    let err = driver
        .update(
            row.clone(),
            true,
            vec![],
            vec![column("ok", "1"), column(&oversized, "2")],
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidRequest);

    let entries = driver.fetch_data(&row, true, None, None, 10).await.unwrap();
    assert_eq!(names(&entries), vec!["keep"]);
}

#[tokio::test]
async fn test_engine_rejected_batch_is_atomic() {
    rejected_batch_is_atomic(&driver_over(memory_engine())).await;

    let fixture = FjallFixture::new();
    rejected_batch_is_atomic(&fixture.driver()).await;
}

#[tokio::test]
async fn test_read_failure_is_relayed() {
    let session = Arc::new(FaultySession::new(memory_engine()));
    let driver = driver_over(Arc::clone(&session));

    session.fail_reads(true);
    let err = driver
        .fetch_data(&"r".to_string(), true, None, None, 10)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Unavailable);

    session.fail_reads(false);
    assert!(driver
        .fetch_data(&"r".to_string(), true, None, None, 10)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_unknown_column_family() {
    let driver = WideRowDriver::builder(memory_engine(), Serializers::strings())
        .column_family("missing")
        .build()
        .unwrap();

    let err = driver
        .fetch_data(&"r".to_string(), true, None, None, 10)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ColumnFamilyNotFound);

    let err = driver
        .update("r".to_string(), true, vec![], vec![])
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ColumnFamilyNotFound);
}

#[tokio::test]
async fn test_inverted_range_is_rejected_by_engine() {
    let fixture = FjallFixture::new();
    for err in [
        fixture
            .driver()
            .fetch_data(&"r".into(), true, Some("z".into()), Some("a".into()), 10)
            .await
            .unwrap_err(),
        driver_over(memory_engine())
            .fetch_data(&"r".into(), false, Some("a".into()), Some("z".into()), 10)
            .await
            .unwrap_err(),
    ] {
        assert_eq!(err.code(), ErrorCode::InvalidRange);
    }
}

#[tokio::test]
async fn test_drop_with_insert_rejected_before_engine() {
    let session = Arc::new(FaultySession::new(memory_engine()));
    let driver = WideRowDriver::builder(Arc::clone(&session), Serializers::strings())
        .config(DriverConfig::new(TEST_COLUMN_FAMILY).reject_drop_with_insert(true))
        .build()
        .unwrap();

    session.fail_batches(true);
    let err = driver
        .update("r".into(), true, vec![], vec![column("a", "1")])
        .await
        .unwrap_err();
    assert!(matches!(err, DriverError::InvalidArgument(_)));
    assert_eq!(session.rejected(), 0);
}

#[tokio::test]
async fn test_timing_hook_counts_failures() {
    let session = Arc::new(FaultySession::new(memory_engine()));
    let hook = Arc::new(TimingHook::new(Duration::from_secs(5)));
    let driver = WideRowDriver::builder(Arc::clone(&session), Serializers::strings())
        .column_family(TEST_COLUMN_FAMILY)
        .hook(Arc::clone(&hook))
        .build()
        .unwrap();

    driver
        .update("r".into(), false, vec![], vec![column("a", "1")])
        .await
        .unwrap();
    session.fail_reads(true);
    for _ in 0..3 {
        let _ = driver.fetch_data(&"r".into(), true, None, None, 1).await;
    }

    let fetch = hook.stats(OP_FETCH_DATA).unwrap();
    assert_eq!((fetch.calls, fetch.failures), (3, 3));
    let update = hook.stats(OP_UPDATE).unwrap();
    assert_eq!((update.calls, update.failures), (1, 0));
}

#[tokio::test(start_paused = true)]
async fn test_expired_columns_disappear() {
    let driver = driver_over(memory_engine());
    let row = "expiring".to_string();
    driver
        .update(
            row.clone(),
            false,
            vec![],
            vec![column("a", "1").with_ttl(10), column("b", "2")],
        )
        .await
        .unwrap();

    tokio::time::advance(Duration::from_secs(9)).await;
    let entries = driver.fetch_data(&row, true, None, None, 10).await.unwrap();
    assert_eq!(names(&entries), vec!["a", "b"]);

    tokio::time::advance(Duration::from_secs(1)).await;
    let entries = driver.fetch_data(&row, true, None, None, 1).await.unwrap();
    assert_eq!(names(&entries), vec!["b"]);
}
