//! Batch-in-batch: a large stream of operations flushed in fixed-size chunks

use crate::fixtures::{TestStore, test_sink};
use anyhow::Result;
use batchline_core::Value;
use batchline_executor::{BatchExecutor, BatchOptions, SessionState};
use pretty_assertions::assert_eq;
use rstest::rstest;

const UPDATE_SQL: &str = "update user set name=? where id=?";

#[rstest]
#[case::memory(TestStore::Memory)]
#[case::file(TestStore::File)]
#[tokio::test]
async fn test_batch_in_batch(#[case] store: TestStore) -> Result<()> {
    let sink = test_sink(store)?;
    let mut executor =
        BatchExecutor::prepare(sink.sink(), UPDATE_SQL, BatchOptions::new()).await?;

    let mut flush_sizes = Vec::new();
    for i in 0..100i64 {
        executor.add_params([Value::from(format!("batchInBatch{}", i)), Value::from(i)])?;
        if let Some(result) = executor.flush_if_threshold(sink.sink(), 10).await {
            assert!(result.all_succeeded());
            flush_sizes.push(result.len());
        }
        assert!(executor.len() <= 10);
    }

    assert_eq!(flush_sizes, vec![10; 10]);

    let last = executor.drain(sink.sink()).await;
    assert!(last.is_empty());
    assert_eq!(executor.state(), SessionState::Idle);
    assert_eq!(executor.stats().flushes(), 10);
    assert_eq!(executor.stats().rows_affected(), 100);
    assert_eq!(sink.count_users("name like 'batchInBatch%'")?, 100);

    Ok(())
}

#[rstest]
#[case::memory(TestStore::Memory)]
#[tokio::test]
async fn test_push_with_configured_threshold(#[case] store: TestStore) -> Result<()> {
    let sink = test_sink(store)?;
    let options = BatchOptions::new().with_max_batch_size(7);
    let mut executor = BatchExecutor::prepare(sink.sink(), UPDATE_SQL, options).await?;

    let mut flushed = 0;
    for i in 0..50i64 {
        let op = executor
            .template()
            .bind(vec![Value::from(format!("pushed{}", i)), Value::from(i)]);
        if let Some(result) = executor.push(sink.sink(), op).await? {
            assert_eq!(result.len(), 7);
            flushed += result.len();
        }
    }

    // 50 = 7 * 7 + 1
    assert_eq!(flushed, 49);
    assert_eq!(executor.len(), 1);

    let rest = executor.finish(sink.sink()).await;
    assert_eq!(rest.len(), 1);
    assert_eq!(sink.count_users("name like 'pushed%'")?, 50);

    Ok(())
}
