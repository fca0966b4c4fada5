//! The no-op vs. not-supported split of the standard statement surface is a
//! fixed contract; conformance suites probe it directly.

use std::sync::Arc;

use cratedb_client::prelude::*;
use cratedb_client::test_utils::{MockTransport, columns};
use serde_json::json;

fn fresh_statement() -> (Arc<MockTransport>, Connection, Statement) {
    let transport = Arc::new(MockTransport::new());
    let conn = Connection::new(transport.clone(), "doc");
    let stmt = conn.create_statement().expect("statement");
    (transport, conn, stmt)
}

#[test]
fn test4_no_ops_never_raise_and_never_change_behavior() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let (transport, _conn, stmt) = fresh_statement();
        transport.push_rows(columns(&[("a", SqlType::Integer)]), vec![vec![json!(1)]]);

        stmt.set_escape_processing(false)?;
        stmt.set_cursor_name("ignored")?;
        stmt.clear_warnings()?;
        stmt.set_max_rows(1)?; // silent no-op, deliberately not enforced

        assert_eq!(stmt.warnings()?, None);
        assert_eq!(stmt.max_rows()?, 0);
        assert_eq!(stmt.max_field_size()?, 0);
        assert_eq!(stmt.query_timeout()?, 0);
        assert!(!stmt.more_results()?);
        assert_eq!(stmt.fetch_direction()?, FetchDirection::Forward);
        assert_eq!(stmt.fetch_size()?, 0);
        assert_eq!(stmt.result_set_type()?, ResultSetType::ForwardOnly);
        assert_eq!(
            stmt.result_set_concurrency()?,
            ResultSetConcurrency::ReadOnly
        );
        assert_eq!(
            stmt.result_set_holdability()?,
            ResultSetHoldability::HoldCursorsOverCommit
        );
        assert!(!stmt.is_poolable()?);
        assert!(stmt.is_close_on_completion()?);

        // set_max_rows(1) must not truncate the result.
        let cursor = stmt.execute_query("select a from t").await?;
        assert!(cursor.advance()?);
        Ok::<(), DriverError>(())
    })?;
    Ok(())
}

#[test]
fn test4_unsupported_methods_raise_deterministically() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        // Probed before any execution ever happened on the statement.
        let (transport, _conn, stmt) = fresh_statement();

        assert!(matches!(
            stmt.set_max_field_size(1024),
            Err(DriverError::Unsupported(_))
        ));
        assert!(matches!(
            stmt.set_query_timeout(30),
            Err(DriverError::Unsupported(_))
        ));
        assert!(matches!(stmt.cancel(), Err(DriverError::Unsupported(_))));
        assert!(matches!(
            stmt.set_fetch_direction(FetchDirection::Forward),
            Err(DriverError::Unsupported(_))
        ));
        assert!(matches!(
            stmt.set_fetch_size(500),
            Err(DriverError::Unsupported(_))
        ));
        assert!(matches!(
            stmt.more_results_then(),
            Err(DriverError::Unsupported(_))
        ));
        assert!(matches!(
            stmt.generated_keys(),
            Err(DriverError::Unsupported(_))
        ));
        assert!(matches!(
            stmt.set_poolable(true),
            Err(DriverError::Unsupported(_))
        ));
        assert!(matches!(
            stmt.execute_returning_keys("insert into t values (1)", KeyRetrieval::GeneratedKeys)
                .await,
            Err(DriverError::Unsupported(_))
        ));
        assert!(matches!(
            stmt.execute_update_returning_keys(
                "insert into t values (1)",
                KeyRetrieval::ColumnNames(vec!["a".into()])
            )
            .await,
            Err(DriverError::Unsupported(_))
        ));

        // None of the rejected calls reached the transport.
        assert_eq!(transport.call_count(), 0);
        Ok::<(), DriverError>(())
    })?;
    Ok(())
}

#[test]
fn test4_closed_check_precedes_unsupported_check() -> Result<(), Box<dyn std::error::Error>> {
    let (_transport, _conn, stmt) = fresh_statement();
    stmt.close();

    // cancel on a closed statement reports Closed, not Unsupported.
    assert!(matches!(stmt.cancel(), Err(DriverError::Closed(_))));
    assert!(matches!(
        stmt.generated_keys(),
        Err(DriverError::Closed(_))
    ));
    assert!(matches!(
        stmt.more_results_then(),
        Err(DriverError::Closed(_))
    ));
    // The no-op surface stays callable even after close.
    stmt.clear_warnings()?;
    stmt.set_max_rows(5)?;
    Ok(())
}

#[test]
fn test4_result_set_handle_matches_last_execution() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let (transport, _conn, stmt) = fresh_statement();
        transport.push_row_count(0);
        transport.push_rows(columns(&[("a", SqlType::Integer)]), vec![vec![json!(9)]]);

        stmt.execute("create table t (a int)").await?;
        assert!(stmt.result_set()?.is_none());

        let outcome = stmt.execute("select a from t").await?;
        assert!(outcome.is_rows());
        let open = stmt.result_set()?.expect("cursor after row result");
        assert!(open.advance()?);
        assert_eq!(open.get_i64(1)?, Some(9));
        Ok::<(), DriverError>(())
    })?;
    Ok(())
}
