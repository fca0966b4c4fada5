use std::sync::Arc;

use chrono::NaiveDate;
use cratedb_client::prelude::*;
use cratedb_client::test_utils::{MockTransport, columns};
use serde_json::json;

#[test]
fn test2_binding_mismatch_fails_before_any_network_call() -> Result<(), Box<dyn std::error::Error>>
{
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let transport = Arc::new(MockTransport::new());
        let conn = Connection::new(transport.clone(), "doc");

        let pstmt = conn.prepare("select * from t where a = ?")?;
        assert_eq!(pstmt.placeholder_count(), 1);

        match pstmt.execute(&[]).await {
            Err(DriverError::ParameterMismatch { expected, supplied }) => {
                assert_eq!(expected, 1);
                assert_eq!(supplied, 0);
            }
            other => panic!("expected binding mismatch, got {other:?}"),
        }
        assert!(matches!(
            pstmt.execute(&[SqlValue::Int(1), SqlValue::Int(2)]).await,
            Err(DriverError::ParameterMismatch { .. })
        ));
        assert_eq!(transport.call_count(), 0);
        Ok::<(), DriverError>(())
    })?;
    Ok(())
}

#[test]
fn test2_parameters_are_encoded_for_the_wire() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let transport = Arc::new(MockTransport::new());
        transport.push_row_count(1);

        let conn = Connection::new(transport.clone(), "doc");
        let pstmt = conn.prepare("insert into t (a, b, c, d) values (?, ?, ?, ?)")?;

        let ts = NaiveDate::from_ymd_opt(2023, 11, 14)
            .unwrap()
            .and_hms_opt(22, 13, 20)
            .unwrap();
        let affected = pstmt
            .execute_update(&[
                SqlValue::Int(42),
                SqlValue::Text("x".into()),
                SqlValue::Null,
                SqlValue::Timestamp(ts),
            ])
            .await?;
        assert_eq!(affected, 1);
        assert_eq!(
            transport.dispatched_sql(),
            vec!["insert into t (a, b, c, d) values (?, ?, ?, ?)".to_string()]
        );
        Ok::<(), DriverError>(())
    })?;
    Ok(())
}

#[test]
fn test2_placeholders_inside_literals_do_not_count() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let transport = Arc::new(MockTransport::new());
        transport.push_rows(
            columns(&[("b", SqlType::String)]),
            vec![vec![json!("?")]],
        );

        let conn = Connection::new(transport, "doc");
        let pstmt = conn.prepare("select b from t where b = '?' and a = ? -- ?")?;
        assert_eq!(pstmt.placeholder_count(), 1);

        let cursor = pstmt.execute_query(&[SqlValue::Int(7)]).await?;
        assert!(cursor.advance()?);
        assert_eq!(cursor.get_string(1)?, Some("?".to_string()));
        Ok::<(), DriverError>(())
    })?;
    Ok(())
}

#[test]
fn test2_prepared_rejects_empty_sql_at_creation() -> Result<(), Box<dyn std::error::Error>> {
    let transport = Arc::new(MockTransport::new());
    let conn = Connection::new(transport, "doc");
    assert!(matches!(
        conn.prepare("  "),
        Err(DriverError::Execution(_))
    ));
    Ok(())
}

#[test]
fn test2_prepared_shares_the_classification_table() -> Result<(), Box<dyn std::error::Error>> {
    let transport = Arc::new(MockTransport::new());
    let conn = Connection::new(transport, "doc");
    let pstmt = conn.prepare("select * from t where a = ?")?;

    // Same surface as plain statements: no-ops stay silent,
    // unsupported controls raise.
    pstmt.set_max_rows(10)?;
    pstmt.clear_warnings()?;
    assert!(matches!(
        pstmt.set_fetch_size(100),
        Err(DriverError::Unsupported(_))
    ));
    assert!(matches!(
        pstmt.generated_keys(),
        Err(DriverError::Unsupported(_))
    ));
    Ok(())
}
