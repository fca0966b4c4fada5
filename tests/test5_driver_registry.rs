use std::sync::Arc;

use cratedb_client::prelude::*;
use cratedb_client::test_utils::{MockTransport, columns};
use serde_json::json;

#[test]
fn test5_registry_resolves_urls_to_connections() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let transport = Arc::new(MockTransport::new());
        transport.push_rows(
            columns(&[("name", SqlType::String)]),
            vec![vec![json!("crate1")]],
        );

        let factory_transport = transport.clone();
        let registry = DriverRegistry::new();
        registry.register(Arc::new(CrateDriver::new(Arc::new(move |opts| {
            assert_eq!(opts.host, "db1.example.com");
            assert_eq!(opts.port, 4300);
            Ok(factory_transport.clone() as Arc<dyn Transport>)
        }))));

        let conn = registry.connect("crate://db1.example.com:4300/my_schema")?;
        assert_eq!(conn.schema()?, "my_schema");

        let stmt = conn.create_statement()?;
        let cursor = stmt.execute_query("select name from sys.cluster").await?;
        assert!(cursor.advance()?);
        assert_eq!(cursor.get_string(1)?, Some("crate1".to_string()));
        Ok::<(), DriverError>(())
    })?;
    Ok(())
}

#[test]
fn test5_unknown_scheme_is_a_config_error() -> Result<(), Box<dyn std::error::Error>> {
    let registry = DriverRegistry::new();
    registry.register(Arc::new(CrateDriver::new(Arc::new(|_| {
        Ok(Arc::new(MockTransport::new()) as Arc<dyn Transport>)
    }))));

    assert!(matches!(
        registry.connect("postgres://localhost:5432/db"),
        Err(DriverError::Config(_))
    ));
    assert!(matches!(
        registry.connect("crate://"),
        Err(DriverError::Config(_))
    ));
    Ok(())
}

#[test]
fn test5_transport_factory_failure_propagates() -> Result<(), Box<dyn std::error::Error>> {
    let registry = DriverRegistry::new();
    registry.register(Arc::new(CrateDriver::new(Arc::new(|_| {
        Err(DriverError::Transport("no route to host".to_string()))
    }))));

    assert!(matches!(
        registry.connect("crate://unreachable:4200"),
        Err(DriverError::Transport(_))
    ));
    Ok(())
}
