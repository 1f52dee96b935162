use super::*;

fn sample_configuration() -> LayoutConfiguration {
    LayoutConfiguration {
        name: String::new(),
        nodes: vec![
            NodePosition {
                component_id: ElementId::new(),
                position: Point::new(0.1 + 0.2, -250.0),
            },
            NodePosition {
                component_id: ElementId::new(),
                position: Point::new(1e-12, 123456.789),
            },
        ],
        links: vec![
            LinkWaypoints {
                interface_id: ElementId::new(),
                waypoints: vec![Point::new(1.0, 2.0), Point::new(3.5, -4.25)],
            },
            LinkWaypoints {
                interface_id: ElementId::new(),
                waypoints: Vec::new(),
            },
        ],
        filters: vec![
            FilterRecord::values(FilterKind::Owner, vec![ElementId::new(), ElementId::new()]),
            FilterRecord::connection(FilterKind::ComponentConnection, ConnectionFilter::Unconnected),
        ],
    }
}

#[test]
fn test_tables_are_created() -> Result<(), StorageError> {
    let storage = Storage::new_in_memory()?;
    let mut stmt = storage
        .conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")?;
    let tables = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    for table in [
        "layout_configuration",
        "layout_filter",
        "layout_link",
        "layout_node",
    ] {
        assert!(tables.iter().any(|name| name == table), "missing {table}");
    }
    assert_eq!(storage.schema_version()?, SCHEMA_VERSION);
    Ok(())
}

#[test]
fn test_save_then_load_restores_everything() -> Result<(), StorageError> {
    let storage = Storage::new_in_memory()?;
    let scope = ElementId::new();
    let config = sample_configuration();

    let outcome = storage.save_configuration(scope, "Overview", &config);
    assert_eq!(outcome, SaveOutcome::accepted());

    let loaded = storage
        .load_configuration(scope, "Overview")?
        .expect("saved configuration");
    assert_eq!(loaded.name, "Overview");
    assert_eq!(loaded.nodes, config.nodes);
    assert_eq!(loaded.links, config.links);
    assert_eq!(loaded.filters, config.filters);
    Ok(())
}

#[test]
fn test_same_name_save_overwrites() -> Result<(), StorageError> {
    let storage = Storage::new_in_memory()?;
    let scope = ElementId::new();
    let first = sample_configuration();
    let second = LayoutConfiguration::default();

    assert!(storage.save_configuration(scope, "v", &first).success);
    assert!(storage.save_configuration(scope, "v", &second).success);

    let loaded = storage.load_configuration(scope, "v")?.expect("saved");
    assert!(loaded.nodes.is_empty());
    assert!(loaded.filters.is_empty());
    assert_eq!(storage.list_configuration_names(scope)?, vec!["v".to_string()]);

    let rows: i64 = storage
        .conn
        .query_row("SELECT count(*) FROM layout_node", [], |row| row.get(0))?;
    assert_eq!(rows, 0);
    Ok(())
}

#[test]
fn test_names_are_validated_and_trimmed() -> Result<(), StorageError> {
    let storage = Storage::new_in_memory()?;
    let scope = ElementId::new();
    let config = LayoutConfiguration::default();

    let outcome = storage.save_configuration(scope, "   ", &config);
    assert!(!outcome.success);
    assert_eq!(outcome.errors.len(), 1);

    let long = "x".repeat(MAX_CONFIGURATION_NAME_LEN + 1);
    assert!(!storage.save_configuration(scope, &long, &config).success);
    let limit = "y".repeat(MAX_CONFIGURATION_NAME_LEN);
    assert!(storage.save_configuration(scope, &limit, &config).success);

    assert!(storage.save_configuration(scope, "  padded  ", &config).success);
    assert!(storage.load_configuration(scope, "padded")?.is_some());
    Ok(())
}

#[test]
fn test_scopes_are_isolated() -> Result<(), StorageError> {
    let storage = Storage::new_in_memory()?;
    let (a, b) = (ElementId::new(), ElementId::new());
    let config = sample_configuration();

    assert!(storage.save_configuration(a, "shared", &config).success);
    assert!(storage.save_configuration(b, "other", &config).success);

    assert_eq!(storage.list_configuration_names(a)?, vec!["shared".to_string()]);
    assert_eq!(storage.list_configuration_names(b)?, vec!["other".to_string()]);
    assert!(storage.load_configuration(b, "shared")?.is_none());
    Ok(())
}

#[test]
fn test_delete_configuration() -> Result<(), StorageError> {
    let storage = Storage::new_in_memory()?;
    let scope = ElementId::new();
    assert!(storage
        .save_configuration(scope, "gone", &sample_configuration())
        .success);
    // warm the name cache so deletion has to invalidate it
    assert_eq!(storage.list_configuration_names(scope)?.len(), 1);

    assert_eq!(storage.delete_configuration(scope, "gone"), DeleteOutcome::deleted());
    assert!(storage.list_configuration_names(scope)?.is_empty());
    assert!(storage.load_configuration(scope, "gone")?.is_none());

    let again = storage.delete_configuration(scope, "gone");
    assert!(!again.success);
    assert!(again.error.is_some());

    for table in ["layout_node", "layout_link", "layout_filter"] {
        let rows: i64 =
            storage
                .conn
                .query_row(&format!("SELECT count(*) FROM {table}"), [], |row| row.get(0))?;
        assert_eq!(rows, 0, "{table} not emptied");
    }
    Ok(())
}

#[test]
fn test_names_listed_alphabetically() -> Result<(), StorageError> {
    let storage = Storage::new_in_memory()?;
    let scope = ElementId::new();
    for name in ["zeta", "alpha", "mid"] {
        assert!(storage
            .save_configuration(scope, name, &LayoutConfiguration::default())
            .success);
    }
    assert_eq!(
        storage.list_configuration_names(scope)?,
        vec!["alpha".to_string(), "mid".to_string(), "zeta".to_string()]
    );
    Ok(())
}

#[test]
fn test_invalid_filter_kind_is_reported() -> Result<(), StorageError> {
    let storage = Storage::new_in_memory()?;
    let scope = ElementId::new();
    let config = LayoutConfiguration {
        filters: vec![FilterRecord::values(FilterKind::Category, vec![])],
        ..Default::default()
    };
    assert!(storage.save_configuration(scope, "bad", &config).success);
    storage.conn.execute("UPDATE layout_filter SET kind = 42", [])?;

    let result = storage.load_configuration(scope, "bad");
    assert!(matches!(
        result,
        Err(StorageError::EnumConversion(EnumConversionError::InvalidFilterKind(42)))
    ));
    Ok(())
}

#[test]
fn test_clear_removes_all_configurations() -> Result<(), StorageError> {
    let storage = Storage::new_in_memory()?;
    let scope = ElementId::new();
    assert!(storage
        .save_configuration(scope, "one", &sample_configuration())
        .success);
    storage.clear()?;
    assert!(storage.list_configuration_names(scope)?.is_empty());
    Ok(())
}

#[test]
fn test_on_disk_store_survives_reopen() -> Result<(), StorageError> {
    let dir = tempfile::tempdir().map_err(|e| StorageError::Other(e.to_string()))?;
    let path = dir.path().join("layouts.db");
    let scope = ElementId::new();
    let config = sample_configuration();

    {
        let storage = Storage::open(&path)?;
        assert!(storage.save_configuration(scope, "persisted", &config).success);
    }

    let storage = Storage::open(&path)?;
    let loaded = storage
        .load_configuration(scope, "persisted")?
        .expect("persisted configuration");
    assert_eq!(loaded.nodes, config.nodes);
    assert_eq!(loaded.links, config.links);
    Ok(())
}

#[test]
fn test_newer_schema_is_rejected() -> Result<(), StorageError> {
    let dir = tempfile::tempdir().map_err(|e| StorageError::Other(e.to_string()))?;
    let path = dir.path().join("future.db");
    {
        let storage = Storage::open(&path)?;
        storage.set_schema_version(SCHEMA_VERSION + 1)?;
    }
    assert!(matches!(Storage::open(&path), Err(StorageError::Other(_))));
    Ok(())
}
