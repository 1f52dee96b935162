use super::*;

const TABLE_STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS layout_configuration (
        id INTEGER PRIMARY KEY,
        scope_id TEXT NOT NULL,
        name TEXT NOT NULL,
        UNIQUE(scope_id, name)
    )",
    "CREATE TABLE IF NOT EXISTS layout_node (
        configuration_id INTEGER NOT NULL,
        ordinal INTEGER NOT NULL,
        component_id TEXT NOT NULL,
        x REAL NOT NULL,
        y REAL NOT NULL,
        PRIMARY KEY(configuration_id, ordinal),
        FOREIGN KEY(configuration_id) REFERENCES layout_configuration(id) ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS layout_link (
        configuration_id INTEGER NOT NULL,
        ordinal INTEGER NOT NULL,
        interface_id TEXT NOT NULL,
        waypoints TEXT NOT NULL,
        PRIMARY KEY(configuration_id, ordinal),
        FOREIGN KEY(configuration_id) REFERENCES layout_configuration(id) ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS layout_filter (
        configuration_id INTEGER NOT NULL,
        ordinal INTEGER NOT NULL,
        kind INTEGER NOT NULL,
        value_ids TEXT NOT NULL,
        connection_state INTEGER,
        PRIMARY KEY(configuration_id, ordinal),
        FOREIGN KEY(configuration_id) REFERENCES layout_configuration(id) ON DELETE CASCADE
    )",
];

const INDEX_STATEMENTS: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_layout_configuration_scope ON layout_configuration(scope_id)",
];

pub(super) fn create_tables(conn: &Connection) -> Result<(), StorageError> {
    for statement in TABLE_STATEMENTS {
        conn.execute(statement, [])?;
    }
    Ok(())
}

pub(super) fn create_indexes(conn: &Connection) -> Result<(), StorageError> {
    for statement in INDEX_STATEMENTS {
        conn.execute(statement, [])?;
    }
    Ok(())
}

pub(super) fn apply_schema_migrations(storage: &Storage) -> Result<(), StorageError> {
    let stored_version = storage.schema_version()?;

    if stored_version > SCHEMA_VERSION {
        return Err(StorageError::Other(format!(
            "Unsupported database schema version: {stored_version} (max supported: {SCHEMA_VERSION})"
        )));
    }

    if stored_version < SCHEMA_VERSION {
        storage.set_schema_version(SCHEMA_VERSION)?;
    }
    Ok(())
}
