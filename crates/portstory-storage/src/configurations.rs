use super::*;

pub(super) fn list_names(conn: &Connection, scope: ElementId) -> Result<Vec<String>, StorageError> {
    let mut stmt =
        conn.prepare("SELECT name FROM layout_configuration WHERE scope_id = ?1 ORDER BY name")?;
    let names = stmt
        .query_map(params![scope.to_string()], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names)
}

fn configuration_id(
    conn: &Connection,
    scope: ElementId,
    name: &str,
) -> Result<Option<i64>, StorageError> {
    let id = conn
        .query_row(
            "SELECT id FROM layout_configuration WHERE scope_id = ?1 AND name = ?2",
            params![scope.to_string(), name],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

pub(super) fn load(
    conn: &Connection,
    scope: ElementId,
    name: &str,
) -> Result<Option<LayoutConfiguration>, StorageError> {
    let Some(id) = configuration_id(conn, scope, name)? else {
        return Ok(None);
    };

    let mut config = LayoutConfiguration {
        name: name.to_string(),
        ..Default::default()
    };

    let mut stmt = conn.prepare(
        "SELECT component_id, x, y FROM layout_node WHERE configuration_id = ?1 ORDER BY ordinal",
    )?;
    let mut rows = stmt.query(params![id])?;
    while let Some(row) = rows.next()? {
        config.nodes.push(row_mapping::node_from_row(row)?);
    }

    let mut stmt = conn.prepare(
        "SELECT interface_id, waypoints FROM layout_link WHERE configuration_id = ?1 ORDER BY ordinal",
    )?;
    let mut rows = stmt.query(params![id])?;
    while let Some(row) = rows.next()? {
        config.links.push(row_mapping::link_from_row(row)?);
    }

    let mut stmt = conn.prepare(
        "SELECT kind, value_ids, connection_state FROM layout_filter WHERE configuration_id = ?1 ORDER BY ordinal",
    )?;
    let mut rows = stmt.query(params![id])?;
    while let Some(row) = rows.next()? {
        config.filters.push(row_mapping::filter_from_row(row)?);
    }

    Ok(Some(config))
}

/// Replace any configuration stored under `name` with `config`. The caller owns
/// the transaction.
pub(super) fn replace(
    conn: &Connection,
    scope: ElementId,
    name: &str,
    config: &LayoutConfiguration,
) -> Result<i64, StorageError> {
    delete(conn, scope, name)?;
    conn.execute(
        "INSERT INTO layout_configuration (scope_id, name) VALUES (?1, ?2)",
        params![scope.to_string(), name],
    )?;
    let id = conn.last_insert_rowid();

    let mut stmt = conn.prepare(
        "INSERT INTO layout_node (configuration_id, ordinal, component_id, x, y)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for (ordinal, node) in config.nodes.iter().enumerate() {
        stmt.execute(params![
            id,
            ordinal as i64,
            node.component_id.to_string(),
            node.position.x,
            node.position.y
        ])?;
    }

    let mut stmt = conn.prepare(
        "INSERT INTO layout_link (configuration_id, ordinal, interface_id, waypoints)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    for (ordinal, link) in config.links.iter().enumerate() {
        stmt.execute(params![
            id,
            ordinal as i64,
            link.interface_id.to_string(),
            serde_json::to_string(&link.waypoints)?
        ])?;
    }

    let mut stmt = conn.prepare(
        "INSERT INTO layout_filter (configuration_id, ordinal, kind, value_ids, connection_state)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for (ordinal, filter) in config.filters.iter().enumerate() {
        stmt.execute(params![
            id,
            ordinal as i64,
            filter.kind as i32,
            serde_json::to_string(&filter.selected_value_ids)?,
            filter.connection_state.map(|state| state as i32)
        ])?;
    }

    Ok(id)
}

pub(super) fn delete(conn: &Connection, scope: ElementId, name: &str) -> Result<bool, StorageError> {
    let Some(id) = configuration_id(conn, scope, name)? else {
        return Ok(false);
    };
    conn.execute(
        "DELETE FROM layout_filter WHERE configuration_id = ?1",
        params![id],
    )?;
    conn.execute(
        "DELETE FROM layout_link WHERE configuration_id = ?1",
        params![id],
    )?;
    conn.execute(
        "DELETE FROM layout_node WHERE configuration_id = ?1",
        params![id],
    )?;
    conn.execute("DELETE FROM layout_configuration WHERE id = ?1", params![id])?;
    Ok(true)
}
