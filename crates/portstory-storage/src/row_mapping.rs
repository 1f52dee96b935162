use super::*;

pub(super) fn element_id_from_db(value: &str) -> Result<ElementId, StorageError> {
    Ok(ElementId::parse(value)?)
}

pub(super) fn node_from_row(row: &Row) -> Result<NodePosition, StorageError> {
    let component_id: String = row.get(0)?;
    Ok(NodePosition {
        component_id: element_id_from_db(&component_id)?,
        position: Point::new(row.get(1)?, row.get(2)?),
    })
}

pub(super) fn link_from_row(row: &Row) -> Result<LinkWaypoints, StorageError> {
    let interface_id: String = row.get(0)?;
    let waypoints: String = row.get(1)?;
    Ok(LinkWaypoints {
        interface_id: element_id_from_db(&interface_id)?,
        waypoints: serde_json::from_str(&waypoints)?,
    })
}

pub(super) fn filter_from_row(row: &Row) -> Result<FilterRecord, StorageError> {
    let kind_int: i32 = row.get(0)?;
    let value_ids: String = row.get(1)?;
    let connection_state = row
        .get::<_, Option<i32>>(2)?
        .map(ConnectionFilter::try_from)
        .transpose()?;
    Ok(FilterRecord {
        kind: FilterKind::try_from(kind_int)?,
        selected_value_ids: serde_json::from_str(&value_ids)?,
        connection_state,
    })
}
