use portstory_core::{FilterKind, FilterRecord, FilterSelection};
use portstory_graph::AvailableFilterValues;

/// The filter UI component.
///
/// Presents the values available for one filter kind next to the current
/// selection and returns the user's choice, or `None` when the dialog was
/// dismissed.
pub trait FilterPresenter {
    fn present(
        &mut self,
        kind: FilterKind,
        available: &AvailableFilterValues,
        current: &FilterSelection,
    ) -> Option<FilterRecord>;
}

impl<F> FilterPresenter for F
where
    F: FnMut(FilterKind, &AvailableFilterValues, &FilterSelection) -> Option<FilterRecord>,
{
    fn present(
        &mut self,
        kind: FilterKind,
        available: &AvailableFilterValues,
        current: &FilterSelection,
    ) -> Option<FilterRecord> {
        self(kind, available, current)
    }
}
