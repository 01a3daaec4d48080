use crate::shared::list_utils::{get_sort_class, get_sort_indicator};
use leptos::prelude::*;
use thaw::*;

/// Column header that toggles sorting by `field` when clicked.
#[component]
pub fn SortHeader(
    #[prop(into)] label: String,
    field: &'static str,
    #[prop(into)] sort_field: Signal<String>,
    #[prop(into)] ascending: Signal<bool>,
    on_sort: Callback<&'static str>,
    #[prop(optional, default = 100.0)] min_width: f64,
) -> impl IntoView {
    view! {
        <TableHeaderCell resizable=false min_width=min_width>
            <div
                class="table__sortable-header"
                style="cursor:pointer;"
                on:click=move |_| on_sort.run(field)
            >
                {label}
                <span class=move || get_sort_class(&sort_field.get(), field)>
                    {move || get_sort_indicator(&sort_field.get(), field, ascending.get())}
                </span>
            </div>
        </TableHeaderCell>
    }
}

/// Flips the direction when `field` is already the sort column, otherwise
/// sorts ascending by `field`.
pub fn next_sort(current: &str, ascending: bool, field: &str) -> (String, bool) {
    if current == field {
        (field.to_string(), !ascending)
    } else {
        (field.to_string(), true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_sort() {
        assert_eq!(next_sort("created_at", false, "created_at"), ("created_at".into(), true));
        assert_eq!(next_sort("created_at", true, "full_name"), ("full_name".into(), true));
    }
}
