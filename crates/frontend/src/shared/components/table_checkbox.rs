use leptos::prelude::*;

/// Selection checkbox cell. Clicking it does not trigger the row click.
#[component]
pub fn TableCheckbox(
    checked: Signal<bool>,
    on_change: Callback<bool>,
    #[prop(optional)] disabled: bool,
) -> impl IntoView {
    view! {
        <td class="table__cell table__cell--checkbox" on:click=|e| e.stop_propagation()>
            <input
                type="checkbox"
                class="table__checkbox"
                prop:checked=checked
                prop:disabled=disabled
                on:change=move |ev| on_change.run(event_target_checked(&ev))
            />
        </td>
    }
}

/// Header cell toggling the whole visible page.
#[component]
pub fn HeaderCheckbox(all_checked: Signal<bool>, on_change: Callback<bool>) -> impl IntoView {
    view! {
        <th class="table__cell table__cell--checkbox">
            <input
                type="checkbox"
                class="table__checkbox"
                prop:checked=all_checked
                on:change=move |ev| on_change.run(event_target_checked(&ev))
            />
        </th>
    }
}
