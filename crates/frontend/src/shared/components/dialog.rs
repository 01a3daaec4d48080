use crate::shared::icons::icon;
use leptos::prelude::*;

/// Modal frame: overlay, title bar with a close button, body and footer.
/// Clicking the overlay closes the dialog.
#[component]
pub fn Dialog(
    #[prop(into)] title: Signal<String>,
    on_close: Callback<()>,
    #[prop(optional, into)] width: Option<String>,
    children: Children,
) -> impl IntoView {
    let style = format!("width: {};", width.unwrap_or_else(|| "560px".to_string()));
    view! {
        <div class="modal-overlay" on:click=move |_| on_close.run(())>
            <div class="modal" style=style on:click=|ev| ev.stop_propagation()>
                <div class="modal-header">
                    <h2 class="modal-title">{move || title.get()}</h2>
                    <button class="modal-close" on:click=move |_| on_close.run(())>
                        {icon("x")}
                    </button>
                </div>
                {children()}
            </div>
        </div>
    }
}

/// Yes/no question before a destructive action.
#[component]
pub fn ConfirmDialog(
    #[prop(into)] title: String,
    #[prop(into)] message: String,
    #[prop(optional, into)] confirm_label: Option<String>,
    #[prop(into, optional)] busy: Signal<bool>,
    on_confirm: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let confirm_label = confirm_label.unwrap_or_else(|| "Confirm".to_string());
    view! {
        <Dialog title=title on_close=on_cancel width="420px">
            <div class="modal-body">
                <p class="confirm-message">{message}</p>
            </div>
            <div class="modal-footer">
                <button
                    class="btn btn-secondary"
                    on:click=move |_| on_cancel.run(())
                    disabled=move || busy.get()
                >
                    "Cancel"
                </button>
                <button
                    class="btn btn-danger"
                    on:click=move |_| on_confirm.run(())
                    disabled=move || busy.get()
                >
                    {confirm_label}
                </button>
            </div>
        </Dialog>
    }
}
