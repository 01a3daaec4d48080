use contracts::shared::severity::Severity;
use leptos::prelude::*;

/// Coloured label for a status; unknown statuses render neutral.
#[component]
pub fn SeverityBadge(
    #[prop(into)] label: String,
    #[prop(into)] severity: Option<Severity>,
) -> impl IntoView {
    let class = format!("badge {}", Severity::class_or_neutral(severity));
    view! { <span class=class>{label}</span> }
}
