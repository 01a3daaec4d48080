use crate::shared::icons::icon;
use contracts::shared::severity::Severity;
use leptos::prelude::*;

/// Headline number on a dashboard or list page.
#[component]
pub fn StatCard(
    /// Label displayed above the value
    #[prop(into)]
    label: String,
    /// Icon name from the icon() helper
    #[prop(into)]
    icon_name: String,
    /// Already formatted value; `None` while loading
    #[prop(into)]
    value: Signal<Option<String>>,
    #[prop(optional)] severity: Option<Severity>,
    /// Change in percent relative to the previous period
    #[prop(into, optional)]
    change_percent: Signal<Option<f64>>,
    #[prop(into, optional)] subtitle: Signal<Option<String>>,
) -> impl IntoView {
    let card_class = match severity {
        Some(Severity::Success) => "stat-card stat-card--success",
        Some(Severity::Danger) => "stat-card stat-card--error",
        Some(Severity::Warning) => "stat-card stat-card--warning",
        Some(Severity::Info) => "stat-card stat-card--info",
        None => "stat-card",
    };

    let change_view = move || {
        change_percent.get().map(|pct| {
            let (arrow, cls) = if pct > 0.5 {
                ("\u{2191}", "stat-card__change stat-card__change--up")
            } else if pct < -0.5 {
                ("\u{2193}", "stat-card__change stat-card__change--down")
            } else {
                ("", "stat-card__change stat-card__change--flat")
            };
            view! { <span class=cls>{format!("{}{:.1}%", arrow, pct.abs())}</span> }
        })
    };

    view! {
        <div class=card_class>
            <div class="stat-card__icon">{icon(&icon_name)}</div>
            <div class="stat-card__content">
                <div class="stat-card__label">{label}</div>
                <div class="stat-card__value">
                    {move || value.get().unwrap_or_else(|| "-".to_string())}
                    {change_view}
                </div>
                {move || subtitle.get().map(|s| view! { <div class="stat-card__subtitle">{s}</div> })}
            </div>
        </div>
    }
}
