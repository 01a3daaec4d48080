use chrono::Local;
use contracts::domain::a002_discount::{
    format_discount_value, Discount, DiscountForm, DiscountType, GenerateDiscountsRequest,
    GENERATE_MAX_COUNT,
};
use contracts::shared::dates::{parse_iso_date, to_iso};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a002_discount::api;
use crate::shared::components::dialog::Dialog;

/// Percent values are edited as 0..100 and stored as a 0..1 fraction.
fn display_value(discount_type: &DiscountType, value: f64) -> String {
    match discount_type {
        DiscountType::Percent => format!("{}", (value * 100.0 * 100.0).round() / 100.0),
        _ => format!("{}", value),
    }
}

fn stored_value(discount_type: &DiscountType, raw: &str) -> f64 {
    let value = raw.trim().parse::<f64>().unwrap_or(0.0);
    match discount_type {
        DiscountType::Percent => value / 100.0,
        _ => value,
    }
}

fn value_label(discount_type: &DiscountType) -> &'static str {
    match discount_type {
        DiscountType::Percent => "Value (%)",
        _ => "Value (amount)",
    }
}

/// Create/edit dialog for a single discount code.
#[component]
pub fn DiscountDetails(
    discount: Option<Discount>,
    on_saved: Callback<Discount>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let today = Local::now().date_naive();
    let form = RwSignal::new(
        discount
            .as_ref()
            .map(DiscountForm::from_discount)
            .unwrap_or_else(|| DiscountForm::new_default(today)),
    );
    let (error, set_error) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);

    // The list may be stale; usage counters move with every booking.
    if let Some(id) = discount.as_ref().map(|d| d.id) {
        spawn_local(async move {
            match api::fetch_by_id(id).await {
                Ok(latest) => form.set(DiscountForm::from_discount(&latest)),
                Err(e) => log::warn!("discount {} reload failed: {}", id, e),
            }
        });
    }

    let title = if form.with_untracked(|f| f.is_edit()) {
        format!("Edit discount {}", form.with_untracked(|f| f.code.clone()))
    } else {
        "New discount".to_string()
    };

    let on_save = move |_| {
        let current = form.get_untracked();
        if let Err(e) = current.validate() {
            set_error.set(Some(e.to_string()));
            return;
        }
        set_error.set(None);
        set_saving.set(true);
        spawn_local(async move {
            match api::save(&current).await {
                Ok(saved) => on_saved.run(saved),
                Err(e) => set_error.set(Some(format!("Save failed: {}", e))),
            }
            set_saving.set(false);
        });
    };

    view! {
        <Dialog title=title on_close=on_cancel>
            <div class="modal-body">
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
                <div class="form__grid">
                    <div class="form__group">
                        <label>"Code"</label>
                        <input
                            type="text"
                            prop:value=move || form.with(|f| f.code.clone())
                            on:input=move |ev| {
                                let code = event_target_value(&ev).to_uppercase();
                                form.update(|f| f.code = code);
                            }
                        />
                    </div>
                    <div class="form__group">
                        <label>"Type"</label>
                        <select
                            prop:value=move || form.with(|f| f.discount_type.code().to_string())
                            on:change=move |ev| {
                                let kind = DiscountType::from(event_target_value(&ev));
                                form.update(|f| f.discount_type = kind);
                            }
                        >
                            {DiscountType::ALL.iter().map(|kind| {
                                view! { <option value=kind.code().to_string()>{kind.label().to_string()}</option> }
                            }).collect_view()}
                        </select>
                    </div>
                    <div class="form__group">
                        <label>{move || form.with(|f| value_label(&f.discount_type))}</label>
                        <input
                            type="number"
                            step="any"
                            min="0"
                            prop:value=move || form.with(|f| display_value(&f.discount_type, f.discount_value))
                            on:change=move |ev| {
                                let raw = event_target_value(&ev);
                                form.update(|f| f.discount_value = stored_value(&f.discount_type, &raw));
                            }
                        />
                        <span class="form__hint">
                            {move || form.with(|f| format_discount_value(&f.discount_type, f.discount_value))}
                        </span>
                    </div>
                    <div class="form__group">
                        <label>"Max uses"</label>
                        <input
                            type="number"
                            min="1"
                            prop:value=move || form.with(|f| f.max_uses.to_string())
                            on:change=move |ev| {
                                let uses = event_target_value(&ev).parse().unwrap_or(0);
                                form.update(|f| f.max_uses = uses);
                            }
                        />
                    </div>
                    <div class="form__group">
                        <label>"Valid from"</label>
                        <input
                            type="date"
                            prop:value=move || form.with(|f| to_iso(f.valid_from))
                            on:input=move |ev| {
                                if let Some(date) = parse_iso_date(&event_target_value(&ev)) {
                                    form.update(|f| f.valid_from = date);
                                }
                            }
                        />
                    </div>
                    <div class="form__group">
                        <label>"Valid to"</label>
                        <input
                            type="date"
                            prop:value=move || form.with(|f| to_iso(f.valid_to))
                            on:input=move |ev| {
                                if let Some(date) = parse_iso_date(&event_target_value(&ev)) {
                                    form.update(|f| f.valid_to = date);
                                }
                            }
                        />
                    </div>
                    <div class="form__group">
                        <label class="form__checkbox">
                            <input
                                type="checkbox"
                                prop:checked=move || form.with(|f| f.valid)
                                on:change=move |ev| {
                                    let enabled = event_target_checked(&ev);
                                    form.update(|f| f.valid = enabled);
                                }
                            />
                            " Enabled"
                        </label>
                    </div>
                    <Show when=move || form.with(|f| f.is_edit())>
                        <div class="form__group">
                            <label>"Used"</label>
                            <span>{move || form.with(|f| format!("{} / {}", f.used_count, f.max_uses))}</span>
                        </div>
                    </Show>
                </div>
            </div>
            <div class="modal-footer">
                <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_cancel.run(())>
                    "Cancel"
                </Button>
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=on_save
                    disabled=Signal::derive(move || saving.get())
                >
                    {move || if saving.get() { "Saving..." } else { "Save" }}
                </Button>
            </div>
        </Dialog>
    }
}

/// Batch generation of random codes sharing a prefix.
#[component]
pub fn GenerateDiscounts(on_generated: Callback<usize>, on_cancel: Callback<()>) -> impl IntoView {
    let request = RwSignal::new(GenerateDiscountsRequest::new_default(Local::now().date_naive()));
    let (error, set_error) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);

    let on_generate = move |_| {
        let current = request.get_untracked();
        if let Err(e) = current.validate() {
            set_error.set(Some(e.to_string()));
            return;
        }
        set_error.set(None);
        set_saving.set(true);
        spawn_local(async move {
            match api::generate(&current).await {
                Ok(created) => on_generated.run(created.len()),
                Err(e) => set_error.set(Some(format!("Generation failed: {}", e))),
            }
            set_saving.set(false);
        });
    };

    view! {
        <Dialog title="Generate discount codes" on_close=on_cancel>
            <div class="modal-body">
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
                <div class="form__grid">
                    <div class="form__group">
                        <label>"Prefix"</label>
                        <input
                            type="text"
                            prop:value=move || request.with(|r| r.prefix.clone())
                            on:input=move |ev| {
                                let prefix = event_target_value(&ev).to_uppercase();
                                request.update(|r| r.prefix = prefix);
                            }
                        />
                    </div>
                    <div class="form__group">
                        <label>{format!("Count (1-{})", GENERATE_MAX_COUNT)}</label>
                        <input
                            type="number"
                            min="1"
                            max=GENERATE_MAX_COUNT.to_string()
                            prop:value=move || request.with(|r| r.count.to_string())
                            on:change=move |ev| {
                                let count = event_target_value(&ev).parse().unwrap_or(0);
                                request.update(|r| r.count = count);
                            }
                        />
                    </div>
                    <div class="form__group">
                        <label>"Type"</label>
                        <select
                            prop:value=move || request.with(|r| r.discount_type.code().to_string())
                            on:change=move |ev| {
                                let kind = DiscountType::from(event_target_value(&ev));
                                request.update(|r| r.discount_type = kind);
                            }
                        >
                            {DiscountType::ALL.iter().map(|kind| {
                                view! { <option value=kind.code().to_string()>{kind.label().to_string()}</option> }
                            }).collect_view()}
                        </select>
                    </div>
                    <div class="form__group">
                        <label>{move || request.with(|r| value_label(&r.discount_type))}</label>
                        <input
                            type="number"
                            step="any"
                            min="0"
                            prop:value=move || request.with(|r| display_value(&r.discount_type, r.discount_value))
                            on:change=move |ev| {
                                let raw = event_target_value(&ev);
                                request.update(|r| r.discount_value = stored_value(&r.discount_type, &raw));
                            }
                        />
                    </div>
                    <div class="form__group">
                        <label>"Max uses per code"</label>
                        <input
                            type="number"
                            min="1"
                            prop:value=move || request.with(|r| r.max_uses.to_string())
                            on:change=move |ev| {
                                let uses = event_target_value(&ev).parse().unwrap_or(0);
                                request.update(|r| r.max_uses = uses);
                            }
                        />
                    </div>
                    <div class="form__group">
                        <label>"Valid from"</label>
                        <input
                            type="date"
                            prop:value=move || request.with(|r| to_iso(r.valid_from))
                            on:input=move |ev| {
                                if let Some(date) = parse_iso_date(&event_target_value(&ev)) {
                                    request.update(|r| r.valid_from = date);
                                }
                            }
                        />
                    </div>
                    <div class="form__group">
                        <label>"Valid to"</label>
                        <input
                            type="date"
                            prop:value=move || request.with(|r| to_iso(r.valid_to))
                            on:input=move |ev| {
                                if let Some(date) = parse_iso_date(&event_target_value(&ev)) {
                                    request.update(|r| r.valid_to = date);
                                }
                            }
                        />
                    </div>
                </div>
            </div>
            <div class="modal-footer">
                <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_cancel.run(())>
                    "Cancel"
                </Button>
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=on_generate
                    disabled=Signal::derive(move || saving.get())
                >
                    {move || if saving.get() { "Generating..." } else { "Generate" }}
                </Button>
            </div>
        </Dialog>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_is_edited_in_percent() {
        assert_eq!(display_value(&DiscountType::Percent, 0.15), "15");
        assert!((stored_value(&DiscountType::Percent, "15") - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_fixed_value_passes_through() {
        assert_eq!(display_value(&DiscountType::Fixed, 50000.0), "50000");
        assert_eq!(stored_value(&DiscountType::Fixed, " 50000 "), 50000.0);
        assert_eq!(stored_value(&DiscountType::Fixed, "abc"), 0.0);
    }
}
