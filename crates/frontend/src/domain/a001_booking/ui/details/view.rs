use contracts::domain::a001_booking::{BookingStatus, PaymentMethod, PaymentStatus};
use contracts::shared::dates::{parse_iso_date, to_iso};
use contracts::shared::format::format_currency;
use leptos::prelude::*;
use thaw::*;

use super::view_model::BookingDetailsViewModel;
use crate::shared::components::dialog::Dialog;

#[component]
pub fn BookingDetails(
    /// Booking to edit; `None` creates a new one
    id: Option<i64>,
    on_saved: Callback<String>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let vm = BookingDetailsViewModel::new();
    vm.load(id);

    let title = Signal::derive(move || {
        if vm.is_edit_mode() {
            format!("Edit booking #{}", vm.form.with(|f| f.id.unwrap_or_default()))
        } else {
            "New booking".to_string()
        }
    });

    let text_field = move |label: &'static str,
                           get: fn(&contracts::domain::a001_booking::BookingForm) -> String,
                           set: fn(&mut contracts::domain::a001_booking::BookingForm, String)| {
        view! {
            <div class="form__group">
                <label>{label}</label>
                <input
                    type="text"
                    prop:value=move || vm.form.with(get)
                    on:input=move |ev| vm.form.update(|f| set(f, event_target_value(&ev)))
                    disabled=move || vm.saving.get()
                />
            </div>
        }
    };

    let nights = move || {
        vm.form.with(|f| match (f.check_in_date, f.check_out_date) {
            (Some(i), Some(o)) if o > i => format!("{} night(s)", (o - i).num_days()),
            _ => String::new(),
        })
    };

    view! {
        <Dialog title=title on_close=on_cancel width="720px">
            <div class="modal-body">
                {move || vm.error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
                <Show when=move || vm.loading.get()>
                    <div class="loading">"Loading..."</div>
                </Show>

                <div class="form__grid">
                    {text_field("Guest name", |f| f.full_name.clone(), |f, v| f.full_name = v)}
                    {text_field("Email", |f| f.email.clone(), |f, v| f.email = v)}
                    {text_field("Phone", |f| f.phone.clone(), |f, v| f.phone = v)}

                    <div class="form__group">
                        <label>"Check-in"</label>
                        <input
                            type="date"
                            prop:value=move || vm.form.with(|f| f.check_in_date.map(to_iso).unwrap_or_default())
                            on:input=move |ev| {
                                let date = parse_iso_date(&event_target_value(&ev));
                                vm.form.update(|f| f.check_in_date = date);
                            }
                        />
                    </div>
                    <div class="form__group">
                        <label>"Check-out"</label>
                        <input
                            type="date"
                            prop:value=move || vm.form.with(|f| f.check_out_date.map(to_iso).unwrap_or_default())
                            on:input=move |ev| {
                                let date = parse_iso_date(&event_target_value(&ev));
                                vm.form.update(|f| f.check_out_date = date);
                            }
                        />
                        <span class="form__hint">{nights}</span>
                    </div>

                    <div class="form__group">
                        <label>"Status"</label>
                        <select
                            prop:value=move || vm.form.with(|f| f.status.as_ref().map(|s| s.code().to_string()).unwrap_or_default())
                            on:change=move |ev| {
                                let status = BookingStatus::from(event_target_value(&ev));
                                vm.form.update(|f| f.status = Some(status));
                            }
                        >
                            {move || vm.status_options().into_iter().map(|status| {
                                let code = status.code().to_string();
                                view! { <option value=code>{status.label().to_string()}</option> }
                            }).collect_view()}
                        </select>
                    </div>
                    <div class="form__group">
                        <label>"Payment status"</label>
                        <select
                            prop:value=move || vm.form.with(|f| f.payment_status.code().to_string())
                            on:change=move |ev| {
                                let status = PaymentStatus::from(event_target_value(&ev));
                                vm.form.update(|f| f.payment_status = status);
                            }
                        >
                            {PaymentStatus::ALL.iter().map(|status| {
                                view! { <option value=status.code().to_string()>{status.label().to_string()}</option> }
                            }).collect_view()}
                        </select>
                    </div>
                    <div class="form__group">
                        <label>"Payment method"</label>
                        <select
                            prop:value=move || vm.form.with(|f| f.payment_method.as_ref().map(|m| m.code().to_string()).unwrap_or_default())
                            on:change=move |ev| {
                                let raw = event_target_value(&ev);
                                vm.form.update(|f| {
                                    f.payment_method = if raw.is_empty() { None } else { Some(PaymentMethod::from(raw)) };
                                });
                            }
                        >
                            <option value="">"Not set"</option>
                            {PaymentMethod::ALL.iter().map(|method| {
                                view! { <option value=method.code().to_string()>{method.label().to_string()}</option> }
                            }).collect_view()}
                        </select>
                    </div>
                    {text_field(
                        "Discount code",
                        |f| f.discount_code.clone().unwrap_or_default(),
                        |f, v| f.discount_code = Some(v).filter(|c| !c.trim().is_empty()),
                    )}
                </div>

                <div class="form__group">
                    <label>"Rooms"</label>
                    <div class="room-picker">
                        <For
                            each=move || vm.rooms.get()
                            key=|room| room.id
                            children=move |room| {
                                let room_id = room.id;
                                let checked = move || vm.form.with(|f| f.room_ids.contains(&room_id));
                                view! {
                                    <label class="room-picker__item">
                                        <input
                                            type="checkbox"
                                            prop:checked=checked
                                            on:change=move |ev| vm.toggle_room(room_id, event_target_checked(&ev))
                                        />
                                        {format!(
                                            "{} ({}) {}",
                                            room.room_number,
                                            room.room_type,
                                            format_currency(room.price_per_night),
                                        )}
                                    </label>
                                }
                            }
                        />
                    </div>
                </div>

                <div class="form__group">
                    <label>"Special requests"</label>
                    <textarea
                        rows="3"
                        prop:value=move || vm.form.with(|f| f.special_requests.clone().unwrap_or_default())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            vm.form.update(|f| {
                                f.special_requests = if value.trim().is_empty() { None } else { Some(value) };
                            });
                        }
                    />
                </div>
            </div>

            <div class="modal-footer">
                <Button
                    appearance=ButtonAppearance::Secondary
                    on_click=move |_| on_cancel.run(())
                    disabled=Signal::derive(move || vm.saving.get())
                >
                    "Cancel"
                </Button>
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=move |_| vm.save_command(on_saved)
                    disabled=Signal::derive(move || vm.saving.get() || vm.loading.get())
                >
                    {move || if vm.saving.get() { "Saving..." } else { "Save" }}
                </Button>
            </div>
        </Dialog>
    }
}
