use chrono::{NaiveDate, Utc};
use contracts::domain::a001_booking::{BookingForm, PaymentMethod};
use contracts::domain::a002_discount::{Discount, DiscountApplication};
use contracts::domain::a004_room::{total_price, AvailabilityQuery, Room};
use contracts::shared::format::{format_currency, format_naive_date};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_navigate, use_query_map};
use thaw::*;

use super::stay_from_query;
use crate::domain::a001_booking::api as bookings_api;
use crate::domain::a002_discount::api as discounts_api;
use crate::domain::a004_room::api as rooms_api;
use crate::shared::api_utils::ApiClient;
use crate::shared::toast::use_toast;
use crate::system::auth::context::use_auth;
use crate::system::auth::guard::RequireCustomer;

/// Booking request for one room over `stay`, on behalf of the signed-in user.
pub fn checkout_form(
    room_id: i64,
    stay: &AvailabilityQuery,
    user_id: Option<i64>,
    today: NaiveDate,
) -> BookingForm {
    BookingForm {
        user_id,
        check_in_date: Some(stay.check_in_date),
        check_out_date: Some(stay.check_out_date),
        room_ids: vec![room_id],
        ..BookingForm::new_default(today)
    }
}

#[component]
pub fn CheckoutPage() -> impl IntoView {
    view! {
        <RequireCustomer>
            <Checkout />
        </RequireCustomer>
    }
}

#[component]
fn Checkout() -> impl IntoView {
    let auth = use_auth();
    let toast = use_toast();
    let query = use_query_map();
    let navigate = use_navigate();
    let today = Utc::now().date_naive();

    let stay = query.with_untracked(|q| stay_from_query(|k| q.get(k), today));
    let room_id = query.with_untracked(|q| q.get("roomId").and_then(|v| v.parse::<i64>().ok()));
    let session = auth.client_session();
    let user_id = session.as_ref().map(|s| s.id).filter(|id| *id > 0);

    let form = RwSignal::new(checkout_form(room_id.unwrap_or_default(), &stay, user_id, today));
    if let Some(s) = session.as_ref().filter(|s| s.username.contains('@')) {
        let email = s.username.clone();
        form.update(|f| f.email = email);
    }

    let room = RwSignal::new(None::<Room>);
    let (error, set_error) = signal(None::<String>);
    let discount_code = RwSignal::new(String::new());
    let applied: RwSignal<Option<(Discount, DiscountApplication)>> = RwSignal::new(None);
    let (checking_code, set_checking_code) = signal(false);
    let (submitting, set_submitting) = signal(false);

    Effect::new(move |_| {
        let Some(id) = room_id else {
            set_error.set(Some("No room selected".into()));
            return;
        };
        spawn_local(async move {
            match rooms_api::fetch_room(id).await {
                Ok(found) => room.set(Some(found)),
                Err(e) => set_error.set(Some(format!("Could not load room: {}", e))),
            }
        });
    });

    let subtotal = Memo::new(move |_| {
        room.with(|r| {
            r.as_ref()
                .map(|r| total_price(r, stay.check_in_date, stay.check_out_date))
                .unwrap_or(0.0)
        })
    });
    let amount_due = Memo::new(move |_| {
        applied.with(|a| a.as_ref().map(|(_, app)| app.discounted_amount)).unwrap_or_else(|| subtotal.get())
    });

    let apply_code = move || {
        let code = discount_code.get_untracked();
        let amount = subtotal.get_untracked();
        set_checking_code.set(true);
        spawn_local(async move {
            match discounts_api::validate_code(ApiClient::client(), &code).await {
                Ok(discount) => match discount.apply(amount, today) {
                    Ok(application) => {
                        toast.success(
                            "Discount applied",
                            format!("-{}", format_currency(application.discount_amount)),
                        );
                        applied.set(Some((discount, application)));
                    }
                    Err(e) => toast.warn("Discount", e.to_string()),
                },
                Err(e) => {
                    auth.on_api_error(&e);
                    toast.api_error("Discount", &e);
                }
            }
            set_checking_code.set(false);
        });
    };

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let mut request = form.get_untracked();
        let code = applied.with_untracked(|a| a.as_ref().map(|(d, _)| d.code.clone()));
        request.discount_code = code.clone();
        if let Err(e) = request.validate() {
            set_error.set(Some(e.to_string()));
            return;
        }
        set_error.set(None);
        set_submitting.set(true);
        let navigate = navigate.clone();
        spawn_local(async move {
            match bookings_api::create(ApiClient::client(), &request).await {
                Ok(()) => {
                    if let Some(code) = code {
                        if let Err(e) = discounts_api::use_code(ApiClient::client(), &code).await {
                            log::warn!("could not record use of {}: {}", code, e);
                        }
                    }
                    toast.success("Booking received", "We will confirm it shortly");
                    navigate("/bookings", Default::default());
                }
                Err(e) => {
                    auth.on_api_error(&e);
                    set_error.set(Some(format!("Booking failed: {}", e)));
                    set_submitting.set(false);
                }
            }
        });
    };

    let text_field = move |label: &'static str, get: fn(&BookingForm) -> String, set: fn(&mut BookingForm, String)| {
        view! {
            <div class="form__group">
                <label>{label}</label>
                <input
                    type="text"
                    prop:value=move || form.with(get)
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        form.update(|f| set(f, value));
                    }
                />
            </div>
        }
    };

    view! {
        <div class="checkout">
            <h1>"Complete your booking"</h1>
            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

            <form class="checkout__form" on:submit=submit>
                <section class="checkout__guest">
                    <h2>"Guest details"</h2>
                    {text_field("Full name *", |f| f.full_name.clone(), |f, v| f.full_name = v)}
                    {text_field("Email *", |f| f.email.clone(), |f, v| f.email = v)}
                    {text_field("Phone *", |f| f.phone.clone(), |f, v| f.phone = v)}
                    <div class="form__group">
                        <label>"Payment method"</label>
                        <select
                            on:change=move |ev| {
                                let raw = event_target_value(&ev);
                                form.update(|f| {
                                    f.payment_method = if raw.is_empty() { None } else { Some(PaymentMethod::from(raw)) }
                                });
                            }
                        >
                            <option value="">"Pay at the hotel"</option>
                            {PaymentMethod::ALL.iter().map(|m| view! {
                                <option value=m.code().to_string()>{m.label().to_string()}</option>
                            }).collect_view()}
                        </select>
                    </div>
                    <div class="form__group">
                        <label>"Special requests"</label>
                        <textarea
                            rows="3"
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                form.update(|f| f.special_requests = if value.trim().is_empty() { None } else { Some(value) });
                            }
                        />
                    </div>
                </section>

                <aside class="checkout__summary">
                    <h2>"Your stay"</h2>
                    {move || room.get().map(|r| view! {
                        <div class="checkout__room">
                            <strong>{r.title()}</strong>
                            <span>{format!("{} \u{b7} {} / night", r.room_type, format_currency(r.price_per_night))}</span>
                        </div>
                    })}
                    <dl class="kv-list">
                        <dt>"Check-in"</dt>
                        <dd>{format_naive_date(stay.check_in_date)}</dd>
                        <dt>"Check-out"</dt>
                        <dd>{format_naive_date(stay.check_out_date)}</dd>
                        <dt>"Nights"</dt>
                        <dd>{stay.nights()}</dd>
                        <dt>"Guests"</dt>
                        <dd>{stay.guests}</dd>
                        <dt>"Subtotal"</dt>
                        <dd>{move || format_currency(subtotal.get())}</dd>
                    </dl>

                    <div class="checkout__discount">
                        <Show
                            when=move || applied.with(|a| a.is_some())
                            fallback=move || view! {
                                <Flex gap=FlexGap::Small>
                                    <Input value=discount_code placeholder="Discount code" />
                                    <Button
                                        appearance=ButtonAppearance::Secondary
                                        on_click=move |_| apply_code()
                                        disabled=Signal::derive(move || checking_code.get() || subtotal.get() <= 0.0)
                                    >
                                        "Apply"
                                    </Button>
                                </Flex>
                            }
                        >
                            <div class="checkout__discount-applied">
                                {move || applied.with(|a| a.as_ref().map(|(d, app)| format!(
                                    "{} ({}): -{}",
                                    d.code,
                                    d.format_value(),
                                    format_currency(app.discount_amount)
                                )))}
                                <Button
                                    size=ButtonSize::Small
                                    appearance=ButtonAppearance::Subtle
                                    on_click=move |_| applied.set(None)
                                >
                                    "Remove"
                                </Button>
                            </div>
                        </Show>
                    </div>

                    <div class="checkout__total">
                        <span>"Total"</span>
                        <strong>{move || format_currency(amount_due.get())}</strong>
                    </div>
                    <button type="submit" class="btn btn-primary" disabled=move || submitting.get() || room.with(|r| r.is_none())>
                        {move || if submitting.get() { "Booking..." } else { "Confirm booking" }}
                    </button>
                </aside>
            </form>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_booking::{BookingStatus, PaymentStatus};

    #[test]
    fn test_checkout_form() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        let stay = AvailabilityQuery::new(d(10), d(12));
        let form = checkout_form(4, &stay, Some(7), d(1));
        assert_eq!(form.room_ids, vec![4]);
        assert_eq!(form.user_id, Some(7));
        assert_eq!(form.check_in_date, Some(d(10)));
        assert_eq!(form.check_out_date, Some(d(12)));
        assert_eq!(form.status, Some(BookingStatus::Pending));
        assert_eq!(form.payment_status, PaymentStatus::Unpaid);
        assert!(!form.is_edit());
    }
}
