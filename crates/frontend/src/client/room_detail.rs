use chrono::Utc;
use contracts::domain::a004_room::{nights, total_price, AvailabilityQuery, Room, RoomType};
use contracts::shared::dates::{parse_iso_date, to_iso};
use contracts::shared::format::format_currency;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::{use_params_map, use_query_map};

use super::stay_from_query;
use crate::domain::a004_room::api;
use crate::shared::api_utils::with_query;

/// Checkout link for one room and the chosen stay.
pub fn checkout_href(room_id: i64, stay: &AvailabilityQuery) -> String {
    let path = with_query("/booking/checkout", stay).unwrap_or_else(|_| "/booking/checkout".into());
    format!("{}&roomId={}", path, room_id)
}

#[component]
pub fn RoomDetailPage() -> impl IntoView {
    let params = use_params_map();
    let query = use_query_map();
    let today = Utc::now().date_naive();

    let initial = query.with_untracked(|q| stay_from_query(|k| q.get(k), today));
    let check_in = RwSignal::new(to_iso(initial.check_in_date));
    let check_out = RwSignal::new(to_iso(initial.check_out_date));
    let guests = initial.guests;

    let room = RwSignal::new(None::<Room>);
    let room_type = RwSignal::new(None::<RoomType>);
    let (error, set_error) = signal(None::<String>);
    let selected_image = RwSignal::new(0usize);

    Effect::new(move |_| {
        let Some(id) = params.with(|p| p.get("id")).and_then(|v| v.parse::<i64>().ok()) else {
            set_error.set(Some("Room not found".into()));
            return;
        };
        spawn_local(async move {
            match api::fetch_room(id).await {
                Ok(found) => {
                    let type_id = found.room_type_id;
                    room.set(Some(found));
                    if let Some(type_id) = type_id {
                        match api::fetch_room_type(type_id).await {
                            Ok(t) => room_type.set(Some(t)),
                            Err(e) => log::warn!("room type {} unavailable: {}", type_id, e),
                        }
                    }
                }
                Err(e) => set_error.set(Some(format!("Could not load room: {}", e))),
            }
        });
    });

    // None while the dates do not form a stay.
    let stay = Memo::new(move |_| {
        let check_in_date = parse_iso_date(&check_in.get())?;
        let check_out_date = parse_iso_date(&check_out.get())?;
        (nights(check_in_date, check_out_date) > 0).then_some(AvailabilityQuery {
            check_in_date,
            check_out_date,
            guests,
        })
    });

    view! {
        {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
        {move || room.get().map(|room| {
            let images = room.images.clone();
            let thumbs = images.clone();
            let price_room = room.clone();
            let room_id = room.id;
            view! {
                <article class="room-detail">
                    <div class="room-detail__gallery">
                        {move || images.get(selected_image.get()).cloned().map(|src| view! {
                            <img class="room-detail__image" src=src />
                        })}
                        <div class="room-detail__thumbs">
                            {thumbs.into_iter().enumerate().map(|(i, src)| view! {
                                <img
                                    class=move || if selected_image.get() == i { "thumb thumb--active" } else { "thumb" }
                                    src=src
                                    on:click=move |_| selected_image.set(i)
                                />
                            }).collect_view()}
                        </div>
                    </div>

                    <div class="room-detail__info">
                        <h1>{room.title()}</h1>
                        <div class="room-detail__meta">
                            {format!("Room {} \u{b7} {}", room.room_number, room.room_type)}
                            {room.area.map(|a| format!(" \u{b7} {} m\u{b2}", a))}
                            {format!(" \u{b7} up to {} guest(s)", room.max_occupancy)}
                        </div>
                        {room.rating.map(|r| view! {
                            <div class="room-detail__rating">
                                {format!("\u{2605} {:.1} ({} reviews)", r, room.review_count)}
                            </div>
                        })}
                        <p>{room.description.clone()}</p>
                        {move || room_type.get().map(|t| view! {
                            <p class="room-detail__type">{t.description}</p>
                        })}
                        <h3>"Amenities"</h3>
                        <ul class="room-detail__amenities">
                            {room.amenities.iter().map(|a| view! { <li>{a.clone()}</li> }).collect_view()}
                        </ul>
                    </div>

                    <aside class="booking-box">
                        <div class="booking-box__price">
                            {format!("{} / night", format_currency(room.price_per_night))}
                        </div>
                        <label>
                            "Check-in"
                            <input type="date" min=to_iso(today) prop:value=move || check_in.get() on:change=move |ev| check_in.set(event_target_value(&ev)) />
                        </label>
                        <label>
                            "Check-out"
                            <input type="date" prop:value=move || check_out.get() on:change=move |ev| check_out.set(event_target_value(&ev)) />
                        </label>
                        {move || match stay.get() {
                            Some(s) => {
                                let total = total_price(&price_room, s.check_in_date, s.check_out_date);
                                view! {
                                    <div class="booking-box__total">
                                        <span>{format!("{} x {} night(s)", format_currency(price_room.price_per_night), s.nights())}</span>
                                        <strong>{format_currency(total)}</strong>
                                    </div>
                                    <A href=checkout_href(room_id, &s) attr:class="btn btn-primary">"Book now"</A>
                                }.into_any()
                            }
                            None => view! {
                                <div class="alert alert--warning">"Check-out must be after check-in"</div>
                            }.into_any(),
                        }}
                    </aside>
                </article>
            }
        })}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_checkout_href() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        let stay = AvailabilityQuery::new(d(1), d(4));
        assert_eq!(
            checkout_href(3, &stay),
            "/booking/checkout?checkInDate=2024-03-01&checkOutDate=2024-03-04&guests=1&roomId=3"
        );
    }
}
