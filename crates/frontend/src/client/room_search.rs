use chrono::Utc;
use contracts::domain::a004_room::{
    collect_amenities, filter_by_amenities, filter_by_price, total_price, AvailabilityQuery, Room,
    RoomType,
};
use contracts::shared::dates::{parse_iso_date, to_iso};
use contracts::shared::format::format_currency;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::use_query_map;
use thaw::*;

use super::stay_from_query;
use crate::domain::a004_room::api;
use crate::shared::api_utils::with_query;
use crate::shared::icons::icon;
use crate::shared::toast::use_toast;

/// What the result list currently shows.
#[derive(Clone, Debug, PartialEq)]
enum Results {
    Nothing,
    Available(AvailabilityQuery),
    RoomType(RoomType),
}

/// Blank means "no bound"; anything unparsable too.
fn parse_price(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| *v >= 0.0)
}

/// Link to a room page carrying the searched stay.
fn room_href(room_id: i64, stay: Option<&AvailabilityQuery>) -> String {
    let path = format!("/room/{}", room_id);
    match stay {
        Some(stay) => with_query(&path, stay).unwrap_or(path),
        None => path,
    }
}

#[component]
pub fn RoomSearchPage() -> impl IntoView {
    let toast = use_toast();
    let query = use_query_map();
    let today = Utc::now().date_naive();

    let initial = query.with_untracked(|q| stay_from_query(|k| q.get(k), today));
    let check_in = RwSignal::new(to_iso(initial.check_in_date));
    let check_out = RwSignal::new(to_iso(initial.check_out_date));
    let guests = RwSignal::new(initial.guests.to_string());

    let room_types: RwSignal<Vec<RoomType>> = RwSignal::new(Vec::new());
    let rooms: RwSignal<Vec<Room>> = RwSignal::new(Vec::new());
    let results = RwSignal::new(Results::Nothing);
    let (loading, set_loading) = signal(false);

    let min_price = RwSignal::new(String::new());
    let max_price = RwSignal::new(String::new());
    let wanted_amenities: RwSignal<Vec<String>> = RwSignal::new(Vec::new());

    let search = move || {
        let (Some(check_in_date), Some(check_out_date)) = (
            parse_iso_date(&check_in.get_untracked()),
            parse_iso_date(&check_out.get_untracked()),
        ) else {
            toast.warn("Search", "Pick check-in and check-out dates");
            return;
        };
        let stay = AvailabilityQuery {
            check_in_date,
            check_out_date,
            guests: guests.get_untracked().trim().parse().unwrap_or(1),
        };
        set_loading.set(true);
        spawn_local(async move {
            match api::fetch_available(&stay).await {
                Ok(found) => {
                    log::debug!("{} rooms available for {:?}", found.len(), stay);
                    wanted_amenities.set(Vec::new());
                    rooms.set(found);
                    results.set(Results::Available(stay));
                }
                Err(e) => toast.api_error("Search failed", &e),
            }
            set_loading.set(false);
        });
    };

    let browse_type = move |room_type: RoomType| {
        set_loading.set(true);
        spawn_local(async move {
            match api::fetch_room_type_rooms(room_type.id).await {
                Ok(found) => {
                    wanted_amenities.set(Vec::new());
                    rooms.set(found);
                    results.set(Results::RoomType(room_type));
                }
                Err(e) => toast.api_error("Could not load rooms", &e),
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| {
        spawn_local(async move {
            match api::fetch_room_types().await {
                Ok(types) => room_types.set(types),
                Err(e) => log::warn!("room types unavailable: {}", e),
            }
        });
        if query.with_untracked(|q| q.get("checkInDate").is_some()) {
            search();
        }
    });

    let amenities = Memo::new(move |_| rooms.with(|r| collect_amenities(r)));

    let visible = Memo::new(move |_| {
        let min = parse_price(&min_price.get()).unwrap_or(0.0);
        let max = parse_price(&max_price.get()).unwrap_or(f64::MAX);
        let priced = rooms.with(|r| filter_by_price(r, min, max));
        wanted_amenities.with(|wanted| filter_by_amenities(&priced, wanted))
    });

    let toggle_amenity = move |amenity: String| {
        wanted_amenities.update(|wanted| {
            if let Some(pos) = wanted.iter().position(|a| *a == amenity) {
                wanted.remove(pos);
            } else {
                wanted.push(amenity);
            }
        });
    };

    view! {
        <section class="hero">
            <h1>"Find your room"</h1>
            <form
                class="search-bar"
                on:submit=move |ev| {
                    ev.prevent_default();
                    search();
                }
            >
                <label>
                    "Check-in"
                    <input type="date" min=to_iso(today) prop:value=move || check_in.get() on:change=move |ev| check_in.set(event_target_value(&ev)) />
                </label>
                <label>
                    "Check-out"
                    <input type="date" prop:value=move || check_out.get() on:change=move |ev| check_out.set(event_target_value(&ev)) />
                </label>
                <label>
                    "Guests"
                    <input type="number" min="1" prop:value=move || guests.get() on:change=move |ev| guests.set(event_target_value(&ev)) />
                </label>
                <button type="submit" class="btn btn-primary" disabled=move || loading.get()>
                    {icon("search")}
                    {move || if loading.get() { " Searching..." } else { " Search" }}
                </button>
            </form>
        </section>

        <section class="room-types">
            <h2 class="section__title">"Our rooms"</h2>
            <div class="room-type-grid">
                <For
                    each=move || room_types.get()
                    key=|t| t.id
                    children=move |room_type| {
                        let card = room_type.clone();
                        view! {
                            <div class="room-type-card" on:click=move |_| browse_type(card.clone())>
                                <div class="room-type-card__name">{room_type.name.clone()}</div>
                                <div class="room-type-card__price">
                                    {format!("from {} / night", format_currency(room_type.base_price))}
                                </div>
                                <div class="room-type-card__meta">
                                    {format!("Up to {} guest(s)", room_type.max_occupancy)}
                                </div>
                            </div>
                        }
                    }
                />
            </div>
        </section>

        <Show when=move || results.with(|r| *r != Results::Nothing)>
            <section class="search-results">
                <aside class="search-filters">
                    <h3>"Price per night"</h3>
                    <Flex gap=FlexGap::Small>
                        <Input value=min_price placeholder="Min" />
                        <Input value=max_price placeholder="Max" />
                    </Flex>
                    <h3>"Amenities"</h3>
                    {move || amenities.get().into_iter().map(|amenity| {
                        let name = amenity.clone();
                        let checked = {
                            let name = amenity.clone();
                            move || wanted_amenities.with(|w| w.contains(&name))
                        };
                        view! {
                            <label class="form__checkbox">
                                <input
                                    type="checkbox"
                                    prop:checked=checked
                                    on:change=move |_| toggle_amenity(name.clone())
                                />
                                {format!(" {}", amenity)}
                            </label>
                        }
                    }).collect_view()}
                </aside>

                <div class="search-results__list">
                    <h2 class="section__title">
                        {move || match results.get() {
                            Results::Available(stay) => format!(
                                "{} room(s) available, {} night(s), {} guest(s)",
                                visible.with(|v| v.len()),
                                stay.nights(),
                                stay.guests
                            ),
                            Results::RoomType(room_type) => format!("{} rooms", room_type.name),
                            Results::Nothing => String::new(),
                        }}
                    </h2>
                    <Show
                        when=move || visible.with(|v| !v.is_empty())
                        fallback=|| view! { <p class="empty-state">"No rooms match your filters."</p> }
                    >
                        <div class="room-grid">
                            <For
                                each=move || visible.get()
                                key=|r| r.id
                                children=move |room| {
                                    let stay = match results.get_untracked() {
                                        Results::Available(stay) => Some(stay),
                                        _ => None,
                                    };
                                    view! { <RoomCard room=room stay=stay /> }
                                }
                            />
                        </div>
                    </Show>
                </div>
            </section>
        </Show>
    }
}

#[component]
fn RoomCard(room: Room, stay: Option<AvailabilityQuery>) -> impl IntoView {
    let href = room_href(room.id, stay.as_ref());
    let stay_total = stay.map(|s| {
        format!(
            "{} for {} night(s)",
            format_currency(total_price(&room, s.check_in_date, s.check_out_date)),
            s.nights()
        )
    });

    view! {
        <article class="room-card">
            {room.cover_image().map(|src| view! { <img class="room-card__image" src=src.to_string() alt=room.title() /> })}
            <div class="room-card__body">
                <h3 class="room-card__title">{room.title()}</h3>
                <div class="room-card__meta">
                    {format!("{} \u{b7} up to {} guest(s)", room.room_type, room.max_occupancy)}
                </div>
                <div class="room-card__amenities">{room.amenities.join(", ")}</div>
                <div class="room-card__price">{format!("{} / night", format_currency(room.price_per_night))}</div>
                {stay_total.map(|t| view! { <div class="room-card__total">{t}</div> })}
                <A href=href attr:class="btn btn-primary">"View room"</A>
            </div>
        </article>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price(" 500000 "), Some(500_000.0));
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("-5"), None);
    }

    #[test]
    fn test_room_href_carries_stay() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        let stay = AvailabilityQuery {
            check_in_date: d(5),
            check_out_date: d(7),
            guests: 2,
        };
        assert_eq!(
            room_href(9, Some(&stay)),
            "/room/9?checkInDate=2024-03-05&checkOutDate=2024-03-07&guests=2"
        );
        assert_eq!(room_href(9, None), "/room/9");
    }
}
