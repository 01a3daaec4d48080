use contracts::domain::a004_room::{Room, RoomType};
use contracts::shared::error::ApiError;
use contracts::shared::format::format_currency;
use contracts::system::access::Page;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a004_room::api;
use crate::shared::components::sort_header::{next_sort, SortHeader};
use crate::shared::icons::icon;
use crate::shared::list_utils::{filter_list, sort_list};
use crate::system::auth::context::use_auth;
use crate::system::auth::guard::RequireStaff;

/// Server query behind the rooms table.
#[derive(Clone, Debug, PartialEq)]
enum RoomSource {
    All,
    Type(i64),
    Occupancy(u32),
}

async fn fetch_rooms(source: RoomSource) -> Result<Vec<Room>, ApiError> {
    match source {
        RoomSource::All => api::fetch_all_rooms().await,
        RoomSource::Type(id) => api::fetch_rooms_by_type(id).await,
        RoomSource::Occupancy(guests) => api::fetch_rooms_by_occupancy(guests).await,
    }
}

#[component]
pub fn RoomsListPage() -> impl IntoView {
    view! {
        <RequireStaff page=Page::Rooms>
            <RoomsList />
        </RequireStaff>
    }
}

#[component]
fn RoomsList() -> impl IntoView {
    let auth = use_auth();
    let rooms: RwSignal<Vec<Room>> = RwSignal::new(Vec::new());
    let room_types: RwSignal<Vec<RoomType>> = RwSignal::new(Vec::new());
    let source = RwSignal::new(RoomSource::All);
    let (error, set_error) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(false);
    let search = RwSignal::new(String::new());
    let guests_input = RwSignal::new(String::new());
    let sort_field = RwSignal::new("room_number".to_string());
    let sort_ascending = RwSignal::new(true);

    let load_rooms = move || {
        let current = source.get_untracked();
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            match fetch_rooms(current).await {
                Ok(list) => rooms.set(list),
                Err(e) => {
                    auth.on_api_error(&e);
                    set_error.set(Some(format!("Failed to load rooms: {}", e)));
                }
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| {
        source.track();
        load_rooms();
    });

    Effect::new(move |_| {
        spawn_local(async move {
            match api::fetch_room_types().await {
                Ok(types) => room_types.set(types),
                Err(e) => log::warn!("room types unavailable: {}", e),
            }
        });
    });

    let visible = Memo::new(move |_| {
        let needle = search.get();
        let mut list = rooms.with(|all| filter_list(all, &needle));
        sort_list(&mut list, &sort_field.get(), sort_ascending.get());
        list
    });

    let on_sort = Callback::new(move |field: &'static str| {
        let (next_field, ascending) =
            next_sort(&sort_field.get_untracked(), sort_ascending.get_untracked(), field);
        sort_field.set(next_field);
        sort_ascending.set(ascending);
    });

    let apply_guests = move || match guests_input.get_untracked().trim().parse::<u32>() {
        Ok(guests) if guests > 0 => source.set(RoomSource::Occupancy(guests)),
        _ => source.set(RoomSource::All),
    };

    view! {
        <div class="page">
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Rooms"</h1>
                    <Badge>{move || visible.with(|v| v.len()).to_string()}</Badge>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| load_rooms()
                        disabled=Signal::derive(move || loading.get())
                    >
                        {icon("refresh")}
                        {move || if loading.get() { " Loading..." } else { " Refresh" }}
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

                <h2 class="section__title">"Room types"</h2>
                <div class="room-type-grid">
                    <For
                        each=move || room_types.get()
                        key=|t| t.id
                        children=move |room_type| {
                            let id = room_type.id;
                            let active = move || source.get() == RoomSource::Type(id);
                            view! {
                                <div
                                    class=move || if active() { "room-type-card room-type-card--active" } else { "room-type-card" }
                                    on:click=move |_| {
                                        if active() {
                                            source.set(RoomSource::All);
                                        } else {
                                            source.set(RoomSource::Type(id));
                                        }
                                    }
                                >
                                    <div class="room-type-card__name">{room_type.name.clone()}</div>
                                    <div class="room-type-card__price">
                                        {format!("from {}", format_currency(room_type.base_price))}
                                    </div>
                                    <div class="room-type-card__meta">
                                        {format!("Up to {} guest(s)", room_type.max_occupancy)}
                                    </div>
                                    <div class="room-type-card__desc">{room_type.description.clone()}</div>
                                </div>
                            }
                        }
                    />
                </div>

                <div class="filter-panel">
                    <div class="filter-panel-content">
                        <Flex gap=FlexGap::Small align=FlexAlign::End>
                            <div style="flex: 1; max-width: 280px;">
                                <Input value=search placeholder="Room number, name or type..." />
                            </div>
                            <div style="max-width: 140px;">
                                <Input value=guests_input placeholder="Guests" />
                            </div>
                            <Button appearance=ButtonAppearance::Secondary on_click=move |_| apply_guests()>
                                "Fits guests"
                            </Button>
                            <Button
                                appearance=ButtonAppearance::Secondary
                                on_click=move |_| {
                                    search.set(String::new());
                                    guests_input.set(String::new());
                                    source.set(RoomSource::All);
                                }
                            >
                                "Reset"
                            </Button>
                        </Flex>
                    </div>
                </div>

                <div class="table-wrapper">
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                <SortHeader label="Room" field="room_number" sort_field=sort_field ascending=sort_ascending on_sort=on_sort />
                                <TableHeaderCell min_width=160.0>"Name"</TableHeaderCell>
                                <SortHeader label="Type" field="room_type" sort_field=sort_field ascending=sort_ascending on_sort=on_sort />
                                <SortHeader label="Price / night" field="price_per_night" sort_field=sort_field ascending=sort_ascending on_sort=on_sort min_width=130.0 />
                                <SortHeader label="Guests" field="max_occupancy" sort_field=sort_field ascending=sort_ascending on_sort=on_sort />
                                <TableHeaderCell min_width=220.0>"Amenities"</TableHeaderCell>
                                <TableHeaderCell min_width=90.0>"Status"</TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || visible.get()
                                key=|r| r.id
                                children=move |room| {
                                    let number = room.room_number.clone();
                                    let title = room.title();
                                    let room_type = room.room_type.clone();
                                    let price = format_currency(room.price_per_night);
                                    let guests = room.max_occupancy;
                                    let amenities = room.amenities.join(", ");
                                    let status = room.status.clone().unwrap_or_else(|| "-".to_string());
                                    view! {
                                        <TableRow>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <span style="font-weight: 500;">{number}</span>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{title}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{room_type}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{price}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{guests}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{amenities}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <span class="badge badge--neutral">
                                                    {status}
                                                </span>
                                            </TableCell>
                                        </TableRow>
                                    }
                                }
                            />
                        </TableBody>
                    </Table>
                </div>
            </div>
        </div>
    }
}
