use contracts::domain::a003_review::{ReplyRequest, Review, ReviewForm, ReviewStatus};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a001_booking::api as bookings_api;
use crate::domain::a003_review::api;
use crate::shared::components::dialog::Dialog;
use crate::shared::icons::icon;
use crate::system::auth::context::use_auth;
use crate::system::users::api as users_api;

/// Form state of the review dialog, with the guest and room lookups.
#[derive(Clone, Copy)]
struct ReviewDetailsViewModel {
    form: RwSignal<ReviewForm>,
    error: RwSignal<Option<String>>,
    saving: RwSignal<bool>,
    looking_up: RwSignal<bool>,
}

impl ReviewDetailsViewModel {
    fn new(review: Option<&Review>) -> Self {
        Self {
            form: RwSignal::new(review.map(ReviewForm::from_review).unwrap_or_default()),
            error: RwSignal::new(None),
            saving: RwSignal::new(false),
            looking_up: RwSignal::new(false),
        }
    }

    /// Fills the guest name from the user record.
    fn lookup_guest(&self) {
        let Some(user_id) = self.form.with_untracked(|f| f.user_id) else {
            self.error.set(Some("Enter a user id first".into()));
            return;
        };
        let vm = *self;
        vm.looking_up.set(true);
        spawn_local(async move {
            match users_api::fetch_user(user_id).await {
                Ok(user) => {
                    vm.error.set(None);
                    vm.form.update(|f| f.guest_name = user.display_name());
                }
                Err(e) => vm.error.set(Some(format!("User #{} not found: {}", user_id, e))),
            }
            vm.looking_up.set(false);
        });
    }

    /// Fills the room from the first room of the booking.
    fn lookup_room(&self) {
        let Some(booking_id) = self.form.with_untracked(|f| f.booking_id) else {
            self.error.set(Some("Enter a booking id first".into()));
            return;
        };
        let vm = *self;
        vm.looking_up.set(true);
        spawn_local(async move {
            match bookings_api::fetch_by_id(booking_id).await {
                Ok(booking) => {
                    vm.error.set(None);
                    let room = booking.rooms.first().cloned();
                    vm.form.update(|f| {
                        if f.user_id.is_none() {
                            f.user_id = booking.user_id;
                        }
                        if f.guest_name.is_empty() {
                            f.guest_name = booking.full_name.clone();
                        }
                        if let Some(room) = room {
                            f.room_number = room.room_number;
                            f.room_type = room.room_type;
                        }
                    });
                }
                Err(e) => vm.error.set(Some(format!("Booking #{} not found: {}", booking_id, e))),
            }
            vm.looking_up.set(false);
        });
    }

    fn save(&self, on_saved: Callback<String>) {
        let current = self.form.get_untracked();
        if let Err(e) = current.validate() {
            self.error.set(Some(e.to_string()));
            return;
        }
        let vm = *self;
        vm.error.set(None);
        vm.saving.set(true);
        spawn_local(async move {
            match api::save(&current).await {
                Ok(()) => on_saved.run(if current.is_edit() {
                    "Review updated".to_string()
                } else {
                    "Review created".to_string()
                }),
                Err(e) => vm.error.set(Some(e.to_string())),
            }
            vm.saving.set(false);
        });
    }
}

fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

#[component]
fn ScoreSelect(
    label: &'static str,
    form: RwSignal<ReviewForm>,
    get: fn(&ReviewForm) -> u8,
    set: fn(&mut ReviewForm, u8),
) -> impl IntoView {
    view! {
        <div class="form__group">
            <label>{label}</label>
            <select
                prop:value=move || form.with(get).to_string()
                on:change=move |ev| {
                    let score = event_target_value(&ev).parse().unwrap_or(0);
                    form.update(|f| set(f, score));
                }
            >
                {(1..=5u8).map(|n| view! { <option value=n.to_string()>{"\u{2605}".repeat(n as usize)}</option> }).collect_view()}
            </select>
        </div>
    }
}

#[component]
pub fn ReviewDetails(
    review: Option<Review>,
    on_saved: Callback<String>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let vm = ReviewDetailsViewModel::new(review.as_ref());
    let form = vm.form;
    let title = match &review {
        Some(r) => format!("Edit review #{}", r.id),
        None => "New review".to_string(),
    };

    view! {
        <Dialog title=title on_close=on_cancel width="760px">
            <div class="modal-body">
                {move || vm.error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
                <div class="form__grid">
                    <div class="form__group">
                        <label>"User id"</label>
                        <div class="input-with-button">
                            <input
                                type="number"
                                prop:value=move || form.with(|f| f.user_id.map(|id| id.to_string()).unwrap_or_default())
                                on:change=move |ev| {
                                    let id = parse_id(&event_target_value(&ev));
                                    form.update(|f| f.user_id = id);
                                }
                            />
                            <Button
                                size=ButtonSize::Small
                                on_click=move |_| vm.lookup_guest()
                                disabled=Signal::derive(move || vm.looking_up.get())
                            >
                                {icon("search")}
                            </Button>
                        </div>
                        <span class="form__hint">{move || form.with(|f| f.guest_name.clone())}</span>
                    </div>
                    <div class="form__group">
                        <label>"Booking id"</label>
                        <div class="input-with-button">
                            <input
                                type="number"
                                prop:value=move || form.with(|f| f.booking_id.map(|id| id.to_string()).unwrap_or_default())
                                on:change=move |ev| {
                                    let id = parse_id(&event_target_value(&ev));
                                    form.update(|f| f.booking_id = id);
                                }
                            />
                            <Button
                                size=ButtonSize::Small
                                on_click=move |_| vm.lookup_room()
                                disabled=Signal::derive(move || vm.looking_up.get())
                            >
                                {icon("search")}
                            </Button>
                        </div>
                        <span class="form__hint">
                            {move || form.with(|f| {
                                if f.room_number.is_empty() {
                                    String::new()
                                } else {
                                    format!("Room {} ({})", f.room_number, f.room_type)
                                }
                            })}
                        </span>
                    </div>

                    <ScoreSelect label="Overall" form=form get=|f| f.rating set=|f, v| f.rating = v />
                    <ScoreSelect label="Cleanliness" form=form get=|f| f.cleanliness set=|f, v| f.cleanliness = v />
                    <ScoreSelect label="Service" form=form get=|f| f.service set=|f, v| f.service = v />
                    <ScoreSelect label="Comfort" form=form get=|f| f.comfort set=|f, v| f.comfort = v />
                    <ScoreSelect label="Location" form=form get=|f| f.location set=|f, v| f.location = v />
                    <ScoreSelect label="Facilities" form=form get=|f| f.facilities set=|f, v| f.facilities = v />
                    <ScoreSelect label="Value for money" form=form get=|f| f.value_for_money set=|f, v| f.value_for_money = v />

                    <Show when=move || form.with(|f| f.is_edit())>
                        <div class="form__group">
                            <label>"Status"</label>
                            <select
                                prop:value=move || form.with(|f| f.status.as_ref().map(|s| s.code().to_string()).unwrap_or_default())
                                on:change=move |ev| {
                                    let status = ReviewStatus::from(event_target_value(&ev));
                                    form.update(|f| f.status = Some(status));
                                }
                            >
                                {ReviewStatus::ALL.iter().map(|status| {
                                    view! { <option value=status.code().to_string()>{status.label().to_string()}</option> }
                                }).collect_view()}
                            </select>
                        </div>
                        <div class="form__group">
                            <label class="form__checkbox">
                                <input
                                    type="checkbox"
                                    prop:checked=move || form.with(|f| f.is_featured.unwrap_or(false))
                                    on:change=move |ev| {
                                        let featured = event_target_checked(&ev);
                                        form.update(|f| f.is_featured = Some(featured));
                                    }
                                />
                                " Featured"
                            </label>
                        </div>
                    </Show>
                    <div class="form__group">
                        <label class="form__checkbox">
                            <input
                                type="checkbox"
                                prop:checked=move || form.with(|f| f.is_anonymous)
                                on:change=move |ev| {
                                    let anonymous = event_target_checked(&ev);
                                    form.update(|f| f.is_anonymous = anonymous);
                                }
                            />
                            " Anonymous"
                        </label>
                    </div>
                </div>
                <div class="form__group">
                    <label>"Comment"</label>
                    <textarea
                        rows="4"
                        prop:value=move || form.with(|f| f.comment.clone())
                        on:input=move |ev| {
                            let comment = event_target_value(&ev);
                            form.update(|f| f.comment = comment);
                        }
                    />
                </div>
            </div>
            <div class="modal-footer">
                <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_cancel.run(())>
                    "Cancel"
                </Button>
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=move |_| vm.save(on_saved)
                    disabled=Signal::derive(move || vm.saving.get())
                >
                    {move || if vm.saving.get() { "Saving..." } else { "Save" }}
                </Button>
            </div>
        </Dialog>
    }
}

/// Staff answer to a review, signed with the staff username.
#[component]
pub fn ReplyDialog(review: Review, on_saved: Callback<String>, on_cancel: Callback<()>) -> impl IntoView {
    let auth = use_auth();
    let text = RwSignal::new(review.reply_comment.clone().unwrap_or_default());
    let (error, set_error) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);
    let review_id = review.id;

    let on_send = move |_| {
        let author = auth.staff_username().unwrap_or_else(|| "Hotel staff".to_string());
        let request = ReplyRequest::new(text.get_untracked(), author);
        if let Err(e) = request.validate() {
            set_error.set(Some(e.to_string()));
            return;
        }
        set_saving.set(true);
        spawn_local(async move {
            match api::reply(review_id, &request).await {
                Ok(()) => on_saved.run(format!("Reply sent to review #{}", review_id)),
                Err(e) => set_error.set(Some(e.to_string())),
            }
            set_saving.set(false);
        });
    };

    view! {
        <Dialog title=format!("Reply to {}", review.guest_display_name()) on_close=on_cancel>
            <div class="modal-body">
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
                <blockquote class="review-quote">{review.comment.clone()}</blockquote>
                <textarea
                    rows="5"
                    placeholder="Write a reply..."
                    prop:value=move || text.get()
                    on:input=move |ev| text.set(event_target_value(&ev))
                />
            </div>
            <div class="modal-footer">
                <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_cancel.run(())>
                    "Cancel"
                </Button>
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=on_send
                    disabled=Signal::derive(move || saving.get())
                >
                    {icon("reply")}
                    " Send"
                </Button>
            </div>
        </Dialog>
    }
}

#[cfg(test)]
mod tests {
    use super::parse_id;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id(" 12 "), Some(12));
        assert_eq!(parse_id("0"), None);
        assert_eq!(parse_id("abc"), None);
    }
}
