use chrono::Local;
use contracts::domain::a001_booking::{BookingForm, BookingStatus};
use contracts::domain::a004_room::Room;
use contracts::shared::error::ApiError;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a001_booking::api;
use crate::domain::a004_room::api as rooms_api;
use crate::shared::api_utils::ApiClient;

/// State and commands of the booking create/edit dialog.
#[derive(Clone, Copy)]
pub struct BookingDetailsViewModel {
    pub form: RwSignal<BookingForm>,
    pub rooms: RwSignal<Vec<Room>>,
    pub error: RwSignal<Option<String>>,
    pub loading: RwSignal<bool>,
    pub saving: RwSignal<bool>,
}

impl BookingDetailsViewModel {
    pub fn new() -> Self {
        Self {
            form: RwSignal::new(BookingForm::new_default(Local::now().date_naive())),
            rooms: RwSignal::new(Vec::new()),
            error: RwSignal::new(None),
            loading: RwSignal::new(false),
            saving: RwSignal::new(false),
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        self.form.with(|f| f.is_edit())
    }

    /// Statuses selectable in the form: the current one plus its lifecycle
    /// successors when editing, every status when creating.
    pub fn status_options(&self) -> Vec<BookingStatus> {
        self.form.with(|f| match (&f.status, f.is_edit()) {
            (Some(current), true) => {
                let mut options = vec![current.clone()];
                options.extend(current.next_statuses());
                options
            }
            _ => BookingStatus::ALL.to_vec(),
        })
    }

    /// Loads the room list and, when editing, the full booking by id.
    pub fn load(&self, id: Option<i64>) {
        let vm = *self;
        vm.loading.set(true);
        spawn_local(async move {
            match rooms_api::fetch_all_rooms().await {
                Ok(rooms) => vm.rooms.set(rooms),
                Err(e) => log::warn!("room list unavailable: {}", e),
            }
            if let Some(id) = id {
                match api::fetch_by_id(id).await {
                    Ok(booking) => vm.form.set(BookingForm::from_booking(&booking)),
                    Err(e) => vm.error.set(Some(format!("Failed to load booking: {}", e))),
                }
            }
            vm.loading.set(false);
        });
    }

    pub fn toggle_room(&self, room_id: i64, selected: bool) {
        self.form.update(|f| {
            f.room_ids.retain(|id| *id != room_id);
            if selected {
                f.room_ids.push(room_id);
            }
        });
    }

    /// Validates and saves; `on_saved` receives the success message.
    pub fn save_command(&self, on_saved: Callback<String>) {
        let current = self.form.get_untracked();
        if let Err(e) = current.validate() {
            self.error.set(Some(e.to_string()));
            return;
        }
        let vm = *self;
        vm.error.set(None);
        vm.saving.set(true);
        spawn_local(async move {
            let result: Result<String, ApiError> = if current.is_edit() {
                api::update(&current)
                    .await
                    .map(|_| format!("Booking #{} updated", current.id.unwrap_or_default()))
            } else {
                api::create(ApiClient::admin(), &current)
                    .await
                    .map(|_| format!("Booking for {} created", current.full_name))
            };
            vm.saving.set(false);
            match result {
                Ok(message) => on_saved.run(message),
                Err(e) => vm.error.set(Some(e.to_string())),
            }
        });
    }
}

impl Default for BookingDetailsViewModel {
    fn default() -> Self {
        Self::new()
    }
}
