use contracts::system::access::ADMIN_HOME_PATH;
use leptos::prelude::*;
use leptos_router::components::{ParentRoute, Redirect, Route, Router, Routes};
use leptos_router::path;

use crate::client::checkout::CheckoutPage;
use crate::client::my_bookings::MyBookingsPage;
use crate::client::room_detail::RoomDetailPage;
use crate::client::room_search::RoomSearchPage;
use crate::client::ClientShell;
use crate::dashboards::StatisticsDashboard;
use crate::domain::a001_booking::ui::list::BookingsListPage;
use crate::domain::a002_discount::ui::list::DiscountsListPage;
use crate::domain::a003_review::ui::list::ReviewsListPage;
use crate::domain::a004_room::ui::list::RoomsListPage;
use crate::layout::AdminShell;
use crate::system::pages::access_denied::AccessDeniedPage;
use crate::system::pages::login::LoginPage;
use crate::system::users::ui::list::UsersListPage;

#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="empty-state">
            <h1>"Page not found"</h1>
            <a href="/">"Back to the hotel"</a>
        </div>
    }
}

/// Back-office pages guard themselves by role; the customer site is public
/// except for checkout and "my bookings".
#[component]
pub fn AppRoutes() -> impl IntoView {
    view! {
        <Router>
            <Routes fallback=|| view! { <NotFound /> }>
                <ParentRoute path=path!("/admin") view=AdminShell>
                    <Route path=path!("") view=|| view! { <Redirect path=ADMIN_HOME_PATH /> } />
                    <Route path=path!("dashboard") view=StatisticsDashboard />
                    <Route path=path!("bookings") view=BookingsListPage />
                    <Route path=path!("rooms") view=RoomsListPage />
                    <Route path=path!("reviews") view=ReviewsListPage />
                    <Route path=path!("discounts") view=DiscountsListPage />
                    <Route path=path!("users") view=UsersListPage />
                </ParentRoute>
                <Route path=path!("/auth/login") view=LoginPage />
                <Route path=path!("/auth/access") view=AccessDeniedPage />
                <ParentRoute path=path!("") view=ClientShell>
                    <Route path=path!("") view=RoomSearchPage />
                    <Route path=path!("rooms") view=RoomSearchPage />
                    <Route path=path!("room/:id") view=RoomDetailPage />
                    <Route path=path!("booking/checkout") view=CheckoutPage />
                    <Route path=path!("bookings") view=MyBookingsPage />
                </ParentRoute>
            </Routes>
        </Router>
    }
}
