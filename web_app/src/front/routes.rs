//! Frontend route configuration module.
//!
//! Routes are grouped by resource into scopes; handlers answer with JSON.

use super::{adopt, applications, auth, dashboard, favorites, notifications, pets, server, vets};
use ntex::web;

/// Login, logout, the entry point and the per-user dashboard.
///
/// # Routes
/// - `GET /` - Google login url
/// - `GET /google_callback` - OAuth callback
/// - `POST /logout` - Sign out
/// - `GET /dashboard` - Applications, favorites and notifications of the caller
pub fn account(cfg: &mut web::ServiceConfig) {
    cfg.service((
        server::index,
        auth::google_callback,
        auth::logout,
        dashboard::get_dashboard,
    ));
}

/// Pet catalogue.
///
/// # Routes
/// - `GET /pets` - List with `search`, `type` and `gender` filters
/// - `GET /pets/{slug}` - Pet detail
/// - `POST /pets/new` - Create a pet (multipart with image)
pub fn pet_catalogue(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/pets").service((
        pets::list_pets,
        pets::create_pet,
        pets::get_pet_detail,
    )));
}

/// Adoption applications.
///
/// # Routes
/// - `GET /adopt/prefill` - Contact details of the latest application
/// - `POST /adopt/{slug}` - Submit an application
/// - `GET /applications/mine` - Caller's applications, paginated
/// - `GET /applications/received` - Applications for the caller's pets
/// - `POST /applications/{id}/accept` - Accept
/// - `POST /applications/{id}/reject` - Reject
/// - `DELETE /applications/{id}` - Cancel a pending application
pub fn adoption(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/adopt").service((adopt::get_prefill, adopt::submit_application)))
        .service(web::scope("/applications").service((
            applications::list_mine,
            applications::list_received,
            applications::accept,
            applications::reject,
            applications::cancel,
        )));
}

/// Favorites of the caller.
///
/// # Routes
/// - `GET /favorites` - Favorites with pet summary
/// - `GET /favorites/{pet_id}` - Whether the pet is liked
/// - `PUT /favorites/{pet_id}` - Add
/// - `DELETE /favorites/{pet_id}` - Remove
/// - `POST /favorites/{pet_id}/toggle` - Flip the liked state
pub fn favorite_pets(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/favorites").service((
        favorites::list_favorites,
        favorites::is_favorited,
        favorites::add_favorite,
        favorites::remove_favorite,
        favorites::toggle_favorite,
    )));
}

/// Notification inbox.
///
/// # Routes
/// - `GET /notifications` - Most recent notifications and unread count
/// - `GET /notifications/stream` - Server-sent events feed
/// - `POST /notifications/read-all` - Mark every notification read
/// - `POST /notifications/{id}/read` - Mark one notification read
pub fn notification_inbox(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/notifications").service((
        notifications::list_notifications,
        notifications::stream_notifications,
        notifications::mark_all_read,
        notifications::mark_read,
    )));
}

/// Vet directory and nearby search.
///
/// # Routes
/// - `GET /vets` - Directory, optionally by `city`
/// - `GET /api/nearby-vets` - Clinics near `lat`/`lng`
pub fn vet_directory(cfg: &mut web::ServiceConfig) {
    cfg.service((vets::list_vets, vets::nearby_vets));
}
