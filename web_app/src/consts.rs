pub const CSRF_TOKEN_COOKIE_NAME: &str = "csrf_token";
pub const CSRF_STATE_COOKIE_NAME: &str = "csrf_state";
pub const REDIRECT_TO_COOKIE_NAME: &str = "redirect_to";
pub const GOOGLE_ENDPOINT_USER_INFO: &str = "https://openidconnect.googleapis.com/v1/userinfo";
pub const GOOGLE_ENDPOINT_REVOKE_TOKEN: &str = "https://oauth2.googleapis.com/revoke";

pub const PLACES_NEARBY_ENDPOINT: &str =
    "https://maps.googleapis.com/maps/api/place/nearbysearch/json";
pub const PLACES_NEARBY_KEYWORD: &str = "veterinary pet hospital animal clinic";
pub const PLACES_NEARBY_TYPE: &str = "veterinary_care";
pub const DEFAULT_NEARBY_RADIUS_METERS: u32 = 4000;

pub const PIC_PET_MAX_SIZE_BYTES: usize = 6_000_000;
pub const ACCEPTED_IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpeg", "jpg", "webp"];

pub const PET_MIN_AGE_YEARS: u32 = 1;
pub const PET_MAX_AGE_YEARS: u32 = 50;
pub const PET_MAX_WEIGHT_KG: f64 = 150.0;

pub const APPLICATIONS_PAGE_SIZE: usize = 5;
pub const NOTIFICATIONS_LIST_LIMIT: i64 = 20;
pub const NOTIFICATION_FEED_CAPACITY: usize = 256;

pub const MAX_AGE_COOKIES: i64 = chrono::TimeDelta::hours(4).num_seconds();
