pub mod connections;
pub mod opening_hours;
pub mod postal_codes;
pub mod roots;
pub mod versions;

use chrono::NaiveDateTime;

/// Configures the web app by adding services from each web file.
///
/// @see https://docs.rs/actix-web/4/actix_web/struct.App.html#method.configure
pub fn configure(conf: &mut actix_web::web::ServiceConfig) {
    // Route resolution stops at the first match, so the fixed prefixes go
    // before the `/api/{kind}` routes.
    versions::configure(conf);
    opening_hours::configure(conf);
    postal_codes::configure(conf);
    connections::configure(conf);
    roots::configure(conf);
}

/// Request time used by every state change.
pub(crate) fn now() -> NaiveDateTime {
    chrono::Utc::now().naive_utc()
}
