pub mod admin_auth;
pub mod admins;
pub mod auth;
pub mod contact;
pub mod members;
pub mod messages;
pub mod users;

use cookie::Cookie;

/// Session cookie shared by login and logout handlers. An empty value with
/// max age zero expires the cookie on the client.
pub(crate) fn session_cookie(name: &'static str, value: String) -> Cookie<'static> {
    let mut c = Cookie::new(name, value);
    c.set_path("/");
    c.set_http_only(true);
    c.set_same_site(cookie::SameSite::Lax);
    c
}

pub(crate) fn expired_session_cookie(name: &'static str) -> Cookie<'static> {
    let mut c = session_cookie(name, String::new());
    c.set_max_age(cookie::time::Duration::ZERO);
    c
}
