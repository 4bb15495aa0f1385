//! Cookie-based session authentication.
//!
//! A successful log-in stores a JSON [token::Token] in an encrypted private
//! cookie. The [middleware::auth_guard] middleware validates the token on
//! protected routes and injects the [crate::user::UserID] as a request
//! extension.

mod cookie;
mod middleware;
mod token;

pub(crate) use cookie::{
    COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, get_token_from_cookies, invalidate_auth_cookie,
    set_auth_cookie,
};
pub(crate) use middleware::{AuthState, auth_guard, auth_guard_hx};
