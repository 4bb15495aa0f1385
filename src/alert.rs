//! Alert fragments for displaying success and error messages to users.
//!
//! Alerts are rendered as HTMX out-of-band swaps targeting the alert
//! container in the page shell, so a failed mutation can surface a message
//! without replacing the element that triggered it.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

/// Render `markup` as an HTML response with the given status code.
#[inline]
pub fn render(status_code: StatusCode, markup: Markup) -> Response {
    (status_code, markup).into_response()
}

/// A green alert confirming that an action succeeded.
pub fn alert_success(message: &str, details: &str) -> Markup {
    alert(
        message,
        details,
        "p-4 mb-4 text-sm text-green-800 rounded-lg bg-green-50 \
        dark:bg-gray-800 dark:text-green-400",
    )
}

/// A red alert explaining why an action failed.
pub fn alert_error(message: &str, details: &str) -> Markup {
    alert(
        message,
        details,
        "p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50 \
        dark:bg-gray-800 dark:text-red-400",
    )
}

fn alert(message: &str, details: &str, style: &str) -> Markup {
    html! {
        div
            id="alert-container"
            hx-swap-oob="true"
            class="w-full max-w-md px-4"
            style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
        {
            div class=(style) role="alert"
            {
                span class="font-medium" { (message) }
                @if !details.is_empty() {
                    " "
                    (details)
                }
            }
        }
    }
}
