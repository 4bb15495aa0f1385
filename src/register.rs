//! The sign-up page for creating a new account.
use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, PasswordHash, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base, link,
        loading_spinner, log_in_register, password_input, username_input,
    },
    internal_server_error::get_internal_server_error_redirect,
    user::create_user,
};

fn confirm_password_input(error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label
                for="confirm-password"
                class=(FORM_LABEL_STYLE)
            {
                "Confirm Password"
            }

            input
                type="password"
                name="confirm_password"
                id="confirm-password"
                placeholder="••••••••"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                autofocus[error_message.is_some()]
            ;

            @if let Some(error_message) = error_message
            {
                p class="text-red-500 text-base" { (error_message) }
            }
        }
    }
}

#[derive(Default)]
struct RegistrationFormErrors<'a> {
    username: Option<&'a str>,
    password: Option<&'a str>,
    confirm_password: Option<&'a str>,
}

fn registration_form(username: &str, errors: RegistrationFormErrors) -> Markup {
    html! {
        form
            hx-post=(endpoints::USERS)
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="space-y-4 md:space-y-6"
        {
            (username_input(username, errors.username))
            (password_input("", errors.password))
            (confirm_password_input(errors.confirm_password))

            button
                type="submit" id="submit-button" tabindex="0"
                class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Sign up"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "
                (link(endpoints::LOG_IN_VIEW, "Log in here"))
            }
        }
    }
}

/// The partial shown in place of the form once the account has been created.
///
/// Signing up does not log the new user in; they are pointed at the log-in
/// page instead.
fn registration_success() -> Markup {
    html! {
        div class="space-y-4"
        {
            p class="text-gray-900 dark:text-white"
            {
                "Your account has been created."
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                (link(endpoints::LOG_IN_VIEW, "Log in here"))
                " to start tracking your expenses."
            }
        }
    }
}

/// Display the sign-up page.
pub async fn get_register_page() -> Response {
    let registration_form = registration_form("", RegistrationFormErrors::default());
    let content = log_in_register("Create an account", &registration_form);
    base("Sign up", &[], &content).into_response()
}

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The database connection for creating users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The data submitted from the sign-up form.
#[derive(Deserialize)]
pub struct RegisterForm {
    /// The desired username.
    pub username: String,
    /// The desired password.
    pub password: String,
    /// A second copy of the password to catch typos.
    pub confirm_password: String,
}

/// Handler for sign-up requests via the POST method.
///
/// On success the form is replaced with a message directing the user to the
/// log-in page. On a validation error the form is returned with an inline
/// error message and the username preserved.
pub async fn post_register(
    State(state): State<RegistrationState>,
    Form(form): Form<RegisterForm>,
) -> Response {
    if form.username.trim().is_empty() {
        return registration_error_response(
            &form.username,
            RegistrationFormErrors {
                username: Some("Username cannot be empty."),
                ..Default::default()
            },
        );
    }

    if form.password.is_empty() {
        return registration_error_response(
            &form.username,
            RegistrationFormErrors {
                password: Some("Password cannot be empty."),
                ..Default::default()
            },
        );
    }

    if form.password != form.confirm_password {
        return registration_error_response(
            &form.username,
            RegistrationFormErrors {
                confirm_password: Some("Passwords do not match."),
                ..Default::default()
            },
        );
    }

    let password_hash = match PasswordHash::new(&form.password, PasswordHash::DEFAULT_COST) {
        Ok(password_hash) => password_hash,
        Err(error) => {
            tracing::error!("an error occurred while hashing a password: {error}");
            return get_internal_server_error_redirect();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return get_internal_server_error_redirect();
        }
    };

    match create_user(form.username.trim(), password_hash, &connection) {
        Ok(_) => registration_success().into_response(),
        Err(Error::DuplicateUsername(_)) => registration_error_response(
            &form.username,
            RegistrationFormErrors {
                username: Some("That username is taken. Choose a different username."),
                ..Default::default()
            },
        ),
        Err(error) => {
            tracing::error!("an error occurred while creating a user: {error}");
            get_internal_server_error_redirect()
        }
    }
}

fn registration_error_response(username: &str, errors: RegistrationFormErrors) -> Response {
    (StatusCode::OK, registration_form(username, errors)).into_response()
}
