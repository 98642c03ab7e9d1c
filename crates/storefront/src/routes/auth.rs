//! Authentication route handlers.
//!
//! Email and password login, signup and logout. Failed submissions re-render
//! the form with a message instead of redirecting.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use harvest_hub_core::UserRole;

use super::NavView;
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::MIN_PASSWORD_LENGTH;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

/// Shown for any failed login, whichever half was wrong.
const INVALID_LOGIN_MESSAGE: &str = "Invalid email or password.";

/// Shown when something other than the user's input went wrong.
const TRY_AGAIN_MESSAGE: &str = "Something went wrong. Please try again.";

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Signup form data.
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Query parameters for the login page.
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub signed_up: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub nav: NavView,
    pub email: String,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "signup.html")]
pub struct SignupTemplate {
    pub nav: NavView,
    pub name: String,
    pub email: String,
    pub error: Option<String>,
}

// =============================================================================
// Login
// =============================================================================

/// Display the login page.
pub async fn login_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<LoginQuery>,
) -> LoginTemplate {
    LoginTemplate {
        nav: NavView::for_user(user.as_ref()),
        email: String::new(),
        error: None,
        success: query
            .signed_up
            .map(|_| "Account created. You can log in now.".to_string()),
    }
}

/// Handle login form submission.
///
/// Admins land on `/admin`, everyone else on `/`.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let failed = |message: &str| LoginTemplate {
        nav: NavView::default(),
        email: form.email.clone(),
        error: Some(message.to_string()),
        success: None,
    };

    let user = match AuthService::new(state.pool())
        .login(&form.email, &form.password)
        .await
    {
        Ok(user) => user,
        Err(AuthError::InvalidCredentials) => {
            tracing::info!("Login rejected");
            return failed(INVALID_LOGIN_MESSAGE).into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "Login failed");
            return failed(TRY_AGAIN_MESSAGE).into_response();
        }
    };

    let current = CurrentUser::from(user);
    if let Err(e) = set_current_user(&session, &current).await {
        tracing::error!(error = %e, "Failed to set session");
        return failed(TRY_AGAIN_MESSAGE).into_response();
    }
    set_sentry_user(&current.id, Some(current.email.as_str()));
    tracing::info!(user_id = %current.id, role = %current.role, "User logged in");

    let destination = if current.is_admin() { "/admin" } else { "/" };
    Redirect::to(destination).into_response()
}

// =============================================================================
// Signup
// =============================================================================

/// Display the signup page.
pub async fn signup_page(OptionalAuth(user): OptionalAuth) -> SignupTemplate {
    SignupTemplate {
        nav: NavView::for_user(user.as_ref()),
        name: String::new(),
        email: String::new(),
        error: None,
    }
}

/// Handle signup form submission.
///
/// New accounts always get the customer role.
pub async fn signup(State(state): State<AppState>, Form(form): Form<SignupForm>) -> Response {
    match AuthService::new(state.pool())
        .register(&form.name, &form.email, &form.password, UserRole::Customer)
        .await
    {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "User signed up");
            Redirect::to("/login?signed_up=1").into_response()
        }
        Err(e) => {
            let message = signup_error_message(&e);
            if matches!(e, AuthError::Repository(_) | AuthError::PasswordHash) {
                tracing::error!(error = %e, "Signup failed");
            } else {
                tracing::info!(error = %e, "Signup rejected");
            }
            SignupTemplate {
                nav: NavView::default(),
                name: form.name,
                email: form.email,
                error: Some(message),
            }
            .into_response()
        }
    }
}

fn signup_error_message(error: &AuthError) -> String {
    match error {
        AuthError::MissingName => "Please enter your name.".to_string(),
        AuthError::InvalidEmail(_) => "Please enter a valid email address.".to_string(),
        AuthError::WeakPassword(_) => {
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters.")
        }
        AuthError::UserAlreadyExists => "An account with this email already exists.".to_string(),
        AuthError::InvalidCredentials | AuthError::Repository(_) | AuthError::PasswordHash => {
            TRY_AGAIN_MESSAGE.to_string()
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Log out and return to the home page.
pub async fn logout(session: Session) -> Redirect {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!(error = %e, "Failed to clear session");
    }
    clear_sentry_user();
    Redirect::to("/")
}
