//! Route guard layer.
//!
//! Pure decision functions over a session snapshot; no I/O, no state. The UI
//! layer evaluates them on every relevant navigation and re-evaluates through
//! the session store's `watch` subscription whenever the session changes.
//!
//! None of these run while `is_checking_auth` holds - the startup auth probe
//! must settle before protected content may render at all.

use crate::stores::SessionState;

/// Where a navigation attempt lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Render the requested content.
    Render,
    /// Send the visitor to the login page.
    RedirectToLogin,
    /// Send the visitor to the email-verification page.
    RedirectToVerifyEmail,
    /// Send the visitor back to the home page.
    RedirectToHome,
}

/// Guard for the protected area (home, profile, search, cart, order status).
///
/// Unauthenticated visitors go to login; authenticated but unverified users
/// go to email verification.
#[must_use]
pub fn protected_route(session: &SessionState) -> RouteDecision {
    if !session.is_authenticated {
        return RouteDecision::RedirectToLogin;
    }
    match &session.user {
        Some(user) if user.is_verified => RouteDecision::Render,
        _ => RouteDecision::RedirectToVerifyEmail,
    }
}

/// Guard for the auth pages (login, signup, forgot-password).
///
/// A fully authenticated, verified user has no business here and goes home.
#[must_use]
pub fn authenticated_user(session: &SessionState) -> RouteDecision {
    let verified = session.user.as_ref().is_some_and(|user| user.is_verified);
    if session.is_authenticated && verified {
        RouteDecision::RedirectToHome
    } else {
        RouteDecision::Render
    }
}

/// Guard for the admin area (restaurant management, menus, incoming orders).
#[must_use]
pub fn admin_route(session: &SessionState) -> RouteDecision {
    if !session.is_authenticated {
        return RouteDecision::RedirectToLogin;
    }
    if session.user.as_ref().is_some_and(|user| user.admin) {
        RouteDecision::Render
    } else {
        RouteDecision::RedirectToHome
    }
}
