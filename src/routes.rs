//! Client-side routing and the session gate.
//!
//! Two auth states only: a token is stored, or it is not. Protected
//! routes resolve to a login redirect in the second case. There is no
//! expiry push from the server; a token rejected mid-call is handled by
//! the API client's observer, after which the next resolution here
//! redirects.

use crate::session::SessionStore;

/// Navigable views of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Root,
    Login,
    Register,
    Home,
    UploadSales,
    Settings,
    /// Anything unrecognized; sent home, which re-gates.
    Unknown,
}

impl Route {
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Home | Route::UploadSales | Route::Settings)
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Root => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Home => "/home",
            Route::UploadSales => "/upload-sales",
            Route::Settings => "/settings",
            Route::Unknown => "*",
        }
    }
}

/// Session-derived authorization state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Authorized,
    Unauthorized,
}

/// Result of resolving a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Render(Route),
    Redirect(Route),
}

pub struct RouteGuard {
    session: SessionStore,
}

impl RouteGuard {
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }

    pub async fn auth_state(&self) -> AuthState {
        if self.session.is_authenticated().await {
            AuthState::Authorized
        } else {
            AuthState::Unauthorized
        }
    }

    pub async fn resolve(&self, route: Route) -> Resolution {
        Self::resolve_with(route, self.auth_state().await)
    }

    /// Pure route map, split out so it can be tested without storage.
    pub fn resolve_with(route: Route, state: AuthState) -> Resolution {
        let authorized = state == AuthState::Authorized;
        match route {
            Route::Root => {
                if authorized {
                    Resolution::Redirect(Route::Home)
                } else {
                    Resolution::Redirect(Route::Login)
                }
            }
            Route::Login | Route::Register => Resolution::Render(route),
            Route::Home | Route::UploadSales | Route::Settings => {
                if authorized {
                    Resolution::Render(route)
                } else {
                    Resolution::Redirect(Route::Login)
                }
            }
            Route::Unknown => {
                if authorized {
                    Resolution::Redirect(Route::Home)
                } else {
                    Resolution::Redirect(Route::Login)
                }
            }
        }
    }
}
