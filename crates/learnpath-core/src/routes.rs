//! Views of the application, their access rules and navigation.
//!
//! `Route` names every view a front end can show. Protected views carry a
//! `RouteGuard`, which is evaluated against a `SessionState` snapshot before
//! the view is rendered. The `Navigator` trait is how the library asks the
//! front end to move somewhere else, e.g. to the login view after the
//! session could not be refreshed.

use std::fmt;
use std::sync::Mutex;

use tracing::debug;

use crate::auth::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Register,
    Dashboard,
    AdminDashboard,
    Courses,
    CourseCreate,
    CourseDetail(i64),
    CourseEdit(i64),
    MyCourses,
    Projects,
    ProjectCreate,
    ProjectDetail(i64),
    ProjectEdit(i64),
    Profile,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::AdminDashboard => "/admin/dashboard".to_string(),
            Route::Courses => "/courses".to_string(),
            Route::CourseCreate => "/courses/create".to_string(),
            Route::CourseDetail(id) => format!("/courses/{}", id),
            Route::CourseEdit(id) => format!("/courses/{}/edit", id),
            Route::MyCourses => "/my-courses".to_string(),
            Route::Projects => "/projects".to_string(),
            Route::ProjectCreate => "/projects/create".to_string(),
            Route::ProjectDetail(id) => format!("/projects/{}", id),
            Route::ProjectEdit(id) => format!("/projects/{}/edit", id),
            Route::Profile => "/profile".to_string(),
        }
    }

    /// Parse a view path. Trailing slashes are ignored.
    pub fn parse(path: &str) -> Option<Route> {
        let trimmed = path.trim().trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        let route = match segments.as_slice() {
            [] => Route::Home,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["dashboard"] => Route::Dashboard,
            ["admin", "dashboard"] => Route::AdminDashboard,
            ["courses"] => Route::Courses,
            ["courses", "create"] => Route::CourseCreate,
            ["courses", id] => Route::CourseDetail(id.parse().ok()?),
            ["courses", id, "edit"] => Route::CourseEdit(id.parse().ok()?),
            ["my-courses"] => Route::MyCourses,
            ["projects"] => Route::Projects,
            ["projects", "create"] => Route::ProjectCreate,
            ["projects", id] => Route::ProjectDetail(id.parse().ok()?),
            ["projects", id, "edit"] => Route::ProjectEdit(id.parse().ok()?),
            ["profile"] => Route::Profile,
            _ => return None,
        };
        Some(route)
    }

    /// Access rule for this view; `None` for public views.
    pub fn guard(&self) -> Option<RouteGuard> {
        match self {
            Route::Home | Route::Login | Route::Register => None,
            Route::AdminDashboard
            | Route::CourseCreate
            | Route::CourseEdit(_)
            | Route::ProjectCreate
            | Route::ProjectEdit(_) => Some(RouteGuard::Admin),
            Route::Dashboard
            | Route::Courses
            | Route::CourseDetail(_)
            | Route::MyCourses
            | Route::Projects
            | Route::ProjectDetail(_)
            | Route::Profile => Some(RouteGuard::Authenticated),
        }
    }

    /// Evaluate this view's guard; public views are always allowed.
    pub fn check(&self, state: &SessionState) -> GuardDecision {
        match self.guard() {
            Some(guard) => guard.check(state),
            None => GuardDecision::Allow,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Access rule applied before rendering a protected view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteGuard {
    /// Any signed-in user.
    Authenticated,
    /// Signed-in administrators only.
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session is still loading; render a placeholder.
    Pending,
    Redirect(Route),
    Allow,
}

impl RouteGuard {
    pub fn check(&self, state: &SessionState) -> GuardDecision {
        if state.loading {
            return GuardDecision::Pending;
        }
        if !state.is_authenticated() {
            return GuardDecision::Redirect(Route::Login);
        }
        if *self == RouteGuard::Admin && !state.is_admin() {
            return GuardDecision::Redirect(Route::Dashboard);
        }
        GuardDecision::Allow
    }
}

/// Receives navigation requests issued by the library.
pub trait Navigator: Send + Sync {
    fn redirect(&self, route: Route);
}

/// Navigator that only logs. Used when no front end is listening.
#[derive(Debug, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn redirect(&self, route: Route) {
        debug!(route = %route, "Redirect requested");
    }
}

/// Navigator that remembers every redirect, newest last.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    history: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<Route> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Route> {
        self.history.lock().ok().and_then(|h| h.last().copied())
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, route: Route) {
        debug!(route = %route, "Redirect requested");
        if let Ok(mut history) = self.history.lock() {
            history.push(route);
        }
    }
}
