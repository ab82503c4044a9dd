//! Route table and gating

use super::{Access, AuthProvider, Page, RouteDecision, LOGIN_PATH, MEMBERS_HOME_PATH};

/// A path bound to a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub page: Page,
    pub access: Access,
}

const fn route(path: &'static str, page: Page, access: Access) -> Route {
    Route { path, page, access }
}

/// Every page of the site
pub const ROUTES: &[Route] = &[
    route("/", Page::Home, Access::Public),
    route("/robos", Page::Robots, Access::Public),
    route("/copy-trading", Page::CopyTrading, Access::Public),
    route("/mesa-proprietaria", Page::PropDesk, Access::Public),
    route("/calculadora", Page::Calculator, Access::Public),
    route("/contato", Page::Contact, Access::Public),
    route("/obrigado", Page::ThankYou, Access::Public),
    route(LOGIN_PATH, Page::Login, Access::GuestOnly),
    route(MEMBERS_HOME_PATH, Page::MembersHome, Access::Members),
    route("/area-membros/robos", Page::MembersRobots, Access::Members),
    route(
        "/area-membros/copy-trading",
        Page::MembersCopyTrading,
        Access::Members,
    ),
    route("/area-membros/downloads", Page::MembersDownloads, Access::Members),
];

impl Route {
    /// Find the route for an already-normalized path
    pub fn find(path: &str) -> Option<&'static Route> {
        ROUTES.iter().find(|r| r.path == path)
    }
}

/// Drop query string, fragment and trailing slashes; lower-case the path
pub fn normalize(path: &str) -> String {
    let path = path
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim();
    let trimmed = path.trim_end_matches('/');

    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_lowercase()
    } else {
        format!("/{}", trimmed.to_lowercase())
    }
}

/// Decide whether `path` renders, redirects or does not exist
pub fn resolve(path: &str, auth: &dyn AuthProvider) -> RouteDecision {
    let normalized = normalize(path);

    let Some(route) = Route::find(&normalized) else {
        return RouteDecision::NotFound;
    };

    match route.access {
        Access::Members if !auth.is_authenticated() => {
            tracing::debug!(path = %normalized, "Unauthenticated access to members area");
            RouteDecision::Redirect {
                to: format!("{}?next={}", LOGIN_PATH, route.path),
            }
        }
        Access::GuestOnly if auth.is_authenticated() => RouteDecision::Redirect {
            to: MEMBERS_HOME_PATH.to_string(),
        },
        _ => RouteDecision::Render { page: route.page },
    }
}
