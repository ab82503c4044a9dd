//! Site route surface
//!
//! Named pages reachable by path, with members-only pages gated behind an
//! externally supplied authentication predicate

mod table;

pub use table::{normalize, resolve, Route, ROUTES};

use serde::Serialize;

/// Login page path
pub const LOGIN_PATH: &str = "/login";
/// Landing page of the members area
pub const MEMBERS_HOME_PATH: &str = "/area-membros";

/// Site pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    Home,
    Robots,
    CopyTrading,
    PropDesk,
    Calculator,
    Contact,
    ThankYou,
    Login,
    MembersHome,
    MembersRobots,
    MembersCopyTrading,
    MembersDownloads,
}

impl Page {
    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "Profit Estrategista",
            Page::Robots => "Robôs de Trading",
            Page::CopyTrading => "Copy Trading",
            Page::PropDesk => "Mesa Proprietária",
            Page::Calculator => "Calculadora de Posição",
            Page::Contact => "Contato",
            Page::ThankYou => "Obrigado",
            Page::Login => "Entrar",
            Page::MembersHome => "Área de Membros",
            Page::MembersRobots => "Meus Robôs",
            Page::MembersCopyTrading => "Minhas Carteiras",
            Page::MembersDownloads => "Downloads",
        }
    }
}

/// Who may see a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    /// Everyone
    Public,
    /// Authenticated members only
    Members,
    /// Visitors who are not logged in (login page)
    GuestOnly,
}

/// Authentication predicate supplied by the auth provider
pub trait AuthProvider: Send + Sync {
    fn is_authenticated(&self) -> bool;
}

/// Fixed authentication state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticAuth(pub bool);

impl AuthProvider for StaticAuth {
    fn is_authenticated(&self) -> bool {
        self.0
    }
}

/// What to do with a navigation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum RouteDecision {
    Render { page: Page },
    Redirect { to: String },
    NotFound,
}
