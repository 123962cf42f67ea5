//! Roles and the capability sets they grant.
//!
//! Every frontend decision about which views to mount or which actions to
//! offer goes through [`Capabilities`] instead of comparing role names.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role of the signed-in actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Researcher,
    Contributor,
}

/// A top-level dashboard view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Overview,
    Games,
    Devices,
    Analytics,
    Reports,
    MySubmissions,
    Review,
    Users,
    Settings,
}

/// A mutation the actor may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Create,
    EditOwn,
    EditAny,
    Delete,
    Review,
    ManageUsers,
    Upload,
}

const ALL_VIEWS: &[View] = &[
    View::Overview,
    View::Games,
    View::Devices,
    View::Analytics,
    View::Reports,
    View::MySubmissions,
    View::Review,
    View::Users,
    View::Settings,
];

const ALL_ACTIONS: &[Action] = &[
    Action::Create,
    Action::EditOwn,
    Action::EditAny,
    Action::Delete,
    Action::Review,
    Action::ManageUsers,
    Action::Upload,
];

const RESEARCHER_VIEWS: &[View] = &[
    View::Overview,
    View::Games,
    View::Devices,
    View::Analytics,
    View::Reports,
    View::MySubmissions,
    View::Review,
    View::Settings,
];

const RESEARCHER_ACTIONS: &[Action] = &[
    Action::Create,
    Action::EditOwn,
    Action::EditAny,
    Action::Review,
    Action::Upload,
];

const CONTRIBUTOR_VIEWS: &[View] = &[
    View::Overview,
    View::Games,
    View::Devices,
    View::MySubmissions,
    View::Settings,
];

const CONTRIBUTOR_ACTIONS: &[Action] = &[Action::Create, Action::EditOwn, Action::Upload];

/// The explicit set of views and actions a role is permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    views: &'static [View],
    actions: &'static [Action],
}

impl Capabilities {
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Admin => Self {
                views: ALL_VIEWS,
                actions: ALL_ACTIONS,
            },
            Role::Researcher => Self {
                views: RESEARCHER_VIEWS,
                actions: RESEARCHER_ACTIONS,
            },
            Role::Contributor => Self {
                views: CONTRIBUTOR_VIEWS,
                actions: CONTRIBUTOR_ACTIONS,
            },
        }
    }

    pub fn can_view(&self, view: View) -> bool {
        self.views.contains(&view)
    }

    pub fn can(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }

    /// Views in navigation order.
    pub fn views(&self) -> &'static [View] {
        self.views
    }

    pub fn actions(&self) -> &'static [Action] {
        self.actions
    }

    /// Whether the actor may edit a record submitted by `submitted_by`.
    pub fn can_edit(&self, actor: &str, submitted_by: Option<&str>) -> bool {
        self.can(Action::EditAny) || (self.can(Action::EditOwn) && submitted_by == Some(actor))
    }
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Researcher => "researcher",
            Self::Contributor => "contributor",
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities::for_role(*self)
    }

    /// Whether records this role creates skip the review queue.
    pub fn is_trusted(&self) -> bool {
        matches!(self, Self::Admin | Self::Researcher)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error)]
#[error("unknown role: '{0}' (expected admin, researcher or contributor)")]
pub struct RoleParseError(pub String);

impl std::str::FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" | "administrator" => Ok(Self::Admin),
            "researcher" => Ok(Self::Researcher),
            "contributor" | "user" => Ok(Self::Contributor),
            _ => Err(RoleParseError(s.to_string())),
        }
    }
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Games => "games",
            Self::Devices => "devices",
            Self::Analytics => "analytics",
            Self::Reports => "reports",
            Self::MySubmissions => "my_submissions",
            Self::Review => "review",
            Self::Users => "users",
            Self::Settings => "settings",
        }
    }

    /// Human label shown in navigation.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Games => "Games",
            Self::Devices => "Devices",
            Self::Analytics => "Analytics",
            Self::Reports => "Reports",
            Self::MySubmissions => "My Submissions",
            Self::Review => "Review Queue",
            Self::Users => "User Management",
            Self::Settings => "Settings",
        }
    }
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::EditOwn => "edit_own",
            Self::EditAny => "edit_any",
            Self::Delete => "delete",
            Self::Review => "review",
            Self::ManageUsers => "manage_users",
            Self::Upload => "upload",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
#[path = "tests/role_tests.rs"]
mod tests;
