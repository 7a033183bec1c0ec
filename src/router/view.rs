//! Content-view selectors produced by the router

use serde::{Deserialize, Serialize};

use crate::types::{Enrollment, Grade, UserProfile};

/// Stand-alone screens reachable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamedView {
    SubjectOverview,
    Leaderboard,
    Achievements,
    DailyChallenge,
    ProfileSettings,
}

/// Structured course units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnitView {
    NumberSystems,
    Polynomials,
    CoordinateGeometry,
    LinearEquations,
    Triangles,
    Statistics,
}

/// Game renderers; each handles every id in its catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameHandler {
    MathArcade,
    ScienceLab,
    WordQuest,
    HindiVarnamala,
}

/// Which content renderer to invoke
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "view", rename_all = "kebab-case")]
pub enum ViewSelector {
    /// Role-specific home screen
    Dashboard,
    Named { screen: NamedView },
    Unit { course: String, unit: UnitView },
    Subtopic { id: String },
    Game { handler: GameHandler, id: String },
    Mission { id: String },
}

impl ViewSelector {
    pub fn is_dashboard(&self) -> bool {
        matches!(self, ViewSelector::Dashboard)
    }

    /// Short label for logs
    pub fn label(&self) -> String {
        match self {
            ViewSelector::Dashboard => "dashboard".to_string(),
            ViewSelector::Named { screen } => format!("named:{:?}", screen),
            ViewSelector::Unit { course, unit } => format!("unit:{}:{:?}", course, unit),
            ViewSelector::Subtopic { id } => format!("subtopic:{}", id),
            ViewSelector::Game { handler, id } => format!("game:{:?}:{}", handler, id),
            ViewSelector::Mission { id } => format!("mission:{}", id),
        }
    }
}

/// Dashboard resolved against the signed-in profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "dashboard", rename_all = "lowercase")]
pub enum DashboardView {
    Student { grade: Grade },
    Teacher,
}

impl DashboardView {
    pub fn for_profile(profile: &UserProfile) -> Self {
        match profile.enrollment() {
            Enrollment::Student { grade } => DashboardView::Student { grade },
            Enrollment::Teacher => DashboardView::Teacher,
        }
    }
}
