//! Activity vocabulary: the data the router matches references against.
//!
//! Supplied by the host as JSON, or taken from [`ActivityCatalogue::builtin`].
//!
//! ```json
//! {
//!   "named":    { "subjects": "subject-overview" },
//!   "prefixes": [
//!     { "prefix": "advanced-math-unit", "kind": "unit", "course": "advanced-math",
//!       "units": { "3": "coordinate-geometry" } },
//!     { "prefix": "subtopic-", "kind": "subtopic" }
//!   ],
//!   "games":    [ { "handler": "hindi-varnamala", "languages": ["hi"], "ids": ["varnamala"] } ],
//!   "missions": [ "water-saver" ],
//!   "missionSeparator": "_"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use super::view::{GameHandler, NamedView, UnitView};
use crate::error::ClientError;
use crate::types::Language;

/// Structured-prefix rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefixRule {
    pub prefix: String,
    #[serde(flatten)]
    pub kind: PrefixKind,
}

/// How the remainder after a prefix is interpreted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PrefixKind {
    /// Suffix names a unit of `course`; unlisted suffixes are unknown
    Unit {
        course: String,
        units: BTreeMap<String, UnitView>,
    },
    /// Any non-empty suffix is a subtopic id
    Subtopic,
}

/// Allow-list of game ids served by one handler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameCatalogue {
    pub handler: GameHandler,
    /// Restrict to these languages; absent means every language
    #[serde(default)]
    pub languages: Option<BTreeSet<Language>>,
    pub ids: BTreeSet<String>,
}

impl GameCatalogue {
    pub fn serves(&self, id: &str, language: Language) -> bool {
        self.ids.contains(id)
            && self
                .languages
                .as_ref()
                .map_or(true, |langs| langs.contains(&language))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityCatalogue {
    #[serde(default)]
    pub named: BTreeMap<String, NamedView>,
    #[serde(default)]
    pub prefixes: Vec<PrefixRule>,
    /// Checked in order; the first catalogue serving an id wins
    #[serde(default)]
    pub games: Vec<GameCatalogue>,
    #[serde(default)]
    pub missions: BTreeSet<String>,
    #[serde(default = "default_mission_separator")]
    pub mission_separator: char,
}

fn default_mission_separator() -> char {
    '_'
}

impl Default for ActivityCatalogue {
    fn default() -> Self {
        Self {
            named: BTreeMap::new(),
            prefixes: Vec::new(),
            games: Vec::new(),
            missions: BTreeSet::new(),
            mission_separator: default_mission_separator(),
        }
    }
}

impl ActivityCatalogue {
    pub fn from_json(json: &str) -> Result<Self, ClientError> {
        let catalogue: Self = serde_json::from_str(json)
            .map_err(|e| ClientError::Config(format!("Invalid activity catalogue: {}", e)))?;
        catalogue.validate()?;
        Ok(catalogue)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Config(format!("Failed to read catalogue {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if let Some(rule) = self.prefixes.iter().find(|r| r.prefix.is_empty()) {
            return Err(ClientError::Config(format!(
                "Empty prefix in catalogue ({:?})",
                rule.kind
            )));
        }
        let mut seen = BTreeSet::new();
        for rule in &self.prefixes {
            if !seen.insert(rule.prefix.as_str()) {
                return Err(ClientError::Config(format!(
                    "Duplicate prefix '{}' in catalogue",
                    rule.prefix
                )));
            }
        }
        Ok(())
    }

    /// Default vocabulary shipped with the client
    pub fn builtin() -> Self {
        let named = [
            ("subjects", NamedView::SubjectOverview),
            ("leaderboard", NamedView::Leaderboard),
            ("achievements", NamedView::Achievements),
            ("daily-challenge", NamedView::DailyChallenge),
            ("profile", NamedView::ProfileSettings),
        ]
        .into_iter()
        .map(|(name, view)| (name.to_string(), view))
        .collect();

        let units = |entries: &[(&str, UnitView)]| -> BTreeMap<String, UnitView> {
            entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
        };

        let prefixes = vec![
            PrefixRule {
                prefix: "advanced-math-unit".into(),
                kind: PrefixKind::Unit {
                    course: "advanced-math".into(),
                    units: units(&[
                        ("1", UnitView::NumberSystems),
                        ("2", UnitView::Polynomials),
                        ("3", UnitView::CoordinateGeometry),
                        ("4", UnitView::LinearEquations),
                        ("5", UnitView::Triangles),
                        ("6", UnitView::Statistics),
                    ]),
                },
            },
            PrefixRule {
                prefix: "math-unit".into(),
                kind: PrefixKind::Unit {
                    course: "math".into(),
                    units: units(&[
                        ("1", UnitView::NumberSystems),
                        ("2", UnitView::LinearEquations),
                        ("3", UnitView::Statistics),
                    ]),
                },
            },
            PrefixRule {
                prefix: "subtopic-".into(),
                kind: PrefixKind::Subtopic,
            },
        ];

        let game = |handler, languages: Option<&[Language]>, ids: &[&str]| GameCatalogue {
            handler,
            languages: languages.map(|l| l.iter().copied().collect()),
            ids: ids.iter().map(|id| id.to_string()).collect(),
        };

        let games = vec![
            game(
                GameHandler::MathArcade,
                None,
                &["number-ninja", "fraction-frenzy", "algebra-attack"],
            ),
            game(
                GameHandler::ScienceLab,
                None,
                &["circuit-builder", "periodic-puzzle", "plant-growth"],
            ),
            game(GameHandler::WordQuest, None, &["spelling-bee", "word-ladder"]),
            game(
                GameHandler::HindiVarnamala,
                Some(&[Language::Hi]),
                &["varnamala", "matra-match"],
            ),
        ];

        Self {
            named,
            prefixes,
            games,
            missions: ["water-saver", "green-school"]
                .into_iter()
                .map(String::from)
                .collect(),
            mission_separator: default_mission_separator(),
        }
    }
}
