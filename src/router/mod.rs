//! Activity Router - maps activity references to content views
//!
//! Pure and synchronous: the same (reference, language) always yields the same
//! [`ViewSelector`], and no reference ever fails. Anything unrecognised lands
//! on the dashboard.
//!
//! ```text
//! "subjects"             → Named(SubjectOverview)       exact name
//! "advanced-math-unit3"  → Unit(CoordinateGeometry)     longest prefix
//! "varnamala" (hi)       → Game(HindiVarnamala)         allow-list
//! "eco_warrior"          → Mission                      separator
//! "unknown-garbage"      → Dashboard
//! ```

mod catalogue;
mod reference;
mod view;

pub use catalogue::{ActivityCatalogue, GameCatalogue, PrefixKind, PrefixRule};
pub use reference::ActivityRef;
pub use view::{DashboardView, GameHandler, NamedView, UnitView, ViewSelector};

use tracing::debug;

use crate::error::ClientError;
use crate::types::Language;

#[derive(Debug, Clone)]
pub struct ActivityRouter {
    catalogue: ActivityCatalogue,
}

impl ActivityRouter {
    /// Router over `catalogue`. Prefix rules are ordered longest-first here,
    /// so catalogue order never changes which prefix wins.
    pub fn new(catalogue: ActivityCatalogue) -> Result<Self, ClientError> {
        catalogue.validate()?;
        Ok(Self::sorted(catalogue))
    }

    pub fn builtin() -> Self {
        Self::sorted(ActivityCatalogue::builtin())
    }

    fn sorted(mut catalogue: ActivityCatalogue) -> Self {
        catalogue.prefixes.sort_by(|a, b| {
            b.prefix
                .len()
                .cmp(&a.prefix.len())
                .then_with(|| a.prefix.cmp(&b.prefix))
        });
        Self { catalogue }
    }

    pub fn catalogue(&self) -> &ActivityCatalogue {
        &self.catalogue
    }

    pub fn parse(&self, reference: &str, language: Language) -> ActivityRef {
        reference::parse(&self.catalogue, reference, language)
    }

    /// Content view for `reference`
    pub fn route(&self, reference: &str, language: Language) -> ViewSelector {
        let selector = match self.parse(reference, language) {
            ActivityRef::Named(screen) => ViewSelector::Named { screen },
            ActivityRef::Unit { course, unit } => ViewSelector::Unit { course, unit },
            ActivityRef::Subtopic(id) => ViewSelector::Subtopic { id },
            ActivityRef::Game { handler, id } => ViewSelector::Game { handler, id },
            ActivityRef::Mission(id) => ViewSelector::Mission { id },
            ActivityRef::Unknown => ViewSelector::Dashboard,
        };
        debug!(reference, language = %language, view = %selector.label(), "Routed activity");
        selector
    }
}

impl Default for ActivityRouter {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_activity() {
        let router = ActivityRouter::builtin();
        assert_eq!(
            router.route("subjects", Language::En),
            ViewSelector::Named {
                screen: NamedView::SubjectOverview
            }
        );
    }

    #[test]
    fn test_advanced_math_unit3_is_coordinate_geometry() {
        let router = ActivityRouter::builtin();
        for lang in Language::ALL {
            assert_eq!(
                router.route("advanced-math-unit3", lang),
                ViewSelector::Unit {
                    course: "advanced-math".into(),
                    unit: UnitView::CoordinateGeometry
                }
            );
        }
    }

    #[test]
    fn test_unknown_garbage_is_dashboard() {
        let router = ActivityRouter::builtin();
        assert!(router.route("unknown-garbage", Language::En).is_dashboard());
        assert!(router.route("", Language::Hi).is_dashboard());
    }

    #[test]
    fn test_unknown_suffix_under_prefix_does_not_fall_through() {
        let mut catalogue = ActivityCatalogue::builtin();
        catalogue.missions.insert("advanced-math-unit9".into());
        let router = ActivityRouter::new(catalogue).unwrap();

        assert_eq!(router.parse("advanced-math-unit9", Language::En), ActivityRef::Unknown);
        assert!(router.route("advanced-math-unit9", Language::En).is_dashboard());
    }

    #[test]
    fn test_subtopic_needs_suffix() {
        let router = ActivityRouter::builtin();
        assert_eq!(
            router.route("subtopic-fractions", Language::En),
            ViewSelector::Subtopic {
                id: "fractions".into()
            }
        );
        assert!(router.route("subtopic-", Language::En).is_dashboard());
    }

    #[test]
    fn test_game_language_restriction() {
        let router = ActivityRouter::builtin();
        assert_eq!(
            router.route("varnamala", Language::Hi),
            ViewSelector::Game {
                handler: GameHandler::HindiVarnamala,
                id: "varnamala".into()
            }
        );
        assert!(router.route("varnamala", Language::En).is_dashboard());
        assert!(matches!(
            router.route("number-ninja", Language::Ta),
            ViewSelector::Game {
                handler: GameHandler::MathArcade,
                ..
            }
        ));
    }

    #[test]
    fn test_first_game_catalogue_wins() {
        let mut catalogue = ActivityCatalogue::builtin();
        catalogue.games.push(GameCatalogue {
            handler: GameHandler::WordQuest,
            languages: None,
            ids: ["number-ninja".to_string()].into_iter().collect(),
        });
        let router = ActivityRouter::new(catalogue).unwrap();

        assert!(matches!(
            router.route("number-ninja", Language::En),
            ViewSelector::Game {
                handler: GameHandler::MathArcade,
                ..
            }
        ));
    }

    #[test]
    fn test_missions_by_separator_or_allow_list() {
        let router = ActivityRouter::builtin();
        assert_eq!(
            router.route("eco_warrior", Language::En),
            ViewSelector::Mission {
                id: "eco_warrior".into()
            }
        );
        assert_eq!(
            router.route("water-saver", Language::En),
            ViewSelector::Mission {
                id: "water-saver".into()
            }
        );
    }

    #[test]
    fn test_prefix_precedence_ignores_catalogue_order() {
        let rules = |order: &[&str]| -> ActivityCatalogue {
            let mut catalogue = ActivityCatalogue::default();
            for prefix in order {
                let kind = if *prefix == "unit-" {
                    PrefixKind::Subtopic
                } else {
                    PrefixKind::Unit {
                        course: "geometry".into(),
                        units: [("tri".to_string(), UnitView::Triangles)].into_iter().collect(),
                    }
                };
                catalogue.prefixes.push(PrefixRule {
                    prefix: prefix.to_string(),
                    kind,
                });
            }
            catalogue
        };

        let short_first = ActivityRouter::new(rules(&["unit-", "unit-geo-"])).unwrap();
        let long_first = ActivityRouter::new(rules(&["unit-geo-", "unit-"])).unwrap();

        for router in [&short_first, &long_first] {
            assert_eq!(
                router.route("unit-geo-tri", Language::En),
                ViewSelector::Unit {
                    course: "geometry".into(),
                    unit: UnitView::Triangles
                }
            );
            assert_eq!(
                router.route("unit-algebra", Language::En),
                ViewSelector::Subtopic {
                    id: "algebra".into()
                }
            );
        }
    }

    #[test]
    fn test_route_is_deterministic() {
        let router = ActivityRouter::builtin();
        for reference in ["subjects", "math-unit2", "spelling-bee", "a_b", "zzz"] {
            assert_eq!(
                router.route(reference, Language::Mr),
                router.route(reference, Language::Mr)
            );
        }
    }
}
