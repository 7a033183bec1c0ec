//! Activity reference parsing

use super::catalogue::{ActivityCatalogue, PrefixKind};
use super::view::{GameHandler, NamedView, UnitView};
use crate::types::Language;

/// Parsed form of an opaque activity reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityRef {
    Named(NamedView),
    Unit { course: String, unit: UnitView },
    Subtopic(String),
    Game { handler: GameHandler, id: String },
    Mission(String),
    /// Nothing recognised the reference
    Unknown,
}

/// Parse `reference` against `catalogue`, whose prefix rules must already be
/// sorted longest-first.
///
/// Rules are tried in order and the first that claims the reference decides:
/// exact name, structured prefix, game allow-list, mission heuristic. A
/// prefix match is final even when its suffix is not recognised.
pub(super) fn parse(catalogue: &ActivityCatalogue, reference: &str, language: Language) -> ActivityRef {
    if reference.is_empty() {
        return ActivityRef::Unknown;
    }

    if let Some(view) = catalogue.named.get(reference) {
        return ActivityRef::Named(*view);
    }

    if let Some((rule, suffix)) = catalogue
        .prefixes
        .iter()
        .find_map(|rule| reference.strip_prefix(rule.prefix.as_str()).map(|s| (rule, s)))
    {
        return match &rule.kind {
            PrefixKind::Unit { course, units } => match units.get(suffix) {
                Some(unit) => ActivityRef::Unit {
                    course: course.clone(),
                    unit: *unit,
                },
                None => ActivityRef::Unknown,
            },
            PrefixKind::Subtopic if !suffix.is_empty() => ActivityRef::Subtopic(suffix.to_string()),
            PrefixKind::Subtopic => ActivityRef::Unknown,
        };
    }

    if let Some(game) = catalogue.games.iter().find(|g| g.serves(reference, language)) {
        return ActivityRef::Game {
            handler: game.handler,
            id: reference.to_string(),
        };
    }

    if reference.contains(catalogue.mission_separator) || catalogue.missions.contains(reference) {
        return ActivityRef::Mission(reference.to_string());
    }

    ActivityRef::Unknown
}
