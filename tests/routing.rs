//! Activity routing with built-in and file-loaded catalogues

use lamad_client::{
    ActivityCatalogue, ActivityRouter, ClientError, GameHandler, Language, NamedView, UnitView,
    ViewSelector,
};

#[test]
fn test_reference_examples() {
    let router = ActivityRouter::builtin();

    assert_eq!(
        router.route("advanced-math-unit3", Language::En),
        ViewSelector::Unit {
            course: "advanced-math".into(),
            unit: UnitView::CoordinateGeometry
        }
    );
    assert_eq!(router.route("unknown-garbage", Language::En), ViewSelector::Dashboard);
}

#[test]
fn test_routing_is_pure_across_calls_and_routers() {
    let a = ActivityRouter::builtin();
    let b = ActivityRouter::builtin();
    let references = [
        "subjects",
        "daily-challenge",
        "math-unit2",
        "subtopic-photosynthesis",
        "circuit-builder",
        "matra-match",
        "save_the_tiger",
        "nothing-here",
    ];

    for lang in Language::ALL {
        for reference in references {
            let first = a.route(reference, lang);
            assert_eq!(first, a.route(reference, lang));
            assert_eq!(first, b.route(reference, lang));
        }
    }
}

#[test]
fn test_catalogue_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalogue.json");
    std::fs::write(
        &path,
        r#"{
            "named": { "home-leaders": "leaderboard" },
            "prefixes": [
                { "prefix": "sci-unit", "kind": "unit", "course": "science",
                  "units": { "a": "statistics" } }
            ],
            "games": [
                { "handler": "word-quest", "languages": ["bn"], "ids": ["shabdo"] }
            ],
            "missionSeparator": ":"
        }"#,
    )
    .unwrap();

    let router = ActivityRouter::new(ActivityCatalogue::from_file(&path).unwrap()).unwrap();

    assert_eq!(
        router.route("home-leaders", Language::En),
        ViewSelector::Named {
            screen: NamedView::Leaderboard
        }
    );
    assert_eq!(
        router.route("sci-unita", Language::En),
        ViewSelector::Unit {
            course: "science".into(),
            unit: UnitView::Statistics
        }
    );
    assert_eq!(
        router.route("shabdo", Language::Bn),
        ViewSelector::Game {
            handler: GameHandler::WordQuest,
            id: "shabdo".into()
        }
    );
    assert_eq!(
        router.route("quest:river", Language::En),
        ViewSelector::Mission {
            id: "quest:river".into()
        }
    );
    // '_' is not the separator in this catalogue
    assert!(router.route("eco_warrior", Language::En).is_dashboard());
}

#[test]
fn test_bad_catalogue_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalogue.json");
    std::fs::write(&path, r#"{ "prefixes": [ { "prefix": "", "kind": "subtopic" } ] }"#).unwrap();

    assert!(matches!(
        ActivityCatalogue::from_file(&path),
        Err(ClientError::Config(_))
    ));
}
