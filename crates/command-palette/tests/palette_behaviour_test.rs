use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use command_palette::{
    filter_commands, Command, CommandPalette, CommandSpec, HotKeyRegistry, KeyChord,
    MatchOptions, PaletteConfig, PaletteEvent, PaletteStatus, SelectionEvent,
};

fn fizz_buzz() -> Vec<Command> {
    vec![
        Command::new("Fizz", || {}),
        Command::new("Fizz Buzz", || {}),
        Command::new("Buzz", || {}),
    ]
}

fn names(palette: &CommandPalette) -> Vec<String> {
    palette
        .suggestions()
        .iter()
        .map(|s| s.name().to_string())
        .collect()
}

#[test]
fn test_filter_never_exceeds_limit() {
    let commands: Vec<Command> = (0..40)
        .map(|i| Command::new(format!("command {}", i), || {}))
        .collect();
    let options = MatchOptions::default();

    for query in ["", "c", "command 1", "zzz", "3"] {
        for limit in [1, 5, 7, 500] {
            let results = filter_commands(&commands, query, &options, limit);
            assert!(results.len() <= limit, "query {:?} limit {}", query, limit);
        }
    }
}

#[test]
fn test_empty_and_unmatched_query_agree() {
    let commands = fizz_buzz();
    let options = MatchOptions::default();

    let empty: Vec<_> = filter_commands(&commands, "", &options, 7)
        .into_iter()
        .map(|s| s.command.name)
        .collect();
    let unmatched: Vec<_> = filter_commands(&commands, "bannanas!", &options, 7)
        .into_iter()
        .map(|s| s.command.name)
        .collect();

    assert_eq!(empty, vec!["Fizz", "Fizz Buzz", "Buzz"]);
    assert_eq!(empty, unmatched);
}

#[test]
fn test_fizz_scenario() {
    let config = PaletteConfig {
        open: true,
        ..Default::default()
    };
    let mut palette = CommandPalette::new(fizz_buzz(), config).unwrap();
    palette
        .dispatch(PaletteEvent::QueryChanged("Fizz".into()))
        .unwrap();

    assert_eq!(names(&palette), vec!["Fizz", "Fizz Buzz"]);
}

#[test]
fn test_hotkey_through_registry_opens_palette() {
    let registry = HotKeyRegistry::new();
    let mut palette = CommandPalette::new(fizz_buzz(), PaletteConfig::default()).unwrap();
    let id = palette.listen(&registry);
    assert_eq!(palette.status(), PaletteStatus::Closed);

    let chord: KeyChord = "command+shift+p".parse().unwrap();
    if registry.listeners_for(&chord).contains(&id) {
        palette.dispatch(PaletteEvent::HotKey(chord)).unwrap();
    }

    assert_eq!(palette.status(), PaletteStatus::Open);

    drop(palette);
    assert!(registry.is_empty());
}

#[test]
fn test_close_on_select_invokes_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let commands = vec![Command::new("Ship it", move || {
        counter.fetch_add(1, Ordering::SeqCst);
    })];

    let config = PaletteConfig {
        open: true,
        close_on_select: true,
        ..Default::default()
    };
    let mut palette = CommandPalette::new(commands, config).unwrap();
    palette
        .dispatch(PaletteEvent::Select(SelectionEvent::click(0)))
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(palette.status(), PaletteStatus::Closed);
}

#[test]
fn test_unresolved_config_command_fails_selection() {
    let spec: CommandSpec = toml::from_str(
        r#"
        name = "Launch"
        action = "launch"
        "#,
    )
    .unwrap();

    let config = PaletteConfig {
        open: true,
        ..Default::default()
    };
    let mut palette = CommandPalette::new(vec![spec.resolve(|_| None)], config).unwrap();

    let err = palette.dispatch(PaletteEvent::Confirm).unwrap_err();
    assert_eq!(err.to_string(), "command must be a function");
    assert_eq!(palette.status(), PaletteStatus::Open);
}

#[test]
fn test_replacing_commands_after_mount() {
    let config = PaletteConfig {
        open: true,
        ..Default::default()
    };
    let mut palette = CommandPalette::new(fizz_buzz(), config).unwrap();
    assert_eq!(palette.suggestions().len(), 3);

    palette.set_commands(vec![Command::new("Omega", || {})]);
    assert_eq!(names(&palette), vec!["Omega"]);
}

#[test]
fn test_caller_list_is_untouched() {
    let commands = fizz_buzz();
    let mut palette = CommandPalette::new(commands.clone(), PaletteConfig::default()).unwrap();
    palette.set_query("Buzz");

    let original: Vec<_> = commands.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(original, vec!["Fizz", "Fizz Buzz", "Buzz"]);
    assert_eq!(palette.commands().len(), 3);
}
