//! Property-based tests for the App state machine.
//!
//! Tests verify that invariants hold under arbitrary event sequences.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use heartsh_app::{App, AppAction, AppEvent, KeyInput, MIN_BODY_HEIGHT, TAB_COUNT, Theme};
use proptest::prelude::*;

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
}

fn app() -> App {
    App::new("  ,d88b.d88b,\n  88888888888\n  `Y8888888Y'\n    `Y888Y'\n      `Y'", Arc::new(Theme::default()), start())
}

/// Generate random keys, quit keys excluded.
fn key_strategy() -> impl Strategy<Value = KeyInput> {
    prop_oneof![
        3 => Just(KeyInput::Tab),
        3 => Just(KeyInput::BackTab),
        2 => Just(KeyInput::Down),
        2 => Just(KeyInput::Up),
        1 => Just(KeyInput::PageDown),
        1 => Just(KeyInput::PageUp),
        1 => Just(KeyInput::Home),
        1 => Just(KeyInput::End),
        2 => prop::char::range('a', 'p').prop_map(KeyInput::Char),
    ]
}

/// Generate random app events.
fn event_strategy() -> impl Strategy<Value = AppEvent> {
    prop_oneof![
        1 => (0i64..100_000).prop_map(|s| AppEvent::Tick(start() + Duration::seconds(s))),
        1 => (0u16..300, 0u16..120).prop_map(|(c, r)| AppEvent::Resize(c, r)),
        4 => key_strategy().prop_map(AppEvent::Key),
    ]
}

proptest! {
    #[test]
    fn prop_selected_stays_in_range(events in prop::collection::vec(event_strategy(), 0..100)) {
        let mut app = app();

        for event in events {
            app.handle(event, start());
            prop_assert!(app.selected() < TAB_COUNT);
        }
    }

    #[test]
    fn prop_tab_then_back_tab_is_identity(presses in 0usize..10) {
        let mut app = app();
        for _ in 0..presses {
            app.handle(AppEvent::Key(KeyInput::Tab), start());
        }
        let selected = app.selected();

        app.handle(AppEvent::Key(KeyInput::Tab), start());
        app.handle(AppEvent::Key(KeyInput::BackTab), start());

        prop_assert_eq!(app.selected(), selected);
        prop_assert_eq!(selected, presses % TAB_COUNT);
    }

    #[test]
    fn prop_resize_sets_viewport_size(
        first in (0u16..300, 0u16..120),
        rest in prop::collection::vec((0u16..300, 0u16..120), 0..10),
    ) {
        let mut app = app();

        let actions = app.handle(AppEvent::Resize(first.0, first.1), start());
        prop_assert_eq!(actions, vec![AppAction::SyncViewport, AppAction::Render]);
        prop_assert!(app.is_ready());
        prop_assert_eq!(app.viewport().width(), first.0.saturating_sub(1));
        prop_assert_eq!(app.viewport().height(), first.1.saturating_sub(6));
        prop_assert!(app.viewport().line_count() >= usize::from(MIN_BODY_HEIGHT));

        for (cols, rows) in rest {
            app.handle(AppEvent::Resize(cols, rows), start());
            prop_assert!(app.is_ready());
            prop_assert_eq!(app.viewport().width(), cols);
            prop_assert_eq!(app.viewport().height(), rows.saturating_sub(6));
        }
    }

    #[test]
    fn prop_offset_stays_in_range(events in prop::collection::vec(event_strategy(), 0..100)) {
        let mut app = app();

        for event in events {
            app.handle(event, start());
            let viewport = app.viewport();
            prop_assert!(viewport.y_offset() <= viewport.max_y_offset());
        }
    }

    #[test]
    fn prop_every_non_quit_event_renders_once(events in prop::collection::vec(event_strategy(), 0..50)) {
        let mut app = app();

        for event in events {
            let actions = app.handle(event, start());
            let renders = actions.iter().filter(|a| **a == AppAction::Render).count();
            prop_assert_eq!(renders, 1);
            prop_assert!(!actions.contains(&AppAction::Quit));
        }
    }

    #[test]
    fn prop_view_is_pure(events in prop::collection::vec(event_strategy(), 0..30)) {
        let mut app = app();
        for event in events {
            app.handle(event, start());
        }

        prop_assert_eq!(app.view(), app.view());
    }

    #[test]
    fn prop_clock_is_monotonic(ticks in prop::collection::vec(0i64..100_000, 0..50)) {
        let mut app = app();
        let mut latest = app.time();

        for seconds in ticks {
            let at = start() + Duration::seconds(seconds);
            app.handle(AppEvent::Tick(at), at);
            latest = latest.max(at);
            prop_assert_eq!(app.time(), latest);
        }
    }

    #[test]
    fn prop_quit_keys_always_quit(
        events in prop::collection::vec(event_strategy(), 0..30),
        quit in prop_oneof![Just(KeyInput::Ctrl('c')), Just(KeyInput::Char('q')), Just(KeyInput::Esc)],
    ) {
        let mut app = app();
        for event in events {
            app.handle(event, start());
        }

        prop_assert_eq!(app.handle(AppEvent::Key(quit), start()), vec![AppAction::Quit]);
    }
}
