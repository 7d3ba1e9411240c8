mod common;

use std::time::{Duration, Instant};

use common::{level, sample_dataset, FakeEngine};
use crossterm::event::KeyCode;
use hsk_flashcards::ui::{OverlayPhase, CLOSE_DURATION, OPEN_DURATION};
use hsk_flashcards::{App, Category, Filters, PlaybackDispatcher};

fn app_with_engine() -> (App, FakeEngine) {
    let engine = FakeEngine::default();
    let app = App::new(
        sample_dataset(),
        Filters::default(),
        PlaybackDispatcher::new(Box::new(engine.clone())),
    );
    (app, engine)
}

fn silent_app() -> App {
    App::new(
        sample_dataset(),
        Filters::default(),
        PlaybackDispatcher::unavailable(),
    )
}

fn press(app: &mut App, keys: &[KeyCode]) {
    for key in keys {
        assert!(!app.handle_key(*key), "{key:?} should not quit");
    }
}

fn visible_ids(app: &App) -> Vec<i64> {
    app.visible_items().iter().map(|item| item.key().id).collect()
}

#[test]
fn expanding_another_card_collapses_the_first() {
    let mut app = silent_app();
    let first = app.visible_items()[0].key();
    let second = app.visible_items()[1].key();

    press(&mut app, &[KeyCode::Enter]);
    assert_eq!(app.list_state().expanded(), Some(first));

    press(&mut app, &[KeyCode::Down, KeyCode::Enter]);
    assert_eq!(app.list_state().expanded(), Some(second));
    assert!(!app.list_state().is_expanded(first));

    press(&mut app, &[KeyCode::Enter]);
    assert_eq!(app.list_state().expanded(), None);
}

#[test]
fn switching_category_resets_cursor_and_expansion() {
    let mut app = silent_app();
    press(&mut app, &[KeyCode::Down, KeyCode::Enter, KeyCode::Tab]);

    assert_eq!(app.filters().category, Category::Vocabulary);
    assert_eq!(app.list_state().cursor(), 0);
    assert_eq!(app.list_state().expanded(), None);

    press(&mut app, &[KeyCode::BackTab, KeyCode::BackTab]);
    assert_eq!(app.filters().category, Category::Patterns);
    press(&mut app, &[KeyCode::Char('c')]);
    assert_eq!(app.filters().category, Category::Conversation);
}

#[test]
fn digit_keys_filter_vocabulary_by_level() {
    let mut app = silent_app();

    press(&mut app, &[KeyCode::Char('1')]);
    assert_eq!(app.filters().category, Category::Vocabulary);
    assert_eq!(app.filters().hsk_level, Some(level(1)));
    assert_eq!(visible_ids(&app), vec![1, 3]);
    assert_eq!(app.status_text(), Some("Showing HSK 1 vocabulary."));

    press(&mut app, &[KeyCode::Char('6')]);
    assert!(app.visible_items().is_empty());

    press(&mut app, &[KeyCode::Char('0')]);
    assert_eq!(app.filters().hsk_level, None);
    assert_eq!(visible_ids(&app), vec![1, 2, 3, 4]);
}

#[test]
fn headword_toggle_does_not_change_selection() {
    let mut app = silent_app();
    press(&mut app, &[KeyCode::Char('v'), KeyCode::Down, KeyCode::Enter]);
    let before = visible_ids(&app);
    let expanded = app.list_state().expanded();

    press(&mut app, &[KeyCode::Char('h')]);
    assert!(!app.headwords_visible());
    assert_eq!(visible_ids(&app), before);
    assert_eq!(app.list_state().expanded(), expanded);

    press(&mut app, &[KeyCode::Char('h')]);
    assert!(app.headwords_visible());
}

#[test]
fn reveal_survives_expansion_changes() {
    let mut app = silent_app();
    let first = app.visible_items()[0].key();

    press(&mut app, &[KeyCode::Char('r'), KeyCode::Enter, KeyCode::Enter]);
    assert!(app.list_state().is_revealed(first));

    press(&mut app, &[KeyCode::Down, KeyCode::Enter]);
    assert!(app.list_state().is_revealed(first));
}

#[test]
fn space_plays_cursor_headword_and_a_replays_expanded() {
    let (mut app, engine) = app_with_engine();

    press(&mut app, &[KeyCode::Char(' ')]);
    assert_eq!(engine.audible.borrow().as_deref(), Some("你好"));

    press(&mut app, &[KeyCode::Down, KeyCode::Enter, KeyCode::Down]);
    press(&mut app, &[KeyCode::Char('a')]);
    assert_eq!(engine.audible.borrow().as_deref(), Some("谢谢"));
    assert_eq!(
        engine.spoken(),
        vec!["你好".to_string(), "谢谢".to_string()]
    );
}

#[test]
fn replay_without_expanded_card_reports_status() {
    let (mut app, engine) = app_with_engine();
    press(&mut app, &[KeyCode::Char('a')]);
    assert!(engine.spoken().is_empty());
    assert_eq!(app.status_text(), Some("Expand a card first to replay it."));
}

#[test]
fn playing_without_speech_leaves_state_untouched() {
    let mut app = silent_app();
    press(&mut app, &[KeyCode::Char('v'), KeyCode::Down, KeyCode::Enter]);
    let filters = *app.filters();
    let cursor = app.list_state().cursor();
    let expanded = app.list_state().expanded();

    press(&mut app, &[KeyCode::Char(' ')]);

    assert_eq!(*app.filters(), filters);
    assert_eq!(app.list_state().cursor(), cursor);
    assert_eq!(app.list_state().expanded(), expanded);
    assert_eq!(app.status_text(), None);
}

#[test]
fn usage_overlay_only_opens_for_entries_with_a_note() {
    let mut app = silent_app();
    let now = Instant::now();

    app.handle_key_at(KeyCode::Char('v'), now);
    app.handle_key_at(KeyCode::Char('u'), now);
    assert_eq!(app.overlay().phase(), OverlayPhase::Closed);

    app.handle_key_at(KeyCode::End, now);
    app.handle_key_at(KeyCode::Char('u'), now);
    assert!(matches!(app.overlay().phase(), OverlayPhase::Opening { .. }));

    app.on_tick(now + OPEN_DURATION);
    assert_eq!(app.overlay().phase(), OverlayPhase::Open);
}

#[test]
fn reopening_the_overlay_starts_with_everything_hidden() {
    let (mut app, engine) = app_with_engine();
    let start = Instant::now();

    app.handle_key_at(KeyCode::Char('v'), start);
    app.handle_key_at(KeyCode::End, start);
    app.handle_key_at(KeyCode::Char('u'), start);
    app.on_tick(start + OPEN_DURATION);

    app.handle_key_at(KeyCode::Char('r'), start + OPEN_DURATION);
    app.handle_key_at(KeyCode::Down, start + OPEN_DURATION);
    app.handle_key_at(KeyCode::Enter, start + OPEN_DURATION);
    app.handle_key_at(KeyCode::Char(' '), start + OPEN_DURATION);
    assert_eq!(app.overlay().revealed().len(), 2);
    assert_eq!(engine.audible.borrow().as_deref(), Some("这是书。"));

    let closing = start + Duration::from_secs(1);
    app.handle_key_at(KeyCode::Esc, closing);
    assert!(app.overlay().revealed().is_empty());

    // Keys are ignored while the exit animation runs.
    app.handle_key_at(KeyCode::Char('u'), closing);
    assert!(matches!(app.overlay().phase(), OverlayPhase::Closing { .. }));

    app.on_tick(closing + CLOSE_DURATION);
    assert_eq!(app.overlay().phase(), OverlayPhase::Closed);

    let reopened = closing + CLOSE_DURATION;
    app.handle_key_at(KeyCode::Char('u'), reopened);
    assert!(app.overlay().is_visible());
    assert!(app.overlay().revealed().is_empty());
    assert_eq!(app.overlay().focus(), 0);
}

#[test]
fn q_quits_from_anywhere() {
    let mut app = silent_app();
    let now = Instant::now();
    app.handle_key_at(KeyCode::Char('v'), now);
    app.handle_key_at(KeyCode::End, now);
    app.handle_key_at(KeyCode::Char('u'), now);
    assert!(app.handle_key_at(KeyCode::Char('q'), now));
}
