//! Transcript log and progressive reveal behavior

use std::time::{Duration, Instant};
use talkback::transcript::{Role, TranscriptEntry, TranscriptStore};

#[test]
fn test_entries_are_appended_in_arrival_order() {
    let store = TranscriptStore::default();

    store.push_user("first");
    store.push_assistant("second");
    store.push_user("third");

    let entries = store.entries();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].role, Role::User);
    assert_eq!(entries[0].text, "first");
    assert_eq!(entries[1].role, Role::Assistant);
    assert_eq!(entries[1].text, "second");
    assert_eq!(entries[2].role, Role::User);
    assert_eq!(entries[2].text, "third");
}

#[test]
fn test_user_entries_render_in_full_immediately() {
    let store = TranscriptStore::default();
    store.push_user("no suspense here");

    let entries = store.entries();
    assert!(entries[0].is_fully_revealed());
    assert_eq!(entries[0].visible_text(), "no suspense here");
}

#[test]
fn test_reveal_performs_one_increment_per_character() {
    let text = "twelve chars";
    let entry = TranscriptEntry::assistant(text);
    let total = text.chars().count();

    assert_eq!(entry.visible_text(), "");

    for step in 1..=total {
        entry.reveal.advance();
        assert_eq!(entry.reveal.shown(), step);
        assert_eq!(entry.visible_text().chars().count(), step);
    }

    assert!(entry.is_fully_revealed());
    assert_eq!(entry.visible_text(), text);
}

#[test]
fn test_reveal_never_truncates_or_duplicates() {
    let text = "Ünïcodé – reveal ✓";
    let entry = TranscriptEntry::assistant(text);

    // Way more advances than characters; the text must come out exact
    for _ in 0..1000 {
        entry.reveal.advance();
    }

    assert_eq!(entry.visible_text(), text);
    assert_eq!(entry.reveal.shown(), text.chars().count());
}

#[test]
fn test_ticker_reveals_store_entry_to_completion() {
    let store = TranscriptStore::new(Duration::from_millis(1));
    store.push_assistant("short reply");

    let deadline = Instant::now() + Duration::from_secs(5);
    while store.any_revealing() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }

    let entries = store.entries();
    assert!(entries[0].is_fully_revealed());
    assert_eq!(entries[0].visible_text(), "short reply");
}

#[test]
fn test_reveal_of_one_entry_does_not_gate_another() {
    let store = TranscriptStore::new(Duration::from_secs(60));

    // The first entry will stay mid-reveal for a minute; appending more
    // entries must not wait for it
    store.push_assistant("slow reveal");
    store.push_user("and an instant one");

    let entries = store.entries();
    assert_eq!(entries.len(), 2);
    assert!(!entries[0].is_fully_revealed());
    assert!(entries[1].is_fully_revealed());
}
