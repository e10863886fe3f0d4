use std::cell::Cell;

use school_dashboard::models::{Note, Role};
use school_dashboard::services::{DELETE_CONFIRMATION, NotesBoard, OwnerEvent};

fn note(id: &str, content: &str) -> Note {
    Note {
        id: id.to_string(),
        content: content.to_string(),
        author: "Principal".to_string(),
        timestamp: "2026-04-01T09:00:00+00:00".to_string(),
    }
}

fn admin_board() -> NotesBoard {
    let mut board = NotesBoard::new(Role::Admin);
    board.sync_from_owner(vec![
        note("b", "Sports day on Friday"),
        note("a", "Exams start next week"),
    ]);
    board
}

#[test]
fn keeps_owner_order() {
    let board = admin_board();
    let ids: Vec<&str> = board.notes().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, ["b", "a"]);
}

#[test]
fn add_ignores_blank_content() {
    let board = admin_board();
    assert!(board.add("").is_none());
    assert!(board.add("  \n\t").is_none());
    assert_eq!(
        board.add("  Holiday on Monday "),
        Some(OwnerEvent::AddNote {
            content: "  Holiday on Monday ".to_string()
        })
    );
}

#[test]
fn only_admins_may_post_edit_or_delete() {
    for role in [Role::Student, Role::Teacher] {
        let mut board = NotesBoard::new(role);
        board.sync_from_owner(vec![note("a", "Exams start next week")]);

        assert!(!board.can_post());
        assert!(board.add("Hello").is_none());
        assert!(!board.start_edit("a"));
        assert!(board.save_edit().is_none());
        assert!(board.delete("a", |_| true).is_none());
    }
}

#[test]
fn delete_requires_confirmation() {
    let board = admin_board();
    let asked = Cell::new(0);

    let declined = board.delete("a", |message| {
        asked.set(asked.get() + 1);
        assert_eq!(message, DELETE_CONFIRMATION);
        false
    });
    assert!(declined.is_none());
    assert_eq!(asked.get(), 1);

    let confirmed = board.delete("a", |_| {
        asked.set(asked.get() + 1);
        true
    });
    assert_eq!(
        confirmed,
        Some(OwnerEvent::DeleteNote {
            id: "a".to_string()
        })
    );
    assert_eq!(asked.get(), 2);
}

#[test]
fn edit_save_emits_draft_and_leaves_edit_mode_once_stored() {
    let mut board = admin_board();

    assert!(board.start_edit("a"));
    assert_eq!(board.editing().unwrap().content, "Exams start next week");

    board.set_edit_draft("Exams start in two weeks");
    assert_eq!(
        board.save_edit(),
        Some(OwnerEvent::EditNote {
            id: "a".to_string(),
            content: "Exams start in two weeks".to_string()
        })
    );
    assert_eq!(
        board.editing().unwrap().content,
        "Exams start in two weeks",
        "draft survives until the owner stores it"
    );

    board.mark_saved();
    assert!(board.editing().is_none());
}

#[test]
fn draft_for_removed_note_is_dropped_on_sync() {
    let mut board = admin_board();
    board.start_edit("a");
    board.set_edit_draft("half written");

    board.sync_from_owner(vec![note("a", "Exams start next week"), note("c", "New")]);
    assert_eq!(board.editing().unwrap().content, "half written", "note still there");

    board.sync_from_owner(vec![note("b", "Sports day on Friday")]);
    assert!(board.editing().is_none());
    assert!(board.save_edit().is_none());
}

#[test]
fn blank_edit_draft_is_not_saved() {
    let mut board = admin_board();
    board.start_edit("a");
    board.set_edit_draft("   ");

    assert!(board.save_edit().is_none());
    assert_eq!(board.editing().unwrap().note_id, "a", "still editing");
}

#[test]
fn cancel_discards_draft_without_emitting() {
    let mut board = admin_board();
    board.start_edit("b");
    board.set_edit_draft("changed my mind");
    board.cancel_edit();

    assert!(board.editing().is_none());
    assert!(board.save_edit().is_none());
    assert_eq!(board.notes()[0].content, "Sports day on Friday");
}

#[test]
fn only_one_note_is_edited_at_a_time() {
    let mut board = admin_board();
    board.start_edit("a");
    board.set_edit_draft("draft for a");
    board.start_edit("b");

    let editing = board.editing().unwrap();
    assert_eq!(editing.note_id, "b");
    assert_eq!(editing.content, "Sports day on Friday");
}

#[test]
fn unknown_note_cannot_be_edited() {
    let mut board = admin_board();
    assert!(!board.start_edit("zzz"));
    assert!(board.editing().is_none());
}
