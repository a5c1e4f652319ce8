use notes_core::Note;

#[test]
fn note_new_is_unsaved() {
    let note = Note::new("Groceries", "Milk, eggs");

    assert_eq!(note.id, None);
    assert!(!note.is_persisted());
    assert_eq!(note.title, "Groceries");
    assert_eq!(note.content, "Milk, eggs");
}

#[test]
fn note_serialization_uses_expected_wire_fields() {
    let note = Note::with_id(3, "Groceries", "Milk, eggs");

    let json = serde_json::to_value(&note).unwrap();
    assert_eq!(json["id"], 3);
    assert_eq!(json["title"], "Groceries");
    assert_eq!(json["content"], "Milk, eggs");

    let decoded: Note = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, note);
}

#[test]
fn unsaved_note_serializes_null_id() {
    let json = serde_json::to_value(Note::new("draft", "")).unwrap();
    assert!(json["id"].is_null());
}
