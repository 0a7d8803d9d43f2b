//! Undo/redo timeline contract tests
//!
//! Scenarios drive a full session the way a host would and pin the
//! observable history behavior: one timeline across every block, ordered
//! by edit arrival, with redo as the exact inverse of undo.

#[cfg(test)]
mod tests {
    use document_model::InsertPosition;
    use focus_router::FocusState;
    use keymap::{KeyCode, KeyEvent, Modifiers};
    use notebook_session::NotebookSession;
    use notebook_types::{BlockId, BlockKind};

    fn session_with_code(contents: &[&str]) -> (NotebookSession, Vec<BlockId>) {
        let mut session = NotebookSession::new();
        let ids = contents
            .iter()
            .map(|content| {
                session
                    .insert_block(BlockKind::Code, content, InsertPosition::AtEnd)
                    .unwrap()
            })
            .collect();
        (session, ids)
    }

    fn edit(session: &mut NotebookSession, id: BlockId, text: &str) {
        let surface = session.surface_mut(id).unwrap();
        surface.cursor_to_end();
        surface.insert_str(text);
        session.commit_changes();
    }

    fn undo_chord() -> KeyEvent {
        KeyEvent::new(KeyCode::Z, Modifiers::CTRL)
    }

    fn redo_chord() -> KeyEvent {
        KeyEvent::new(KeyCode::Z, Modifiers::CTRL.with(Modifiers::SHIFT))
    }

    fn content(session: &NotebookSession, id: BlockId) -> String {
        session.document().block(id).unwrap().content.clone()
    }

    #[test]
    fn test_n_undos_restore_every_block() {
        let (mut session, ids) = session_with_code(&["a0", "b0", "c0"]);
        edit(&mut session, ids[0], " a1");
        edit(&mut session, ids[2], " c1");
        edit(&mut session, ids[1], " b1");
        edit(&mut session, ids[0], " a2");

        for _ in 0..4 {
            assert!(session.handle_key(&undo_chord()));
        }
        assert_eq!(content(&session, ids[0]), "a0");
        assert_eq!(content(&session, ids[1]), "b0");
        assert_eq!(content(&session, ids[2]), "c0");

        // The timeline is exhausted
        assert_eq!(session.history().undo_depth(), 0);
    }

    #[test]
    fn test_undo_order_is_edit_arrival_not_document_order() {
        let (mut session, ids) = session_with_code(&["first", "second"]);
        edit(&mut session, ids[1], "!");
        edit(&mut session, ids[0], "!");

        // The block-0 edit arrived last, so it is undone first
        session.handle_key(&undo_chord());
        assert_eq!(content(&session, ids[0]), "first");
        assert_eq!(content(&session, ids[1]), "second!");

        session.handle_key(&undo_chord());
        assert_eq!(content(&session, ids[1]), "second");
    }

    #[test]
    fn test_uncommitted_edits_keep_arrival_order_across_blocks() {
        let (mut session, ids) = session_with_code(&["first", "second"]);
        // Two surfaces carry pending edits at once, with no commit between
        let surface = session.surface_mut(ids[1]).unwrap();
        surface.cursor_to_end();
        surface.insert_str("!");
        let surface = session.surface_mut(ids[0]).unwrap();
        surface.cursor_to_end();
        surface.insert_str("!");

        // Undo commits the backlog; the block-0 edit arrived last, so it is
        // the one undone, even though block 1 drains later in document order
        session.handle_key(&undo_chord());
        assert_eq!(content(&session, ids[0]), "first");
        assert_eq!(content(&session, ids[1]), "second!");

        session.handle_key(&undo_chord());
        assert_eq!(content(&session, ids[1]), "second");
    }

    #[test]
    fn test_undo_focuses_the_restored_block() {
        let (mut session, ids) = session_with_code(&["one", "two"]);
        edit(&mut session, ids[0], " x");
        session.focus_block(ids[1]);

        session.handle_key(&undo_chord());
        assert_eq!(session.focus_state(), FocusState::SurfaceFocused(ids[0]));
    }

    #[test]
    fn test_redo_replays_the_undone_edit() {
        let (mut session, ids) = session_with_code(&["base"]);
        edit(&mut session, ids[0], " more");

        session.handle_key(&undo_chord());
        assert_eq!(content(&session, ids[0]), "base");

        session.handle_key(&redo_chord());
        assert_eq!(content(&session, ids[0]), "base more");
    }

    #[test]
    fn test_ctrl_y_also_redoes() {
        let (mut session, ids) = session_with_code(&["base"]);
        edit(&mut session, ids[0], " more");
        session.handle_key(&undo_chord());

        session.handle_key(&KeyEvent::new(KeyCode::Y, Modifiers::CTRL));
        assert_eq!(content(&session, ids[0]), "base more");
    }

    #[test]
    fn test_new_edit_discards_the_redo_future() {
        let (mut session, ids) = session_with_code(&["base"]);
        edit(&mut session, ids[0], " one");
        session.handle_key(&undo_chord());

        edit(&mut session, ids[0], " two");
        session.handle_key(&redo_chord());
        // Redo had nothing to replay
        assert_eq!(content(&session, ids[0]), "base two");
    }

    #[test]
    fn test_deleting_a_block_purges_its_timeline() {
        let (mut session, ids) = session_with_code(&["keep", "gone"]);
        edit(&mut session, ids[0], " k1");
        edit(&mut session, ids[1], " g1");
        edit(&mut session, ids[1], " g2");

        session.remove_block(ids[1]).unwrap();

        // Undo can never resurrect the deleted block; only the survivor's
        // edit remains
        assert_eq!(session.history().undo_depth(), 1);
        session.handle_key(&undo_chord());
        assert_eq!(content(&session, ids[0]), "keep");
        assert_eq!(session.history().undo_depth(), 0);
    }

    #[test]
    fn test_undo_while_another_block_has_focus() {
        let (mut session, ids) = session_with_code(&["alpha", "beta"]);
        edit(&mut session, ids[0], " edited");
        session.focus_block(ids[1]);

        // The chord resolves globally, not against the focused block
        session.handle_key(&undo_chord());
        assert_eq!(content(&session, ids[0]), "alpha");
        assert_eq!(content(&session, ids[1]), "beta");
    }

    #[test]
    fn test_restores_never_rerecord() {
        let (mut session, ids) = session_with_code(&["base"]);
        edit(&mut session, ids[0], " a");
        edit(&mut session, ids[0], " b");

        session.handle_key(&undo_chord());
        session.handle_key(&redo_chord());
        session.handle_key(&undo_chord());
        session.handle_key(&undo_chord());

        assert_eq!(content(&session, ids[0]), "base");
        assert_eq!(session.history().undo_depth(), 0);
        assert_eq!(session.history().redo_depth(), 2);
    }
}
