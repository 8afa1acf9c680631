use serde::{Serialize, Deserialize};

/// The reverse of one completed player move: `card_count` cards went from
/// `source` to `dest`, and `revealed_card` records whether the move flipped
/// the new top card of `source` face-up. Stacks are referenced by tableau
/// index so the log can be persisted alongside the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoAction {
    pub card_count: usize,
    pub source: usize,
    pub dest: usize,
    pub revealed_card: bool,
}

/// LIFO log of reversible moves. Cleared whenever an irreversible action
/// happens (dealing a reserve row, sweeping a completed run) — undo only
/// covers the contiguous player moves since then.
#[derive(Debug, Clone, Default)]
pub struct UndoStack {
    actions: Vec<UndoAction>,
}

impl UndoStack {
    pub fn new() -> Self {
        UndoStack { actions: Vec::new() }
    }

    pub fn can_undo(&self) -> bool {
        !self.actions.is_empty()
    }

    pub fn actions(&self) -> &[UndoAction] {
        &self.actions
    }

    pub fn add_move_of_cards(
        &mut self,
        card_count: usize,
        source: usize,
        dest: usize,
        revealed_card: bool,
    ) {
        self.actions.push(UndoAction {
            card_count,
            source,
            dest,
            revealed_card,
        });
    }

    /// Restore a persisted action (used when loading a saved game).
    pub fn push(&mut self, action: UndoAction) {
        self.actions.push(action);
    }

    pub fn pop(&mut self) -> Option<UndoAction> {
        self.actions.pop()
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }
}
