use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::card::{Card, DECK_SIZE, RUN_LENGTH, full_deck};
use crate::stack::CardStack;
use crate::undo::{UndoAction, UndoStack};

/// Number of tableau stacks.
pub const STACK_COUNT: usize = 10;
/// Maximum number of pending reserve deals the board (and save format) can hold.
pub const EXTRAS_CAPACITY: usize = 6;
/// Reserve deals prepared by a fresh game: 5 batches of 10 cards.
pub const INITIAL_DEALS: usize = 5;

pub const STARTING_SCORE: i32 = 500;
pub const SCORE_PER_RUN: i32 = 100;
pub const SCORE_PER_MOVE: i32 = 1;

/// The game board – the single source of truth for all game state.
///
/// Ten tableau stacks, a reserve of face-down deals, a pile of completed-run
/// markers, the undo log and the score/move counters. Created once per
/// session; `start_new_game` reshuffles it in place.
#[derive(Debug, Clone)]
pub struct Board {
    suit_count: u8,
    stacks: Vec<CardStack>,
    /// Pending reserve batches of 10 face-down cards each, consumed from the
    /// back (the most recently prepared batch is dealt first).
    extras: Vec<Vec<Card>>,
    /// One marker (the run's King) per completed run swept off the board.
    completed: Vec<Card>,
    /// Cached board-clear flag, set once when the last run completes.
    cleared: bool,
    undo: UndoStack,
    move_count: u32,
    score: i32,
}

impl Board {
    // -------------------------------------------------------------------------
    // Construction / Dealing
    // -------------------------------------------------------------------------

    pub fn new(suit_count: u8) -> Self {
        Board {
            suit_count,
            stacks: vec![CardStack::new(); STACK_COUNT],
            extras: Vec::with_capacity(EXTRAS_CAPACITY),
            completed: Vec::with_capacity(DECK_SIZE / RUN_LENGTH),
            cleared: false,
            undo: UndoStack::new(),
            move_count: 0,
            score: 0,
        }
    }

    /// Reshuffle and deal a fresh game using OS entropy.
    pub fn start_new_game(&mut self, suit_count: u8) {
        let mut rng = rand::rngs::SmallRng::from_os_rng();
        let mut deck = full_deck(suit_count);
        deck.shuffle(&mut rng);
        self.suit_count = suit_count;
        self.start_with_deck(deck);
    }

    /// Deal from a specific seed (reproducible games).
    pub fn start_seeded(&mut self, suit_count: u8, seed: u64) {
        let mut rng = rand::rngs::SmallRng::seed_from_u64(seed);
        let mut deck = full_deck(suit_count);
        deck.shuffle(&mut rng);
        self.suit_count = suit_count;
        self.start_with_deck(deck);
    }

    /// Deal from an already-shuffled deck.
    ///
    /// The first 54 cards go round-robin onto the 10 stacks (stacks 0–3 end
    /// up with 6 cards, stacks 4–9 with 5) with only the top card face-up;
    /// the remaining 50 become 5 reserve batches of 10.
    fn start_with_deck(&mut self, deck: Vec<Card>) {
        assert_eq!(deck.len(), DECK_SIZE, "Need exactly 104 cards to deal");

        self.reset();

        let tableau_cards = DECK_SIZE - STACK_COUNT * INITIAL_DEALS;
        for (i, card) in deck.iter().take(tableau_cards).enumerate() {
            self.stacks[i % STACK_COUNT].add(*card);
        }
        for stack in &mut self.stacks {
            if let Some(top) = stack.top_card_mut() {
                top.reveal();
            }
        }

        for batch in deck[tableau_cards..].chunks(STACK_COUNT) {
            self.extras.push(batch.to_vec());
        }

        self.move_count = 0;
        self.score = STARTING_SCORE;
    }

    pub fn reset(&mut self) {
        for stack in &mut self.stacks {
            stack.clear();
        }
        self.extras.clear();
        self.completed.clear();
        self.cleared = false;
        self.undo.clear();
        self.move_count = 0;
        self.score = 0;
    }

    /// Deal the next reserve batch: one face-up card onto each stack.
    /// Irreversible, so the undo log is cleared. No-op (returns `false`)
    /// when the reserve is empty.
    pub fn deal(&mut self) -> bool {
        let Some(batch) = self.extras.pop() else {
            return false;
        };

        for (i, mut card) in batch.into_iter().enumerate() {
            card.reveal();
            self.stacks[i].add(card);
        }
        self.undo.clear();
        true
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn suit_count(&self) -> u8 {
        self.suit_count
    }

    pub fn stack(&self, idx: usize) -> &CardStack {
        &self.stacks[idx]
    }

    pub fn stacks(&self) -> &[CardStack] {
        &self.stacks
    }

    pub fn extras(&self) -> &[Vec<Card>] {
        &self.extras
    }

    pub fn count_of_extra_dealings_left(&self) -> usize {
        self.extras.len()
    }

    pub fn cards_in_next_deal(&self) -> Option<&[Card]> {
        self.extras.last().map(Vec::as_slice)
    }

    /// Markers (one King per run) for the runs swept off the board.
    pub fn completed(&self) -> &[Card] {
        &self.completed
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    pub fn is_board_clear(&self) -> bool {
        self.cleared
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    pub fn undo_actions(&self) -> &[UndoAction] {
        self.undo.actions()
    }

    /// Live cards everywhere, counting each completed run as its 13 cards.
    pub fn total_card_count(&self) -> usize {
        self.stacks.iter().map(CardStack::len).sum::<usize>()
            + self.extras.iter().map(Vec::len).sum::<usize>()
            + self.completed.len() * RUN_LENGTH
    }

    // -------------------------------------------------------------------------
    // Moves
    // -------------------------------------------------------------------------

    /// Placement rule: an empty stack accepts anything, otherwise the moving
    /// card must be exactly one rank below the destination's top card (suit
    /// does not matter for placement).
    pub fn can_move_card_to_stack(&self, card: Card, dest: usize) -> bool {
        match self.stacks[dest].top_card() {
            None => true,
            Some(top) => card.can_stack_on(top),
        }
    }

    /// Move the slice `[pos, len)` from `src` to `dest`, preserving order.
    ///
    /// Callers are expected to have validated the move via `can_pickup_run`
    /// and `can_move_card_to_stack`; a violation here is a bug upstream, so
    /// it is warned about and the move proceeds best-effort. Flips the
    /// uncovered source card face-up when it was hidden, bumps the move
    /// counter, charges the score and records the undo action.
    pub fn move_cards(&mut self, src: usize, pos: usize, dest: usize) {
        if !self.stacks[src].can_pickup_run(pos) {
            eprintln!("[WARN] Asked to move cards that are not in a sequential run - bug?");
        }
        let moving = self.stacks[src].card(pos);
        if !self.can_move_card_to_stack(moving, dest) {
            eprintln!("[WARN] Asked to move cards to an invalid location - bug?");
        }

        let card_count = self.stacks[src].len() - pos;
        let slice = self.stacks[src].remove_range(pos, card_count);
        for card in slice {
            self.stacks[dest].add(card);
        }

        let mut revealed_card = false;
        if let Some(top) = self.stacks[src].top_card_mut() {
            if !top.face_up {
                revealed_card = true;
                top.reveal();
            }
        }

        self.move_count += 1;
        self.score -= SCORE_PER_MOVE;
        self.undo
            .add_move_of_cards(card_count, src, dest, revealed_card);
    }

    /// Same mechanics as `move_cards` but without the validation warnings,
    /// without touching the counters or the undo log, and force-revealing
    /// the uncovered source card. Used exclusively by undo replay, where the
    /// original move is known to have been legal.
    fn move_cards_without_checking(&mut self, src: usize, pos: usize, dest: usize) {
        let card_count = self.stacks[src].len() - pos;
        let slice = self.stacks[src].remove_range(pos, card_count);
        for card in slice {
            self.stacks[dest].add(card);
        }

        if let Some(top) = self.stacks[src].top_card_mut() {
            top.reveal();
        }
    }

    /// Reverse the most recent move: un-flip the card it revealed, replay
    /// the cards back, and restore the move counter and score to their
    /// pre-move values. No-op when the log is empty.
    pub fn undo(&mut self) {
        let Some(action) = self.undo.pop() else {
            return;
        };

        let Some(pos) = self.stacks[action.dest].len().checked_sub(action.card_count) else {
            eprintln!("[WARN] Undo action does not match the board - bug?");
            return;
        };

        if action.revealed_card {
            if let Some(top) = self.stacks[action.source].top_card_mut() {
                top.hide();
            }
        }

        self.move_cards_without_checking(action.dest, pos, action.source);

        self.move_count = self.move_count.saturating_sub(1);
        self.score += SCORE_PER_MOVE;
    }

    // -------------------------------------------------------------------------
    // Completed runs / Win detection
    // -------------------------------------------------------------------------

    /// Sweep the complete King→Ace run off the top of `stack`. Irreversible,
    /// so the undo log is cleared. When `add_to_complete` is set, a marker
    /// joins the completed pile, the run bonus is scored and the board-clear
    /// transition is checked.
    pub fn remove_complete_run(&mut self, stack: usize, reveal_card: bool, add_to_complete: bool) {
        let Some(run) = self.stacks[stack].remove_complete_run(reveal_card) else {
            return;
        };

        self.undo.clear();

        if add_to_complete {
            self.completed.push(run[0]);
            self.score += SCORE_PER_RUN;

            if !self.cleared && self.completed.len() == DECK_SIZE / RUN_LENGTH {
                self.cleared = true;
            }

            #[cfg(debug_assertions)]
            {
                let recount =
                    self.stacks.iter().all(CardStack::is_empty) && self.extras.is_empty();
                assert_eq!(
                    recount, self.cleared,
                    "completed count does not match full board recount"
                );
            }
        }
    }

    // -------------------------------------------------------------------------
    // Persistence boundary
    // -------------------------------------------------------------------------

    /// Reassemble a board from persisted parts. The board-clear flag is
    /// recomputed rather than trusted from disk.
    pub(crate) fn from_parts(
        suit_count: u8,
        stacks: Vec<CardStack>,
        extras: Vec<Vec<Card>>,
        completed: Vec<Card>,
        undo_actions: Vec<UndoAction>,
        move_count: u32,
        score: i32,
    ) -> Self {
        debug_assert_eq!(stacks.len(), STACK_COUNT);

        let cleared = completed.len() == DECK_SIZE / RUN_LENGTH;
        let mut undo = UndoStack::new();
        for action in undo_actions {
            undo.push(action);
        }

        let board = Board {
            suit_count,
            stacks,
            extras,
            completed,
            cleared,
            undo,
            move_count,
            score,
        };
        debug_assert_eq!(board.total_card_count(), DECK_SIZE);
        board
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Suit;

    fn face_up(suit: Suit, rank: u8) -> Card {
        let mut c = Card::new(suit, rank);
        c.reveal();
        c
    }

    #[test]
    fn new_game_with_four_suits_deals_the_classic_layout() {
        let mut board = Board::new(4);
        board.start_seeded(4, 7);

        let sizes: Vec<usize> = board.stacks().iter().map(CardStack::len).collect();
        assert_eq!(sizes, vec![6, 6, 6, 6, 5, 5, 5, 5, 5, 5]);

        assert_eq!(board.count_of_extra_dealings_left(), INITIAL_DEALS);
        for batch in board.extras() {
            assert_eq!(batch.len(), STACK_COUNT);
        }

        assert_eq!(board.total_card_count(), DECK_SIZE);
        assert_eq!(board.score(), STARTING_SCORE);
        assert_eq!(board.move_count(), 0);
        assert!(!board.is_board_clear());

        // Only the top card of each stack starts face-up.
        for stack in board.stacks() {
            assert_eq!(stack.hidden_count(), stack.len() - 1);
            assert!(stack.top_card().unwrap().face_up);
        }
        for batch in board.extras() {
            assert!(batch.iter().all(|c| !c.face_up));
        }
    }

    #[test]
    fn dealing_every_reserve_batch_grows_each_stack_by_five() {
        let mut board = Board::new(2);
        board.start_seeded(2, 1);

        let before: Vec<usize> = board.stacks().iter().map(CardStack::len).collect();
        for _ in 0..INITIAL_DEALS {
            assert!(board.deal());
        }
        assert_eq!(board.count_of_extra_dealings_left(), 0);
        assert!(!board.deal(), "dealing from an empty reserve is a no-op");

        for (i, stack) in board.stacks().iter().enumerate() {
            assert_eq!(stack.len(), before[i] + INITIAL_DEALS);
            assert!(stack.top_card().unwrap().face_up);
        }
        assert_eq!(board.total_card_count(), DECK_SIZE);
    }

    #[test]
    fn next_deal_preview_tracks_the_reserve() {
        let mut board = Board::new(2);
        board.start_seeded(2, 11);

        let next = board.cards_in_next_deal().expect("fresh game has a reserve");
        assert_eq!(next.len(), STACK_COUNT);
        assert_eq!(next, board.extras().last().unwrap().as_slice());

        for _ in 0..INITIAL_DEALS {
            board.deal();
        }
        assert!(board.cards_in_next_deal().is_none());
    }

    #[test]
    fn deal_clears_the_undo_log() {
        let mut board = Board::new(1);
        board.stacks[0].add(face_up(Suit::Spade, 5));
        board.stacks[1].add(face_up(Suit::Spade, 6));
        board.extras.push(
            (0..STACK_COUNT)
                .map(|_| Card::new(Suit::Spade, 10))
                .collect(),
        );

        board.move_cards(0, 0, 1);
        assert!(board.can_undo());

        board.deal();
        assert!(!board.can_undo());
        assert_eq!(board.count_of_extra_dealings_left(), 0);
    }

    #[test]
    fn move_then_undo_restores_everything() {
        let mut board = Board::new(4);
        board.stacks[0].add(Card::new(Suit::Club, 11));
        board.stacks[0].add(face_up(Suit::Heart, 8));
        board.stacks[0].add(face_up(Suit::Heart, 7));
        board.stacks[1].add(face_up(Suit::Diamond, 9));
        board.score = STARTING_SCORE;

        let src_before = board.stack(0).clone();
        let dest_before = board.stack(1).clone();

        board.move_cards(0, 1, 1);
        assert_eq!(board.move_count(), 1);
        assert_eq!(board.score(), STARTING_SCORE - SCORE_PER_MOVE);
        assert_eq!(board.undo_actions().len(), 1);

        board.undo();
        assert_eq!(board.stack(0), &src_before);
        assert_eq!(board.stack(1), &dest_before);
        assert_eq!(board.move_count(), 0);
        assert_eq!(board.score(), STARTING_SCORE);
        assert!(!board.can_undo());
    }

    #[test]
    fn undo_unflips_the_card_the_move_revealed() {
        // Stack 0: hidden 9♥ under a face-up 5♠; stack 1 top is 6♠ so the
        // 5♠ can move there, revealing the 9♥.
        let mut board = Board::new(1);
        board.stacks[0].add(Card::new(Suit::Heart, 9));
        board.stacks[0].add(face_up(Suit::Spade, 5));
        board.stacks[1].add(face_up(Suit::Spade, 6));

        board.move_cards(0, 1, 1);
        assert!(board.stack(0).top_card().unwrap().face_up);
        assert!(board.undo_actions()[0].revealed_card);

        board.undo();
        assert!(!board.stack(0).card(0).face_up, "reveal must be rolled back");
        assert!(board.stack(0).top_card().unwrap().face_up);
        assert_eq!(board.stack(0).len(), 2);
        assert_eq!(board.stack(1).len(), 1);
    }

    #[test]
    fn multi_card_run_moves_as_a_unit() {
        let mut board = Board::new(1);
        board.stacks[0].add(face_up(Suit::Spade, 8));
        board.stacks[0].add(face_up(Suit::Spade, 7));
        board.stacks[0].add(face_up(Suit::Spade, 6));
        board.stacks[1].add(face_up(Suit::Spade, 9));

        assert!(board.stack(0).can_pickup_run(0));
        assert!(board.can_move_card_to_stack(board.stack(0).card(0), 1));

        board.move_cards(0, 0, 1);
        assert!(board.stack(0).is_empty());
        assert_eq!(board.stack(1).len(), 4);
        assert_eq!(board.stack(1).top_card().unwrap().rank, 6);
    }

    #[test]
    fn placement_allows_off_suit_but_pickup_does_not() {
        let mut board = Board::new(4);
        board.stacks[0].add(face_up(Suit::Heart, 5));
        board.stacks[1].add(face_up(Suit::Spade, 6));

        // Off-suit placement is legal...
        assert!(board.can_move_card_to_stack(board.stack(0).card(0), 1));
        board.move_cards(0, 0, 1);

        // ...but the resulting pair is not a pickup run.
        assert_eq!(board.stack(1).top_of_sequential_run(), Some(1));
        assert!(!board.stack(1).can_pickup_run(0));
    }

    #[test]
    fn completing_the_final_run_sets_board_clear() {
        let mut board = Board::new(1);
        // Seven runs already swept, the eighth sitting complete on stack 0.
        for _ in 0..7 {
            board.completed.push(face_up(Suit::Spade, 13));
        }
        for rank in (1..=13).rev() {
            board.stacks[0].add(face_up(Suit::Spade, rank));
        }
        board.score = STARTING_SCORE;

        assert!(board.stack(0).contains_complete_run());
        board.remove_complete_run(0, true, true);

        assert_eq!(board.completed_count(), 8);
        assert!(board.is_board_clear());
        assert_eq!(board.score(), STARTING_SCORE + SCORE_PER_RUN);
        assert_eq!(board.total_card_count(), 8 * RUN_LENGTH);
    }

    #[test]
    fn removing_a_run_scores_and_clears_the_undo_log() {
        let mut board = Board::new(1);
        board.stacks[1].add(Card::new(Suit::Spade, 2)); // stays hidden until the sweep
        for rank in (1..=13).rev() {
            board.stacks[1].add(face_up(Suit::Spade, rank));
        }
        board.stacks[0].add(face_up(Suit::Heart, 3));
        board.stacks[2].add(face_up(Suit::Heart, 4));
        board.score = STARTING_SCORE;

        board.move_cards(0, 0, 2);
        assert!(board.can_undo());

        board.remove_complete_run(1, true, true);
        assert!(!board.can_undo());
        assert_eq!(board.completed_count(), 1);
        assert_eq!(board.score(), STARTING_SCORE - SCORE_PER_MOVE + SCORE_PER_RUN);
        assert!(board.stack(1).top_card().unwrap().face_up);
        assert!(!board.is_board_clear());
    }

    #[test]
    fn card_conservation_across_a_busy_sequence() {
        let mut board = Board::new(4);
        board.start_seeded(4, 99);

        for round in 0..3 {
            for _ in 0..4 {
                if let Some((src, pos, dest)) = find_any_legal_move(&board) {
                    board.move_cards(src, pos, dest);
                    assert_eq!(board.total_card_count(), DECK_SIZE);
                }
            }
            board.undo();
            assert_eq!(board.total_card_count(), DECK_SIZE);
            if round < INITIAL_DEALS {
                board.deal();
                assert_eq!(board.total_card_count(), DECK_SIZE);
            }
        }
    }

    /// Scan for any legal single-run move, preferring one that moves fewer
    /// than a whole stack so tests exercise partial slices too.
    fn find_any_legal_move(board: &Board) -> Option<(usize, usize, usize)> {
        for src in 0..STACK_COUNT {
            let Some(top_of_run) = board.stack(src).top_of_sequential_run() else {
                continue;
            };
            for pos in top_of_run..board.stack(src).len() {
                let card = board.stack(src).card(pos);
                for dest in 0..STACK_COUNT {
                    if dest == src {
                        continue;
                    }
                    // Skip empty destinations so undo comparisons stay simple.
                    if board.stack(dest).is_empty() {
                        continue;
                    }
                    if board.can_move_card_to_stack(card, dest) {
                        return Some((src, pos, dest));
                    }
                }
            }
        }
        None
    }
}
