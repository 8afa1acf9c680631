use crate::card::{Card, RANK_ACE, RANK_KING, RUN_LENGTH};

/// An ordered pile of cards. Index 0 is the bottom (first dealt), the last
/// element is the top and the only place cards arrive. Face-down cards form
/// a contiguous prefix at the bottom during normal play.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardStack {
    cards: Vec<Card>,
}

impl CardStack {
    pub fn new() -> Self {
        CardStack { cards: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Append a card to the top.
    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    pub fn card(&self, pos: usize) -> Card {
        self.cards[pos]
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn top_card(&self) -> Option<Card> {
        self.cards.last().copied()
    }

    pub fn top_card_mut(&mut self) -> Option<&mut Card> {
        self.cards.last_mut()
    }

    /// Remove a contiguous slice, preserving order. This is the primitive
    /// behind every multi-card move; the caller guarantees the range is in
    /// bounds and an out-of-range request panics.
    pub fn remove_range(&mut self, start: usize, count: usize) -> Vec<Card> {
        self.cards.drain(start..start + count).collect()
    }

    /// Number of face-down cards at the bottom of the stack.
    pub fn hidden_count(&self) -> usize {
        self.cards.iter().take_while(|c| !c.face_up).count()
    }

    /// Index of the first card of the topmost sequential run: the maximal
    /// face-up suffix where each card is one rank below the same-suit card
    /// under it. `None` for an empty stack.
    pub fn top_of_sequential_run(&self) -> Option<usize> {
        let mut i = self.cards.len().checked_sub(1)?;
        let mut current = self.cards[i];
        while i > 0 {
            if !current.runs_onto(self.cards[i - 1]) {
                break;
            }
            i -= 1;
            current = self.cards[i];
        }
        Some(i)
    }

    /// Whether the slice `[pos, len)` can be picked up as one unit, i.e.
    /// `pos` lies within the topmost sequential run.
    pub fn can_pickup_run(&self, pos: usize) -> bool {
        match self.top_of_sequential_run() {
            Some(top) => pos >= top && pos < self.cards.len(),
            None => false,
        }
    }

    /// Whether the topmost run is a full King-down-to-Ace run of 13 cards.
    pub fn contains_complete_run(&self) -> bool {
        let Some(top) = self.top_of_sequential_run() else {
            return false;
        };
        self.cards.len() - top == RUN_LENGTH
            && self.cards[top].rank == RANK_KING
            && self.cards[self.cards.len() - 1].rank == RANK_ACE
    }

    /// Pop the complete 13-card run off the top. Asking when no complete
    /// run is present is a caller bug: warn and return `None`. When
    /// `reveal_card` is set, the newly uncovered top card is flipped
    /// face-up if it was hidden.
    pub fn remove_complete_run(&mut self, reveal_card: bool) -> Option<Vec<Card>> {
        if !self.contains_complete_run() {
            eprintln!("[WARN] Asked to remove run from stack when run is not complete - bug?");
            return None;
        }

        let start = self.cards.len() - RUN_LENGTH;
        let run: Vec<Card> = self.cards.drain(start..).collect();

        if reveal_card {
            if let Some(top) = self.cards.last_mut() {
                if !top.face_up {
                    top.reveal();
                }
            }
        }
        Some(run)
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

    fn stack_of(cards: Vec<Card>) -> CardStack {
        let mut stack = CardStack::new();
        for card in cards {
            stack.add(card);
        }
        stack
    }

    #[test]
    fn run_scan_on_empty_stack_is_none() {
        let stack = CardStack::new();
        assert_eq!(stack.top_of_sequential_run(), None);
        assert!(!stack.can_pickup_run(0));
        assert!(!stack.contains_complete_run());
    }

    #[test]
    fn run_scan_stops_at_suit_change() {
        let stack = stack_of(vec![
            face_up(Suit::Heart, 9),
            face_up(Suit::Spade, 8),
            face_up(Suit::Spade, 7),
        ]);
        assert_eq!(stack.top_of_sequential_run(), Some(1));
        assert!(stack.can_pickup_run(1));
        assert!(stack.can_pickup_run(2));
        assert!(!stack.can_pickup_run(0));
    }

    #[test]
    fn run_scan_stops_at_rank_gap() {
        let stack = stack_of(vec![
            face_up(Suit::Spade, 9),
            face_up(Suit::Spade, 7),
            face_up(Suit::Spade, 6),
        ]);
        assert_eq!(stack.top_of_sequential_run(), Some(1));
    }

    #[test]
    fn run_scan_stops_at_face_down_card() {
        let stack = stack_of(vec![
            Card::new(Suit::Spade, 8), // face-down
            face_up(Suit::Spade, 7),
            face_up(Suit::Spade, 6),
        ]);
        assert_eq!(stack.top_of_sequential_run(), Some(1));
        assert_eq!(stack.hidden_count(), 1);
    }

    #[test]
    fn run_scan_covers_whole_stack_when_everything_connects() {
        let stack = stack_of(vec![face_up(Suit::Club, 5), face_up(Suit::Club, 4)]);
        assert_eq!(stack.top_of_sequential_run(), Some(0));
    }

    #[test]
    fn complete_run_requires_exactly_king_through_ace() {
        let full = stack_of((1..=13).rev().map(|r| face_up(Suit::Spade, r)).collect());
        assert!(full.contains_complete_run());

        // Twelve cards (King..2) is not complete.
        let partial = stack_of((2..=13).rev().map(|r| face_up(Suit::Spade, r)).collect());
        assert!(!partial.contains_complete_run());

        // Queen..Ace topped by an off-suit King breaks the run at 12.
        let mut mixed: Vec<Card> = vec![face_up(Suit::Heart, 13)];
        mixed.extend((1..=12).rev().map(|r| face_up(Suit::Spade, r)));
        assert!(!stack_of(mixed).contains_complete_run());
    }

    #[test]
    fn remove_complete_run_pops_thirteen_and_reveals() {
        let mut cards = vec![Card::new(Suit::Heart, 4)]; // hidden card underneath
        cards.extend((1..=13).rev().map(|r| face_up(Suit::Spade, r)));
        let mut stack = stack_of(cards);

        let run = stack.remove_complete_run(true).expect("run should pop");
        assert_eq!(run.len(), 13);
        assert_eq!(run[0].rank, 13);
        assert_eq!(run[12].rank, 1);
        assert_eq!(stack.len(), 1);
        assert!(stack.top_card().unwrap().face_up);
    }

    #[test]
    fn remove_complete_run_without_one_is_a_noop() {
        let mut stack = stack_of(vec![face_up(Suit::Spade, 5)]);
        assert!(stack.remove_complete_run(true).is_none());
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn remove_range_preserves_order_of_remainder() {
        let mut stack = stack_of(vec![
            face_up(Suit::Spade, 9),
            face_up(Suit::Spade, 8),
            face_up(Suit::Spade, 7),
        ]);
        let taken = stack.remove_range(1, 2);
        assert_eq!(taken.len(), 2);
        assert_eq!(taken[0].rank, 8);
        assert_eq!(taken[1].rank, 7);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.top_card().unwrap().rank, 9);
    }
}
