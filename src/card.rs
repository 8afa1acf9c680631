use serde::{Serialize, Deserialize};

/// Suits in canonical order. A 1-suit game uses only Spades, a 2-suit game
/// Spades and Diamonds (one black, one red), a 4-suit game all four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Spade,
    Diamond,
    Club,
    Heart,
}

impl Suit {
    /// All four suits, in canonical order.
    pub const ALL: [Suit; 4] = [Suit::Spade, Suit::Diamond, Suit::Club, Suit::Heart];

    /// Single-character symbol used in CLI rendering.
    pub fn symbol(self) -> &'static str {
        match self {
            Suit::Spade => "♠",
            Suit::Diamond => "♦",
            Suit::Club => "♣",
            Suit::Heart => "♥",
        }
    }

    /// Stable numeric index, used by the save format.
    pub fn index(self) -> u8 {
        match self {
            Suit::Spade => 0,
            Suit::Diamond => 1,
            Suit::Club => 2,
            Suit::Heart => 3,
        }
    }

    pub fn from_index(idx: u8) -> Option<Suit> {
        Suit::ALL.get(idx as usize).copied()
    }
}

/// Ranks are plain numbers: Ace = 1 up to King = 13.
pub const RANK_ACE: u8 = 1;
pub const RANK_KING: u8 = 13;

/// Short rank label for CLI rendering ("A", "2".."10", "J", "Q", "K").
pub fn rank_symbol(rank: u8) -> &'static str {
    const SYMBOLS: [&str; 13] = [
        "A", "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K",
    ];
    SYMBOLS[(rank - 1) as usize]
}

/// A single playing card. Identity is suit + rank; `face_up` is the only
/// mutable part and flips as cards are revealed and un-revealed by undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: u8,
    pub face_up: bool,
}

impl Card {
    pub fn new(suit: Suit, rank: u8) -> Self {
        debug_assert!((RANK_ACE..=RANK_KING).contains(&rank));
        Card {
            suit,
            rank,
            face_up: false,
        }
    }

    pub fn reveal(&mut self) {
        self.face_up = true;
    }

    pub fn hide(&mut self) {
        self.face_up = false;
    }

    /// Cross-stack placement rule: any card exactly one rank below the
    /// target's top card may be placed there. Suit does not matter for
    /// placement, only for runs already stacked together.
    pub fn can_stack_on(self, other: Card) -> bool {
        self.rank + 1 == other.rank
    }

    /// Whether `below` extends a same-suit run when sitting directly under
    /// `self` (one rank higher, same suit, face-up).
    pub fn runs_onto(self, below: Card) -> bool {
        below.face_up && below.suit == self.suit && below.rank == self.rank + 1
    }

    pub fn label(self) -> String {
        format!("{}{}", rank_symbol(self.rank), self.suit.symbol())
    }
}

/// Number of cards in every game regardless of suit count.
pub const DECK_SIZE: usize = 104;
/// Length of a complete run (King down to Ace).
pub const RUN_LENGTH: usize = 13;

/// Build the full 104-card set for a game. `suit_count` must be 1, 2 or 4;
/// the deck is duplicated so the total always comes out to 104 cards and
/// eight complete runs.
pub fn full_deck(suit_count: u8) -> Vec<Card> {
    debug_assert!(matches!(suit_count, 1 | 2 | 4));

    let decks = DECK_SIZE / RUN_LENGTH / suit_count as usize;
    let mut deck = Vec::with_capacity(DECK_SIZE);

    for _ in 0..decks {
        for &suit in &Suit::ALL[..suit_count as usize] {
            for rank in RANK_ACE..=RANK_KING {
                deck.push(Card::new(suit, rank));
            }
        }
    }

    debug_assert_eq!(deck.len(), DECK_SIZE, "Deck must have exactly 104 cards");
    deck
}
