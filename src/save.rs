use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::board::{Board, EXTRAS_CAPACITY, STACK_COUNT};
use crate::card::{Card, DECK_SIZE, RANK_ACE, RANK_KING, RUN_LENGTH, Suit};
use crate::stack::CardStack;
use crate::undo::UndoAction;

type HmacSha256 = Hmac<Sha256>;

const SECRET_KEY: &[u8] = b"spider_sol_secret_key_do_not_cheat";
const HMAC_SIZE: usize = 32;

// ---------------------------------------------------------------------------
// Save model
// ---------------------------------------------------------------------------

/// One card as it appears on disk: stable numeric fields only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SavedCard {
    pub suit: u8,
    pub rank: u8,
    pub visible: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavedStack {
    pub cards: Vec<SavedCard>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SavedUndoAction {
    pub card_count: u32,
    pub source_stack: u8,
    pub dest_stack: u8,
    pub revealed_card: bool,
}

/// The whole persisted game: counters plus the tableau, reserve and
/// completed piles (completed runs are stored as one-card marker stacks),
/// and the undo log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedGame {
    pub suits: u8,
    pub move_count: u32,
    pub score: i32,
    pub stacks: Vec<SavedStack>,
    pub extras: Vec<SavedStack>,
    pub completed: Vec<SavedStack>,
    pub undo_actions: Vec<SavedUndoAction>,
}

fn saved_card(card: Card) -> SavedCard {
    SavedCard {
        suit: card.suit.index(),
        rank: card.rank,
        visible: card.face_up,
    }
}

fn live_card(saved: SavedCard) -> Option<Card> {
    if !(RANK_ACE..=RANK_KING).contains(&saved.rank) {
        return None;
    }
    let mut card = Card::new(Suit::from_index(saved.suit)?, saved.rank);
    if saved.visible {
        card.reveal();
    }
    Some(card)
}

fn saved_pile(cards: &[Card]) -> SavedStack {
    SavedStack {
        cards: cards.iter().copied().map(saved_card).collect(),
    }
}

fn live_pile(saved: &SavedStack) -> Option<Vec<Card>> {
    saved.cards.iter().copied().map(live_card).collect()
}

impl SavedGame {
    pub fn from_board(board: &Board) -> Self {
        SavedGame {
            suits: board.suit_count(),
            move_count: board.move_count(),
            score: board.score(),
            stacks: board
                .stacks()
                .iter()
                .map(|s| saved_pile(s.cards()))
                .collect(),
            extras: board.extras().iter().map(|b| saved_pile(b)).collect(),
            completed: board
                .completed()
                .iter()
                .map(|&king| saved_pile(&[king]))
                .collect(),
            undo_actions: board
                .undo_actions()
                .iter()
                .map(|a| SavedUndoAction {
                    card_count: a.card_count as u32,
                    source_stack: a.source as u8,
                    dest_stack: a.dest as u8,
                    revealed_card: a.revealed_card,
                })
                .collect(),
        }
    }

    /// Rebuild a live board, rejecting any model that could not have come
    /// from a real game (bad counts, bad indices, bad cards).
    pub fn into_board(self) -> Option<Board> {
        if !matches!(self.suits, 1 | 2 | 4) {
            return None;
        }
        if self.stacks.len() != STACK_COUNT
            || self.extras.len() > EXTRAS_CAPACITY
            || self.completed.len() > DECK_SIZE / RUN_LENGTH
        {
            return None;
        }

        let mut stacks = Vec::with_capacity(STACK_COUNT);
        for saved in &self.stacks {
            let mut stack = CardStack::new();
            for card in live_pile(saved)? {
                stack.add(card);
            }
            stacks.push(stack);
        }

        // Every reserve batch deals one card per stack; any other size would
        // index past the tableau when dealt.
        let mut extras = Vec::with_capacity(self.extras.len());
        for saved in &self.extras {
            let batch = live_pile(saved)?;
            if batch.len() != STACK_COUNT {
                return None;
            }
            extras.push(batch);
        }

        // Completed runs are stored as single King markers.
        let mut completed = Vec::with_capacity(self.completed.len());
        for saved in &self.completed {
            let pile = live_pile(saved)?;
            let [king] = pile.as_slice() else {
                return None;
            };
            if king.rank != RANK_KING {
                return None;
            }
            completed.push(*king);
        }

        let in_play: usize = stacks.iter().map(CardStack::len).sum::<usize>()
            + extras.iter().map(Vec::len).sum::<usize>();
        if in_play + completed.len() * RUN_LENGTH != DECK_SIZE {
            return None;
        }

        let mut undo_actions = Vec::with_capacity(self.undo_actions.len());
        for saved in &self.undo_actions {
            if saved.card_count == 0
                || saved.source_stack as usize >= STACK_COUNT
                || saved.dest_stack as usize >= STACK_COUNT
            {
                return None;
            }
            undo_actions.push(UndoAction {
                card_count: saved.card_count as usize,
                source: saved.source_stack as usize,
                dest: saved.dest_stack as usize,
                revealed_card: saved.revealed_card,
            });
        }

        Some(Board::from_parts(
            self.suits,
            stacks,
            extras,
            completed,
            undo_actions,
            self.move_count,
            self.score,
        ))
    }
}

// ---------------------------------------------------------------------------
// Signed file I/O (shared with the statistics file)
// ---------------------------------------------------------------------------

/// Read a signed payload. A missing file, short file, bad signature or any
/// I/O trouble all come back as `None` – the caller starts fresh.
pub(crate) fn read_signed(path: &Path) -> Option<Vec<u8>> {
    if !path.exists() {
        return None;
    }

    let mut file = File::open(path).ok()?;
    let mut data = Vec::new();
    file.read_to_end(&mut data).ok()?;

    if data.len() < HMAC_SIZE {
        return None;
    }

    let split_idx = data.len() - HMAC_SIZE;
    let payload = &data[..split_idx];
    let signature = &data[split_idx..];

    let mut mac = HmacSha256::new_from_slice(SECRET_KEY).ok()?;
    mac.update(payload);
    if mac.verify_slice(signature).is_err() {
        eprintln!("[WARN] Save file signature mismatched! Ignoring it.");
        return None;
    }

    Some(payload.to_vec())
}

/// Sign and write a payload atomically: temp file, flush, rename.
pub(crate) fn write_signed(path: &Path, payload: &[u8]) {
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }

    let Ok(mut mac) = HmacSha256::new_from_slice(SECRET_KEY) else {
        return;
    };
    mac.update(payload);
    let signature = mac.finalize().into_bytes();

    let mut final_data = payload.to_vec();
    final_data.extend_from_slice(&signature);

    let mut temp_path = path.to_path_buf();
    temp_path.set_extension("tmp");

    let Ok(mut temp_file) = File::create(&temp_path) else {
        return;
    };

    if temp_file.write_all(&final_data).is_err() {
        let _ = fs::remove_file(&temp_path);
        return;
    }

    // Flush OS buffers before the rename so a power loss mid-save leaves
    // either the old file or the new one, never a torn write.
    if temp_file.sync_all().is_err() {
        let _ = fs::remove_file(&temp_path);
        return;
    }

    let _ = fs::rename(&temp_path, path);
}

// ---------------------------------------------------------------------------
// The one save slot
// ---------------------------------------------------------------------------

/// The single in-progress-game slot. Overwritten on every save; there is no
/// history and no second slot.
pub struct SaveSlot {
    path: PathBuf,
}

impl SaveSlot {
    /// The platform data-dir slot (`game.dat`). `None` when no home
    /// directory can be determined.
    pub fn default_slot() -> Option<Self> {
        let proj_dirs = ProjectDirs::from("com", "spidersol", "spider-sol")?;
        Some(SaveSlot {
            path: proj_dirs.data_dir().join("game.dat"),
        })
    }

    pub fn at_path(path: PathBuf) -> Self {
        SaveSlot { path }
    }

    /// Persist the board. Best-effort: failures are swallowed. A cleared
    /// board is not resumable, so saving one deletes the slot instead.
    pub fn save(&self, board: &Board) {
        if board.is_board_clear() {
            self.delete();
            return;
        }

        let model = SavedGame::from_board(board);
        let Ok(payload) = bincode::serialize(&model) else {
            return;
        };
        write_signed(&self.path, &payload);
    }

    /// Load the saved board, or `None` when there is no usable save.
    pub fn load(&self) -> Option<Board> {
        let payload = read_signed(&self.path)?;
        let model: SavedGame = bincode::deserialize(&payload).ok()?;
        model.into_board()
    }

    pub fn delete(&self) {
        if self.path.exists() {
            let _ = fs::remove_file(&self.path);
        }
    }
}
