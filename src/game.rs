use std::io::{self, BufRead, Write};

use crate::board::{Board, STACK_COUNT};
use crate::command::{parse_command, Command};
use crate::renderer::Renderer;
use crate::save::SaveSlot;
use crate::stats::{Statistics, StatsFile};

const DEFAULT_SUIT_COUNT: u8 = 1;

/// The main game loop. `renderer` is injected so the engine stays
/// renderer-agnostic; the save slot and statistics file are optional so the
/// game still runs on a machine with no usable data directory.
pub struct Game<R: Renderer> {
    board: Board,
    renderer: R,
    stats: Statistics,
    stats_file: Option<StatsFile>,
    save_slot: Option<SaveSlot>,
}

impl<R: Renderer> Game<R> {
    /// Resume the saved game if one exists, otherwise deal a fresh one
    /// (seeded when a seed was given on the command line).
    pub fn init(seed: Option<u64>, renderer: R) -> Self {
        let stats_file = StatsFile::default_file();
        let stats = stats_file.as_ref().map(|f| f.load()).unwrap_or_default();
        let save_slot = SaveSlot::default_slot();

        let mut game = Game {
            board: Board::new(DEFAULT_SUIT_COUNT),
            renderer,
            stats,
            stats_file,
            save_slot,
        };

        let resumed = game.save_slot.as_ref().and_then(|slot| slot.load());
        match resumed {
            Some(board) => {
                game.board = board;
                game.renderer.info("Resumed your game in progress.");
            }
            None => {
                match seed {
                    Some(seed) => game.board.start_seeded(DEFAULT_SUIT_COUNT, seed),
                    None => game.board.start_new_game(DEFAULT_SUIT_COUNT),
                }
                game.stats.record_started(DEFAULT_SUIT_COUNT);
            }
        }
        game
    }

    /// Run the interactive game loop until the player quits.
    pub fn run(&mut self) {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        self.renderer.render(&self.board);

        loop {
            print!("> ");
            let _ = stdout.flush();

            let mut line = String::new();
            match stdin.lock().read_line(&mut line) {
                Ok(0) | Err(_) => break, // EOF
                Ok(_) => {}
            }

            match parse_command(&line) {
                Err(e) => self.renderer.error(&e),
                Ok(cmd) => {
                    let quit = self.handle(cmd);
                    if quit {
                        break;
                    }

                    // Sweep any runs the command completed, then show the
                    // board (and the win screen on the clearing sweep).
                    let was_clear = self.board.is_board_clear();
                    self.sweep_complete_runs();
                    self.renderer.render(&self.board);

                    if self.board.is_board_clear() && !was_clear {
                        self.renderer.win(&self.board);
                        self.stats.record_win(self.board.suit_count());
                        self.persist();
                    }
                }
            }
        }

        self.persist();
    }

    /// Dispatch a command. Returns `true` if the game should exit.
    fn handle(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Quit => {
                self.renderer.info("Game saved. Goodbye!");
                return true;
            }
            Command::Help => {
                self.renderer.help();
            }
            Command::Stats => {
                self.renderer.stats(&self.stats);
            }
            Command::ResetStats => {
                self.stats.reset();
                self.persist();
                self.renderer.info("Statistics reset.");
            }
            Command::Save => {
                self.persist();
                self.renderer.info("Game saved.");
            }
            Command::NewGame { suits } => {
                let suits = suits.unwrap_or(self.board.suit_count());
                self.board.start_new_game(suits);
                self.stats.record_started(suits);
                self.renderer.info("A new game has been dealt.");
            }
            Command::Undo => {
                if self.board.can_undo() {
                    self.board.undo();
                } else {
                    self.renderer.error("Nothing to undo.");
                }
            }
            Command::Deal => {
                if !self.board.deal() {
                    self.renderer.error("The reserve is empty - no deals left.");
                }
            }
            Command::Move { src, depth, dst } => {
                if src == dst {
                    self.renderer.error("Source and destination are the same stack.");
                    return false;
                }
                let Some(pos) = run_start_index(self.board.stack(src).len(), depth) else {
                    self.renderer.error("Source stack does not have that many cards.");
                    return false;
                };
                if !self.board.stack(src).can_pickup_run(pos) {
                    self.renderer
                        .error("Those cards are not a same-suit run - they cannot move together.");
                    return false;
                }
                let card = self.board.stack(src).card(pos);
                if !self.board.can_move_card_to_stack(card, dst) {
                    self.renderer
                        .error("That card cannot go on the destination stack.");
                    return false;
                }
                self.board.move_cards(src, pos, dst);
            }
        }
        false
    }

    /// Sweep every stack holding a complete King→Ace run off the board,
    /// revealing the card each sweep uncovers.
    fn sweep_complete_runs(&mut self) {
        for i in 0..STACK_COUNT {
            if self.board.stack(i).contains_complete_run() {
                self.board.remove_complete_run(i, true, true);
                self.renderer.info("A completed run was swept off the board. +100");
            }
        }
    }

    /// Best-effort save of the board and the statistics.
    fn persist(&self) {
        if let Some(slot) = &self.save_slot {
            slot.save(&self.board);
        }
        if let Some(file) = &self.stats_file {
            file.save(&self.stats);
        }
    }
}

/// Convert a depth counted from the top of a stack (0 = top card) into the
/// absolute index the board works with. `None` when the stack is too short.
fn run_start_index(stack_len: usize, depth: usize) -> Option<usize> {
    if depth >= stack_len {
        return None;
    }
    Some(stack_len - 1 - depth)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_converts_to_absolute_index_from_the_top() {
        assert_eq!(run_start_index(6, 0), Some(5));
        assert_eq!(run_start_index(6, 2), Some(3));
        assert_eq!(run_start_index(6, 5), Some(0));
        assert_eq!(run_start_index(6, 6), None);
        assert_eq!(run_start_index(0, 0), None);
    }
}
