use crate::board::Board;
use crate::card::{Card, Suit};
use crate::stats::Statistics;

/// Trait that abstracts the rendering layer so the engine stays
/// renderer-agnostic (plain CLI today, something fancier tomorrow).
pub trait Renderer {
    /// Render the full game board.
    fn render(&mut self, board: &Board);
    /// Display an informational message.
    fn info(&mut self, msg: &str);
    /// Display an error message.
    fn error(&mut self, msg: &str);
    /// Display the help text.
    fn help(&mut self);
    /// Display the statistics screen.
    fn stats(&mut self, stats: &Statistics);
    /// Display the win screen.
    fn win(&mut self, board: &Board);
}

// ---------------------------------------------------------------------------
// CLI Renderer
// ---------------------------------------------------------------------------

/// A simple ANSI-color CLI renderer.
pub struct CliRenderer;

impl Default for CliRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CliRenderer {
    pub fn new() -> Self {
        CliRenderer
    }

    fn card_str(&self, card: Card) -> String {
        if !card.face_up {
            return "\x1b[34m###\x1b[0m".to_string();
        }
        let label = format!("{:>3}", card.label());
        match card.suit {
            Suit::Diamond | Suit::Heart => format!("\x1b[31m{}\x1b[0m", label),
            Suit::Spade | Suit::Club => format!("\x1b[90m{}\x1b[0m", label),
        }
    }
}

impl Renderer for CliRenderer {
    fn render(&mut self, board: &Board) {
        println!();

        // ---- Status row: reserve deals | completed runs | score | moves ----
        print!("  DEALS LEFT: {}", board.count_of_extra_dealings_left());
        if let Some(batch) = board.cards_in_next_deal() {
            // One face-down placeholder per card in the upcoming row.
            print!(" \x1b[34m");
            for _ in batch {
                print!("▒");
            }
            print!("\x1b[0m");
        }
        print!("   DONE: ");
        if board.completed_count() == 0 {
            print!("--");
        } else {
            for king in board.completed() {
                print!("{} ", self.card_str(*king));
            }
        }
        println!(
            "   SCORE: {}   MOVES: {}   ({} suit{})",
            board.score(),
            board.move_count(),
            board.suit_count(),
            if board.suit_count() == 1 { "" } else { "s" }
        );

        // ---- Stack indices header ----
        println!();
        print!("  ROW:   ");
        for i in 0..crate::board::STACK_COUNT {
            print!("  {:^5}", i);
        }
        println!();

        // ---- Tableau ----
        let max_len = board.stacks().iter().map(|s| s.len()).max().unwrap_or(0);

        for row in 0..max_len {
            print!("  {:>3}:   ", row);
            for stack in board.stacks() {
                if row < stack.len() {
                    print!(" [{}] ", self.card_str(stack.card(row)));
                } else {
                    print!("   ..  ");
                }
            }
            println!();
        }

        if max_len == 0 {
            println!("  (all stacks empty)");
        }

        println!();
    }

    fn info(&mut self, msg: &str) {
        println!("\x1b[36m[INFO]\x1b[0m {}", msg);
    }

    fn error(&mut self, msg: &str) {
        println!("\x1b[31m[ERR ]\x1b[0m {}", msg);
    }

    fn help(&mut self) {
        println!(
            r#"
╔══════════════════════════════════════════════════════════════╗
║              Spider Solitaire – CLI Help                     ║
╠══════════════════════════════════════════════════════════════╣
║  GOAL: Build eight King→Ace same-suit runs to clear the      ║
║        board.                                                ║
║                                                              ║
║  RULES:                                                      ║
║    · Place any card on a card one rank higher (any suit)     ║
║      or on an empty stack.                                   ║
║    · Only a face-up, same-suit descending run moves as a     ║
║      group.                                                  ║
║    · A completed K→A same-suit run is swept off the board    ║
║      automatically (+100 points).                            ║
║    · 'deal' adds one card to every stack from the reserve;   ║
║      dealing and sweeping a run both erase undo history.     ║
║    · Every move costs 1 point; the game starts at 500.       ║
╠══════════════════════════════════════════════════════════════╣
║  COMMANDS (case-insensitive):                                ║
║                                                              ║
║  mv <src> <dst>          Move top card stack → stack         ║
║  mv <src>:<N> <dst>      Move run of N+1 cards from the top  ║
║                          (0=top card only, 1=top 2, etc.)    ║
║  deal | d                Deal the next reserve row           ║
║  undo | u                Undo the last move                  ║
║  new [1|2|4]             New game (1=easy, 2=medium, 4=hard) ║
║  save                    Save the game now                   ║
║  stats [reset]           Show (or zero out) statistics       ║
║  quit                    Save and exit                       ║
║  help | h | ?            Show this help                      ║
╠══════════════════════════════════════════════════════════════╣
║  Example: mv 4:2 7  →  move top 3 cards of stack 4 to 7      ║
╚══════════════════════════════════════════════════════════════╝
"#
        );
    }

    fn stats(&mut self, stats: &Statistics) {
        println!();
        println!("  GAMES PLAYED        GAMES WON");
        println!(
            "  total:  {:>5}      total:  {:>5}",
            stats.total_games, stats.total_games_won
        );
        println!(
            "  easy:   {:>5}      easy:   {:>5}",
            stats.easy_games, stats.easy_games_won
        );
        println!(
            "  medium: {:>5}      medium: {:>5}",
            stats.medium_games, stats.medium_games_won
        );
        println!(
            "  hard:   {:>5}      hard:   {:>5}",
            stats.hard_games, stats.hard_games_won
        );
        println!();
    }

    fn win(&mut self, board: &Board) {
        println!(
            "\n\x1b[33m\
            \n  ██╗    ██╗ ██████╗ ███╗   ██╗██╗\
            \n  ██║    ██║██╔═══██╗████╗  ██║██║\
            \n  ██║ █╗ ██║██║   ██║██╔██╗ ██║██║\
            \n  ██║███╗██║██║   ██║██║╚██╗██║╚═╝\
            \n  ╚███╔███╔╝╚██████╔╝██║ ╚████║██╗\
            \n   ╚══╝╚══╝  ╚═════╝ ╚═╝  ╚═══╝╚═╝\
            \n\x1b[0m"
        );
        println!(
            "  Board cleared in {} moves, final score {}.  Type 'new' for another game.\n",
            board.move_count(),
            board.score()
        );
    }
}
