/// All commands a player can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Move the sequential run starting `depth` cards from the top of stack
    /// `src` onto stack `dst`. `depth` 0 means just the top card.
    Move { src: usize, depth: usize, dst: usize },
    /// Deal the next reserve row onto the tableau.
    Deal,
    /// Undo the last move.
    Undo,
    /// Start a new game; `suits` is 1, 2 or 4, `None` keeps the current
    /// difficulty.
    NewGame { suits: Option<u8> },
    /// Save the game in progress right now.
    Save,
    /// Show aggregate play statistics.
    Stats,
    /// Zero out the statistics.
    ResetStats,
    /// Quit the game.
    Quit,
    /// Print help.
    Help,
}

/// Parse a single line of text input into a `Command`.
///
/// Syntax reference (case-insensitive):
/// ```
/// mv <src> <dst>            -- Move top card stack→stack
/// mv <src>:<depth> <dst>    -- Move run starting <depth> from the top (0=top)
/// deal | d                  -- Deal the next reserve row
/// undo | u                  -- Undo last move
/// new [1|2|4]               -- New game (optionally change suit count)
/// save                      -- Save now
/// stats [reset]             -- Show (or zero out) statistics
/// quit | q                  -- Quit
/// help | h | ?              -- Help
/// ```
pub fn parse_command(input: &str) -> Result<Command, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("Empty input".to_string());
    }

    let tokens: Vec<&str> = input.split_whitespace().collect();
    let cmd = tokens[0].to_lowercase();

    match cmd.as_str() {
        "mv" | "m" => {
            if tokens.len() < 3 {
                return Err("Usage: mv <src[:<depth>]> <dst>".to_string());
            }
            let dst = parse_stack_idx(tokens[2])?;
            // Parse optional depth: "3:2" means stack 3, starting 2 from top.
            if let Some((stack_part, depth_part)) = tokens[1].split_once(':') {
                let src = parse_stack_idx(stack_part)?;
                let depth: usize = depth_part
                    .parse()
                    .map_err(|_| "Invalid depth".to_string())?;
                Ok(Command::Move { src, depth, dst })
            } else {
                let src = parse_stack_idx(tokens[1])?;
                Ok(Command::Move { src, depth: 0, dst })
            }
        }
        "deal" | "d" => Ok(Command::Deal),
        "undo" | "u" => Ok(Command::Undo),
        "new" | "n" => {
            let suits = match tokens.get(1) {
                Some(tok) => Some(parse_suit_count(tok)?),
                None => None,
            };
            Ok(Command::NewGame { suits })
        }
        "save" => Ok(Command::Save),
        "stats" => match tokens.get(1).map(|t| t.to_lowercase()) {
            None => Ok(Command::Stats),
            Some(opt) if opt == "reset" => Ok(Command::ResetStats),
            Some(opt) => Err(format!("Unknown stats option '{}'.", opt)),
        },
        "quit" | "q" | "exit" => Ok(Command::Quit),
        "help" | "h" | "?" => Ok(Command::Help),
        _ => Err(format!("Unknown command '{}'. Type 'help' for help.", tokens[0])),
    }
}

fn parse_stack_idx(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid stack index", s))?;
    if n >= crate::board::STACK_COUNT {
        return Err(format!(
            "Stack index {} out of range (0–{})",
            n,
            crate::board::STACK_COUNT - 1
        ));
    }
    Ok(n)
}

fn parse_suit_count(s: &str) -> Result<u8, String> {
    match s {
        "1" => Ok(1),
        "2" => Ok(2),
        "4" => Ok(4),
        _ => Err(format!("'{}' is not a valid suit count. Use 1, 2 or 4.", s)),
    }
}
