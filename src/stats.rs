use std::path::PathBuf;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::save::{read_signed, write_signed};

/// Aggregate play statistics, bucketed by difficulty (1 suit = easy,
/// 2 = medium, 4 = hard). An explicitly constructed repository with
/// load/save, passed to whoever needs it – never a global.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_games: u32,
    pub easy_games: u32,
    pub medium_games: u32,
    pub hard_games: u32,

    pub total_games_won: u32,
    pub easy_games_won: u32,
    pub medium_games_won: u32,
    pub hard_games_won: u32,
}

impl Statistics {
    pub fn record_started(&mut self, suit_count: u8) {
        self.total_games += 1;
        match suit_count {
            1 => self.easy_games += 1,
            2 => self.medium_games += 1,
            4 => self.hard_games += 1,
            _ => {}
        }
    }

    pub fn record_win(&mut self, suit_count: u8) {
        self.total_games_won += 1;
        match suit_count {
            1 => self.easy_games_won += 1,
            2 => self.medium_games_won += 1,
            4 => self.hard_games_won += 1,
            _ => {}
        }
    }

    pub fn reset(&mut self) {
        *self = Statistics::default();
    }
}

/// On-disk home of the statistics document. Same signed-payload scheme as
/// the game slot; a missing or unreadable file just means fresh stats.
pub struct StatsFile {
    path: PathBuf,
}

impl StatsFile {
    pub fn default_file() -> Option<Self> {
        let proj_dirs = ProjectDirs::from("com", "spidersol", "spider-sol")?;
        Some(StatsFile {
            path: proj_dirs.data_dir().join("stats.dat"),
        })
    }

    pub fn at_path(path: PathBuf) -> Self {
        StatsFile { path }
    }

    pub fn load(&self) -> Statistics {
        let Some(payload) = read_signed(&self.path) else {
            return Statistics::default();
        };
        bincode::deserialize(&payload).unwrap_or_default()
    }

    /// Best-effort: serialization or I/O failure loses nothing but stats.
    pub fn save(&self, stats: &Statistics) {
        let Ok(payload) = bincode::serialize(stats) else {
            return;
        };
        write_signed(&self.path, &payload);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_follow_suit_count() {
        let mut stats = Statistics::default();
        stats.record_started(1);
        stats.record_started(4);
        stats.record_started(4);
        stats.record_win(4);

        assert_eq!(stats.total_games, 3);
        assert_eq!(stats.easy_games, 1);
        assert_eq!(stats.medium_games, 0);
        assert_eq!(stats.hard_games, 2);
        assert_eq!(stats.total_games_won, 1);
        assert_eq!(stats.hard_games_won, 1);

        stats.reset();
        assert_eq!(stats, Statistics::default());
    }

    #[test]
    fn stats_round_trip_on_disk() {
        let path = std::env::temp_dir().join(format!(
            "spider-sol-test-stats-{}.dat",
            std::process::id()
        ));
        let file = StatsFile::at_path(path.clone());

        let mut stats = Statistics::default();
        stats.record_started(2);
        stats.record_win(2);
        file.save(&stats);

        assert_eq!(file.load(), stats);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_stats_file_loads_defaults() {
        let file = StatsFile::at_path(std::env::temp_dir().join("spider-sol-test-no-such-stats.dat"));
        assert_eq!(file.load(), Statistics::default());
    }
}
