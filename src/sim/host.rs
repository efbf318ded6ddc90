//! Contract between the simulation and the page that embeds it

use super::state::{Category, CollectedItems, ContentKind, GameMode};

/// The external collaborator that owns the game mode and the collected set.
///
/// The simulation reads the mode to gate itself and writes it only to enter
/// [`GameMode::Win`]. Item collection and content opening are reported as two
/// separate calls, in that order, from the same kill.
pub trait Host {
    fn game_mode(&self) -> GameMode;

    fn set_game_mode(&mut self, mode: GameMode);

    fn collected(&self) -> &CollectedItems;

    /// Must be idempotent
    fn on_item_collected(&mut self, category: Category);

    fn on_open_content(&mut self, content: ContentKind);

    fn on_score_update(&mut self, score: u64);
}

/// Host that records every call; handy for tests and headless runs
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    pub mode: GameMode,
    pub collected: CollectedItems,
    pub collected_calls: Vec<Category>,
    pub opened: Vec<ContentKind>,
    pub scores: Vec<u64>,
    pub mode_changes: Vec<GameMode>,
}

impl RecordingHost {
    pub fn playing() -> Self {
        Self {
            mode: GameMode::Playing,
            ..Default::default()
        }
    }
}

impl Host for RecordingHost {
    fn game_mode(&self) -> GameMode {
        self.mode
    }

    fn set_game_mode(&mut self, mode: GameMode) {
        self.mode = mode;
        self.mode_changes.push(mode);
    }

    fn collected(&self) -> &CollectedItems {
        &self.collected
    }

    fn on_item_collected(&mut self, category: Category) {
        self.collected_calls.push(category);
        self.collected.insert(category);
    }

    fn on_open_content(&mut self, content: ContentKind) {
        self.opened.push(content);
    }

    fn on_score_update(&mut self, score: u64) {
        self.scores.push(score);
    }
}
