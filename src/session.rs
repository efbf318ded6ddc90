//! Page-level session state
//!
//! Reference [`Host`] for the landing page: owns the game mode, the collected
//! set and the score shown in the page header. Everything the page needs to
//! react to is queued as a [`SessionEvent`].

use serde::Serialize;

use crate::sim::{Category, CollectedItems, ContentKind, GameMode, Host};

/// Notifications for the embedding page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "value", rename_all = "snake_case")]
pub enum SessionEvent {
    ModeChanged(GameMode),
    ItemCollected(Category),
    OpenContent(ContentKind),
    Score(u64),
    Replay(u32),
}

impl SessionEvent {
    /// Tagged JSON form, e.g. `{"event":"score","value":600}`
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Event name and display value for the page listener
    pub fn to_pair(&self) -> (&'static str, String) {
        match self {
            SessionEvent::ModeChanged(mode) => ("mode", mode.as_str().to_string()),
            SessionEvent::ItemCollected(category) => {
                ("collected", ContentKind::from(*category).as_str().to_string())
            }
            SessionEvent::OpenContent(kind) => ("open", kind.as_str().to_string()),
            SessionEvent::Score(score) => ("score", score.to_string()),
            SessionEvent::Replay(generation) => ("replay", generation.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    mode: GameMode,
    /// Mode to return to when a modal or the menu closes
    previous_mode: GameMode,
    collected: CollectedItems,
    score: u64,
    active_content: Option<ContentKind>,
    /// Bumped on every replay
    generation: u32,
    events: Vec<SessionEvent>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn active_content(&self) -> Option<ContentKind> {
        self.active_content
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    fn transition(&mut self, mode: GameMode) {
        if self.mode == mode {
            return;
        }
        log::info!("Mode {} -> {}", self.mode.as_str(), mode.as_str());
        self.mode = mode;
        self.events.push(SessionEvent::ModeChanged(mode));
    }

    /// Leave the intro screen
    pub fn start(&mut self) {
        if self.mode == GameMode::Intro {
            self.transition(GameMode::Playing);
        }
    }

    /// Show a content panel over the game
    pub fn open_content(&mut self, kind: ContentKind) {
        if self.mode != GameMode::ModalOpen {
            self.previous_mode = match self.mode {
                GameMode::MenuOpen => GameMode::Playing,
                other => other,
            };
        }
        self.active_content = Some(kind);
        self.events.push(SessionEvent::OpenContent(kind));
        self.transition(GameMode::ModalOpen);
    }

    /// Close the content panel.
    ///
    /// With everything collected this lands on the win screen, or back on the
    /// menu if the panel was the contact page.
    pub fn close_modal(&mut self) {
        if self.mode != GameMode::ModalOpen {
            return;
        }
        let closed = self.active_content.take();
        let next = if self.collected.is_complete() {
            if closed == Some(ContentKind::Contact) {
                GameMode::MenuOpen
            } else {
                GameMode::Win
            }
        } else {
            self.previous_mode
        };
        self.transition(next);
    }

    pub fn toggle_menu(&mut self) {
        if self.mode == GameMode::MenuOpen {
            let next = if self.collected.is_complete() {
                GameMode::Win
            } else {
                self.previous_mode
            };
            self.transition(next);
        } else {
            self.previous_mode = self.mode;
            self.transition(GameMode::MenuOpen);
        }
    }

    /// Forget progress and go straight back to playing
    pub fn replay(&mut self) {
        self.collected.clear();
        self.score = 0;
        self.active_content = None;
        self.generation += 1;
        log::info!("Replay (generation {})", self.generation);
        self.events.push(SessionEvent::Replay(self.generation));
        self.events.push(SessionEvent::Score(0));
        self.transition(GameMode::Playing);
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Host for Session {
    fn game_mode(&self) -> GameMode {
        self.mode
    }

    fn set_game_mode(&mut self, mode: GameMode) {
        self.transition(mode);
    }

    fn collected(&self) -> &CollectedItems {
        &self.collected
    }

    fn on_item_collected(&mut self, category: Category) {
        if self.collected.insert(category) {
            log::info!("Collected {} ({}/3)", category.label(), self.collected.len());
            self.events.push(SessionEvent::ItemCollected(category));
        }
    }

    fn on_open_content(&mut self, content: ContentKind) {
        self.open_content(content);
    }

    fn on_score_update(&mut self, score: u64) {
        self.score = score;
        self.events.push(SessionEvent::Score(score));
    }
}
