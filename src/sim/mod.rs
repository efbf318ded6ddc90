//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - One call to [`tick::update`] advances one frame
//! - Seeded RNG only (owned by [`World`])
//! - Wall-clock time only gates fire rate and combo
//! - No rendering or platform dependencies

pub mod collision;
pub mod effects;
pub mod host;
pub mod motion;
pub mod state;
pub mod tick;

pub use collision::{bounce_in_rect, circles_overlap, first_hit};
pub use effects::{Burst, FIREWORK_COLORS};
pub use host::{Host, RecordingHost};
pub use motion::{MotionCtx, policy_for};
pub use state::{
    Category, CollectedItems, Color, Combo, ContentKind, Entity, EntityKind, GameMode, PlayArea,
    Star, Turret, World,
};
pub use tick::{TickInput, TickReport, update};
