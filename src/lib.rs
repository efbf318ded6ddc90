//! Love Invaders - a turret arcade landing page
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (entities, AI, collisions, scoring, win latch)
//! - `input`: Pointer/touch/keyboard to aim + fire intent
//! - `renderer`: Canvas-style 2D drawing of a simulation frame
//! - `scheduler`: Animation-frame loop gated by game mode
//! - `game`: Controller tying input, simulation and rendering together
//! - `session`: Reference host implementing the page state machine
//! - `headless`: Autopilot session for the native binary
//! - `platform`: Clock, errors and browser bindings

pub mod game;
pub mod headless;
pub mod input;
pub mod platform;
pub mod renderer;
pub mod scheduler;
pub mod session;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use session::{Session, SessionEvent};
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
///
/// Distances and speeds are given for the 800x600 reference play area and are
/// multiplied by [`sim::PlayArea::scale`] at use sites.
pub mod consts {
    /// Reference play area
    pub const BASE_WIDTH: f32 = 800.0;
    pub const BASE_HEIGHT: f32 = 600.0;

    /// Fixed simulation timestep (one "frame" of physics)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per rendered frame
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Turret sits this far above the bottom edge
    pub const TURRET_BASE_OFFSET: f32 = 80.0;
    /// Minimum wall-clock gap between shots (ms)
    pub const FIRE_INTERVAL_MS: f64 = 100.0;
    /// Muzzle offset along the aim direction
    pub const MUZZLE_OFFSET: f32 = 30.0;
    pub const MUZZLE_FLASH_FRAMES: u32 = 3;
    pub const RECOIL: f32 = 4.0;
    /// Fraction of the recoil offset recovered per frame
    pub const RECOIL_RECOVERY: f32 = 0.2;

    pub const PROJECTILE_SPEED: f32 = 12.0;
    pub const PROJECTILE_SIZE: f32 = 4.0;

    pub const ENEMY_SIZE: f32 = 45.0;
    pub const ENEMY_HEALTH: i32 = 8;
    pub const HIT_FLASH_FRAMES: u32 = 4;
    /// Safe sub-rectangle insets for enemy bounce
    pub const SAFE_MARGIN: f32 = 50.0;
    pub const SAFE_BOTTOM_MARGIN: f32 = 200.0;

    /// Entities further than this outside the play area are purged
    pub const OFFSCREEN_MARGIN: f32 = 100.0;
    pub const TRAIL_LENGTH: usize = 8;

    /// Points per hit before the combo multiplier
    pub const HIT_POINTS: u64 = 100;
    /// Wall-clock window for chaining hits (ms)
    pub const COMBO_WINDOW_MS: f64 = 1500.0;
    pub const MAX_COMBO: u32 = 99;

    pub const STAR_COUNT: usize = 200;

    pub const PARTICLE_DRAG: f32 = 0.92;
    pub const PARTICLE_SHRINK: f32 = 0.96;
    /// Lifetime (frames) at which particles and text start fading
    pub const FADE_FRAMES: f32 = 30.0;
    pub const FLOATING_TEXT_FRAMES: i32 = 60;

    pub const SHAKE_PER_EXPLOSION: f32 = 8.0;
    pub const MAX_SHAKE: f32 = 25.0;
    pub const SHAKE_DECAY: f32 = 0.9;
    pub const SHAKE_CUTOFF: f32 = 0.5;

    /// Per-frame chance of a victory firework
    pub const FIREWORK_CHANCE: f64 = 0.1;
}

/// Aim angle for a turret sprite that points "up" at angle zero.
///
/// A zero-length vector falls out of `atan2(0, 0) = 0` and needs no branch.
#[inline]
pub fn aim_angle(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x) + std::f32::consts::FRAC_PI_2
}

/// Unit direction a turret rotation points at
#[inline]
pub fn rotation_to_dir(rotation: f32) -> Vec2 {
    let a = rotation - std::f32::consts::FRAC_PI_2;
    Vec2::new(a.cos(), a.sin())
}

/// Cheap integer hash for render-side jitter (never touches the sim RNG)
#[inline]
pub fn frame_hash(frame: u64, salt: u32) -> f32 {
    let hash = (frame as u32)
        .wrapping_mul(2654435761)
        .wrapping_add(salt.wrapping_mul(7919))
        .wrapping_mul(2246822519);
    (hash >> 8) as f32 / 16_777_216.0
}
