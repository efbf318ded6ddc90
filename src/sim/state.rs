//! World state and core simulation types
//!
//! Everything the frame loop mutates lives in [`World`]; the renderer only
//! ever sees it by shared reference.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::Settings;

/// High-level page mode, owned by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Title screen, nothing simulates
    #[default]
    Intro,
    /// Active gameplay
    Playing,
    /// A content panel covers the game
    ModalOpen,
    /// The system menu covers the game
    MenuOpen,
    /// All content unlocked; fireworks
    Win,
}

impl GameMode {
    /// Whether physics runs and the frame loop keeps rescheduling
    pub fn simulates(self) -> bool {
        matches!(self, GameMode::Playing | GameMode::Win)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Intro => "intro",
            GameMode::Playing => "playing",
            GameMode::ModalOpen => "modal_open",
            GameMode::MenuOpen => "menu_open",
            GameMode::Win => "win",
        }
    }
}

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::hex(0xffffff);
    pub const BLACK: Color = Color::hex(0x000000);
    pub const MAGENTA: Color = Color::hex(0xff00ff);

    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
        }
    }
}

/// The three content-unlocking enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Illustration,
    Music,
    Band,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Illustration, Category::Music, Category::Band];

    /// Label drawn under the glyph
    pub fn label(&self) -> &'static str {
        match self {
            Category::Illustration => "ILLUSTRATION",
            Category::Music => "MUSIC",
            Category::Band => "BAND",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Category::Illustration => Color::hex(0x4ade80),
            Category::Music => Color::hex(0xd8b4fe),
            Category::Band => Color::hex(0xfacc15),
        }
    }

    /// Spawn point: left third, center, right third of the upper half
    pub fn spawn_point(&self, area: &PlayArea) -> Vec2 {
        let s = area.scale();
        match self {
            Category::Illustration => Vec2::new(200.0 * s, 150.0 * s),
            Category::Music => Vec2::new(area.width / 2.0, 120.0 * s),
            Category::Band => Vec2::new(area.width - 200.0 * s, 150.0 * s),
        }
    }

    /// Initial velocity in reference units per frame
    pub fn initial_velocity(&self) -> Vec2 {
        match self {
            Category::Illustration => Vec2::new(1.5, 0.5),
            Category::Music => Vec2::new(2.0, 0.0),
            Category::Band => Vec2::new(-1.5, 0.8),
        }
    }
}

/// What a content panel shows. `Contact` never comes from an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentKind {
    Illustration,
    Music,
    Band,
    Contact,
}

impl From<Category> for ContentKind {
    fn from(category: Category) -> Self {
        match category {
            Category::Illustration => ContentKind::Illustration,
            Category::Music => ContentKind::Music,
            Category::Band => ContentKind::Band,
        }
    }
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Illustration => "illustration",
            ContentKind::Music => "music",
            ContentKind::Band => "band",
            ContentKind::Contact => "contact",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "illustration" => Some(ContentKind::Illustration),
            "music" => Some(ContentKind::Music),
            "band" => Some(ContentKind::Band),
            "contact" | "mail" => Some(ContentKind::Contact),
            _ => None,
        }
    }
}

/// Categories unlocked so far this session (insertion ordered, no duplicates)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectedItems {
    items: Vec<Category>,
}

impl CollectedItems {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a category; returns false if it was already present
    pub fn insert(&mut self, category: Category) -> bool {
        if self.items.contains(&category) {
            return false;
        }
        self.items.push(category);
        true
    }

    pub fn contains(&self, category: Category) -> bool {
        self.items.contains(&category)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All three categories unlocked
    pub fn is_complete(&self) -> bool {
        Category::ALL.iter().all(|c| self.contains(*c))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = Category> + '_ {
        self.items.iter().copied()
    }
}

impl FromIterator<Category> for CollectedItems {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        let mut set = Self::new();
        for c in iter {
            set.insert(c);
        }
        set
    }
}

/// Entity tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Projectile,
    Enemy(Category),
    Particle,
    FloatingText,
}

/// The universal simulation object
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Render scale and collision radius
    pub size: f32,
    /// Kill counter for enemies, remaining frames for particles/text
    pub health: i32,
    pub color: Color,
    pub rotation: f32,
    /// Recent positions, oldest first
    pub trail: VecDeque<Vec2>,
    /// Frames of "just hit" remaining
    pub hit_flash: u32,
    /// Hover phase, fixed at spawn
    pub wobble: f32,
    /// Spawn position
    pub anchor: Vec2,
    pub text: Option<String>,
    pub opacity: f32,
}

impl Entity {
    fn base(id: u32, kind: EntityKind, pos: Vec2, vel: Vec2, size: f32, health: i32, color: Color) -> Self {
        Self {
            id,
            kind,
            pos,
            vel,
            size,
            health,
            color,
            rotation: 0.0,
            trail: VecDeque::new(),
            hit_flash: 0,
            wobble: 0.0,
            anchor: pos,
            text: None,
            opacity: 1.0,
        }
    }

    pub fn projectile(id: u32, pos: Vec2, vel: Vec2, rotation: f32, scale: f32) -> Self {
        let mut e = Self::base(
            id,
            EntityKind::Projectile,
            pos,
            vel,
            PROJECTILE_SIZE * scale,
            1,
            Color::MAGENTA,
        );
        e.rotation = rotation;
        e.trail = VecDeque::with_capacity(TRAIL_LENGTH + 1);
        e
    }

    pub fn enemy(id: u32, category: Category, area: &PlayArea, wobble: f32) -> Self {
        let s = area.scale();
        let mut e = Self::base(
            id,
            EntityKind::Enemy(category),
            category.spawn_point(area),
            category.initial_velocity() * s,
            ENEMY_SIZE * s,
            ENEMY_HEALTH,
            category.color(),
        );
        e.wobble = wobble;
        e.trail = VecDeque::with_capacity(TRAIL_LENGTH + 1);
        e
    }

    pub fn particle(id: u32, pos: Vec2, vel: Vec2, size: f32, life: i32, color: Color) -> Self {
        Self::base(id, EntityKind::Particle, pos, vel, size, life, color)
    }

    pub fn floating_text(id: u32, pos: Vec2, vel: Vec2, text: String, color: Color) -> Self {
        let mut e = Self::base(
            id,
            EntityKind::FloatingText,
            pos,
            vel,
            16.0,
            FLOATING_TEXT_FRAMES,
            color,
        );
        e.text = Some(text);
        e
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Category if this is an enemy
    pub fn category(&self) -> Option<Category> {
        match self.kind {
            EntityKind::Enemy(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_projectile(&self) -> bool {
        self.kind == EntityKind::Projectile
    }

    /// Push current position onto the trail, evicting the oldest point
    pub fn record_trail(&mut self) {
        self.trail.push_back(self.pos);
        while self.trail.len() > TRAIL_LENGTH {
            self.trail.pop_front();
        }
    }
}

/// The player's stationary turret
#[derive(Debug, Clone)]
pub struct Turret {
    /// Rest position (bottom center)
    pub base: Vec2,
    /// Visual position including recoil
    pub pos: Vec2,
    /// Aim rotation; 0 points up
    pub rotation: f32,
    pub muzzle_flash: u32,
}

impl Turret {
    pub fn new(area: &PlayArea) -> Self {
        let base = area.turret_base();
        Self {
            base,
            pos: base,
            rotation: 0.0,
            muzzle_flash: 0,
        }
    }
}

/// Background star
#[derive(Debug, Clone, Copy)]
pub struct Star {
    pub pos: Vec2,
    /// Depth: 0.2 (far) to 2.7 (near)
    pub z: f32,
    pub alpha: f32,
}

/// Combo multiplier with its wall-clock window
#[derive(Debug, Clone, Default)]
pub struct Combo {
    pub value: u32,
    pub last_hit_ms: Option<f64>,
}

impl Combo {
    /// Record a hit at `now_ms`; returns the multiplier for this hit
    pub fn register_hit(&mut self, now_ms: f64) -> u32 {
        let chained = self
            .last_hit_ms
            .is_some_and(|last| now_ms - last < COMBO_WINDOW_MS);
        self.value = if chained {
            (self.value + 1).min(MAX_COMBO)
        } else {
            1
        };
        self.last_hit_ms = Some(now_ms);
        self.value
    }

    /// Drop to zero once the window has elapsed without a hit
    pub fn decay(&mut self, now_ms: f64) {
        if self.value == 0 {
            return;
        }
        let expired = self
            .last_hit_ms
            .is_none_or(|last| now_ms - last > COMBO_WINDOW_MS);
        if expired {
            self.value = 0;
        }
    }
}

/// Logical play-area resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayArea {
    pub width: f32,
    pub height: f32,
}

impl Default for PlayArea {
    fn default() -> Self {
        Self {
            width: BASE_WIDTH,
            height: BASE_HEIGHT,
        }
    }
}

impl PlayArea {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    /// Single scale factor relative to the reference area
    pub fn scale(&self) -> f32 {
        (self.width / BASE_WIDTH).min(self.height / BASE_HEIGHT)
    }

    pub fn turret_base(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height - TURRET_BASE_OFFSET * self.scale())
    }

    /// Enemy bounce bounds as (min, max)
    pub fn safe_rect(&self) -> (Vec2, Vec2) {
        let s = self.scale();
        (
            Vec2::new(SAFE_MARGIN * s, SAFE_MARGIN * s),
            Vec2::new(
                self.width - SAFE_MARGIN * s,
                self.height - SAFE_BOTTOM_MARGIN * s,
            ),
        )
    }

    /// Strictly inside the area grown by `margin` on every side
    pub fn contains_with_margin(&self, pos: Vec2, margin: f32) -> bool {
        pos.x > -margin
            && pos.x < self.width + margin
            && pos.y > -margin
            && pos.y < self.height + margin
    }
}

/// Complete simulation state, owned by one controller
#[derive(Debug, Clone)]
pub struct World {
    pub seed: u64,
    pub rng: Pcg32,
    pub area: PlayArea,
    pub settings: Settings,
    /// Simulation frames advanced so far
    pub frame: u64,
    pub turret: Turret,
    /// Enemies and projectiles
    pub entities: Vec<Entity>,
    pub particles: Vec<Entity>,
    pub texts: Vec<Entity>,
    pub stars: Vec<Star>,
    /// Score accumulated this session
    pub score: u64,
    pub combo: Combo,
    pub screen_shake: f32,
    pub last_shot_ms: Option<f64>,
    /// One-way win-sequence latch
    pub win_started: bool,
    next_id: u32,
}

impl World {
    pub fn new(seed: u64, area: PlayArea, settings: Settings) -> Self {
        let mut world = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            area,
            settings,
            frame: 0,
            turret: Turret::new(&area),
            entities: Vec::new(),
            particles: Vec::new(),
            texts: Vec::new(),
            stars: Vec::new(),
            score: 0,
            combo: Combo::default(),
            screen_shake: 0.0,
            last_shot_ms: None,
            win_started: false,
            next_id: 1,
        };
        world.seed_stars();
        world
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Scatter the star field, biased toward the far layer
    pub fn seed_stars(&mut self) {
        let count = self.settings.star_count();
        self.stars.clear();
        self.stars.reserve(count);
        for _ in 0..count {
            let depth: f32 = self.rng.random::<f32>().powi(2);
            let star = Star {
                pos: Vec2::new(
                    self.rng.random::<f32>() * self.area.width,
                    self.rng.random::<f32>() * self.area.height,
                ),
                z: depth * 2.5 + 0.2,
                alpha: 0.3 + self.rng.random::<f32>() * 0.7,
            };
            self.stars.push(star);
        }
    }

    /// Clear transient state and spawn one enemy per uncollected category
    pub fn init_level(&mut self, collected: &CollectedItems) {
        self.win_started = false;
        self.entities.clear();
        self.particles.clear();
        self.texts.clear();

        for category in Category::ALL {
            if collected.contains(category) {
                continue;
            }
            let id = self.next_entity_id();
            let wobble = self.rng.random_range(0.0..100.0_f32).floor();
            self.entities.push(Entity::enemy(id, category, &self.area, wobble));
        }

        log::info!(
            "Level initialized: {} enemies ({} already collected)",
            self.enemy_count(),
            collected.len()
        );
    }

    /// Initialize a level only if the board is empty and no win is underway
    pub fn ensure_level(&mut self, collected: &CollectedItems) -> bool {
        if self.enemy_count() == 0 && !self.win_started {
            self.init_level(collected);
            true
        } else {
            false
        }
    }

    pub fn enemies(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.category().is_some())
    }

    pub fn projectiles(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.is_projectile())
    }

    /// Enemies still standing
    pub fn enemy_count(&self) -> usize {
        self.enemies().filter(|e| e.is_alive()).count()
    }
}
