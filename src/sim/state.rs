//! Game state and core simulation types
//!
//! All state that must be persisted for Continue/determinism lives here.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::placement::place_enemies;
use super::weapon::{Weapon, WeaponKind};
use crate::consts::*;
use crate::settings::Rules;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended (touched a dot under the game-over contact policy)
    GameOver,
}

/// Things that happened during a tick, for audio/feedback collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A dot was removed and counted
    Collected,
    /// A dot was hit but survived
    Damaged,
    /// The player walked through the door
    DoorEntered,
    /// Run ended
    GameOver,
}

/// Playable area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
        }
    }
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Player frame position at the arena center
    pub fn spawn_point(&self) -> Vec2 {
        Vec2::new(
            self.width / 2.0 - FRAME_WIDTH / 2.0,
            self.height / 2.0 - FRAME_HEIGHT / 2.0,
        )
    }

    /// Door position at the arena center
    pub fn door_position(&self) -> Vec2 {
        Vec2::new(
            self.width / 2.0 - DOOR_SIZE / 2.0,
            self.height / 2.0 - DOOR_SIZE / 2.0,
        )
    }

    /// Largest top-left corner an entity of `size` may occupy
    pub fn max_position(&self, size: Vec2) -> Vec2 {
        Vec2::new(
            (self.width - size.x).max(0.0),
            (self.height - size.y).max(0.0),
        )
    }

    /// Clamp an entity position so its rectangle stays inside the arena
    pub fn clamp(&self, pos: Vec2, size: Vec2) -> Vec2 {
        pos.clamp(Vec2::ZERO, self.max_position(size))
    }

    /// True if an entity of `size` at `pos` lies fully inside the arena
    pub fn contains(&self, pos: Vec2, size: Vec2) -> bool {
        Rect::at(pos, size).within(&self.bounds())
    }
}

/// Direction the player faces (one sprite-sheet row each)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    Down,
    Up,
    Left,
    Right,
}

impl Facing {
    /// Sprite-sheet row for this facing
    pub fn row(&self) -> u32 {
        match self {
            Facing::Down => 0,
            Facing::Up => 1,
            Facing::Left => 2,
            Facing::Right => 3,
        }
    }

    pub fn is_vertical(&self) -> bool {
        matches!(self, Facing::Down | Facing::Up)
    }

    /// Unit step in screen coordinates (y grows downward)
    pub fn step(&self) -> Vec2 {
        match self {
            Facing::Down => Vec2::Y,
            Facing::Up => Vec2::NEG_Y,
            Facing::Left => Vec2::NEG_X,
            Facing::Right => Vec2::X,
        }
    }
}

/// Attack state machine
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum AttackState {
    #[default]
    Idle,
    /// Swing in progress: movement locked, hitbox shown until the cooldown ends
    Attacking {
        hitbox: Rect,
        ticks_left: u32,
        /// Generation this swing belongs to; stale once the session resets
        generation: u32,
    },
}

/// The player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner of the sprite frame
    pub pos: Vec2,
    pub facing: Facing,
    pub weapon: Weapon,
    pub moving: bool,
    /// Sprite-sheet column
    pub anim_frame: u32,
    /// Ticks since the last walk-cycle frame change
    pub anim_ticks: u32,
    pub attack: AttackState,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            facing: Facing::Down,
            weapon: Weapon::default(),
            moving: false,
            anim_frame: 0,
            anim_ticks: 0,
            attack: AttackState::Idle,
        }
    }

    pub fn frame_size() -> Vec2 {
        Vec2::new(FRAME_WIDTH, FRAME_HEIGHT)
    }

    /// Full sprite bounds
    pub fn frame_rect(&self) -> Rect {
        Rect::at(self.pos, Self::frame_size())
    }

    /// Collidable region, tighter than the sprite so grazes don't count
    pub fn hitbox(&self) -> Rect {
        Rect::new(
            self.pos.x + HITBOX_OFFSET_X,
            self.pos.y + HITBOX_OFFSET_Y,
            HITBOX_WIDTH,
            HITBOX_HEIGHT,
        )
    }

    /// Movement is locked while a swing is active
    pub fn is_locked(&self) -> bool {
        matches!(self.attack, AttackState::Attacking { .. })
    }

    /// Active weapon hitbox, if swinging
    pub fn weapon_hitbox(&self) -> Option<Rect> {
        match self.attack {
            AttackState::Attacking { hitbox, .. } => Some(hitbox),
            AttackState::Idle => None,
        }
    }

    /// Column used when standing still
    pub fn standing_frame(&self) -> u32 {
        if self.facing == Facing::Right { 1 } else { 0 }
    }
}

/// Dot tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnemyTier {
    #[default]
    Red,
    Blue,
    Gold,
}

impl EnemyTier {
    pub fn max_hp(&self) -> i32 {
        match self {
            EnemyTier::Red => 3,
            EnemyTier::Blue => 6,
            EnemyTier::Gold => 10,
        }
    }

    /// Display color (0xRRGGBB)
    pub fn color(&self) -> u32 {
        match self {
            EnemyTier::Red => 0xe53935,
            EnemyTier::Blue => 0x1e88e5,
            EnemyTier::Gold => 0xfdd835,
        }
    }

    /// Tier mix for a stage (early stages are all red)
    pub fn roll(stage: u32, rng: &mut impl Rng) -> Self {
        let roll = rng.random_range(0..100u32);
        match stage {
            0 | 1 => EnemyTier::Red,
            2 | 3 if roll < 30 => EnemyTier::Blue,
            2 | 3 => EnemyTier::Red,
            _ if roll < 20 => EnemyTier::Gold,
            _ if roll < 50 => EnemyTier::Blue,
            _ => EnemyTier::Red,
        }
    }
}

/// A dot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub hp: i32,
    pub size: f32,
    pub tier: EnemyTier,
}

impl Enemy {
    pub fn new(id: u32, pos: Vec2, tier: EnemyTier) -> Self {
        Self {
            id,
            pos,
            hp: tier.max_hp(),
            size: ENEMY_SIZE,
            tier,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size, self.size)
    }
}

/// Exit to the next stage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Door {
    pub pos: Vec2,
    pub size: f32,
}

impl Door {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: DOOR_SIZE,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size, self.size)
    }
}

/// RNG state wrapper for serialization
///
/// Each stage draws from its own stream so stages differ while the run
/// stays reproducible from the seed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Hand out the generator for the current stream and move to the next
    pub fn next_rng(&mut self) -> Pcg32 {
        let rng = Pcg32::new(self.seed, self.stream.wrapping_mul(2).wrapping_add(1));
        self.stream = self.stream.wrapping_add(1);
        rng
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG state
    pub rng_state: RngState,
    pub arena: Arena,
    pub rules: Rules,
    /// Current phase
    pub phase: GamePhase,
    /// Current stage index (0-based)
    pub stage_index: u32,
    /// Dots collected or defeated, across all stages
    pub collected: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    /// Live dots (sorted by id for determinism)
    pub enemies: Vec<Enemy>,
    pub door: Option<Door>,
    /// Bumped on every swing and reset; stale swings end immediately
    pub attack_generation: u32,
    /// Events since the host last drained them
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed and default rules
    pub fn new(seed: u64) -> Self {
        Self::with_rules(seed, Arena::default(), Rules::default())
    }

    /// Create a new game state with a custom arena and rules
    pub fn with_rules(seed: u64, arena: Arena, rules: Rules) -> Self {
        let mut state = Self::empty(seed, arena, rules);
        state.spawn_stage();
        state
    }

    /// A session with no dots placed yet
    pub fn empty(seed: u64, arena: Arena, rules: Rules) -> Self {
        Self {
            seed,
            rng_state: RngState::new(seed),
            arena,
            rules,
            phase: GamePhase::Playing,
            stage_index: 0,
            collected: 0,
            time_ticks: 0,
            player: Player::new(arena.spawn_point()),
            enemies: Vec::new(),
            door: None,
            attack_generation: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a dot at a fixed position (restores, tests)
    pub fn insert_enemy(&mut self, pos: Vec2, tier: EnemyTier) -> u32 {
        let id = self.next_entity_id();
        self.enemies.push(Enemy::new(id, pos, tier));
        id
    }

    /// Place a fresh batch of dots for the current stage
    pub fn spawn_stage(&mut self) {
        let mut rng = self.rng_state.next_rng();
        let spawn_frame = Rect::at(self.arena.spawn_point(), Player::frame_size());
        let reserved: Vec<Vec2> = self.enemies.iter().map(|e| e.pos).collect();

        let positions = place_enemies(
            &mut rng,
            &self.arena,
            ENEMY_SIZE,
            self.rules.enemy_count,
            self.rules.min_distance,
            self.rules.spawn_buffer.map(|buffer| spawn_frame.inflate(buffer)),
            &reserved,
        );

        for pos in positions {
            let tier = EnemyTier::roll(self.stage_index, &mut rng);
            self.insert_enemy(pos, tier);
        }
        log::info!(
            "Stage {}: {} dots placed",
            self.stage_index,
            self.enemies.len()
        );
    }

    /// Put the player back at the arena center and cancel any swing
    pub fn reset_player(&mut self) {
        self.player.pos = self.arena.spawn_point();
        self.player.moving = false;
        self.player.anim_frame = self.player.standing_frame();
        self.player.anim_ticks = 0;
        self.player.attack = AttackState::Idle;
        self.attack_generation = self.attack_generation.wrapping_add(1);
    }

    /// Move on to the next stage: fresh dots, player back at spawn
    pub fn advance_stage(&mut self) {
        self.door = None;
        self.stage_index += 1;
        self.reset_player();
        self.spawn_stage();
    }

    /// Start over from stage 0, keeping the rules and the equipped weapon
    pub fn restart(&mut self) {
        let weapon = self.player.weapon;
        let generation = self.attack_generation;
        let seed = self.seed.wrapping_add(self.rng_state.stream);

        *self = Self::empty(seed, self.arena, self.rules.clone());
        self.player.weapon = weapon;
        // Keep counting up so nothing from the old run matches
        self.attack_generation = generation.wrapping_add(1);
        self.spawn_stage();
        log::info!("Session restarted with seed {}", seed);
    }

    /// Swap the player's weapon
    pub fn equip_kind(&mut self, kind: WeaponKind) {
        self.player.weapon = Weapon::of(kind);
        log::info!("Weapon set to {}", kind.as_str());
    }

    /// Equip a built-in weapon by name
    pub fn equip(&mut self, name: &str) -> bool {
        match WeaponKind::from_str(name) {
            Some(kind) => {
                self.equip_kind(kind);
                true
            }
            None => {
                log::warn!("Weapon \"{}\" not found", name);
                false
            }
        }
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure enemies are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_new_session() {
        let state = GameState::new(7);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.stage_index, 0);
        assert_eq!(state.collected, 0);
        assert_eq!(state.player.pos, Vec2::new(267.0, 250.0));
        assert_eq!(state.enemies.len(), DEFAULT_ENEMY_COUNT as usize);
        assert!(state.door.is_none());
        assert!(state.enemies.iter().all(|e| e.tier == EnemyTier::Red));
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = GameState::new(42);
        let b = GameState::new(42);
        let pa: Vec<Vec2> = a.enemies.iter().map(|e| e.pos).collect();
        let pb: Vec<Vec2> = b.enemies.iter().map(|e| e.pos).collect();
        assert_eq!(pa, pb);
    }

    #[test]
    fn test_stages_draw_fresh_layouts() {
        let mut state = GameState::new(42);
        let first: Vec<Vec2> = state.enemies.iter().map(|e| e.pos).collect();
        state.enemies.clear();
        state.advance_stage();
        let second: Vec<Vec2> = state.enemies.iter().map(|e| e.pos).collect();
        assert_ne!(first, second);
        assert_eq!(state.stage_index, 1);
    }

    #[test]
    fn test_hitbox_is_inset_from_frame() {
        let player = Player::new(Vec2::new(100.0, 100.0));
        assert_eq!(player.hitbox(), Rect::new(114.0, 120.0, 40.0, 68.0));
        assert!(player.hitbox().within(&player.frame_rect()));
    }

    #[test]
    fn test_arena_center_positions() {
        let arena = Arena::new(600.0, 600.0);
        assert_eq!(arena.door_position(), Vec2::new(280.0, 280.0));
        assert_eq!(arena.spawn_point(), Vec2::new(267.0, 250.0));
        assert_eq!(
            arena.clamp(Vec2::new(-3.0, 590.0), Player::frame_size()),
            Vec2::new(0.0, 500.0)
        );
    }

    #[test]
    fn test_equip_unknown_keeps_weapon() {
        let mut state = GameState::new(1);
        assert!(state.equip("spear"));
        assert!(!state.equip("trebuchet"));
        assert_eq!(state.player.weapon.kind, WeaponKind::Spear);
    }

    #[test]
    fn test_equip_kind_replaces_whole_descriptor() {
        let mut state = GameState::new(1);
        state.equip_kind(WeaponKind::Whip);
        assert_eq!(state.player.weapon, Weapon::of(WeaponKind::Whip));
        assert!(state.equip("KNIFE"));
        assert_eq!(state.player.weapon, Weapon::of(WeaponKind::Knife));
    }

    #[test]
    fn test_restart_resets_progress() {
        let mut state = GameState::new(3);
        state.collected = 9;
        state.stage_index = 4;
        state.phase = GamePhase::GameOver;
        state.equip("whip");
        let generation = state.attack_generation;

        state.restart();
        assert_eq!(state.collected, 0);
        assert_eq!(state.stage_index, 0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.weapon.kind, WeaponKind::Whip);
        assert!(state.attack_generation > generation);
        assert!(!state.enemies.is_empty());
    }

    #[test]
    fn test_tier_roll_early_stages_are_red() {
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..50 {
            assert_eq!(EnemyTier::roll(0, &mut rng), EnemyTier::Red);
            assert_eq!(EnemyTier::roll(1, &mut rng), EnemyTier::Red);
        }
    }
}
