//! Play state: owns the registry, groups and event queues, and runs the
//! fixed tick pipeline.
//!
//! Stage order per tick, each stage draining fully before the next:
//! physics/collision, collider-event dispatch, death/respawn, movement
//! impulses, sprite animation, moving platforms, checkpoints, and finally
//! the registry flush that applies all deferred deletions.

use glam::Vec2;
use log::info;

use super::audio::AudioService;
use super::builder;
use super::component::Component;
use super::components::{
    Checkpoint, Collider, ColliderEvent, DeathTag, Drawable, MovingPlatform, Physics, Sprite,
    SpriteAnimation, StartMovement, StopMovement, Transform,
};
use super::entity::Entity;
use super::event::Events;
use super::input::{self, ControlEdge};
use super::level::{self, GeneratedLevel};
use super::registry::{GroupId, Registry};
use super::renderer::{self, DrawCommand};
use super::systems;
use crate::config::{ConfigError, GameConfig};

/// Group handles, registered once before the level is generated.
pub struct Groups {
    pub physics: GroupId,
    pub colliders: GroupId,
    pub collider_events: GroupId,
    pub deaths: GroupId,
    pub movement_starts: GroupId,
    pub movement_stops: GroupId,
    pub animations: GroupId,
    pub actors: GroupId,
    pub moving_platforms: GroupId,
    pub checkpoints: GroupId,
    pub drawables: GroupId,
}

impl Groups {
    fn register(registry: &mut Registry) -> Self {
        Self {
            physics: registry.register_group(Transform::MASK | Physics::MASK),
            colliders: registry.register_group(Transform::MASK | Collider::MASK),
            collider_events: registry.register_group(ColliderEvent::MASK),
            deaths: registry.register_group(DeathTag::MASK),
            movement_starts: registry.register_group(StartMovement::MASK | Physics::MASK),
            movement_stops: registry.register_group(StopMovement::MASK | Physics::MASK),
            animations: registry
                .register_group(SpriteAnimation::MASK | Sprite::MASK | Drawable::MASK),
            actors: registry.register_group(Physics::MASK | Sprite::MASK | Drawable::MASK),
            moving_platforms: registry.register_group(Transform::MASK | MovingPlatform::MASK),
            checkpoints: registry.register_group(Transform::MASK | Checkpoint::MASK),
            drawables: registry.register_group(Transform::MASK | Drawable::MASK),
        }
    }
}

/// One loaded level plus the machinery to simulate it.
pub struct PlayState {
    pub registry: Registry,
    pub events: Events,
    pub groups: Groups,
    pub config: GameConfig,
    pub level: GeneratedLevel,
    pub player: Entity,
    respawn_point: Vec2,
    audio: Box<dyn AudioService>,
    won: bool,
}

impl PlayState {
    /// Validate the config, generate a level from `seed` and spawn the
    /// player above the first platform.
    pub fn new(
        config: GameConfig,
        seed: u64,
        audio: Box<dyn AudioService>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut registry = Registry::new();
        let groups = Groups::register(&mut registry);
        let level = level::generate(&mut registry, &config, seed);
        let player = builder::create_player(&mut registry, &config.player, level.spawn_point);
        let respawn_point = level.spawn_point;

        info!(
            "play state ready: {} entities, spawn {respawn_point}",
            registry.live_count()
        );

        Ok(Self {
            registry,
            events: Events::new(),
            groups,
            config,
            level,
            player,
            respawn_point,
            audio,
            won: false,
        })
    }

    /// Feed a control edge from the host's input layer into the player's
    /// movement markers.
    pub fn handle_control(&mut self, edge: ControlEdge) {
        input::apply_control(&mut self.registry, self.player, edge);
    }

    /// Run one simulation tick.
    pub fn tick(&mut self, dt: f32) {
        self.events.clear_all();

        systems::physics::simulate(
            &mut self.registry,
            self.groups.physics,
            self.groups.colliders,
            dt,
            self.config.gravity,
            self.config.move_step,
            self.level.death_height,
        );
        systems::events::dispatch_collider_events(&mut self.registry, self.groups.collider_events);
        systems::events::resolve_deaths(
            &mut self.registry,
            self.groups.deaths,
            self.respawn_point,
            &mut self.events,
        );
        systems::movement::apply_start_markers(&mut self.registry, self.groups.movement_starts);
        systems::movement::apply_stop_markers(&mut self.registry, self.groups.movement_stops);
        systems::sprite::advance_animations(&mut self.registry, self.groups.animations, dt);
        systems::sprite::select_actor_animations(&mut self.registry, self.groups.actors);
        systems::platform::advance_platforms(
            &mut self.registry,
            self.groups.moving_platforms,
            dt,
        );
        let outcome = systems::checkpoint::check_checkpoints(
            &mut self.registry,
            self.groups.checkpoints,
            self.player,
            self.config.generator.checkpoint_radius,
            &mut self.events,
            &mut *self.audio,
        );
        if let Some(point) = outcome.respawn_point {
            self.respawn_point = point;
        }
        if outcome.won {
            self.won = true;
        }

        self.registry.flush();
    }

    /// Renderer boundary: the resolved draw list for this frame.
    pub fn draw_list(&self) -> Vec<DrawCommand> {
        renderer::build_draw_list(&self.registry, self.groups.drawables)
    }

    pub fn respawn_point(&self) -> Vec2 {
        self.respawn_point
    }

    pub fn won(&self) -> bool {
        self.won
    }
}
