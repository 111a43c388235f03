//! Checkpoint proximity stage.
//!
//! Checkpoints are pickups floating above platforms. The first time the
//! player comes within the activation radius, the checkpoint fires: the
//! respawn point moves there, a cue plays, and the final checkpoint raises
//! the win signal. A checkpoint fires at most once.

use glam::Vec2;
use log::info;

use crate::game::audio::{AudioService, CUE_CHANNEL};
use crate::game::components::Checkpoint;
use crate::game::entity::Entity;
use crate::game::event::{CheckpointEvent, Events, WinEvent};
use crate::game::registry::{GroupId, Registry};
use crate::game::transform;

/// Result of the checkpoint stage, applied by the owning state.
#[derive(Debug, Default, Clone, Copy)]
pub struct CheckpointOutcome {
    /// New respawn point, when a checkpoint was activated this tick.
    pub respawn_point: Option<Vec2>,
    pub won: bool,
}

/// Check the player against every unactivated checkpoint in the group
/// (Transform + Checkpoint).
pub fn check_checkpoints(
    registry: &mut Registry,
    checkpoint_group: GroupId,
    player: Entity,
    radius: f32,
    events: &mut Events,
    audio: &mut dyn AudioService,
) -> CheckpointOutcome {
    let mut outcome = CheckpointOutcome::default();
    if !registry.is_alive(player) {
        return outcome;
    }
    let player_position = transform::world_position(registry, player);

    for entity in registry.entities_in(checkpoint_group) {
        if !registry.is_alive(entity) {
            continue;
        }
        if registry.component::<Checkpoint>(entity).activated {
            continue;
        }

        let position = transform::world_position(registry, entity);
        if position.distance(player_position) > radius {
            continue;
        }

        registry.component_mut::<Checkpoint>(entity).activated = true;
        outcome.respawn_point = Some(position);

        events.checkpoint.send(CheckpointEvent {
            checkpoint: entity,
            position,
        });
        audio.play_sound("checkpoint", CUE_CHANNEL);
        info!("checkpoint activated at {position}");

        if registry.component::<Checkpoint>(entity).final_goal {
            outcome.won = true;
            events.win.send(WinEvent { checkpoint: entity });
            audio.play_sound("win", CUE_CHANNEL);
            info!("final checkpoint reached");
        }
    }

    outcome
}
