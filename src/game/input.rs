//! Input boundary.
//!
//! The host's control-mapping layer delivers named edges; this module turns
//! them into one-shot movement markers on the controlled entity. The core
//! never sees physical devices.

use serde::{Deserialize, Serialize};

use super::components::{MovementKind, StartMovement, StopMovement};
use super::entity::Entity;
use super::registry::Registry;

/// Named controls the simulation understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Control {
    MoveLeft,
    MoveRight,
    Jump,
}

/// A discrete press or release of a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlEdge {
    Pressed(Control),
    Released(Control),
}

/// Translate a control edge into a movement marker on `entity`.
///
/// Markers keep the first edge of a tick; the movement stage consumes them
/// every tick, so edges delivered in later ticks are never lost. Releasing
/// jump has no stop semantics; the jump impulse is instantaneous.
pub fn apply_control(registry: &mut Registry, entity: Entity, edge: ControlEdge) {
    match edge {
        ControlEdge::Pressed(control) => {
            let kind = movement_kind(control);
            registry.try_add_component(entity, StartMovement { kind });
        }
        ControlEdge::Released(Control::Jump) => {}
        ControlEdge::Released(control) => {
            let kind = movement_kind(control);
            registry.try_add_component(entity, StopMovement { kind });
        }
    }
}

fn movement_kind(control: Control) -> MovementKind {
    match control {
        Control::MoveLeft => MovementKind::Left,
        Control::MoveRight => MovementKind::Right,
        Control::Jump => MovementKind::Jump,
    }
}
