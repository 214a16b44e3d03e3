use crate::hit::HitResult;
use glam::{DVec3, IVec3};
use sightline_core::EntityId;
use sightline_world::ShapeContext;

/// Eye position and look direction at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Eye position.
    pub eye: DVec3,
    /// Look direction (need not be normalized).
    pub look: DVec3,
}

impl Pose {
    /// Interpolate between the previous and current tick's pose.
    pub fn lerp(previous: Pose, current: Pose, partial_tick: f64) -> Self {
        let t = partial_tick.clamp(0.0, 1.0);
        Self {
            eye: previous.eye.lerp(current.eye, t),
            look: previous.look.lerp(current.look, t),
        }
    }

    /// Normalized look direction; falls back to +X for a degenerate look.
    pub fn view_vector(&self) -> DVec3 {
        self.look.try_normalize().unwrap_or(DVec3::X)
    }
}

/// The subject the ray is cast from.
#[derive(Debug, Clone)]
pub struct Observer {
    /// The observer's own entity; never reported as its own target.
    pub entity: EntityId,
    /// Pose interpolated for the current sub-frame.
    pub pose: Pose,
    /// Block interaction range before the configured bonus.
    pub block_reach: f64,
    /// Entity interaction range before the configured bonus.
    pub entity_reach: f64,
    /// What the host's own crosshair logic reported last frame.
    pub crosshair: HitResult,
    /// Player-controlled observers get the player-specific visibility rules.
    pub player_controlled: bool,
    /// Observer is spectating.
    pub spectating: bool,
    /// Observer's team.
    pub team: Option<u32>,
    /// What the observer is riding.
    pub vehicle: Option<EntityId>,
    /// Observer is in the middle of breaking a block.
    pub destroying: bool,
    /// Observer can see marker block outlines.
    pub reveal_markers: bool,
}

impl Observer {
    /// Player-controlled observer with default interaction ranges.
    pub fn player(entity: EntityId, pose: Pose) -> Self {
        Self {
            entity,
            pose,
            block_reach: 4.5,
            entity_reach: 3.0,
            crosshair: HitResult::Miss,
            player_controlled: true,
            spectating: false,
            team: None,
            vehicle: None,
            destroying: false,
            reveal_markers: false,
        }
    }

    /// Override both interaction ranges.
    pub fn with_reach(mut self, block_reach: f64, entity_reach: f64) -> Self {
        self.block_reach = block_reach;
        self.entity_reach = entity_reach;
        self
    }

    /// Cell the eye is in.
    pub fn eye_cell(&self) -> IVec3 {
        self.pose.eye.floor().as_ivec3()
    }

    /// Shape flags for clipping from this observer's point of view.
    pub fn shape_context(&self) -> ShapeContext {
        ShapeContext {
            reveal_markers: self.reveal_markers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pose_interpolates_for_sub_frame() {
        let previous = Pose {
            eye: DVec3::ZERO,
            look: DVec3::X,
        };
        let current = Pose {
            eye: DVec3::new(2.0, 0.0, 0.0),
            look: DVec3::Z,
        };
        let mid = Pose::lerp(previous, current, 0.5);
        assert_eq!(mid.eye, DVec3::new(1.0, 0.0, 0.0));
        let view = mid.view_vector();
        assert!((view.length() - 1.0).abs() < 1e-12);
        assert!((view.x - view.z).abs() < 1e-12);
    }

    #[test]
    fn degenerate_look_falls_back() {
        let pose = Pose {
            eye: DVec3::ZERO,
            look: DVec3::ZERO,
        };
        assert_eq!(pose.view_vector(), DVec3::X);
    }

    #[test]
    fn eye_cell_floors_negative_coordinates() {
        let observer = Observer::player(
            EntityId(1),
            Pose {
                eye: DVec3::new(-0.5, 1.2, 3.9),
                look: DVec3::X,
            },
        );
        assert_eq!(observer.eye_cell(), IVec3::new(-1, 1, 3));
    }
}
