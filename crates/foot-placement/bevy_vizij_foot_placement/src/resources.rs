use bevy::prelude::*;
use vizij_foot_placement_core::{GroundQuery, NoGround, RayHit};

/// Scene query used for every probe. Apps replace it with their physics or
/// terrain lookup; the default never hits.
#[derive(Resource)]
pub struct GroundProbe(pub Box<dyn GroundQuery + Send + Sync>);

impl GroundProbe {
    pub fn new(query: impl GroundQuery + Send + Sync + 'static) -> Self {
        Self(Box::new(query))
    }
}

impl Default for GroundProbe {
    fn default() -> Self {
        Self::new(NoGround)
    }
}

impl GroundQuery for GroundProbe {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        self.0.cast_ray(origin, direction, max_distance)
    }
}

/// Fixed step override (seconds per frame). `None` uses `Time::delta_seconds`.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct FootPlacementDt(pub Option<f32>);
