use lumen_math::{DVec3, LineCrossing};

use crate::element::ElementId;
use crate::ray_hit::{HitDirection, RayHit};

/// Exclusion rule for follow-up casts, so a bounced ray does not
/// immediately hit the surface it left from.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RayIgnore {
    /// Include every element.
    #[default]
    None,
    /// Skip an element entirely.
    Full(ElementId),
    /// Skip the points where the ray enters an element.
    ///
    /// A non-zero minimum only skips entrances closer than that squared
    /// distance to the ray start.
    Entrance {
        id: ElementId,
        minimum_ray_length_squared: f64,
    },
    /// Skip the points where the ray exits an element.
    Exit {
        id: ElementId,
        minimum_ray_length_squared: f64,
    },
}

impl RayIgnore {
    pub fn entrance(id: ElementId) -> Self {
        RayIgnore::Entrance {
            id,
            minimum_ray_length_squared: 0.0,
        }
    }

    pub fn exit(id: ElementId) -> Self {
        RayIgnore::Exit {
            id,
            minimum_ray_length_squared: 0.0,
        }
    }

    /// Returns true if this is `Full` for the given element.
    pub fn should_ignore_fully(&self, id: ElementId) -> bool {
        matches!(*self, RayIgnore::Full(ignored) if ignored == id)
    }

    /// Returns true if this rule excludes a crossing of element `id` in the
    /// given direction at `distance_squared` from the ray start.
    fn excludes(&self, id: ElementId, direction: HitDirection, distance_squared: f64) -> bool {
        let within = |minimum: f64| minimum <= 0.0 || distance_squared < minimum;

        match *self {
            RayIgnore::None => false,
            RayIgnore::Full(ignored) => ignored == id,
            RayIgnore::Entrance {
                id: ignored,
                minimum_ray_length_squared,
            } => {
                ignored == id
                    && direction == HitDirection::Outside
                    && within(minimum_ray_length_squared)
            }
            RayIgnore::Exit {
                id: ignored,
                minimum_ray_length_squared,
            } => {
                ignored == id
                    && direction == HitDirection::Inside
                    && within(minimum_ray_length_squared)
            }
        }
    }

    /// Returns true if an already-tagged hit is excluded by this rule.
    pub fn should_ignore(&self, hit: &RayHit) -> bool {
        self.excludes(hit.id, hit.direction, hit.distance_squared)
    }

    /// Crossings of element `id` that survive this rule, in line order.
    pub fn points_of_interest(
        &self,
        id: ElementId,
        crossings: &[LineCrossing],
        ray_start: DVec3,
    ) -> Vec<LineCrossing> {
        crossings
            .iter()
            .filter(|crossing| {
                let distance_squared = crossing.point_normal.point.distance_squared(ray_start);
                !self.excludes(id, crossing.crossing.into(), distance_squared)
            })
            .copied()
            .collect()
    }

    /// The single crossing shading cares about: the entrance by default, or
    /// the exit when entrances of `id` are ignored.
    pub fn point_of_interest(
        &self,
        id: ElementId,
        crossings: &[LineCrossing],
        ray_start: DVec3,
    ) -> Option<LineCrossing> {
        crossings.iter().copied().find(|crossing| {
            let distance_squared = crossing.point_normal.point.distance_squared(ray_start);
            !self.excludes(id, crossing.crossing.into(), distance_squared)
        })
    }
}
