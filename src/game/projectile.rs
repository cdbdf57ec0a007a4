//! Projectile - the bubble being shot.
//!
//! The projectile is ray-marched in fixed steps through local space. At each
//! sample the six neighbors of the sample's cell are tested: a side wall
//! reflects the shot, the ceiling or an occupied cell stops it. A shot may
//! bounce several times before it sticks.

use bevy::prelude::*;

use super::{
    grid::BubbleGrid,
    hex::{GridPos, HexLayout},
};

/// What the projectile ran into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionKind {
    /// Touched the ceiling or another bubble; the shot ends here.
    Stick,
    /// Touched a side wall; `normal` points away from the wall.
    Wall { normal: Vec2 },
    /// Marched past the distance bound without touching anything.
    Exited,
}

/// A collision found while marching.
///
/// `point` is the sample that touched something and `grid` the cell it was in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    pub grid: GridPos,
    pub point: Vec2,
    pub kind: CollisionKind,
}

impl Collision {
    pub fn sticks(&self) -> bool {
        matches!(self.kind, CollisionKind::Stick)
    }

    /// Wall normal, or zero when this is not a wall hit.
    pub fn wall_normal(&self) -> Vec2 {
        match self.kind {
            CollisionKind::Wall { normal } => normal,
            _ => Vec2::ZERO,
        }
    }
}

/// How a traced shot ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightEnding {
    /// Came to rest in this cell. The cell may still be off the bottom of the board.
    Stuck(GridPos),
    /// Left the board without touching anything.
    Exited(GridPos),
    /// Bounced more often than allowed.
    BounceLimit(GridPos),
}

/// The full path of one shot.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    /// Points to move through: one per wall contact, ending at the resting cell's center.
    pub waypoints: Vec<Vec2>,
    pub ending: FlightEnding,
    pub bounces: u32,
}

/// Ray marcher over a fixed board snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Marcher<'a> {
    pub grid: &'a BubbleGrid,
    pub layout: HexLayout,
    /// Neighbors closer than `2 * radius * collide_threshold` count as touching.
    pub collide_threshold: f32,
    /// Distance after which a march is abandoned.
    pub max_distance: f32,
}

impl<'a> Marcher<'a> {
    pub fn new(
        grid: &'a BubbleGrid,
        layout: HexLayout,
        collide_threshold: f32,
        max_distance: f32,
    ) -> Self {
        Self {
            grid,
            layout,
            collide_threshold,
            max_distance,
        }
    }

    /// Test a single sample point moving along `dir`.
    ///
    /// Touching neighbors are tried closest first. A side wall in the direction
    /// of travel wins over everything else; otherwise the ceiling or an
    /// occupied in-bounds cell makes the projectile stick.
    pub fn collision_test(&self, point: Vec2, dir: Vec2) -> Option<Collision> {
        let cell = self.layout.local_to_grid(point);
        let touch_distance = self.layout.bubble_radius * 2.0 * self.collide_threshold;
        let bubbles_per_row = self.grid.bounds().bubbles_per_row;

        let mut candidates: Vec<(GridPos, f32)> = cell
            .neighbors()
            .into_iter()
            .map(|neighbor| (neighbor, point.distance(self.layout.grid_to_local(neighbor))))
            .filter(|(_, distance)| *distance < touch_distance)
            .collect();
        candidates.sort_by(|a, b| a.1.total_cmp(&b.1));

        for (candidate, _) in candidates {
            let hits_left_wall = candidate.col < 0 && dir.x < 0.0;
            let hits_right_wall = candidate.col >= bubbles_per_row && dir.x > 0.0;

            if hits_left_wall || hits_right_wall {
                let normal = if hits_left_wall { Vec2::X } else { Vec2::NEG_X };
                return Some(Collision {
                    grid: cell,
                    point,
                    kind: CollisionKind::Wall { normal },
                });
            }

            if candidate.row < 0 || self.grid.is_occupied(candidate) {
                return Some(Collision {
                    grid: cell,
                    point,
                    kind: CollisionKind::Stick,
                });
            }
        }

        None
    }

    /// March from `start` along the unit vector `dir` in steps of `step` until
    /// something is hit. Returns `None` for a zero direction or a non-positive step.
    pub fn march_and_collide(&self, start: Vec2, dir: Vec2, step: f32) -> Option<Collision> {
        if dir == Vec2::ZERO || step <= 0.0 {
            return None;
        }

        let mut current = start;
        let mut travelled = 0.0;

        loop {
            current += dir * step;
            travelled += step;

            if travelled > self.max_distance {
                warn!(
                    "Projectile marched {} units from {:?} along {:?} without a collision",
                    travelled, start, dir
                );
                return Some(Collision {
                    grid: self.layout.local_to_grid(current),
                    point: current,
                    kind: CollisionKind::Exited,
                });
            }

            if let Some(collision) = self.collision_test(current, dir) {
                if self.layout.local_to_grid(start) == collision.grid {
                    debug!(
                        "March from {:?} collided in its starting cell {}",
                        start, collision.grid
                    );
                }
                return Some(collision);
            }
        }
    }

    /// Trace a whole shot, bouncing off side walls until it sticks.
    ///
    /// After a wall hit the march restarts from the contact point with the
    /// last segment reflected off the wall. Each contact is recorded as a
    /// waypoint kept inside the side walls; the last waypoint is the center of
    /// the resting cell.
    pub fn trace_shot(&self, origin: Vec2, dir: Vec2, max_bounces: u32) -> Trajectory {
        let step = self.layout.bubble_radius;
        let mut waypoints = Vec::new();
        let mut bounces = 0;
        let mut previous = origin;
        let mut dir = dir;

        let Some(mut collision) = self.march_and_collide(origin, dir, step) else {
            return Trajectory {
                waypoints,
                ending: FlightEnding::Exited(self.layout.local_to_grid(origin)),
                bounces,
            };
        };

        loop {
            let normal = match collision.kind {
                CollisionKind::Stick => {
                    let rest = self.onto_columns(collision.grid);
                    waypoints.push(self.layout.grid_to_local(rest));
                    return Trajectory {
                        waypoints,
                        ending: FlightEnding::Stuck(rest),
                        bounces,
                    };
                }
                CollisionKind::Exited => {
                    waypoints.push(self.within_walls(collision.point));
                    return Trajectory {
                        waypoints,
                        ending: FlightEnding::Exited(collision.grid),
                        bounces,
                    };
                }
                CollisionKind::Wall { normal } => normal,
            };
            waypoints.push(self.within_walls(collision.point));

            if bounces >= max_bounces {
                warn!("Shot from {:?} gave up after {} wall bounces", origin, bounces);
                return Trajectory {
                    waypoints,
                    ending: FlightEnding::BounceLimit(collision.grid),
                    bounces,
                };
            }

            let bounce_point = collision.point;
            // A segment that collapsed or lost its climb falls back to the marching direction.
            let incoming = (bounce_point - previous)
                .try_normalize()
                .filter(|incoming| incoming.y * dir.y > 0.0)
                .unwrap_or(dir);
            dir = incoming.reflect(normal);
            bounces += 1;
            debug!(
                "Bounce {} at {:?} off wall {:?}, new direction {:?}",
                bounces, bounce_point, normal, dir
            );

            collision = match self.march_and_collide(bounce_point, dir, step) {
                Some(next) => next,
                None => Collision {
                    grid: collision.grid,
                    point: bounce_point,
                    kind: CollisionKind::Exited,
                },
            };
            previous = bounce_point;
        }
    }

    /// Pull a cell beyond a side wall back into the nearest column of its row.
    fn onto_columns(&self, pos: GridPos) -> GridPos {
        let last_col = self.grid.bounds().bubbles_per_row - 1;
        GridPos::new(pos.col.clamp(0, last_col.max(0)), pos.row)
    }

    /// Keep a bubble centered at `point` from overlapping the side walls.
    fn within_walls(&self, point: Vec2) -> Vec2 {
        let radius = self.layout.bubble_radius;
        let right = radius * 2.0 * self.grid.bounds().bubbles_per_row as f32;
        Vec2::new(point.x.clamp(radius, right.max(radius)), point.y)
    }
}
