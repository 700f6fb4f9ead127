//! Static world geometry
//!
//! The city is a grid of blocks, each made of four rectangular building
//! footprints. Only the footprint perimeters collide: obstacle circles are
//! laid along each edge at a fixed stride, never across the interior.

use glam::Vec2;
use serde::Serialize;

use crate::consts::*;

/// City layout
const BLOCK_COLS: u32 = 5;
const BLOCK_ROWS: u32 = 3;
const BLOCK_WIDTH: f32 = 780.0;
const BLOCK_HEIGHT: f32 = 820.0;
const BLOCK_ORIGIN: Vec2 = Vec2::new(190.0, 180.0);
const BLOCK_PITCH: Vec2 = Vec2::new(940.0, 960.0);

/// A building footprint (axis-aligned rectangle, top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Footprint {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// Palette index for renderers (0..3)
    pub tone: u8,
}

/// A static circular collider
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Obstacle {
    pub pos: Vec2,
    pub radius: f32,
}

/// World quadrant, indexed `bottom * 2 + right`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Quadrant {
    TopLeft = 0,
    TopRight = 1,
    BottomLeft = 2,
    BottomRight = 3,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    fn is_right(self) -> bool {
        matches!(self, Quadrant::TopRight | Quadrant::BottomRight)
    }

    fn is_bottom(self) -> bool {
        matches!(self, Quadrant::BottomLeft | Quadrant::BottomRight)
    }
}

/// Immutable world: bounds plus the obstacle field
#[derive(Debug, Clone, Serialize)]
pub struct World {
    pub width: f32,
    pub height: f32,
    pub footprints: Vec<Footprint>,
    pub obstacles: Vec<Obstacle>,
}

impl World {
    /// Empty world with the given bounds (no buildings).
    ///
    /// Worlds under 120 units on a side still work, but their quadrant
    /// spawn boxes shrink to single points.
    pub fn open(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            footprints: Vec::new(),
            obstacles: Vec::new(),
        }
    }

    /// Build the standard city layout
    pub fn city() -> Self {
        let mut world = Self::open(WORLD_WIDTH, WORLD_HEIGHT);

        for gy in 0..BLOCK_ROWS {
            for gx in 0..BLOCK_COLS {
                let b = BLOCK_ORIGIN + BLOCK_PITCH * Vec2::new(gx as f32, gy as f32);
                let tone = |k: u32| ((gx + gy + k) % 3) as u8;

                // Two long rows top and bottom, two wings left and right
                world.add_building(b.x + 36.0, b.y + 36.0, BLOCK_WIDTH - 72.0, 122.0, tone(0));
                world.add_building(
                    b.x + 36.0,
                    b.y + BLOCK_HEIGHT - 160.0,
                    BLOCK_WIDTH - 72.0,
                    124.0,
                    tone(1),
                );
                world.add_building(b.x + 36.0, b.y + 200.0, 145.0, BLOCK_HEIGHT - 400.0, tone(2));
                world.add_building(
                    b.x + BLOCK_WIDTH - 181.0,
                    b.y + 200.0,
                    145.0,
                    BLOCK_HEIGHT - 400.0,
                    tone(0),
                );
            }
        }

        log::info!(
            "City built: {} footprints, {} obstacles",
            world.footprints.len(),
            world.obstacles.len()
        );
        world
    }

    /// Add a footprint and its perimeter colliders
    fn add_building(&mut self, x: f32, y: f32, w: f32, h: f32, tone: u8) {
        self.footprints.push(Footprint { x, y, w, h, tone });

        let mut xx = x + OBSTACLE_INSET;
        while xx < x + w {
            self.push_obstacle(xx, y + OBSTACLE_INSET);
            self.push_obstacle(xx, y + h - OBSTACLE_INSET);
            xx += OBSTACLE_STRIDE;
        }
        let mut yy = y + OBSTACLE_INSET;
        while yy < y + h {
            self.push_obstacle(x + OBSTACLE_INSET, yy);
            self.push_obstacle(x + w - OBSTACLE_INSET, yy);
            yy += OBSTACLE_STRIDE;
        }
    }

    fn push_obstacle(&mut self, x: f32, y: f32) {
        self.obstacles.push(Obstacle {
            pos: Vec2::new(x, y),
            radius: OBSTACLE_RADIUS,
        });
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.size() * 0.5
    }

    /// Whether a point lies inside the world rectangle (edges inclusive)
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= 0.0 && pos.y >= 0.0 && pos.x <= self.width && pos.y <= self.height
    }

    /// Clamp a body center so the body stays fully inside the world
    pub fn clamp(&self, pos: Vec2, radius: f32) -> Vec2 {
        Vec2::new(
            pos.x.clamp(radius, (self.width - radius).max(radius)),
            pos.y.clamp(radius, (self.height - radius).max(radius)),
        )
    }

    /// Distance from a point to the nearest world edge
    pub fn edge_distance(&self, pos: Vec2) -> f32 {
        pos.x
            .min(pos.y)
            .min(self.width - pos.x)
            .min(self.height - pos.y)
    }

    /// Quadrant containing a point (split at the world midlines)
    pub fn quadrant_of(&self, pos: Vec2) -> Quadrant {
        let mid = self.center();
        let right = pos.x >= mid.x;
        let bottom = pos.y >= mid.y;
        match (bottom, right) {
            (false, false) => Quadrant::TopLeft,
            (false, true) => Quadrant::TopRight,
            (true, false) => Quadrant::BottomLeft,
            (true, true) => Quadrant::BottomRight,
        }
    }

    /// Spawn box for a quadrant: inset 40 from the world edge, 20 from the midline
    pub fn quadrant_bounds(&self, q: Quadrant) -> (Vec2, Vec2) {
        let half = self.center();
        let (min_x, max_x) = if q.is_right() {
            (half.x + 20.0, self.width - 40.0)
        } else {
            (40.0, half.x - 20.0)
        };
        let (min_y, max_y) = if q.is_bottom() {
            (half.y + 20.0, self.height - 40.0)
        } else {
            (40.0, half.y - 20.0)
        };
        let (min_x, max_x) = collapse_if_inverted(min_x, max_x);
        let (min_y, max_y) = collapse_if_inverted(min_y, max_y);
        (Vec2::new(min_x, min_y), Vec2::new(max_x, max_y))
    }
}

fn collapse_if_inverted(min: f32, max: f32) -> (f32, f32) {
    if min < max {
        (min, max)
    } else {
        let mid = (min + max) * 0.5;
        (mid, mid)
    }
}
