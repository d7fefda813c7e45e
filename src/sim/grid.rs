//! Invader formations
//!
//! A grid moves as one rigid body, but it never translates its invaders
//! itself: each invader integrates the grid's velocity on its own.

use glam::Vec2;
use rand::Rng;

use super::state::{Invader, SpriteState};
use crate::consts::*;

/// A block of invaders that sweeps sideways and steps down on each bounce
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub pos: Vec2,
    pub vel: Vec2,
    /// `columns * GRID_CELL`, only used for the bounce test
    pub width: f32,
    pub columns: usize,
    pub rows: usize,
    pub invaders: Vec<Invader>,
}

impl Grid {
    /// Random formation with columns in [5, 15) and rows in [2, 7)
    pub fn new<R: Rng + ?Sized>(rng: &mut R, sprite: SpriteState) -> Self {
        let columns = rng.random_range(GRID_COLUMNS_MIN..GRID_COLUMNS_MAX);
        let rows = rng.random_range(GRID_ROWS_MIN..GRID_ROWS_MAX);
        Self::with_dimensions(columns, rows, sprite)
    }

    /// Lay out `columns * rows` invaders column by column from the origin
    pub fn with_dimensions(columns: usize, rows: usize, sprite: SpriteState) -> Self {
        let mut invaders = Vec::with_capacity(columns * rows);
        for i in 0..columns {
            for j in 0..rows {
                let pos = Vec2::new(i as f32 * GRID_CELL, j as f32 * GRID_CELL);
                invaders.push(Invader::new(pos, sprite));
            }
        }

        Self {
            pos: Vec2::ZERO,
            vel: Vec2::new(GRID_SPEED, 0.0),
            width: columns as f32 * GRID_CELL,
            columns,
            rows,
            invaders,
        }
    }

    /// Advance one tick, returns true when the grid bounced
    ///
    /// The downward step set on a bounce is integrated exactly once, on the
    /// following tick. Only an edge the grid is moving toward flips it, so a
    /// grid resting on an edge cannot flip again before it has left.
    pub fn update(&mut self, viewport_width: f32) -> bool {
        self.pos += self.vel;
        self.vel.y = 0.0;

        let hit_right = self.pos.x + self.width >= viewport_width && self.vel.x > 0.0;
        let hit_left = self.pos.x <= 0.0 && self.vel.x < 0.0;
        if hit_right || hit_left {
            self.vel.x = -self.vel.x;
            self.vel.y = GRID_DROP;
            return true;
        }
        false
    }

    /// Index of a uniformly random surviving invader
    pub fn pick_shooter<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        if self.invaders.is_empty() {
            None
        } else {
            Some(rng.random_range(0..self.invaders.len()))
        }
    }

    pub fn is_empty(&self) -> bool {
        self.invaders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_layout_is_column_major() {
        let grid = Grid::with_dimensions(5, 2, SpriteState::Loading);
        assert_eq!(grid.invaders.len(), 10);
        assert_eq!(grid.width, 150.0);
        assert_eq!(grid.invaders[0].pos, Vec2::new(0.0, 0.0));
        assert_eq!(grid.invaders[1].pos, Vec2::new(0.0, 30.0));
        assert_eq!(grid.invaders[2].pos, Vec2::new(30.0, 0.0));
        assert_eq!(grid.invaders[9].pos, Vec2::new(120.0, 30.0));
    }

    #[test]
    fn test_random_dimensions_in_range() {
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..200 {
            let grid = Grid::new(&mut rng, SpriteState::Loading);
            assert!((GRID_COLUMNS_MIN..GRID_COLUMNS_MAX).contains(&grid.columns));
            assert!((GRID_ROWS_MIN..GRID_ROWS_MAX).contains(&grid.rows));
            assert_eq!(grid.invaders.len(), grid.columns * grid.rows);
        }
    }

    #[test]
    fn test_bounce_on_exact_touch() {
        // 150 wide in a 300 wide viewport: touches the right edge at x = 150
        let mut grid = Grid::with_dimensions(5, 2, SpriteState::Loading);
        let mut bounces = 0;
        for _ in 0..30 {
            if grid.update(300.0) {
                bounces += 1;
            }
        }
        assert_eq!(grid.pos.x, 150.0);
        assert_eq!(bounces, 1);
        assert_eq!(grid.vel, Vec2::new(-GRID_SPEED, GRID_DROP));

        // Step down happens once, on the next tick
        assert!(!grid.update(300.0));
        assert_eq!(grid.pos, Vec2::new(145.0, GRID_DROP));
        assert_eq!(grid.vel.y, 0.0);
        assert!(!grid.update(300.0));
        assert_eq!(grid.pos.y, GRID_DROP);
    }

    #[test]
    fn test_no_flip_while_leaving_edge() {
        // Still overlapping the right edge after a bounce, but heading left
        let mut grid = Grid::with_dimensions(5, 2, SpriteState::Loading);
        grid.pos.x = 200.0;
        grid.vel.x = -GRID_SPEED;
        for _ in 0..5 {
            assert!(!grid.update(300.0));
        }
        assert_eq!(grid.vel.x, -GRID_SPEED);
        assert_eq!(grid.pos, Vec2::new(175.0, 0.0));
    }

    #[test]
    fn test_left_edge_bounce() {
        let mut grid = Grid::with_dimensions(5, 2, SpriteState::Loading);
        grid.pos.x = 10.0;
        grid.vel.x = -GRID_SPEED;
        assert!(!grid.update(1024.0));
        assert!(grid.update(1024.0));
        assert_eq!(grid.pos.x, 0.0);
        assert_eq!(grid.vel.x, GRID_SPEED);
    }

    #[test]
    fn test_pick_shooter() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut grid = Grid::with_dimensions(5, 2, SpriteState::Loading);
        for _ in 0..50 {
            let idx = grid.pick_shooter(&mut rng).unwrap();
            assert!(idx < grid.invaders.len());
        }
        grid.invaders.clear();
        assert!(grid.pick_shooter(&mut rng).is_none());
    }
}
