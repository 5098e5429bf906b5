//! Axis-aligned collision detection
//!
//! Everything in Dodge Rush is a box with its origin at the top-left corner
//! and y growing downward, so collision is a plain rectangle overlap test.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Obstacle, ObstacleId, Player};

/// Axis-aligned rectangle (top-left origin, y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Strict overlap test; touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        rects_overlap(self, other)
    }
}

/// Returns true if the two rectangles share any interior area
#[inline]
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.left() < b.right() && a.right() > b.left() && a.top() < b.bottom() && a.bottom() > b.top()
}

/// Find the first obstacle (in sequence order) overlapping the player.
///
/// An invincible player never collides.
pub fn first_collision<'a, I>(player: &Player, obstacles: I) -> Option<ObstacleId>
where
    I: IntoIterator<Item = &'a Obstacle>,
{
    if player.invincible {
        return None;
    }
    let player_rect = player.rect();
    obstacles
        .into_iter()
        .find(|o| rects_overlap(&player_rect, &o.rect()))
        .map(|o| o.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_inside() {
        let player = Rect::new(100.0, 500.0, 40.0, 40.0);
        let obstacle = Rect::new(110.0, 510.0, 20.0, 20.0);
        assert!(rects_overlap(&player, &obstacle));
        assert!(rects_overlap(&obstacle, &player));
    }

    #[test]
    fn test_overlap_disjoint() {
        let player = Rect::new(100.0, 500.0, 40.0, 40.0);
        let obstacle = Rect::new(200.0, 500.0, 20.0, 20.0);
        assert!(!rects_overlap(&player, &obstacle));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!a.overlaps(&right));
        assert!(!a.overlaps(&below));
    }

    #[test]
    fn test_partial_corner_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(9.5, 9.5, 10.0, 10.0);
        assert!(a.overlaps(&b));
    }

    #[test]
    fn test_first_collision_respects_invincibility() {
        let mut player = Player::new(Vec2::new(100.0, 500.0), 40.0);
        let obstacles = vec![
            Obstacle::new(ObstacleId(1), Vec2::new(300.0, 0.0), 30.0, 150.0),
            Obstacle::new(ObstacleId(2), Vec2::new(110.0, 510.0), 20.0, 150.0),
            Obstacle::new(ObstacleId(3), Vec2::new(105.0, 505.0), 20.0, 150.0),
        ];

        assert_eq!(first_collision(&player, &obstacles), Some(ObstacleId(2)));

        player.invincible = true;
        assert_eq!(first_collision(&player, &obstacles), None);
    }
}
