//! Collision detection
//!
//! A cell is inside the arena when both coordinates lie in `MIN_COORD..=grid_size`.
//! Coordinates at or below zero, or above the grid size, are wall hits; the
//! last row and column are playable.

use super::state::Cell;

/// Lowest valid coordinate on either axis
pub const MIN_COORD: i32 = 1;

/// Type of collision that ended a round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Head left the arena
    Wall,
    /// Head ran into the snake's own body
    SelfCollision,
}

pub fn in_bounds(cell: Cell, grid_size: i32) -> bool {
    (MIN_COORD..=grid_size).contains(&cell.x) && (MIN_COORD..=grid_size).contains(&cell.y)
}

/// Check a head position against the arena walls and the rest of the body
pub fn check(head: Cell, body: &[Cell], grid_size: i32) -> Option<CollisionType> {
    if !in_bounds(head, grid_size) {
        return Some(CollisionType::Wall);
    }

    if body.contains(&head) {
        return Some(CollisionType::SelfCollision);
    }

    None
}

/// True when `segments[0]` sits on another segment or outside the arena
pub fn is_colliding(segments: &[Cell], grid_size: i32) -> bool {
    match segments.split_first() {
        Some((head, body)) => check(*head, body, grid_size).is_some(),
        None => false,
    }
}
