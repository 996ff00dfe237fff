//! Field-of-vision calculators.
//!
//! Vision is a pure function of the observer's position. The movement
//! service recomputes it in full whenever an actor changes cell, so
//! implementations need no incremental state.

use std::collections::BTreeSet;

use super::GridOracle;
use crate::state::Position;

/// Cells visible from a position, in deterministic (sorted) order.
pub type VisibleTiles = BTreeSet<Position>;

/// Largest radius a calculator honours; larger radii are clamped to it.
///
/// A square of this radius is already over 260k cells.
pub const MAX_VISION_RADIUS: u32 = 256;

/// Computes the set of cells visible from a position.
pub trait VisionCalculator {
    fn compute(&self, origin: Position) -> VisibleTiles;
}

impl<V: VisionCalculator + ?Sized> VisionCalculator for &V {
    fn compute(&self, origin: Position) -> VisibleTiles {
        (**self).compute(origin)
    }
}

impl<V: VisionCalculator + ?Sized> VisionCalculator for Box<V> {
    fn compute(&self, origin: Position) -> VisibleTiles {
        (**self).compute(origin)
    }
}

/// Sees every cell within a square radius. Nothing blocks sight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RadiusVision {
    pub radius: u32,
}

impl RadiusVision {
    pub const fn new(radius: u32) -> Self {
        Self { radius }
    }
}

impl VisionCalculator for RadiusVision {
    fn compute(&self, origin: Position) -> VisibleTiles {
        square_around(origin, self.radius).collect()
    }
}

/// Radius vision clipped to a map and blocked by opaque tiles.
///
/// A cell is visible when the Bresenham line from the observer reaches it
/// without crossing an opaque cell. Opaque cells themselves can be seen
/// (walls are visible, what is behind them is not).
#[derive(Clone, Debug)]
pub struct LineOfSightVision<M> {
    map: M,
    radius: u32,
}

impl<M: GridOracle> LineOfSightVision<M> {
    pub fn new(map: M, radius: u32) -> Self {
        Self { map, radius }
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    fn has_line_of_sight(&self, from: Position, to: Position) -> bool {
        line_between(from, to)
            .into_iter()
            .skip(1)
            .take_while(|&cell| cell != to)
            .all(|cell| !self.map.is_opaque(cell))
    }
}

impl<M: GridOracle> VisionCalculator for LineOfSightVision<M> {
    fn compute(&self, origin: Position) -> VisibleTiles {
        if !self.map.contains(origin) {
            return VisibleTiles::new();
        }

        square_around(origin, self.radius)
            .filter(|&cell| self.map.contains(cell))
            .filter(|&cell| self.has_line_of_sight(origin, cell))
            .collect()
    }
}

fn square_around(origin: Position, radius: u32) -> impl Iterator<Item = Position> {
    let r = i64::from(radius.min(MAX_VISION_RADIUS));
    let (x, y) = (i64::from(origin.x), i64::from(origin.y));
    (y - r..=y + r).flat_map(move |cy| {
        (x - r..=x + r).filter_map(move |cx| {
            // Cells past the edge of the coordinate space do not exist.
            let cx = i32::try_from(cx).ok()?;
            let cy = i32::try_from(cy).ok()?;
            Some(Position::new(cx, cy))
        })
    })
}

/// Cells on the Bresenham line from `from` to `to`, both ends included.
///
/// Steps are taken in `i64` so lines spanning the whole `i32` range cannot
/// overflow; every cell lies between the two endpoints.
fn line_between(from: Position, to: Position) -> Vec<Position> {
    let (x0, y0) = (i64::from(from.x), i64::from(from.y));
    let (x1, y1) = (i64::from(to.x), i64::from(to.y));
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };

    let mut cells = Vec::new();
    let (mut x, mut y) = (x0, y0);
    let mut err = dx + dy;

    loop {
        match (i32::try_from(x), i32::try_from(y)) {
            (Ok(cx), Ok(cy)) => cells.push(Position::new(cx, cy)),
            _ => break,
        }
        if x == x1 && y == y1 {
            break;
        }
        let doubled = 2 * err;
        if doubled >= dy {
            err += dy;
            x += sx;
        }
        if doubled <= dx {
            err += dx;
            y += sy;
        }
    }

    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::StaticGrid;

    #[test]
    fn radius_vision_covers_square() {
        let tiles = RadiusVision::new(1).compute(Position::new(5, 5));
        assert_eq!(tiles.len(), 9);
        assert!(tiles.contains(&Position::new(4, 6)));
        assert!(!tiles.contains(&Position::new(7, 5)));
    }

    #[test]
    fn zero_radius_sees_only_origin() {
        let tiles = RadiusVision::new(0).compute(Position::ORIGIN);
        assert_eq!(tiles.into_iter().collect::<Vec<_>>(), vec![Position::ORIGIN]);
    }

    #[test]
    fn bresenham_line_includes_both_ends() {
        let line = line_between(Position::new(0, 0), Position::new(3, 1));
        assert_eq!(line.first(), Some(&Position::new(0, 0)));
        assert_eq!(line.last(), Some(&Position::new(3, 1)));
        assert_eq!(line.len(), 4);
    }

    #[test]
    fn walls_block_what_is_behind_them() {
        let grid = StaticGrid::from_rows(&[
            ".....", //
            "..#..", //
            ".....",
        ]);
        let vision = LineOfSightVision::new(grid, 4);
        let tiles = vision.compute(Position::new(0, 1));

        assert!(tiles.contains(&Position::new(1, 1)));
        assert!(tiles.contains(&Position::new(2, 1)), "wall itself is visible");
        assert!(!tiles.contains(&Position::new(3, 1)));
        assert!(!tiles.contains(&Position::new(4, 1)));
        assert!(tiles.contains(&Position::new(4, 0)));
    }

    #[test]
    fn vision_is_clipped_to_the_map() {
        let vision = LineOfSightVision::new(StaticGrid::open(3, 3), 5);
        let tiles = vision.compute(Position::ORIGIN);
        assert_eq!(tiles.len(), 9);
        assert!(tiles.iter().all(|cell| vision.map().contains(*cell)));
    }

    #[test]
    fn vision_at_the_edge_of_coordinate_space() {
        let corner = Position::new(i32::MAX, i32::MIN);
        let tiles = RadiusVision::new(1).compute(corner);
        assert_eq!(tiles.len(), 4);
        assert!(tiles.contains(&corner));
        assert!(tiles.contains(&Position::new(i32::MAX - 1, i32::MIN + 1)));

        let line = line_between(Position::new(i32::MAX - 3, 0), Position::new(i32::MAX, 2));
        assert_eq!(line.len(), 4);
        assert_eq!(line.last(), Some(&Position::new(i32::MAX, 2)));
    }

    #[test]
    fn huge_radius_is_clamped() {
        let tiles = RadiusVision::new(3_000_000_000).compute(Position::ORIGIN);
        assert!(tiles.contains(&Position::ORIGIN));
        let side = 2 * MAX_VISION_RADIUS as usize + 1;
        assert_eq!(tiles.len(), side * side);
    }
}
