use crate::state::Position;

/// Static grid oracle exposing the layout facts vision needs.
pub trait GridOracle {
    fn dimensions(&self) -> MapDimensions;

    /// True when the tile blocks line of sight.
    fn is_opaque(&self, position: Position) -> bool;

    fn contains(&self, position: Position) -> bool {
        self.dimensions().contains(position)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && i64::from(position.x) < i64::from(self.width)
            && i64::from(position.y) < i64::from(self.height)
    }
}

/// Rectangular grid backed by a row-major opacity table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaticGrid {
    dimensions: MapDimensions,
    opaque: Vec<bool>,
}

impl StaticGrid {
    /// An open grid with no walls.
    pub fn open(width: u32, height: u32) -> Self {
        Self {
            dimensions: MapDimensions::new(width, height),
            opaque: vec![false; width as usize * height as usize],
        }
    }

    /// Parses rows of `#` (wall) and `.` (floor).
    ///
    /// Rows shorter than the widest one are padded with floor.
    pub fn from_rows(rows: &[&str]) -> Self {
        let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
        let mut grid = Self::open(width as u32, rows.len() as u32);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch == '#' {
                    grid.opaque[y * width + x] = true;
                }
            }
        }
        grid
    }

    pub fn set_opaque(&mut self, position: Position, opaque: bool) {
        if let Some(index) = self.index(position) {
            self.opaque[index] = opaque;
        }
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.dimensions.contains(position).then(|| {
            position.y as usize * self.dimensions.width as usize + position.x as usize
        })
    }
}

impl GridOracle for StaticGrid {
    fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    fn is_opaque(&self, position: Position) -> bool {
        self.index(position).is_none_or(|index| self.opaque[index])
    }
}
