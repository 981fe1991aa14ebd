//! Fixed-size 2D tile grid.
//!
//! Cells are stored row-major. On the wire a grid is a list of rows, each a
//! list of integer tile codes (`height` rows of `width` cells).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{Coord, Error, Result, TileCode};

/// Offsets of the 4-connected (von Neumann) neighbourhood.
pub const VON_NEUMANN: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Offsets of the 8-connected (Moore) neighbourhood, centre excluded.
pub const MOORE: [(isize, isize); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1, 0),           (1, 0),
    (-1, 1),  (0, 1),  (1, 1),
];

/// Rectangular grid of tile codes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<TileCode>>", into = "Vec<Vec<TileCode>>")]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<TileCode>,
}

impl Grid {
    /// Create an all-empty grid.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Self::filled(width, height, TileCode::EMPTY)
    }

    /// Create a grid with every cell set to `code`.
    pub fn filled(width: usize, height: usize, code: TileCode) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![code; width * height],
        })
    }

    /// Empty grid with the same dimensions as `self`.
    pub fn empty_like(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            cells: vec![TileCode::EMPTY; self.cells.len()],
        }
    }

    /// Build from a list of rows. All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<TileCode>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }

        let mut cells = Vec::with_capacity(width * height);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != width {
                return Err(Error::RaggedRows { row, expected: width, found: values.len() });
            }
            cells.extend(values);
        }
        Ok(Self { width, height, cells })
    }

    /// Convenience constructor from raw integer rows.
    pub fn from_u16_rows(rows: &[&[u16]]) -> Result<Self> {
        Self::from_rows(
            rows.iter()
                .map(|row| row.iter().copied().map(TileCode).collect())
                .collect(),
        )
    }

    /// Copy out as a list of rows.
    pub fn to_rows(&self) -> Vec<Vec<TileCode>> {
        self.cells.chunks(self.width).map(<[TileCode]>::to_vec).collect()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn index_of(&self, coord: Coord) -> usize {
        coord.y * self.width + coord.x
    }

    #[inline]
    pub fn coord_of(&self, index: usize) -> Coord {
        Coord::new(index % self.width, index / self.width)
    }

    #[inline]
    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// Tile at `coord`, or `None` when out of bounds.
    pub fn get(&self, coord: Coord) -> Option<TileCode> {
        self.in_bounds(coord).then(|| self.cells[self.index_of(coord)])
    }

    /// Set the tile at `coord`. Out-of-bounds writes are ignored and return false.
    pub fn set(&mut self, coord: Coord, code: TileCode) -> bool {
        if !self.in_bounds(coord) {
            return false;
        }
        let idx = self.index_of(coord);
        self.cells[idx] = code;
        true
    }

    /// Row-major cell slice.
    pub fn cells(&self) -> &[TileCode] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [TileCode] {
        &mut self.cells
    }

    /// Iterate `(coord, code)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, TileCode)> + '_ {
        self.cells.iter().enumerate().map(|(i, &c)| (self.coord_of(i), c))
    }

    /// Number of cells equal to `code`.
    pub fn count(&self, code: TileCode) -> usize {
        self.cells.iter().filter(|&&c| c == code).count()
    }

    /// Number of non-empty cells.
    pub fn count_non_empty(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    pub fn is_all_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }

    /// First non-empty code in row-major order.
    pub fn first_code(&self) -> Option<TileCode> {
        self.cells.iter().copied().find(|c| !c.is_empty())
    }

    /// In-bounds neighbours of `coord` for the given offset table.
    pub fn neighbors<'a>(
        &self,
        coord: Coord,
        offsets: &'a [(isize, isize)],
    ) -> impl Iterator<Item = Coord> + 'a {
        let (w, h) = (self.width, self.height);
        offsets.iter().filter_map(move |&(dx, dy)| {
            let x = coord.x.checked_add_signed(dx)?;
            let y = coord.y.checked_add_signed(dy)?;
            (x < w && y < h).then_some(Coord::new(x, y))
        })
    }

    /// Copy of this grid with every cell where `mask` is non-empty cleared.
    pub fn mask_where(&self, mask: &Grid) -> Result<Grid> {
        self.ensure_same_dimensions(mask)?;
        let mut out = self.clone();
        for (cell, m) in out.cells.iter_mut().zip(&mask.cells) {
            if !m.is_empty() {
                *cell = TileCode::EMPTY;
            }
        }
        Ok(out)
    }

    /// Error unless `other` has the same width and height.
    pub fn ensure_same_dimensions(&self, other: &Grid) -> Result<()> {
        if self.dimensions() != other.dimensions() {
            return Err(Error::DimensionMismatch {
                expected: self.dimensions(),
                found: other.dimensions(),
            });
        }
        Ok(())
    }
}

impl TryFrom<Vec<Vec<TileCode>>> for Grid {
    type Error = Error;

    fn try_from(rows: Vec<Vec<TileCode>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

impl From<Grid> for Vec<Vec<TileCode>> {
    fn from(grid: Grid) -> Self {
        grid.to_rows()
    }
}

/// Prints one row per line. Single-digit codes are packed, wider codes are
/// space-separated and right-aligned.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widest = self.cells.iter().map(|c| c.0).max().unwrap_or(0);
        let digits = widest.to_string().len();
        for (i, row) in self.cells.chunks(self.width).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for (j, code) in row.iter().enumerate() {
                if digits == 1 {
                    write!(f, "{}", code.0)?;
                } else {
                    if j > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{:>digits$}", code.0)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_dimensions() {
        assert!(matches!(Grid::new(0, 5), Err(Error::InvalidDimension { width: 0, height: 5 })));
        assert!(matches!(Grid::new(5, 0), Err(Error::InvalidDimension { .. })));
        assert!(Grid::from_rows(Vec::new()).is_err());
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let err = Grid::from_u16_rows(&[&[0, 1, 0], &[1, 1]]).unwrap_err();
        assert!(matches!(err, Error::RaggedRows { row: 1, expected: 3, found: 2 }));
    }

    #[test]
    fn test_get_set() {
        let mut grid = Grid::new(4, 3).unwrap();
        assert!(grid.set(Coord::new(3, 2), TileCode(5)));
        assert!(!grid.set(Coord::new(4, 0), TileCode(5)));
        assert_eq!(grid.get(Coord::new(3, 2)), Some(TileCode(5)));
        assert_eq!(grid.get(Coord::new(0, 3)), None);
        assert_eq!(grid.count(TileCode(5)), 1);
        assert_eq!(grid.count_non_empty(), 1);
    }

    #[test]
    fn test_json_shape_is_rows() {
        let grid = Grid::from_u16_rows(&[&[0, 1, 1], &[2, 0, 1]]).unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(json, "[[0,1,1],[2,0,1]]");

        let back: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);
        assert_eq!(back.dimensions(), (3, 2));
    }

    #[test]
    fn test_json_rejects_ragged() {
        assert!(serde_json::from_str::<Grid>("[[0,1],[1]]").is_err());
    }

    #[test]
    fn test_neighbors_clip_at_edges() {
        let grid = Grid::new(3, 3).unwrap();
        assert_eq!(grid.neighbors(Coord::new(0, 0), &MOORE).count(), 3);
        assert_eq!(grid.neighbors(Coord::new(1, 0), &MOORE).count(), 5);
        assert_eq!(grid.neighbors(Coord::new(1, 1), &MOORE).count(), 8);
        assert_eq!(grid.neighbors(Coord::new(0, 0), &VON_NEUMANN).count(), 2);
    }

    #[test]
    fn test_mask_where() {
        let grid = Grid::from_u16_rows(&[&[1, 1], &[1, 1]]).unwrap();
        let mask = Grid::from_u16_rows(&[&[0, 3], &[3, 0]]).unwrap();
        let masked = grid.mask_where(&mask).unwrap();
        assert_eq!(masked, Grid::from_u16_rows(&[&[1, 0], &[0, 1]]).unwrap());

        let wrong = Grid::new(3, 2).unwrap();
        assert!(matches!(grid.mask_where(&wrong), Err(Error::DimensionMismatch { .. })));
    }

    #[test]
    fn test_display() {
        let grid = Grid::from_u16_rows(&[&[0, 1], &[2, 0]]).unwrap();
        assert_eq!(grid.to_string(), "01\n20");

        let wide = Grid::from_u16_rows(&[&[0, 12], &[1, 0]]).unwrap();
        assert_eq!(wide.to_string(), " 0 12\n 1  0");
    }
}
