//! Connected-component extraction over tile grids.
//!
//! Regions are maximal 4-connected sets of cells sharing one tile code. All
//! searches use an explicit worklist so stack usage does not grow with the
//! grid.

use std::collections::VecDeque;

use crate::core::{Coord, TileCode};
use crate::grid::{Grid, VON_NEUMANN};

/// A 4-connected set of cells holding the same tile code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    pub tile_code: TileCode,
    /// Cells in breadth-first discovery order from the region's first
    /// row-major cell.
    pub cells: Vec<Coord>,
}

impl Region {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Write this region into `grid` with its tile code.
    pub fn paint(&self, grid: &mut Grid) {
        for &cell in &self.cells {
            grid.set(cell, self.tile_code);
        }
    }

    /// An otherwise empty grid of the given grid's size holding only this region.
    pub fn to_grid(&self, like: &Grid) -> Grid {
        let mut out = like.empty_like();
        self.paint(&mut out);
        out
    }
}

/// Find every maximal 4-connected region of `tile_code`.
///
/// Regions are returned in the row-major order of their first cell. Each
/// matching cell belongs to exactly one region; runs in time linear in the
/// number of cells.
pub fn find_regions(grid: &Grid, tile_code: TileCode) -> Vec<Region> {
    let mut visited = vec![false; grid.len()];
    let mut regions = Vec::new();
    let mut queue = VecDeque::new();

    for start in 0..grid.len() {
        if visited[start] || grid.cells()[start] != tile_code {
            continue;
        }

        visited[start] = true;
        queue.push_back(grid.coord_of(start));
        let mut cells = Vec::new();

        while let Some(cell) = queue.pop_front() {
            cells.push(cell);
            for next in grid.neighbors(cell, &VON_NEUMANN) {
                let idx = grid.index_of(next);
                if !visited[idx] && grid.cells()[idx] == tile_code {
                    visited[idx] = true;
                    queue.push_back(next);
                }
            }
        }

        regions.push(Region { tile_code, cells });
    }

    log::trace!("find_regions: {} regions of tile {}", regions.len(), tile_code);
    regions
}

/// Pick the largest region. Ties go to the earliest region in the list.
///
/// Returns `None` for an empty list.
pub fn select_largest(regions: Vec<Region>) -> Option<Region> {
    let mut best: Option<Region> = None;
    for region in regions {
        match &best {
            Some(current) if region.len() <= current.len() => {}
            _ => best = Some(region),
        }
    }
    best
}

/// Keep only the largest region of `tile_code`; every other cell becomes empty.
///
/// When nothing matches, the result is an all-empty grid.
pub fn keep_largest(grid: &Grid, tile_code: TileCode) -> Grid {
    match select_largest(find_regions(grid, tile_code)) {
        Some(region) => region.to_grid(grid),
        None => grid.empty_like(),
    }
}

/// Join every region of `tile_code` into one by carving corridors.
///
/// Each region after the first is linked to the growing main region through
/// its Manhattan-closest cell pair: a horizontal run along the main cell's row,
/// then a vertical run along the other cell's column. Other tile codes are
/// cleared, as with [`keep_largest`].
pub fn connect_regions(grid: &Grid, tile_code: TileCode) -> Grid {
    let mut regions = find_regions(grid, tile_code).into_iter();
    let mut out = grid.empty_like();

    let Some(first) = regions.next() else {
        return out;
    };
    first.paint(&mut out);
    let mut main = first.cells;

    for region in regions {
        region.paint(&mut out);

        let mut best = (usize::MAX, main[0], region.cells[0]);
        for &a in &main {
            for &b in &region.cells {
                let d = a.manhattan(b);
                if d < best.0 {
                    best = (d, a, b);
                }
            }
        }

        let (_, a, b) = best;
        let mut corridor = Vec::new();
        for x in a.x.min(b.x)..=a.x.max(b.x) {
            corridor.push(Coord::new(x, a.y));
        }
        for y in a.y.min(b.y)..=a.y.max(b.y) {
            corridor.push(Coord::new(b.x, y));
        }
        log::trace!("connect_regions: corridor {:?} -> {:?} ({} cells)", a, b, corridor.len());

        for cell in corridor {
            if out.get(cell) != Some(tile_code) {
                out.set(cell, tile_code);
                main.push(cell);
            }
        }
        main.extend(region.cells);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const T: TileCode = TileCode(1);

    fn sample() -> Grid {
        Grid::from_u16_rows(&[
            &[1, 1, 0, 0, 1],
            &[0, 1, 0, 1, 1],
            &[1, 0, 0, 0, 0],
            &[1, 0, 2, 1, 0],
        ])
        .unwrap()
    }

    fn region_of(len: usize) -> Region {
        Region {
            tile_code: T,
            cells: (0..len).map(|x| Coord::new(x, 0)).collect(),
        }
    }

    #[test]
    fn test_find_regions_coverage() {
        let grid = sample();
        let regions = find_regions(&grid, T);
        assert_eq!(regions.len(), 4);

        let mut seen = HashSet::new();
        for region in &regions {
            for &cell in &region.cells {
                assert_eq!(grid.get(cell), Some(T));
                assert!(seen.insert(cell), "cell {:?} appears in two regions", cell);
            }
        }
        assert_eq!(seen.len(), grid.count(T));
    }

    #[test]
    fn test_regions_are_not_adjacent() {
        let grid = sample();
        let regions = find_regions(&grid, T);
        let mut owner = std::collections::HashMap::new();
        for (i, region) in regions.iter().enumerate() {
            for &cell in &region.cells {
                owner.insert(cell, i);
            }
        }
        for (&cell, &i) in &owner {
            for next in grid.neighbors(cell, &VON_NEUMANN) {
                if let Some(&j) = owner.get(&next) {
                    assert_eq!(i, j, "{:?} and {:?} split across regions", cell, next);
                }
            }
        }
    }

    #[test]
    fn test_region_order_and_sizes() {
        let regions = find_regions(&sample(), T);
        let sizes: Vec<_> = regions.iter().map(Region::len).collect();
        assert_eq!(sizes, vec![3, 3, 2, 1]);
        assert_eq!(regions[0].cells[0], Coord::new(0, 0));
    }

    #[test]
    fn test_diagonal_cells_are_separate() {
        let grid = Grid::from_u16_rows(&[&[1, 0], &[0, 1]]).unwrap();
        assert_eq!(find_regions(&grid, T).len(), 2);
    }

    #[test]
    fn test_no_match_returns_empty() {
        let grid = Grid::new(5, 5).unwrap();
        assert!(find_regions(&grid, T).is_empty());
    }

    #[test]
    fn test_large_grid_does_not_overflow() {
        let grid = Grid::filled(1000, 1000, T).unwrap();
        let regions = find_regions(&grid, T);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].len(), 1_000_000);
    }

    #[test]
    fn test_select_largest() {
        let regions = vec![region_of(3), region_of(7), region_of(2)];
        assert_eq!(select_largest(regions).map(|r| r.len()), Some(7));
        assert!(select_largest(Vec::new()).is_none());
    }

    #[test]
    fn test_select_largest_first_wins_ties() {
        let mut a = region_of(4);
        a.tile_code = TileCode(8);
        let regions = vec![region_of(2), a.clone(), region_of(4)];
        assert_eq!(select_largest(regions), Some(a));
    }

    #[test]
    fn test_keep_largest() {
        let kept = keep_largest(&sample(), T);
        assert_eq!(kept.count(T), 3);
        assert_eq!(kept.count_non_empty(), 3);
        assert_eq!(kept.get(Coord::new(0, 0)), Some(T));
        assert_eq!(kept.get(Coord::new(4, 0)), Some(TileCode::EMPTY));
    }

    #[test]
    fn test_keep_largest_empty() {
        let grid = Grid::filled(4, 4, TileCode(3)).unwrap();
        assert!(keep_largest(&grid, T).is_all_empty());
    }

    #[test]
    fn test_connect_regions_yields_single_component() {
        let grid = sample();
        let connected = connect_regions(&grid, T);
        assert_eq!(find_regions(&connected, T).len(), 1);
        for (cell, code) in grid.iter() {
            if code == T {
                assert_eq!(connected.get(cell), Some(T));
            }
        }
        assert_eq!(connected.count(TileCode(2)), 0);
    }

    #[test]
    fn test_connect_regions_straight_corridor() {
        let grid = Grid::from_u16_rows(&[&[1, 0, 0, 1]]).unwrap();
        let connected = connect_regions(&grid, T);
        assert_eq!(connected, Grid::from_u16_rows(&[&[1, 1, 1, 1]]).unwrap());
    }
}
