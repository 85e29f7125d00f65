use crate::{
    cell::{Cell, Vec2},
    error::GridError,
    graph::Graph,
    N_SMALLVEC_SIZE,
};
use core::fmt;
use grid_util::point::Point;
use itertools::iproduct;
use smallvec::SmallVec;

/// Offsets of the Moore neighbourhood in the order N, S, E, W, NE, NW, SE, SW.
const MOORE_OFFSETS: [(i32, i32); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (-1, 1),
    (1, -1),
    (-1, -1),
];

/// A bounded lattice of [Cell]s centred on an origin in world space.
///
/// The grid owns all cell storage; everything else addresses cells by their [Point]
/// coordinate. Coordinates outside `[0, width) x [0, height)` are clamped onto the border
/// rather than rejected, both when resolving world positions and when deriving neighbours.
#[derive(Clone, Debug)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    cell_size: Vec2,
    origin: Vec2,
    cells: Vec<Cell>,
}

impl Grid {
    /// Allocates `width * height` cells. Cell `(x, y)` sits at
    /// `origin + (x, y) * cell_size - floor(width / 2, height / 2) * cell_size`.
    pub fn new(width: i32, height: i32, origin: Vec2, cell_size: Vec2) -> Result<Grid, GridError> {
        if width <= 0 || height <= 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }
        let valid_extent = |v: f32| v.is_finite() && v > 0.0;
        if !valid_extent(cell_size.x) || !valid_extent(cell_size.y) {
            return Err(GridError::InvalidCellSize {
                x: cell_size.x,
                y: cell_size.y,
            });
        }
        let mut grid = Grid {
            width: width as usize,
            height: height as usize,
            cell_size,
            origin,
            cells: Vec::with_capacity(width as usize * height as usize),
        };
        grid.cells = iproduct!(0..height, 0..width)
            .map(|(y, x)| {
                let coord = Point::new(x, y);
                Cell::new(coord, grid.world_position(coord))
            })
            .collect();
        Ok(grid)
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn cell_size(&self) -> Vec2 {
        self.cell_size
    }

    fn centering_offset(&self) -> Vec2 {
        Vec2::new((self.width / 2) as f32, (self.height / 2) as f32) * self.cell_size
    }

    fn world_position(&self, coord: Point) -> Vec2 {
        self.origin + Vec2::new(coord.x as f32, coord.y as f32) * self.cell_size
            - self.centering_offset()
    }

    fn ix(&self, coord: Point) -> usize {
        coord.y as usize * self.width + coord.x as usize
    }

    pub fn in_bounds(&self, coord: Point) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as usize) < self.width
            && (coord.y as usize) < self.height
    }

    /// Saturates `coord` onto the lattice.
    pub fn clamp(&self, coord: Point) -> Point {
        Point::new(
            coord.x.clamp(0, self.width as i32 - 1),
            coord.y.clamp(0, self.height as i32 - 1),
        )
    }

    /// Resolves a world position to the coordinate of the cell containing it. Positions off
    /// the lattice snap to the nearest border cell.
    pub fn world_to_grid(&self, position: Vec2) -> Point {
        let relative = (position - self.origin + self.cell_size * 0.5) / self.cell_size;
        let floored = relative.floor();
        // Widen before offsetting so far-away positions saturate instead of overflowing.
        let x = (floored.x as i64).saturating_add((self.width / 2) as i64);
        let y = (floored.y as i64).saturating_add((self.height / 2) as i64);
        Point::new(
            x.clamp(0, self.width as i64 - 1) as i32,
            y.clamp(0, self.height as i64 - 1) as i32,
        )
    }

    pub fn world_to_cell(&self, position: Vec2) -> &Cell {
        &self.cells[self.ix(self.world_to_grid(position))]
    }

    pub fn cell(&self, coord: Point) -> Option<&Cell> {
        if self.in_bounds(coord) {
            Some(&self.cells[self.ix(coord)])
        } else {
            None
        }
    }

    /// The cell at `coord` after clamping it onto the lattice.
    pub fn cell_clamped(&self, coord: Point) -> &Cell {
        &self.cells[self.ix(self.clamp(coord))]
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Every coordinate of the lattice, column by column (x-major).
    pub fn coords(&self) -> impl Iterator<Item = Point> {
        iproduct!(0..self.width as i32, 0..self.height as i32).map(|(x, y)| Point::new(x, y))
    }

    /// Distinct neighbours of `coord` in the Moore neighbourhood. Each offset is clamped onto
    /// the lattice, duplicates are dropped and the cell itself is excluded, so corner cells
    /// have 3 neighbours and edge cells 5 (on grids of at least 3x3).
    pub fn neighbors(&self, coord: Point) -> SmallVec<[Point; N_SMALLVEC_SIZE]> {
        let center = self.clamp(coord);
        let mut neighbours: SmallVec<[Point; N_SMALLVEC_SIZE]> = SmallVec::new();
        for (dx, dy) in MOORE_OFFSETS {
            let n = self.clamp(Point::new(center.x + dx, center.y + dy));
            if n != center && !neighbours.contains(&n) {
                neighbours.push(n);
            }
        }
        neighbours
    }

    /// Moves the lattice to `origin`, recomputing every cell's world position in place.
    /// Coordinates, and with them any adjacency derived from this grid, are unchanged.
    pub fn update_origin(&mut self, origin: Vec2) {
        self.origin = origin;
        let offset = self.centering_offset();
        let (origin, cell_size) = (self.origin, self.cell_size);
        for cell in self.cells.iter_mut() {
            let coord = cell.coord;
            cell.world =
                origin + Vec2::new(coord.x as f32, coord.y as f32) * cell_size - offset;
        }
    }

    /// Builds the directed 8-connected graph over all cell coordinates.
    pub fn to_graph(&self) -> Graph<Point> {
        Graph::from_neighbor_fn(self.coords(), |&p| self.neighbors(p))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "Grid {}x{} at {} with cell size {}",
            self.width, self.height, self.origin, self.cell_size
        )
    }
}
