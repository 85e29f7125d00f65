use crate::{grid::Grid, CARDINAL_COST};
use core::fmt;
use grid_util::grid::{BoolGrid, ValueGrid};
use grid_util::point::Point;
use log::debug;
use petgraph::unionfind::UnionFind;

/// Half of the Moore neighbourhood; visiting it from every cell covers each adjacent pair once.
const FORWARD_OFFSETS: [(i32, i32); 4] = [(0, 1), (1, -1), (1, 0), (1, 1)];

/// Per-cell validity mask laid over a [Grid]. Blocked cells stay in the graph; searches
/// avoid them through the cost function from [cost_fn](Self::cost_fn) or the predicate from
/// [passable_fn](Self::passable_fn).
///
/// In addition to the raw mask, the overlay maintains the connected components of valid
/// cells in a [UnionFind] so that unreachable targets can be rejected without a search.
/// Unblocking a cell joins components right away; blocking one may split a component and
/// only marks the components as dirty until [update](Self::update) regenerates them.
#[derive(Clone, Debug)]
pub struct ObstacleOverlay {
    blocked: BoolGrid,
    width: usize,
    height: usize,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
}

fn blocked_at(blocked: &BoolGrid, width: usize, height: usize, p: &Point) -> bool {
    let in_bounds = p.x >= 0 && p.y >= 0 && (p.x as usize) < width && (p.y as usize) < height;
    !in_bounds || blocked.get_point(*p)
}

impl ObstacleOverlay {
    /// An overlay with every cell valid.
    pub fn new(width: usize, height: usize) -> ObstacleOverlay {
        let mut overlay = ObstacleOverlay {
            blocked: BoolGrid::new(width, height, false),
            width,
            height,
            components: UnionFind::new(width * height),
            components_dirty: false,
        };
        overlay.generate_components();
        overlay
    }

    pub fn for_grid(grid: &Grid) -> ObstacleOverlay {
        ObstacleOverlay::new(grid.width, grid.height)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn in_bounds(&self, p: &Point) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as usize) < self.width && (p.y as usize) < self.height
    }

    fn ix(&self, p: &Point) -> usize {
        p.y as usize * self.width + p.x as usize
    }

    /// Whether `cell` may be entered. Cells outside the overlay are never valid.
    pub fn is_valid(&self, cell: &Point) -> bool {
        !blocked_at(&self.blocked, self.width, self.height, cell)
    }

    /// Marks `cell` valid or blocked. Out-of-bounds cells are ignored.
    pub fn set_valid(&mut self, cell: Point, valid: bool) {
        if !self.in_bounds(&cell) {
            debug!("Ignoring validity change outside the overlay at {}", cell);
            return;
        }
        let was_valid = self.is_valid(&cell);
        self.blocked.set_point(cell, !valid);
        if was_valid && !valid {
            self.components_dirty = true;
        } else if valid {
            let cell_ix = self.ix(&cell);
            for (dx, dy) in FORWARD_OFFSETS {
                for n in [
                    Point::new(cell.x + dx, cell.y + dy),
                    Point::new(cell.x - dx, cell.y - dy),
                ] {
                    if self.is_valid(&n) {
                        let ix = self.ix(&n);
                        self.components.union(cell_ix, ix);
                    }
                }
            }
        }
    }

    /// Flips the validity of `cell` and returns the new state.
    pub fn toggle(&mut self, cell: Point) -> bool {
        let valid = !self.is_valid(&cell);
        self.set_valid(cell, valid);
        self.is_valid(&cell)
    }

    pub fn blocked_cells(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.height as i32)
            .flat_map(move |y| (0..self.width as i32).map(move |x| Point::new(x, y)))
            .filter(move |p| !self.is_valid(p))
    }

    /// Cost of moving between two adjacent cells: infinite when `to` is blocked, otherwise
    /// [CARDINAL_COST] for straight and `diagonal_cost` for diagonal moves.
    pub fn edge_cost(&self, from: &Point, to: &Point, diagonal_cost: f32) -> f32 {
        step_cost(&self.blocked, self.width, self.height, from, to, diagonal_cost)
    }

    /// A cost function over a snapshot of the current mask, for handing to a search. Later
    /// changes to the overlay do not affect it.
    pub fn cost_fn(&self, diagonal_cost: f32) -> impl Fn(&Point, &Point) -> f32 + 'static {
        let (blocked, width, height) = (self.blocked.clone(), self.width, self.height);
        move |from, to| step_cost(&blocked, width, height, from, to, diagonal_cost)
    }

    /// A validity predicate over a snapshot of the current mask.
    pub fn passable_fn(&self) -> impl Fn(&Point) -> bool + 'static {
        let (blocked, width, height) = (self.blocked.clone(), self.width, self.height);
        move |p| !blocked_at(&blocked, width, height, p)
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            debug!("Components are dirty: regenerating components");
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up adjacent valid cells.
    pub fn generate_components(&mut self) {
        self.components = UnionFind::new(self.width * self.height);
        self.components_dirty = false;
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let point = Point::new(x, y);
                if !self.is_valid(&point) {
                    continue;
                }
                let parent_ix = self.ix(&point);
                for (dx, dy) in FORWARD_OFFSETS {
                    let n = Point::new(x + dx, y + dy);
                    if self.is_valid(&n) {
                        let ix = self.ix(&n);
                        self.components.union(parent_ix, ix);
                    }
                }
            }
        }
    }

    /// Checks if `start` and `goal` are valid cells on the same component. Only exact when
    /// the components are not dirty.
    pub fn reachable(&self, start: &Point, goal: &Point) -> bool {
        self.is_valid(start)
            && self.is_valid(goal)
            && self.components.equiv(self.ix(start), self.ix(goal))
    }

    pub fn unreachable(&self, start: &Point, goal: &Point) -> bool {
        !self.reachable(start, goal)
    }
}

fn step_cost(
    blocked: &BoolGrid,
    width: usize,
    height: usize,
    from: &Point,
    to: &Point,
    diagonal_cost: f32,
) -> f32 {
    if blocked_at(blocked, width, height, to) {
        f32::INFINITY
    } else if from.x != to.x && from.y != to.y {
        diagonal_cost
    } else {
        CARDINAL_COST
    }
}

impl fmt::Display for ObstacleOverlay {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in (0..self.height as i32).rev() {
            let row = (0..self.width as i32)
                .map(|x| if self.is_valid(&Point::new(x, y)) { '.' } else { '#' })
                .collect::<String>();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}
