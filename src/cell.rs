use core::fmt;
use core::hash::{Hash, Hasher};
use core::ops::{Add, Div, Mul, Sub};
use grid_util::point::Point;

/// A position or extent in continuous world space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const ONE: Vec2 = Vec2 { x: 1.0, y: 1.0 };

    pub const fn new(x: f32, y: f32) -> Vec2 {
        Vec2 { x, y }
    }
    pub fn floor(self) -> Vec2 {
        Vec2::new(self.x.floor(), self.y.floor())
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Component-wise product.
impl Mul for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x * rhs.x, self.y * rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Component-wise quotient.
impl Div for Vec2 {
    type Output = Vec2;
    fn div(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x / rhs.x, self.y / rhs.y)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A single grid cell. Identity is the integer coordinate alone: two cells with the same
/// coordinate compare and hash equal even if their cached world positions differ.
#[derive(Clone, Copy, Debug)]
pub struct Cell {
    pub coord: Point,
    pub world: Vec2,
}

impl Cell {
    pub fn new(coord: Point, world: Vec2) -> Cell {
        Cell { coord, world }
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.coord == other.coord
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.coord.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fxhash::FxHashSet;

    #[test]
    fn identity_ignores_world_position() {
        let a = Cell::new(Point::new(2, 3), Vec2::new(0.0, 0.0));
        let b = Cell::new(Point::new(2, 3), Vec2::new(10.0, -4.0));
        let c = Cell::new(Point::new(3, 2), Vec2::new(0.0, 0.0));
        assert_eq!(a, b);
        assert_ne!(a, c);
        let set: FxHashSet<Cell> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn vector_arithmetic() {
        let v = Vec2::new(1.5, -2.0) * Vec2::new(2.0, 0.5) + Vec2::ONE;
        assert_eq!(v, Vec2::new(4.0, 0.0));
        assert_eq!((v - Vec2::new(0.5, 0.5)).floor(), Vec2::new(3.0, -1.0));
        assert_eq!(Vec2::new(3.0, 9.0) / Vec2::new(3.0, 3.0), Vec2::new(1.0, 3.0));
    }
}
