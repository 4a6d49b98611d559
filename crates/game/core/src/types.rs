use std::fmt;

/// Discrete grid position expressed in tile coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another cell (the pathfinder heuristic).
    pub fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The four cardinal neighbors, in fixed N/S/W/E order.
    pub fn cardinal_neighbors(self) -> [Self; 4] {
        [
            Self::new(self.x, self.y - 1),
            Self::new(self.x, self.y + 1),
            Self::new(self.x - 1, self.y),
            Self::new(self.x + 1, self.y),
        ]
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Continuous sub-tile position used for smooth movement between cells.
///
/// Agents move through continuous space and are snapped to [`Position`] only
/// when the grid is queried (collision probes, pathfinding endpoints).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Self) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Unit vector in the same direction, or zero if the vector is zero.
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self::new(self.x / len, self.y / len)
        } else {
            Self::new(0.0, 0.0)
        }
    }

    /// Tile cell containing this point (truncation, matching grid queries).
    pub fn cell(self) -> Position {
        Position::new(self.x as i32, self.y as i32)
    }

    /// Nearest tile cell by rounding to the closest center.
    pub fn nearest_cell(self) -> Position {
        Position::new((self.x + 0.5) as i32, (self.y + 0.5) as i32)
    }
}

impl From<Position> for Vec2 {
    fn from(position: Position) -> Self {
        Self::new(position.x as f32, position.y as f32)
    }
}

/// The two sides of a pursuit match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize, strum::Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Role {
    Hunter,
    Survivor,
}

impl Role {
    /// The opposing role.
    pub fn opponent(self) -> Self {
        match self {
            Role::Hunter => Role::Survivor,
            Role::Survivor => Role::Hunter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_is_symmetric() {
        let a = Position::new(2, 3);
        let b = Position::new(-1, 7);
        assert_eq!(a.manhattan(b), 7);
        assert_eq!(b.manhattan(a), 7);
    }

    #[test]
    fn nearest_cell_rounds_to_closest_center() {
        assert_eq!(Vec2::new(3.4, 5.6).nearest_cell(), Position::new(3, 6));
        assert_eq!(Vec2::new(3.6, 5.4).nearest_cell(), Position::new(4, 5));
    }

    #[test]
    fn normalized_zero_vector_stays_zero() {
        let v = Vec2::new(0.0, 0.0).normalized();
        assert_eq!(v, Vec2::new(0.0, 0.0));
    }
}
