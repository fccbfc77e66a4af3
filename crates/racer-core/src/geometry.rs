use serde::{Deserialize, Serialize};

/// A cell on the track grid. Column `x`, row `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Key used by the audience map (`"x,y"`).
    pub fn key(&self) -> String {
        format!("{},{}", self.x, self.y)
    }

    /// Parse an audience map key back into a position.
    pub fn from_key(key: &str) -> Option<Self> {
        let (x, y) = key.split_once(',')?;
        Some(Self {
            x: x.trim().parse().ok()?,
            y: y.trim().parse().ok()?,
        })
    }

    pub fn offset(self, velocity: Velocity) -> Self {
        Self {
            x: self.x + velocity.vx,
            y: self.y + velocity.vy,
        }
    }

    /// Euclidean distance to an arbitrary (possibly fractional) point.
    pub fn distance_to(self, x: f64, y: f64) -> f64 {
        let dx = f64::from(self.x) - x;
        let dy = f64::from(self.y) - y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Per-turn displacement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Velocity {
    pub vx: i32,
    pub vy: i32,
}

impl Velocity {
    pub const ZERO: Self = Self::new(0, 0);

    pub const fn new(vx: i32, vy: i32) -> Self {
        Self { vx, vy }
    }

    /// Euclidean magnitude.
    pub fn speed(&self) -> f64 {
        f64::from(self.vx * self.vx + self.vy * self.vy).sqrt()
    }

    /// True when `other` differs by at most one unit on each axis.
    pub fn within_one_step_of(&self, other: Velocity) -> bool {
        (self.vx - other.vx).abs() <= 1 && (self.vy - other.vy).abs() <= 1
    }
}

/// A candidate next state for a car: target cell plus the velocity it would
/// carry afterwards. Serialized flat as `{x, y, vx, vy}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub x: i32,
    pub y: i32,
    pub vx: i32,
    pub vy: i32,
}

impl Move {
    pub const fn new(position: Position, velocity: Velocity) -> Self {
        Self {
            x: position.x,
            y: position.y,
            vx: velocity.vx,
            vy: velocity.vy,
        }
    }

    pub const fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub const fn velocity(&self) -> Velocity {
        Velocity::new(self.vx, self.vy)
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}) @ ({}, {})", self.x, self.y, self.vx, self.vy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_roundtrip() {
        let pos = Position::new(17, 20);
        assert_eq!(pos.key(), "17,20");
        assert_eq!(Position::from_key("17,20"), Some(pos));
    }

    #[test]
    fn from_key_rejects_garbage() {
        assert_eq!(Position::from_key("17"), None);
        assert_eq!(Position::from_key("a,b"), None);
        assert_eq!(Position::from_key(""), None);
    }

    #[test]
    fn offset_applies_velocity() {
        let pos = Position::new(5, 5).offset(Velocity::new(-2, 3));
        assert_eq!(pos, Position::new(3, 8));
    }

    #[test]
    fn velocity_step_check() {
        let v = Velocity::new(2, -1);
        assert!(v.within_one_step_of(Velocity::new(3, 0)));
        assert!(v.within_one_step_of(v));
        assert!(!v.within_one_step_of(Velocity::new(4, -1)));
    }

    #[test]
    fn speed_is_euclidean() {
        assert!((Velocity::new(3, 4).speed() - 5.0).abs() < f64::EPSILON);
        assert!(Velocity::ZERO.speed().abs() < f64::EPSILON);
    }

    #[test]
    fn move_serializes_flat() {
        let mv = Move::new(Position::new(4, 6), Velocity::new(-1, 1));
        let json = serde_json::to_value(mv).unwrap();
        assert_eq!(json, serde_json::json!({"x": 4, "y": 6, "vx": -1, "vy": 1}));
    }
}
