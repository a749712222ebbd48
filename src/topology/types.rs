use serde::{Deserialize, Serialize};

/// An unordered edge between two distinct nodes.
///
/// Endpoints are stored in lexicographic order so that `Connection::new(a, b)`
/// and `Connection::new(b, a)` compare and hash identically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Connection {
    a: String,
    b: String,
}

impl Connection {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        let (x, y) = (x.into(), y.into());
        if x <= y {
            Self { a: x, b: y }
        } else {
            Self { a: y, b: x }
        }
    }

    pub fn endpoints(&self) -> (&str, &str) {
        (&self.a, &self.b)
    }

    pub fn touches(&self, name: &str) -> bool {
        self.a == name || self.b == name
    }
}

/// A 2-D layout position. Only a hint for visualization; positions carry no
/// semantics beyond connected nodes ending up closer together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f64 {
        let (dx, dy) = (self.x - other.x, self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }
}
