//! Agent heading and state types shared across all planner crates.
//!
//! # Channel order
//!
//! The four headings are numbered to match the map format's weight channels:
//!
//! | Index | Heading | Cell delta |
//! |-------|---------|------------|
//! | 0     | North   | (0, +1)    |
//! | 1     | West    | (−1, 0)    |
//! | 2     | South   | (0, −1)    |
//! | 3     | East    | (+1, 0)    |
//!
//! Rotation is ±90° per step: `left()` advances the index by 1 (mod 4),
//! `right()` by 3 (mod 4).

use crate::error::{CoreError, CoreResult};
use crate::ids::VertexId;

// ── Orientation ───────────────────────────────────────────────────────────────

/// A 4-way heading for an agent that must turn to change direction.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Facing +y (channel 0).
    North,
    /// Facing −x (channel 1).
    West,
    /// Facing −y (channel 2).
    South,
    /// Facing +x (channel 3).
    East,
}

impl Orientation {
    /// All headings in channel order.
    pub const ALL: [Orientation; 4] = [
        Orientation::North,
        Orientation::West,
        Orientation::South,
        Orientation::East,
    ];

    /// The weight-channel index of this heading.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Orientation::North => 0,
            Orientation::West  => 1,
            Orientation::South => 2,
            Orientation::East  => 3,
        }
    }

    /// Inverse of [`index`](Self::index); rejects anything outside `0..4`.
    pub fn from_index(i: u8) -> CoreResult<Orientation> {
        match i {
            0 => Ok(Orientation::North),
            1 => Ok(Orientation::West),
            2 => Ok(Orientation::South),
            3 => Ok(Orientation::East),
            _ => Err(CoreError::InvalidOrientation(i)),
        }
    }

    /// The `(dx, dy)` cell offset one step in this heading covers.
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Orientation::North => (0, 1),
            Orientation::West  => (-1, 0),
            Orientation::South => (0, -1),
            Orientation::East  => (1, 0),
        }
    }

    /// The heading that covers the offset `(dx, dy)`, if it is a unit step.
    pub fn from_delta(dx: i32, dy: i32) -> Option<Orientation> {
        match (dx, dy) {
            (0, 1)  => Some(Orientation::North),
            (-1, 0) => Some(Orientation::West),
            (0, -1) => Some(Orientation::South),
            (1, 0)  => Some(Orientation::East),
            _       => None,
        }
    }

    /// Heading after one 90° counter-clockwise turn.
    #[inline]
    pub fn left(self) -> Orientation {
        Orientation::ALL[(self.index() + 1) % 4]
    }

    /// Heading after one 90° clockwise turn.
    #[inline]
    pub fn right(self) -> Orientation {
        Orientation::ALL[(self.index() + 3) % 4]
    }

    /// Number of 90° steps (0..4) separating `self` from `target`, measured
    /// counter-clockwise.  0 means already aligned; 1 or 2 means a left turn
    /// is the (joint-)shortest way round, 3 means a right turn.
    #[inline]
    pub fn steps_to(self, target: Orientation) -> u8 {
        ((target.index() + 4 - self.index()) % 4) as u8
    }

    /// Human-readable label, useful for log and CSV output.
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::North => "north",
            Orientation::West  => "west",
            Orientation::South => "south",
            Orientation::East  => "east",
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── AgentState ────────────────────────────────────────────────────────────────

/// An agent's position plus heading at one timestep.
///
/// `heading: None` models an omnidirectional agent (it may move to any
/// adjacent cell without turning); `Some(_)` models a vehicle that can only
/// advance into the cell it faces and spends a timestep per 90° turn.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentState {
    pub vertex:  VertexId,
    pub heading: Option<Orientation>,
}

impl AgentState {
    /// An omnidirectional state at `vertex`.
    #[inline]
    pub fn at(vertex: VertexId) -> Self {
        Self { vertex, heading: None }
    }

    /// An oriented state at `vertex` facing `heading`.
    #[inline]
    pub fn oriented(vertex: VertexId, heading: Orientation) -> Self {
        Self { vertex, heading: Some(heading) }
    }

    /// The same position with a different heading.
    #[inline]
    pub fn facing(self, heading: Orientation) -> Self {
        Self { vertex: self.vertex, heading: Some(heading) }
    }

    /// The same heading at a different vertex.
    #[inline]
    pub fn moved_to(self, vertex: VertexId) -> Self {
        Self { vertex, heading: self.heading }
    }
}

impl std::fmt::Display for AgentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.heading {
            Some(h) => write!(f, "({}, {})", self.vertex.0, h),
            None    => write!(f, "({}, -)", self.vertex.0),
        }
    }
}
