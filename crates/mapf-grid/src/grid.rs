//! The shared grid graph.
//!
//! # Data layout
//!
//! Cells are stored row-major: `VertexId = y * width + x`.  The vertex space
//! is dense — obstacle cells keep their IDs but are marked impassable — so
//! every per-vertex table in the workspace is a flat `Vec` indexed by
//! `VertexId::index()` with no hashing on hot paths.
//!
//! # Cost model
//!
//! Traversal cost is **per directed edge**, stored as one `f32` per
//! (source vertex, outgoing channel) pair in a flat `width * height * 4`
//! array.  Channel order is [`Orientation::ALL`]: +y, −x, −y, +x.
//! Nonexistent edges hold [`IMPASSABLE`].  The layer is always materialized:
//! uniform 1.0 when no cost layer is loaded, so weight lookup is O(1) and
//! total in both modes.

use mapf_core::{AgentState, Orientation, VertexId};
use tracing::debug;

use crate::error::{GridError, GridResult};
use crate::map::{self, MapDescription};

/// Number of weight channels per vertex — one per heading.
pub const CHANNELS: usize = 4;

/// Weight of a nonexistent or blocked directed edge.
pub const IMPASSABLE: f32 = f32::INFINITY;

/// Immutable weighted 4-connected grid.
///
/// Build with [`Grid::parse`] or [`Grid::load`]; share behind `Arc`.
#[derive(Debug)]
pub struct Grid {
    width:        u16,
    height:       u16,
    /// `true` for traversable cells.  Indexed by `VertexId`.
    passable:     Vec<bool>,
    /// Count of traversable cells (cached — `passable` never changes).
    vertex_count: usize,
    /// Directed-edge weights, `vertex * CHANNELS + channel`.
    weights:      Vec<f32>,
}

impl Grid {
    // ── Construction ──────────────────────────────────────────────────────

    /// Parse a map description with uniform edge costs.
    ///
    /// Format (MovingAI-style): `height H` and `width W` header lines in any
    /// order (unrecognized lines are ignored), a line reading `map`, then
    /// exactly `H` rows of `W` characters.  `@` and `T` are obstacles; any
    /// other character is traversable.
    pub fn parse(text: &str) -> GridResult<Grid> {
        let desc = map::parse_map(text)?;
        Ok(Grid::from_description(desc))
    }

    /// Load a map from `<map_path>.map`, optionally applying the cost layer
    /// from `<map_path>.weights`.
    ///
    /// When `with_weights` is `true` but the sidecar file does not exist,
    /// the grid falls back to uniform costs (with a diagnostic) rather than
    /// failing — maps without a tuned cost layer are common.
    pub fn load(map_path: &std::path::Path, with_weights: bool) -> GridResult<Grid> {
        let map_file = map_path.with_extension("map");
        let text = std::fs::read_to_string(&map_file)?;
        let mut grid = Grid::parse(&text)?;

        if with_weights {
            let weights_file = map_path.with_extension("weights");
            match std::fs::read_to_string(&weights_file) {
                Ok(layer) => grid.apply_weight_layer(&layer)?,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    debug!(
                        file = %weights_file.display(),
                        "weight layer not found; keeping uniform costs"
                    );
                }
                Err(e) => return Err(GridError::Io(e)),
            }
        }

        debug!(
            width = grid.width,
            height = grid.height,
            vertices = grid.vertex_count,
            "grid built"
        );
        Ok(grid)
    }

    fn from_description(desc: MapDescription) -> Grid {
        let MapDescription { width, height, passable } = desc;
        let size = width as usize * height as usize;

        // Uniform layer: 1.0 wherever both endpoints exist, IMPASSABLE else.
        let mut weights = vec![IMPASSABLE; size * CHANNELS];
        for v in 0..size {
            if !passable[v] {
                continue;
            }
            let (x, y) = (v % width as usize, v / width as usize);
            for dir in Orientation::ALL {
                let (dx, dy) = dir.delta();
                let (nx, ny) = (x as i32 + dx, y as i32 + dy);
                if in_bounds(nx, ny, width, height)
                    && passable[ny as usize * width as usize + nx as usize]
                {
                    weights[v * CHANNELS + dir.index()] = 1.0;
                }
            }
        }

        let vertex_count = passable.iter().filter(|&&p| p).count();
        Grid { width, height, passable, vertex_count, weights }
    }

    /// Replace the weight layer from a `.weights` text body.
    ///
    /// The layer must agree with the map's dimensions and carry exactly
    /// [`CHANNELS`] channels; rows for obstacle cells are ignored and
    /// negative weights mark a directed edge impassable.
    pub fn apply_weight_layer(&mut self, text: &str) -> GridResult<()> {
        let weights = map::parse_weights(text, self.width, self.height, &self.passable)?;
        self.weights = weights;
        Ok(())
    }

    /// Replace the weight layer from a raw flat vector
    /// (`vertex * CHANNELS + channel` order).
    ///
    /// Fails when the length is not `width * height * 4` — the only channel
    /// count this grid supports.
    pub fn set_weights(&mut self, weights: Vec<f32>) -> GridResult<()> {
        let size = self.size();
        if weights.len() % size != 0 {
            return Err(GridError::MalformedWeights(format!(
                "layer length {} is not a multiple of map size {size}",
                weights.len()
            )));
        }
        let channels = weights.len() / size;
        if channels != CHANNELS {
            return Err(GridError::MalformedWeights(format!(
                "{channels} channels unsupported (expected {CHANNELS})"
            )));
        }
        self.weights = weights;
        Ok(())
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Total cell count (obstacles included) — the size of the vertex ID space.
    #[inline]
    pub fn size(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Number of traversable cells.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    // ── Vertex queries ────────────────────────────────────────────────────

    /// `true` when `(x, y)` is in bounds and traversable.
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        in_bounds(x, y, self.width, self.height)
            && self.passable[y as usize * self.width as usize + x as usize]
    }

    /// The vertex at `(x, y)`, or `None` for out-of-bounds/obstacle cells.
    #[inline]
    pub fn vertex_at(&self, x: i32, y: i32) -> Option<VertexId> {
        if self.contains(x, y) {
            Some(VertexId((y as u32) * self.width as u32 + x as u32))
        } else {
            None
        }
    }

    /// `true` when `v` names a traversable cell.
    #[inline]
    pub fn is_vertex(&self, v: VertexId) -> bool {
        v.index() < self.passable.len() && self.passable[v.index()]
    }

    /// The `(x, y)` cell coordinates of `v`.
    #[inline]
    pub fn pos(&self, v: VertexId) -> (u16, u16) {
        let w = self.width as u32;
        ((v.0 % w) as u16, (v.0 / w) as u16)
    }

    /// Manhattan distance between two vertices, ignoring obstacles — the
    /// admissible heuristic used by [`astar_path`](crate::astar_path).
    #[inline]
    pub fn manhattan(&self, u: VertexId, v: VertexId) -> u32 {
        let (ux, uy) = self.pos(u);
        let (vx, vy) = self.pos(v);
        ux.abs_diff(vx) as u32 + uy.abs_diff(vy) as u32
    }

    // ── Adjacency and weights ─────────────────────────────────────────────

    /// Structural 4-neighborhood of `v`: every adjacent traversable cell,
    /// regardless of the weight layer.  Used by plan validation, which
    /// checks geometry rather than cost.
    pub fn adjacent(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        let (x, y) = self.pos(v);
        Orientation::ALL.into_iter().filter_map(move |dir| {
            let (dx, dy) = dir.delta();
            self.vertex_at(x as i32 + dx, y as i32 + dy)
        })
    }

    /// Traversable out-edges of `v`: each reachable neighbor tagged with the
    /// heading required to enter it and the traversal cost.  Edges the
    /// weight layer marks impassable are skipped.
    pub fn neighbors(
        &self,
        v: VertexId,
    ) -> impl Iterator<Item = (Orientation, VertexId, f32)> + '_ {
        let (x, y) = self.pos(v);
        Orientation::ALL.into_iter().filter_map(move |dir| {
            let (dx, dy) = dir.delta();
            let target = self.vertex_at(x as i32 + dx, y as i32 + dy)?;
            let w = self.weight(v, dir);
            (w < IMPASSABLE).then_some((dir, target, w))
        })
    }

    /// O(1) lookup of the cost of leaving `v` in direction `dir`.
    #[inline]
    pub fn weight(&self, v: VertexId, dir: Orientation) -> f32 {
        self.weights[v.index() * CHANNELS + dir.index()]
    }

    /// Cost of the directed edge `u → v`, or `None` when the cells are not
    /// adjacent.  An adjacent-but-blocked edge reports [`IMPASSABLE`].
    pub fn edge_weight(&self, u: VertexId, v: VertexId) -> Option<f32> {
        let (ux, uy) = self.pos(u);
        let (vx, vy) = self.pos(v);
        let dir = Orientation::from_delta(vx as i32 - ux as i32, vy as i32 - uy as i32)?;
        Some(self.weight(u, dir))
    }

    /// The raw weight layer (`vertex * CHANNELS + channel` order).
    #[inline]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    // ── Oriented expansion ────────────────────────────────────────────────

    /// States reachable from `s` in one timestep, not counting "stay".
    ///
    /// An omnidirectional state expands to every adjacent traversable cell;
    /// an oriented state expands to the faced cell (when the edge is
    /// traversable) plus a left and a right rotation in place.
    pub fn successors(&self, s: AgentState) -> Vec<AgentState> {
        let mut out = Vec::with_capacity(4);
        match s.heading {
            None => {
                for (_, target, _) in self.neighbors(s.vertex) {
                    out.push(AgentState::at(target));
                }
            }
            Some(h) => {
                let (x, y) = self.pos(s.vertex);
                let (dx, dy) = h.delta();
                if let Some(target) = self.vertex_at(x as i32 + dx, y as i32 + dy) {
                    if self.weight(s.vertex, h) < IMPASSABLE {
                        out.push(AgentState::oriented(target, h));
                    }
                }
                out.push(s.facing(h.left()));
                out.push(s.facing(h.right()));
            }
        }
        out
    }
}

#[inline]
fn in_bounds(x: i32, y: i32, width: u16, height: u16) -> bool {
    0 <= x && x < width as i32 && 0 <= y && y < height as i32
}
