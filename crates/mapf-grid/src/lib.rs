//! `mapf-grid` — the shared weighted grid graph and single-agent search.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`grid`]   | `Grid` — dense 4-connected grid with a directed-edge weight layer |
//! | [`map`]    | `.map` / `.weights` text parsers                           |
//! | [`search`] | `DistanceField` (backward Dijkstra), oriented `astar_path` |
//! | [`error`]  | `GridError`, `GridResult<T>`                               |
//!
//! # Sharing model
//!
//! A `Grid` is built once from a map description and is immutable afterwards
//! (`set_weights` exists for callers that inject a cost layer *before*
//! planning starts).  Hand it out behind `Arc` to instances and solver runs;
//! nothing in this workspace takes mutable access after construction, which
//! is what makes unsynchronized sharing across concurrent runs sound.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.  |

pub mod error;
pub mod grid;
pub mod map;
pub mod search;


pub use error::{GridError, GridResult};
pub use grid::{Grid, CHANNELS, IMPASSABLE};
pub use search::{astar_path, DistanceField};
