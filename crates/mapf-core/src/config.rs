//! Planner configuration.
//!
//! The harness owns option parsing; the core honors the recognized surface
//! below.  `verbose` has no effect on computed results — it only selects how
//! much diagnostic narration the harness's `tracing` subscriber lets through.

use std::path::PathBuf;

/// Top-level planner configuration.
///
/// Typically assembled by the application and passed to graph construction,
/// instance generation, and solver construction.  Cheap to clone.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannerConfig {
    /// Path to the map description (without the `.map`/`.weights` suffix).
    pub map_path: PathBuf,

    /// Registered name of the solving strategy (e.g. `"PIBT"`).
    pub strategy: String,

    /// Diagnostic narration toggle.  Never affects plan data.
    pub verbose: bool,

    /// When `true`, traversal costs are loaded from the map's `.weights`
    /// sidecar; when `false` (or the sidecar is missing) every edge costs a
    /// uniform 1.0.
    pub with_weights: bool,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Maximum number of discrete timesteps a solver may plan before the run
    /// is declared failed.  This is the bound that guarantees termination
    /// regardless of solvability.
    pub max_timestep: u32,

    /// Maximum wall-clock computation budget in milliseconds.
    pub max_comp_time_ms: u64,

    /// Consecutive timesteps without any agent state change (while agents
    /// remain unarrived) after which a run is declared stalled and failed.
    pub stall_limit: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            map_path:         PathBuf::new(),
            strategy:         String::from("PIBT"),
            verbose:          false,
            with_weights:     true,
            seed:             42,
            max_timestep:     10_000,
            max_comp_time_ms: 1_000,
            stall_limit:      10,
        }
    }
}
