//! The probe abstraction shared by every monitor (port, process, filesystem).
//!
//! A probe is a pure sample/diff/classify pipeline: [`Probe::sample`] takes a
//! point-in-time [`Probe::Observation`] of the world, [`Probe::diff`] compares
//! two observations into a list of [`Probe::Delta`]s, and [`Probe::classify`]
//! turns a delta into an [`Alert`]. The sampler loop owns the cadence and the
//! previous-observation state; probes never call each other or hold onto a
//! clock of their own.

use crate::alert::Alert;
use crate::error::Result;

pub trait Probe {
    /// Point-in-time snapshot produced by [`Probe::sample`].
    type Observation: Clone;
    /// A single detected change between two observations.
    type Delta;

    /// Stable identifier used as [`Alert::source`] and in log output.
    fn name(&self) -> &'static str;

    /// Take a fresh observation of the probe's subsystem.
    fn sample(&mut self) -> Result<Self::Observation>;

    /// Compute the deltas between a previous and current observation.
    ///
    /// Called with `previous = None` on a probe's first cycle; probes must
    /// not emit deltas purely from the absence of a baseline.
    fn diff(&self, previous: Option<&Self::Observation>, current: &Self::Observation) -> Vec<Self::Delta>;

    /// Classify a single delta into a publishable alert.
    fn classify(&self, delta: &Self::Delta) -> Alert;
}
