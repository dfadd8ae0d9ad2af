//! Rotation service: snapshot fetching, monthly computation and the
//! annual fan-out.
//!
//! The [`RotationService`] owns a [`SnapshotFetcher`](crate::fetcher::SnapshotFetcher)
//! and an [`EngineConfig`](crate::config::EngineConfig). It validates the
//! requested period, fetches the two snapshots a month needs under the
//! configured timeout, and hands them to the pure calculation functions.

mod rotation;

pub use rotation::RotationService;
