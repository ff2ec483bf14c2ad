//! Port implementations.
//!
//! - `live` talks to the real system clock, disk and HTTP collaborators.
//! - `recording` wraps live adapters and writes every interaction to a cassette.
//! - `replaying` serves interactions back from a cassette, for tests.

pub mod live;
pub mod recording;
pub mod replaying;
