//! Automated brick wall construction.
//!
//! Given wall dimensions and a masonry bond, the crate generates a course by
//! course layout ([`bond`]), splits it into reach-sized work envelopes
//! ([`stride`]) and serves the bricks one at a time in an order that never
//! places a brick before the bricks it rests on ([`sequencer`]).
//!
//! ```text
//! WallConfig ─▶ bond::generate ─▶ Wall ─▶ stride::partition ─▶ BuildSequencer
//!                                                                    │
//!                                   api (axum) ◀── session ◀─────────┘
//! ```

pub mod api;
pub mod bond;
pub mod config;
pub mod error;
pub mod sequencer;
pub mod session;
pub mod stride;
pub mod wall;

pub use config::{Bond, BuildMode, ReachEnvelope, ServerConfig, WallConfig};
pub use error::{Result, WallError};
pub use sequencer::{AdvanceOutcome, BuildProgress, BuildSequencer, SequencerState};
pub use session::WallSession;
pub use stride::{Stride, StrideBounds};
pub use wall::{Brick, BrickId, BrickSnapshot, Course, Wall, WallSnapshot};
