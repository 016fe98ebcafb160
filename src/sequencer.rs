//! Build sequencer: walks the global build order one brick per request.
//!
//! A sequencer is created by `init` (Active, or Complete for a wall without
//! bricks) and mutated only by `advance`. Once every brick is placed the
//! sequencer is Complete and `advance` keeps returning the same terminal
//! snapshot. The Uninitialized state is the absence of a sequencer; see
//! [`crate::session`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::bond;
use crate::config::{ReachEnvelope, WallConfig};
use crate::error::Result;
use crate::stride::{self, Stride, StrideBounds};
use crate::wall::{BrickId, Wall, WallSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SequencerState {
    Active,
    Complete,
}

/// Response of one advance: the wall and the active work envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceOutcome {
    pub wall: WallSnapshot,
    pub stride: StrideBounds,
}

/// Read-only summary of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildProgress {
    pub session_id: Uuid,
    pub config: WallConfig,
    pub state: SequencerState,
    pub placed: usize,
    pub total: usize,
    pub stride_count: usize,
    pub stride: StrideBounds,
    pub initialized_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct BuildSequencer {
    session_id: Uuid,
    config: WallConfig,
    reach: ReachEnvelope,
    wall: Wall,
    strides: Vec<Stride>,
    order: Vec<(BrickId, usize)>,
    cursor: usize,
    state: SequencerState,
    initialized_at: DateTime<Utc>,
}

impl BuildSequencer {
    /// Generate the wall, partition it and position the cursor on the first
    /// brick. Nothing is placed.
    pub fn init(config: WallConfig, reach: ReachEnvelope) -> Result<Self> {
        let wall = bond::generate(&config)?;
        let strides = stride::partition(&wall, config.mode, reach);
        let order = stride::build_order(&strides);
        let state = if order.is_empty() {
            SequencerState::Complete
        } else {
            SequencerState::Active
        };

        let sequencer = Self {
            session_id: Uuid::new_v4(),
            config,
            reach,
            wall,
            strides,
            order,
            cursor: 0,
            state,
            initialized_at: Utc::now(),
        };
        info!(
            session_id = %sequencer.session_id,
            width = config.width,
            height = config.height,
            bond = %config.bond,
            mode = %config.mode,
            bricks = sequencer.order.len(),
            strides = sequencer.strides.len(),
            "Initialized wall session"
        );
        Ok(sequencer)
    }

    /// A fresh session for the same configuration.
    pub fn reset(&self) -> Result<Self> {
        Self::init(self.config, self.reach)
    }

    /// Place the brick under the cursor.
    ///
    /// In the Complete state this is idempotent: nothing changes and the
    /// terminal snapshot is returned again.
    pub fn advance(&mut self) -> Result<AdvanceOutcome> {
        if self.state == SequencerState::Complete {
            debug!(session_id = %self.session_id, "Advance on complete wall");
            return Ok(self.outcome());
        }

        if let Some(&(id, stride)) = self.order.get(self.cursor) {
            if let Err(err) = self.wall.place(id, stride) {
                error!(
                    session_id = %self.session_id,
                    row = id.row,
                    index = id.index,
                    stride,
                    "Build order broke the support relation"
                );
                return Err(err);
            }

            let entered_stride = self.cursor == 0 || self.order[self.cursor - 1].1 != stride;
            if entered_stride {
                debug!(session_id = %self.session_id, stride, "Stride active");
            }
            debug!(row = id.row, index = id.index, stride, "Placed brick");
            self.cursor += 1;
        }

        if self.cursor >= self.order.len() {
            self.state = SequencerState::Complete;
            info!(
                session_id = %self.session_id,
                bricks = self.order.len(),
                "Wall complete"
            );
        }

        Ok(self.outcome())
    }

    pub fn snapshot(&self) -> WallSnapshot {
        self.wall.snapshot()
    }

    pub fn progress(&self) -> BuildProgress {
        BuildProgress {
            session_id: self.session_id,
            config: self.config,
            state: self.state,
            placed: self.cursor,
            total: self.order.len(),
            stride_count: self.strides.len(),
            stride: self.active_bounds(),
            initialized_at: self.initialized_at,
        }
    }

    /// The stride of the most recently placed brick, or of the next brick
    /// before anything is placed.
    pub fn active_stride(&self) -> Option<&Stride> {
        let position = self.cursor.saturating_sub(1);
        let (_, stride) = self.order.get(position)?;
        self.strides.get(*stride)
    }

    fn active_bounds(&self) -> StrideBounds {
        self.active_stride()
            .map(|s| s.bounds)
            .unwrap_or(StrideBounds {
                origin_x: 0,
                origin_y: 0,
                width: self.wall.span(),
                height: self.wall.height() as u32,
            })
    }

    fn outcome(&self) -> AdvanceOutcome {
        AdvanceOutcome {
            wall: self.snapshot(),
            stride: self.active_bounds(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn config(&self) -> &WallConfig {
        &self.config
    }

    pub fn wall(&self) -> &Wall {
        &self.wall
    }

    pub fn strides(&self) -> &[Stride] {
        &self.strides
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn total_bricks(&self) -> usize {
        self.order.len()
    }

    /// Bricks in the order they are placed, with their strides.
    pub fn build_order(&self) -> &[(BrickId, usize)] {
        &self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wall::BrickSnapshot;

    fn sequencer(width: i64, height: i64, mode: &str, bond: &str) -> BuildSequencer {
        let config = WallConfig::new(width, height, bond, mode).unwrap();
        BuildSequencer::init(config, ReachEnvelope::default()).unwrap()
    }

    #[test]
    fn test_init_places_nothing() {
        let seq = sequencer(4, 2, "left-to-right", "stretcher");
        let snapshot = seq.snapshot();
        assert!(!snapshot.is_complete);
        assert_eq!(snapshot.bricks.len(), 2);
        assert!(snapshot.bricks.iter().flatten().all(|b| !b.placed && b.stride.is_none()));
        assert_eq!(seq.state(), SequencerState::Active);
        assert_eq!(seq.total_bricks(), 5);
    }

    #[test]
    fn test_first_advance_places_foundation_brick() {
        let mut seq = sequencer(4, 2, "left-to-right", "stretcher");
        let outcome = seq.advance().unwrap();
        assert_eq!(
            outcome.wall.bricks[0][0],
            BrickSnapshot {
                placed: true,
                width: 4,
                stride: Some(0)
            }
        );
        assert!(!outcome.wall.bricks[0][1].placed);
        assert!(!outcome.wall.is_complete);
        assert_eq!(
            outcome.stride,
            StrideBounds {
                origin_x: 0,
                origin_y: 0,
                width: 8,
                height: 2
            }
        );
    }

    #[test]
    fn test_completion_is_idempotent() {
        let mut seq = sequencer(4, 2, "left-to-right", "stretcher");
        let mut last = None;
        for _ in 0..5 {
            last = Some(seq.advance().unwrap());
        }
        let last = last.unwrap();
        assert!(last.wall.is_complete);
        assert_eq!(seq.state(), SequencerState::Complete);

        let again = seq.advance().unwrap();
        assert_eq!(again, last);
        assert_eq!(seq.progress().placed, 5);
    }

    #[test]
    fn test_reset_starts_over_with_same_layout() {
        let mut seq = sequencer(9, 5, "optimal-strides", "wildverband");
        seq.advance().unwrap();
        seq.advance().unwrap();
        let fresh = seq.reset().unwrap();
        assert_eq!(fresh.progress().placed, 0);
        assert_ne!(fresh.session_id(), seq.session_id());
        assert_eq!(fresh.wall().courses().len(), seq.wall().courses().len());
        for (a, b) in fresh.wall().courses().iter().zip(seq.wall().courses()) {
            assert_eq!(a.widths(), b.widths());
        }
    }

    #[test]
    fn test_stride_tracks_active_envelope() {
        let config = WallConfig::new(10, 3, "stretcher", "optimal-strides").unwrap();
        let reach = ReachEnvelope::new(8, 3).unwrap();
        let mut seq = BuildSequencer::init(config, reach).unwrap();

        let first = seq.advance().unwrap();
        assert_eq!(first.stride.origin_x, 0);

        let mut seen = vec![first.stride];
        while seq.state() == SequencerState::Active {
            let outcome = seq.advance().unwrap();
            if seen.last() != Some(&outcome.stride) {
                seen.push(outcome.stride);
            }
        }
        let origins: Vec<u32> = seen.iter().map(|s| s.origin_x).collect();
        assert_eq!(origins, vec![0, 8, 16]);
    }

    #[test]
    fn test_progress_reports_counts() {
        let mut seq = sequencer(6, 3, "optimal-strides", "english");
        seq.advance().unwrap();
        let progress = seq.progress();
        assert_eq!(progress.placed, 1);
        assert_eq!(progress.total, seq.wall().total_bricks());
        assert_eq!(progress.state, SequencerState::Active);
        assert_eq!(progress.config.width, 6);
    }
}
