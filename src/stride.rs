//! Stride partitioning
//!
//! A stride is a rectangular work envelope the builder completes without
//! repositioning. Strides tile the wall rectangle; every brick is owned by
//! exactly one stride and the concatenation of the strides' build orders, in
//! partition order, never places a brick before its supporters.
//!
//! ## Ownership in optimal-strides mode
//!
//! Bricks do not respect stride borders, so a brick near the right edge of a
//! stride may rest on a brick that starts in the next stride of the same band.
//! Each brick is first given the stride whose column contains its left edge
//! and is then promoted to the latest stride owning any of its supporters in
//! the same band. Supporters in lower bands always belong to earlier strides.
//!
//! Promotion cascades: a brick straddling a column border pulls the brick
//! above it into the later stride, and in running bonds that chain walks
//! back across the whole column one course at a time. A stride therefore
//! owns every brick inside its rectangle that was not claimed earlier, plus
//! promoted bricks that may lie entirely outside it. The envelope reported
//! while such a brick is placed does not contain the brick.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{BuildMode, ReachEnvelope};
use crate::wall::{BrickId, Wall};

/// Rectangle of a stride: modules horizontally, courses vertically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StrideBounds {
    pub origin_x: u32,
    pub origin_y: u32,
    pub width: u32,
    pub height: u32,
}

impl StrideBounds {
    pub fn overlaps(&self, other: &StrideBounds) -> bool {
        self.origin_x < other.origin_x + other.width
            && other.origin_x < self.origin_x + self.width
            && self.origin_y < other.origin_y + other.height
            && other.origin_y < self.origin_y + self.height
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stride {
    /// Position in partition order
    pub id: usize,
    pub bounds: StrideBounds,
    /// Owned bricks in build order: bottom-to-top, left-to-right
    pub bricks: Vec<BrickId>,
}

impl Stride {
    fn new(id: usize, origin_x: u32, origin_y: u32, width: u32, height: u32) -> Self {
        Self {
            id,
            bounds: StrideBounds {
                origin_x,
                origin_y,
                width,
                height,
            },
            bricks: Vec::new(),
        }
    }
}

/// Split the wall into strides, in the order they become active.
pub fn partition(wall: &Wall, mode: BuildMode, reach: ReachEnvelope) -> Vec<Stride> {
    let strides = match mode {
        BuildMode::LeftToRight => left_to_right(wall),
        BuildMode::OptimalStrides => optimal_strides(wall, reach),
    };

    debug!(
        %mode,
        strides = strides.len(),
        reach_width = reach.width(),
        reach_height = reach.height(),
        "Partitioned wall"
    );
    debug_assert!(
        verify_build_order(wall, &build_order(&strides)),
        "stride order breaks the support relation"
    );
    strides
}

/// One stride covering the whole wall, bricks in row-major order.
fn left_to_right(wall: &Wall) -> Vec<Stride> {
    let mut stride = Stride::new(0, 0, 0, wall.span(), wall.height() as u32);
    stride.bricks = wall.brick_ids().collect();
    vec![stride]
}

/// Tile the wall band by band with reach-sized rectangles, clipping the
/// last column and the top band to the wall.
fn optimal_strides(wall: &Wall, reach: ReachEnvelope) -> Vec<Stride> {
    let span = wall.span();
    let height = wall.height() as u32;
    let mut strides: Vec<Stride> = Vec::new();

    for band_y in (0..height).step_by(reach.height() as usize) {
        let band_height = reach.height().min(height - band_y);
        let first = strides.len();
        for x in (0..span).step_by(reach.width() as usize) {
            let id = strides.len();
            strides.push(Stride::new(id, x, band_y, reach.width().min(span - x), band_height));
        }

        let mut owner: HashMap<BrickId, usize> = HashMap::new();
        for row in band_y as usize..(band_y + band_height) as usize {
            for (index, brick) in wall.courses()[row].bricks.iter().enumerate() {
                let id = BrickId::new(row, index);
                let home = first + (brick.offset / reach.width()) as usize;
                let stride = wall
                    .supporters(id)
                    .iter()
                    .filter_map(|s| owner.get(s).copied())
                    .fold(home, usize::max);
                owner.insert(id, stride);
                strides[stride].bricks.push(id);
            }
        }
    }

    strides
}

/// Global build order: each brick paired with its owning stride.
pub fn build_order(strides: &[Stride]) -> Vec<(BrickId, usize)> {
    strides
        .iter()
        .flat_map(|stride| stride.bricks.iter().map(move |id| (*id, stride.id)))
        .collect()
}

/// Check that `order` places every brick exactly once and only after all of
/// its supporters.
pub fn verify_build_order(wall: &Wall, order: &[(BrickId, usize)]) -> bool {
    let mut placed: HashSet<BrickId> = HashSet::with_capacity(order.len());
    for (id, _) in order {
        if wall.brick(*id).is_none() {
            return false;
        }
        if !wall.supporters(*id).iter().all(|s| placed.contains(s)) {
            return false;
        }
        if !placed.insert(*id) {
            return false;
        }
    }
    placed.len() == wall.total_bricks()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bond::generate;
    use crate::config::WallConfig;

    fn wall(width: i64, height: i64, bond: &str) -> Wall {
        generate(&WallConfig::new(width, height, bond, "optimal-strides").unwrap()).unwrap()
    }

    #[test]
    fn test_left_to_right_is_one_stride() {
        let wall = wall(4, 2, "stretcher");
        let strides = partition(&wall, BuildMode::LeftToRight, ReachEnvelope::default());
        assert_eq!(strides.len(), 1);
        assert_eq!(
            strides[0].bounds,
            StrideBounds {
                origin_x: 0,
                origin_y: 0,
                width: 8,
                height: 2
            }
        );
        let order: Vec<BrickId> = strides[0].bricks.clone();
        assert_eq!(
            order,
            vec![
                BrickId::new(0, 0),
                BrickId::new(0, 1),
                BrickId::new(1, 0),
                BrickId::new(1, 1),
                BrickId::new(1, 2),
            ]
        );
    }

    #[test]
    fn test_optimal_strides_clip_to_wall() {
        // 40 modules x 25 courses with a 14 x 19 reach
        let wall = wall(20, 25, "stretcher");
        let strides = partition(&wall, BuildMode::OptimalStrides, ReachEnvelope::default());
        let bounds: Vec<(u32, u32, u32, u32)> = strides
            .iter()
            .map(|s| (s.bounds.origin_x, s.bounds.origin_y, s.bounds.width, s.bounds.height))
            .collect();
        assert_eq!(
            bounds,
            vec![
                (0, 0, 14, 19),
                (14, 0, 14, 19),
                (28, 0, 12, 19),
                (0, 19, 14, 6),
                (14, 19, 14, 6),
                (28, 19, 12, 6),
            ]
        );
        assert!(strides.iter().enumerate().all(|(i, s)| s.id == i));
    }

    #[test]
    fn test_strides_tile_the_wall() {
        let wall = wall(17, 11, "flemish");
        let reach = ReachEnvelope::new(6, 4).unwrap();
        let strides = partition(&wall, BuildMode::OptimalStrides, reach);

        let total: u64 = strides.iter().map(|s| s.bounds.area()).sum();
        assert_eq!(total, wall.span() as u64 * wall.height() as u64);
        for (i, a) in strides.iter().enumerate() {
            assert!(a.bounds.width <= reach.width() && a.bounds.height <= reach.height());
            for b in &strides[i + 1..] {
                assert!(!a.bounds.overlaps(&b.bounds), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn test_every_brick_owned_once_and_order_valid() {
        for bond in ["stretcher", "flemish", "english", "wildverband"] {
            let wall = wall(23, 13, bond);
            let reach = ReachEnvelope::new(7, 5).unwrap();
            let strides = partition(&wall, BuildMode::OptimalStrides, reach);
            let order = build_order(&strides);
            assert_eq!(order.len(), wall.total_bricks());
            assert!(verify_build_order(&wall, &order), "{bond}");
        }
    }

    #[test]
    fn test_brick_promoted_to_supporting_stride() {
        // Course 1 brick [12, 16) starts in stride 0 but rests on [14, 18),
        // which starts in stride 1.
        let wall = Wall::from_course_widths(20, &[vec![4, 4, 4, 2, 4, 2], vec![4, 4, 4, 4, 4]]);
        let reach = ReachEnvelope::new(14, 2).unwrap();
        let strides = partition(&wall, BuildMode::OptimalStrides, reach);
        assert_eq!(strides.len(), 2);
        assert!(strides[1].bricks.contains(&BrickId::new(1, 3)));
        assert!(verify_build_order(&wall, &build_order(&strides)));
    }

    #[test]
    fn test_promotion_cascades_outside_stride_rectangle() {
        // 40 modules x 19 courses: one band, strides [0,14) [14,28) [28,40)
        let wall = wall(20, 19, "stretcher");
        let strides = partition(&wall, BuildMode::OptimalStrides, ReachEnvelope::default());
        assert_eq!(strides.len(), 3);

        // Course 6 brick [4,8) rests on a chain of straddling bricks
        let id = BrickId::new(6, 1);
        let brick = wall.brick(id).unwrap();
        assert_eq!((brick.offset, brick.end()), (4, 8));
        assert!(strides[1].bricks.contains(&id));
        assert!(brick.end() <= strides[1].bounds.origin_x);

        // Foundation bricks are never promoted
        for stride in &strides {
            for id in stride.bricks.iter().filter(|id| id.row == 0) {
                let brick = wall.brick(*id).unwrap();
                let column = brick.offset / ReachEnvelope::default().width();
                assert_eq!(column as usize, stride.id);
            }
        }
        assert!(verify_build_order(&wall, &build_order(&strides)));
    }

    #[test]
    fn test_smallest_reach_gives_one_stride_per_cell() {
        let wall = wall(2, 3, "english");
        let reach = ReachEnvelope::new(1, 1).unwrap();
        assert_eq!((reach.width(), reach.height()), (1, 1));
        let strides = partition(&wall, BuildMode::OptimalStrides, reach);
        assert_eq!(strides.len(), 4 * 3);
        assert!(verify_build_order(&wall, &build_order(&strides)));
    }

    #[test]
    fn test_verify_rejects_unsupported_order() {
        let wall = Wall::from_course_widths(8, &[vec![4, 4], vec![2, 4, 2]]);
        let bad = vec![
            (BrickId::new(0, 0), 0),
            (BrickId::new(1, 1), 0),
            (BrickId::new(0, 1), 0),
            (BrickId::new(1, 0), 0),
            (BrickId::new(1, 2), 0),
        ];
        assert!(!verify_build_order(&wall, &bad));

        let missing = vec![(BrickId::new(0, 0), 0), (BrickId::new(0, 1), 0)];
        assert!(!verify_build_order(&wall, &missing));
    }
}
