//! Wildverband: a wild bond with pseudo-random brick widths.
//!
//! Each course is assembled left to right from {half, three-quarter, whole}
//! widths in seeded random order. A vertical joint may line up across at most
//! two consecutive courses. When no width fits at some position the search
//! backs up one brick and tries that brick's next untried width; the search
//! state is an explicit stack of frames, one per brick.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::trace;

use super::{HALF, THREE_QUARTER, WHOLE};
use crate::error::{Result, WallError};

/// Widths a brick may take when it does not close the course.
const INTERIOR_WIDTHS: [u32; 3] = [HALF, THREE_QUARTER, WHOLE];

/// Largest brick that may close a course.
const MAX_CLOSER: u32 = WHOLE;

/// How many consecutive courses may share a joint position.
const MAX_ALIGNED_COURSES: usize = 2;

pub struct WildverbandGenerator {
    rng: ChaCha8Rng,
}

/// One brick of the course under construction.
#[derive(Debug)]
struct Frame {
    position: u32,
    candidates: Vec<u32>,
    next: usize,
    chosen: u32,
}

impl Frame {
    fn next_candidate(&mut self) -> Option<u32> {
        let width = *self.candidates.get(self.next)?;
        self.next += 1;
        self.chosen = width;
        Some(width)
    }
}

impl WildverbandGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn generate(&mut self, span: u32, height: usize) -> Result<Vec<Vec<u32>>> {
        let mut rows: Vec<Vec<u32>> = Vec::with_capacity(height);
        for row in 0..height {
            let course = self.course(row, span, &rows)?;
            rows.push(course);
        }
        Ok(rows)
    }

    fn course(&mut self, row: usize, span: u32, below: &[Vec<u32>]) -> Result<Vec<u32>> {
        if span == 0 {
            return Ok(Vec::new());
        }

        let blocked = blocked_joints(below);
        let mut backtracks = 0usize;
        let mut stack = vec![self.frame(0, span)];

        loop {
            let Some(frame) = stack.last_mut() else {
                return Err(WallError::UnsatisfiableBond { course: row, span });
            };

            let Some(width) = frame.next_candidate() else {
                stack.pop();
                backtracks += 1;
                continue;
            };

            let end = frame.position + width;
            if end == span {
                trace!(row, backtracks, "Closed wild course");
                return Ok(stack.iter().map(|f| f.chosen).collect());
            }
            if blocked.contains(&end) {
                continue;
            }
            let next = self.frame(end, span);
            stack.push(next);
        }
    }

    /// Widths that fit at `position`, shuffled.
    ///
    /// Interior widths must leave a remainder; the remainder itself is a
    /// candidate when it is small enough to close the course.
    fn frame(&mut self, position: u32, span: u32) -> Frame {
        let remaining = span - position;
        let mut candidates: Vec<u32> = INTERIOR_WIDTHS
            .into_iter()
            .filter(|w| *w < remaining)
            .collect();
        if remaining <= MAX_CLOSER {
            candidates.push(remaining);
        }
        candidates.shuffle(&mut self.rng);
        Frame {
            position,
            candidates,
            next: 0,
            chosen: 0,
        }
    }
}

/// Joint positions shared by the last `MAX_ALIGNED_COURSES` courses.
///
/// A joint at one of these positions would line up over too many courses.
pub(crate) fn blocked_joints(below: &[Vec<u32>]) -> HashSet<u32> {
    if below.len() < MAX_ALIGNED_COURSES {
        return HashSet::new();
    }

    let mut recent = below[below.len() - MAX_ALIGNED_COURSES..].iter();
    let mut blocked = recent.next().map(|w| joints(w)).unwrap_or_default();
    for widths in recent {
        let other = joints(widths);
        blocked.retain(|j| other.contains(j));
    }
    blocked
}

fn joints(widths: &[u32]) -> HashSet<u32> {
    let last = widths.len().saturating_sub(1);
    widths[..last]
        .iter()
        .scan(0, |edge, w| {
            *edge += w;
            Some(*edge)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joint_list(widths: &[u32]) -> Vec<u32> {
        let mut list: Vec<u32> = joints(widths).into_iter().collect();
        list.sort_unstable();
        list
    }

    #[test]
    fn test_joints_exclude_wall_edges() {
        assert_eq!(joint_list(&[4, 2, 4]), vec![4, 6]);
        assert!(joint_list(&[4]).is_empty());
    }

    #[test]
    fn test_blocked_joints_need_two_courses() {
        assert!(blocked_joints(&[vec![4, 4]]).is_empty());
        let blocked = blocked_joints(&[vec![4, 4, 4], vec![2, 2, 4, 4]]);
        assert_eq!(blocked, HashSet::from([4, 8]));
    }

    #[test]
    fn test_no_joint_spans_three_courses() {
        let rows = WildverbandGenerator::new(7).generate(40, 30).unwrap();
        for window in rows.windows(3) {
            let a = joints(&window[0]);
            let b = joints(&window[1]);
            let c = joints(&window[2]);
            assert!(
                a.intersection(&b).all(|j| !c.contains(j)),
                "aligned joint in {window:?}"
            );
        }
    }

    #[test]
    fn test_interior_widths_and_sum() {
        let rows = WildverbandGenerator::new(99).generate(25, 12).unwrap();
        for widths in &rows {
            assert_eq!(widths.iter().sum::<u32>(), 25);
            let (_, interior) = widths.split_last().unwrap();
            assert!(interior.iter().all(|w| INTERIOR_WIDTHS.contains(w)));
            assert!(widths.iter().all(|w| (1..=4).contains(w)));
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = WildverbandGenerator::new(1234).generate(36, 10).unwrap();
        let b = WildverbandGenerator::new(1234).generate(36, 10).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_exhausted_search_is_unsatisfiable() {
        // Every interior width from the wall origin lands on a blocked joint
        let below = vec![vec![2, 1, 1, 1], vec![2, 1, 1, 1]];
        let mut generator = WildverbandGenerator::new(5);
        let err = generator.course(2, 5, &below).unwrap_err();
        assert_eq!(err, WallError::UnsatisfiableBond { course: 2, span: 5 });
    }

    #[test]
    fn test_closes_narrow_course() {
        let mut generator = WildverbandGenerator::new(3);
        assert_eq!(generator.course(0, 2, &[]).unwrap(), vec![2]);
        assert_eq!(generator.course(0, 1, &[]).unwrap(), vec![1]);
    }
}
