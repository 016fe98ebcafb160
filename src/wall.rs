//! Wall model: courses of bricks stacked bottom-to-top.
//!
//! The support relation is never stored. A brick's supporters are the bricks
//! of the course below whose half-open interval overlaps its own, computed
//! from geometry whenever it is asked for.

use serde::{Deserialize, Serialize};

use crate::error::{Result, WallError};

/// Position of a brick: course index and index within the course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BrickId {
    pub row: usize,
    pub index: usize,
}

impl BrickId {
    pub fn new(row: usize, index: usize) -> Self {
        Self { row, index }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brick {
    /// Left edge in modules from the wall origin
    pub offset: u32,
    /// Width in modules, 1..=4
    pub width: u32,
    pub placed: bool,
    /// Owning stride, set when the brick is placed
    pub stride: Option<usize>,
}

impl Brick {
    pub fn new(offset: u32, width: u32) -> Self {
        Self {
            offset,
            width,
            placed: false,
            stride: None,
        }
    }

    /// Right edge (exclusive)
    pub fn end(&self) -> u32 {
        self.offset + self.width
    }

    /// Does `[offset, end)` overlap `[start, end)`?
    pub fn overlaps(&self, start: u32, end: u32) -> bool {
        self.offset < end && start < self.end()
    }
}

/// One horizontal row of bricks spanning the full wall width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub row: usize,
    pub bricks: Vec<Brick>,
}

impl Course {
    /// Lay bricks of the given widths edge to edge from the wall origin.
    pub fn from_widths(row: usize, widths: &[u32]) -> Self {
        let mut offset = 0;
        let bricks = widths
            .iter()
            .map(|&width| {
                let brick = Brick::new(offset, width);
                offset += width;
                brick
            })
            .collect();
        Self { row, bricks }
    }

    pub fn span(&self) -> u32 {
        self.bricks.iter().map(|b| b.width).sum()
    }

    pub fn widths(&self) -> Vec<u32> {
        self.bricks.iter().map(|b| b.width).collect()
    }

    /// Positions of the vertical joints between bricks, wall edges excluded.
    pub fn joints(&self) -> impl Iterator<Item = u32> + '_ {
        let last = self.bricks.len().saturating_sub(1);
        self.bricks[..last].iter().map(Brick::end)
    }

    pub fn is_complete(&self) -> bool {
        self.bricks.iter().all(|b| b.placed)
    }
}

/// Courses stacked bottom-to-top, row 0 is the foundation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wall {
    span: u32,
    courses: Vec<Course>,
}

impl Wall {
    /// Assemble a wall from per-course brick widths, foundation first.
    pub fn from_course_widths(span: u32, rows: &[Vec<u32>]) -> Self {
        let courses = rows
            .iter()
            .enumerate()
            .map(|(row, widths)| Course::from_widths(row, widths))
            .collect();
        Self { span, courses }
    }

    /// Width of every course in modules
    pub fn span(&self) -> u32 {
        self.span
    }

    /// Number of courses
    pub fn height(&self) -> usize {
        self.courses.len()
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn brick(&self, id: BrickId) -> Option<&Brick> {
        self.courses.get(id.row)?.bricks.get(id.index)
    }

    pub fn total_bricks(&self) -> usize {
        self.courses.iter().map(|c| c.bricks.len()).sum()
    }

    pub fn placed_bricks(&self) -> usize {
        self.courses
            .iter()
            .flat_map(|c| &c.bricks)
            .filter(|b| b.placed)
            .count()
    }

    pub fn is_complete(&self) -> bool {
        self.courses.iter().all(Course::is_complete)
    }

    /// Every brick in row-major order: bottom course first, left to right.
    pub fn brick_ids(&self) -> impl Iterator<Item = BrickId> + '_ {
        self.courses.iter().enumerate().flat_map(|(row, course)| {
            (0..course.bricks.len()).map(move |index| BrickId::new(row, index))
        })
    }

    /// Bricks in the course below whose interval overlaps `id`'s interval.
    /// Foundation bricks have none.
    pub fn supporters(&self, id: BrickId) -> Vec<BrickId> {
        let Some(brick) = self.brick(id) else {
            return Vec::new();
        };
        if id.row == 0 {
            return Vec::new();
        }
        let below = &self.courses[id.row - 1];
        below
            .bricks
            .iter()
            .enumerate()
            .filter(|(_, b)| b.overlaps(brick.offset, brick.end()))
            .map(|(index, _)| BrickId::new(id.row - 1, index))
            .collect()
    }

    /// All supporters placed (always true for the foundation course).
    pub fn is_buildable(&self, id: BrickId) -> bool {
        self.supporters(id)
            .into_iter()
            .all(|s| self.brick(s).is_some_and(|b| b.placed))
    }

    /// Mark a brick placed and record its stride.
    ///
    /// Placement is one-way: an already placed brick keeps its flag and its
    /// stride.
    pub(crate) fn place(&mut self, id: BrickId, stride: usize) -> Result<()> {
        if !self.is_buildable(id) {
            return Err(WallError::SupportViolation {
                row: id.row,
                index: id.index,
            });
        }
        let brick = self
            .courses
            .get_mut(id.row)
            .and_then(|c| c.bricks.get_mut(id.index))
            .ok_or(WallError::SupportViolation {
                row: id.row,
                index: id.index,
            })?;
        brick.placed = true;
        brick.stride.get_or_insert(stride);
        Ok(())
    }

    pub fn snapshot(&self) -> WallSnapshot {
        WallSnapshot {
            bricks: self
                .courses
                .iter()
                .map(|course| course.bricks.iter().map(BrickSnapshot::from).collect())
                .collect(),
            is_complete: self.is_complete(),
        }
    }
}

// =============================================================================
// SNAPSHOTS
// =============================================================================

/// Wire view of a brick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrickSnapshot {
    pub placed: bool,
    pub width: u32,
    pub stride: Option<usize>,
}

impl From<&Brick> for BrickSnapshot {
    fn from(brick: &Brick) -> Self {
        Self {
            placed: brick.placed,
            width: brick.width,
            stride: brick.stride,
        }
    }
}

/// Wire view of the wall, rows bottom-to-top
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallSnapshot {
    pub bricks: Vec<Vec<BrickSnapshot>>,
    pub is_complete: bool,
}
