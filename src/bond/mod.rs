//! Bond pattern generation
//!
//! Turns `(width, height, bond)` into courses of typed bricks. Widths are in
//! modules (quarter bricks): 1 quarter, 2 half/header, 3 three-quarter,
//! 4 whole/stretcher. Every course sums exactly to the wall span.
//!
//! - `stretcher` - whole bricks, odd courses shifted by half a brick
//! - `flemish` - whole/header pairs, odd courses open with a queen closer
//! - `english` - stretcher courses alternating with header courses
//! - `wild` - seeded random widths with a joint-alignment rule and backtracking

pub mod english;
pub mod flemish;
pub mod stretcher;
pub mod wild;

use tracing::debug;

use crate::config::{Bond, WallConfig, MAX_HEIGHT, MAX_WIDTH};
use crate::error::{Result, WallError};
use crate::wall::Wall;

pub const QUARTER: u32 = 1;
pub const HALF: u32 = 2;
pub const THREE_QUARTER: u32 = 3;
pub const WHOLE: u32 = 4;

/// Generate the full wall for a configuration.
pub fn generate(config: &WallConfig) -> Result<Wall> {
    check_dimension("width", config.width, MAX_WIDTH)?;
    check_dimension("height", config.height, MAX_HEIGHT)?;

    let span = config.course_span();
    let rows = generate_courses(span, config.height as usize, config.bond, config.seed())?;
    debug!(
        bond = %config.bond,
        span,
        courses = rows.len(),
        bricks = rows.iter().map(Vec::len).sum::<usize>(),
        "Generated bond pattern"
    );
    Ok(Wall::from_course_widths(span, &rows))
}

fn check_dimension(field: &str, value: u32, max: u32) -> Result<()> {
    if value < 1 {
        return Err(WallError::invalid_config(field, value, "must be positive"));
    }
    if value > max {
        return Err(WallError::invalid_config(field, value, format!("must not exceed {max}")));
    }
    Ok(())
}

/// Brick widths per course, foundation first.
///
/// `seed` only influences the randomized bonds.
pub fn generate_courses(span: u32, height: usize, bond: Bond, seed: u64) -> Result<Vec<Vec<u32>>> {
    let rows = match bond {
        Bond::Stretcher => (0..height).map(|row| stretcher::course(span, row)).collect(),
        Bond::Flemish => (0..height).map(|row| flemish::course(span, row)).collect(),
        Bond::English => (0..height).map(|row| english::course(span, row)).collect(),
        Bond::Wildverband => wild::WildverbandGenerator::new(seed).generate(span, height)?,
    };
    Ok(rows)
}

/// Close a course with the largest bricks that still fit.
pub(crate) fn fill_largest(widths: &mut Vec<u32>, mut remaining: u32) {
    while remaining > 0 {
        let width = [WHOLE, HALF, QUARTER]
            .into_iter()
            .find(|w| *w <= remaining)
            .unwrap_or(QUARTER);
        widths.push(width);
        remaining -= width;
    }
}
