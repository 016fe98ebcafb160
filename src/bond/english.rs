//! English bond: stretcher courses alternating with header courses.

use super::{fill_largest, HALF, QUARTER};

pub fn course(span: u32, row: usize) -> Vec<u32> {
    if row % 2 == 0 {
        stretcher_course(span)
    } else {
        header_course(span)
    }
}

fn stretcher_course(span: u32) -> Vec<u32> {
    let mut widths = Vec::new();
    fill_largest(&mut widths, span);
    widths
}

/// Queen closer, headers, and a quarter to close the course.
fn header_course(span: u32) -> Vec<u32> {
    if span == 0 {
        return Vec::new();
    }

    let mut widths = vec![QUARTER];
    let mut remaining = span - QUARTER;

    while remaining > QUARTER {
        widths.push(HALF);
        remaining -= HALF;
    }

    if remaining > 0 {
        widths.push(QUARTER);
    }
    widths
}
