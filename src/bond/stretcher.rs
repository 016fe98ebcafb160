//! Stretcher bond: whole bricks, every other course shifted half a brick.

use super::{HALF, WHOLE};

/// Brick widths for course `row`.
///
/// Odd courses open with a half closer; the last brick is cut to whatever
/// remains.
pub fn course(span: u32, row: usize) -> Vec<u32> {
    let mut widths = Vec::new();
    let mut remaining = span;

    if row % 2 == 1 {
        let closer = HALF.min(remaining);
        widths.push(closer);
        remaining -= closer;
    }

    while remaining >= WHOLE {
        widths.push(WHOLE);
        remaining -= WHOLE;
    }

    if remaining > 0 {
        widths.push(remaining);
    }

    widths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_course_all_whole() {
        assert_eq!(course(16, 0), vec![4, 4, 4, 4]);
        assert_eq!(course(16, 2), vec![4, 4, 4, 4]);
    }

    #[test]
    fn test_odd_course_has_half_closers() {
        assert_eq!(course(16, 1), vec![2, 4, 4, 4, 2]);
        assert_eq!(course(8, 1), vec![2, 4, 2]);
    }

    #[test]
    fn test_cut_closing_brick() {
        assert_eq!(course(10, 0), vec![4, 4, 2]);
        assert_eq!(course(10, 1), vec![2, 4, 4]);
        assert_eq!(course(7, 0), vec![4, 3]);
    }

    #[test]
    fn test_narrow_walls() {
        assert_eq!(course(4, 0), vec![4]);
        assert_eq!(course(2, 0), vec![2]);
        assert_eq!(course(2, 1), vec![2]);
        assert_eq!(course(1, 1), vec![1]);
    }
}
