//! Flemish bond: whole bricks and headers alternate within every course.
//!
//! Odd courses start with a queen closer so each header sits centred on the
//! whole brick below it.

use super::{fill_largest, HALF, QUARTER, WHOLE};

const PAIR: u32 = WHOLE + HALF;

pub fn course(span: u32, row: usize) -> Vec<u32> {
    let odd = row % 2 == 1;
    let mut widths = Vec::new();
    let mut remaining = span;

    if odd && remaining > 0 {
        widths.push(QUARTER);
        remaining -= QUARTER;
    }

    while remaining >= PAIR {
        if odd {
            widths.extend([HALF, WHOLE]);
        } else {
            widths.extend([WHOLE, HALF]);
        }
        remaining -= PAIR;
    }

    fill_largest(&mut widths, remaining);
    widths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_course_alternates_whole_and_header() {
        assert_eq!(course(10, 0), vec![4, 2, 4]);
        assert_eq!(course(12, 0), vec![4, 2, 4, 2]);
    }

    #[test]
    fn test_odd_course_opens_with_queen_closer() {
        assert_eq!(course(10, 1), vec![1, 2, 4, 2, 1]);
        assert_eq!(course(12, 1), vec![1, 2, 4, 4, 1]);
    }

    #[test]
    fn test_headers_centred_over_whole_bricks() {
        let below = course(24, 0);
        let above = course(24, 1);
        let mut offset = 0;
        let whole_centres: Vec<u32> = below
            .iter()
            .filter_map(|w| {
                let centre = (*w == WHOLE).then_some(offset + WHOLE / 2);
                offset += w;
                centre
            })
            .collect();

        let mut offset = 0;
        for w in &above {
            if *w == HALF {
                assert!(whole_centres.contains(&(offset + 1)), "header at {offset}");
            }
            offset += w;
        }
    }

    #[test]
    fn test_single_module_wall() {
        assert_eq!(course(1, 0), vec![1]);
        assert_eq!(course(1, 1), vec![1]);
    }
}
