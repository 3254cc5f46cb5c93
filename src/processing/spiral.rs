//! # Spiral Traversal
//!
//! Produces the pixel visitation order shared by the embedder and the
//! extractor. The order walks the outer ring of the remaining rectangle
//! (right along the top row, down the right column, left along the bottom
//! row, up the left column) and then shrinks the rectangle by one on every
//! side.
//!
//! ```text
//!  0  1  2  3
//! 11 12 13  4
//! 10 15 14  5
//!  9  8  7  6
//! ```
//!
//! The order depends only on `(width, height)`, so both sides of the
//! protocol derive the same path without sharing any state.

use std::iter::FusedIterator;

/// A single pixel position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub x: u32,
    pub y: u32,
}

impl Coordinate {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Leg {
    Right,
    Down,
    Left,
    Up,
}

/// Lazy iterator over every coordinate of a `width x height` grid in
/// spiral order.
///
/// Bounds are kept as `i64` so that shrinking a one-pixel-wide rectangle
/// past zero does not wrap.
#[derive(Debug, Clone)]
pub struct SpiralPath {
    left: i64,
    right: i64,
    top: i64,
    bottom: i64,
    leg: Leg,
    cursor: i64,
    remaining: usize,
}

impl SpiralPath {
    /// Start a new path. A grid with a zero dimension yields nothing.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            left: 0,
            right: i64::from(width) - 1,
            top: 0,
            bottom: i64::from(height) - 1,
            leg: Leg::Right,
            cursor: 0,
            remaining: width as usize * height as usize,
        }
    }

    fn emit(&mut self, x: i64, y: i64) -> Coordinate {
        self.remaining -= 1;
        Coordinate::new(x as u32, y as u32)
    }
}

impl Iterator for SpiralPath {
    type Item = Coordinate;

    fn next(&mut self) -> Option<Coordinate> {
        // The unvisited pixels are always exactly the current rectangle at
        // the start of a leg, so a non-zero count guarantees a non-empty
        // leg is reached before the loop can spin.
        if self.remaining == 0 {
            return None;
        }

        loop {
            match self.leg {
                Leg::Right => {
                    if self.cursor <= self.right {
                        let x = self.cursor;
                        self.cursor += 1;
                        return Some(self.emit(x, self.top));
                    }
                    self.top += 1;
                    self.leg = Leg::Down;
                    self.cursor = self.top;
                }
                Leg::Down => {
                    if self.cursor <= self.bottom {
                        let y = self.cursor;
                        self.cursor += 1;
                        return Some(self.emit(self.right, y));
                    }
                    self.right -= 1;
                    self.leg = Leg::Left;
                    self.cursor = self.right;
                }
                Leg::Left => {
                    if self.cursor >= self.left {
                        let x = self.cursor;
                        self.cursor -= 1;
                        return Some(self.emit(x, self.bottom));
                    }
                    self.bottom -= 1;
                    self.leg = Leg::Up;
                    self.cursor = self.bottom;
                }
                Leg::Up => {
                    if self.cursor >= self.top {
                        let y = self.cursor;
                        self.cursor -= 1;
                        return Some(self.emit(self.left, y));
                    }
                    self.left += 1;
                    self.leg = Leg::Right;
                    self.cursor = self.left;
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for SpiralPath {}

impl FusedIterator for SpiralPath {}

/// Spiral order for a `width x height` grid.
pub fn spiral_path(width: u32, height: u32) -> SpiralPath {
    SpiralPath::new(width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn coords(width: u32, height: u32) -> Vec<(u32, u32)> {
        spiral_path(width, height).map(|c| (c.x, c.y)).collect()
    }

    #[test]
    fn test_square_order() {
        assert_eq!(
            coords(3, 3),
            vec![
                (0, 0),
                (1, 0),
                (2, 0),
                (2, 1),
                (2, 2),
                (1, 2),
                (0, 2),
                (0, 1),
                (1, 1),
            ]
        );
    }

    #[test]
    fn test_four_by_four_center() {
        let path = coords(4, 4);
        assert_eq!(path[11], (0, 1));
        assert_eq!(&path[12..], &[(1, 1), (2, 1), (2, 2), (1, 2)]);
    }

    #[test]
    fn test_single_row_and_column() {
        assert_eq!(coords(4, 1), vec![(0, 0), (1, 0), (2, 0), (3, 0)]);
        assert_eq!(coords(1, 3), vec![(0, 0), (0, 1), (0, 2)]);
        assert_eq!(coords(1, 1), vec![(0, 0)]);
    }

    #[test]
    fn test_wide_rectangle_inner_row() {
        // 5x3 leaves a single inner row 1..=3 at y = 1.
        let path = coords(5, 3);
        assert_eq!(&path[12..], &[(1, 1), (2, 1), (3, 1)]);
    }

    #[test]
    fn test_tall_rectangle_inner_column() {
        // 3x5 leaves a single inner column at x = 1, walked downwards.
        let path = coords(3, 5);
        assert_eq!(&path[12..], &[(1, 1), (1, 2), (1, 3)]);
    }

    #[test]
    fn test_completeness() {
        for width in 1..=9 {
            for height in 1..=9 {
                let path = coords(width, height);
                assert_eq!(path.len(), (width * height) as usize);

                let unique: HashSet<_> = path.iter().copied().collect();
                assert_eq!(unique.len(), path.len(), "duplicate in {width}x{height}");
                assert!(path.iter().all(|&(x, y)| x < width && y < height));
            }
        }
    }

    #[test]
    fn test_empty_grid() {
        assert_eq!(spiral_path(0, 5).count(), 0);
        assert_eq!(spiral_path(5, 0).count(), 0);
    }

    #[test]
    fn test_exact_size() {
        let mut path = spiral_path(7, 2);
        assert_eq!(path.len(), 14);
        path.next();
        assert_eq!(path.len(), 13);
        assert_eq!(path.by_ref().count(), 13);
        assert_eq!(path.next(), None);
    }
}
