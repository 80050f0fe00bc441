//! Viewport: the visible vertical window onto the line buffer.
//!
//! Guarantees after [`Viewport::fix`]:
//! * `first_line <= cursor_line < first_line + height`.
//! * A cursor already inside the window never moves `first_line`.
//!
//! The returned [`Scroll`] tells the caller which repaint is cheapest: `Still` needs only
//! relative cursor motion, `Up` / `Down` need the whole window repainted.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scroll {
    Up,
    Still,
    Down,
}

impl Scroll {
    /// -1, 0 or +1.
    pub fn delta(self) -> i32 {
        match self {
            Scroll::Up => -1,
            Scroll::Still => 0,
            Scroll::Down => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub first_line: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(first_line: usize, height: usize) -> Self {
        Self {
            first_line,
            height: height.max(1),
        }
    }

    /// Adjust `first_line` so `cursor_line` is visible.
    pub fn fix(&mut self, cursor_line: usize) -> Scroll {
        if cursor_line >= self.first_line + self.height {
            self.first_line = cursor_line + 1 - self.height;
            Scroll::Down
        } else if cursor_line < self.first_line {
            self.first_line = cursor_line;
            Scroll::Up
        } else {
            Scroll::Still
        }
    }

    /// One past the last visible line index.
    pub fn end(&self) -> usize {
        self.first_line + self.height
    }

    pub fn contains(&self, line: usize) -> bool {
        line >= self.first_line && line < self.end()
    }

    /// Screen row (relative to the top of the window) of a visible `line`.
    pub fn row_of(&self, line: usize) -> Option<usize> {
        self.contains(line).then(|| line - self.first_line)
    }

    pub fn set_height(&mut self, height: usize) {
        self.height = height.max(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn scrolls_down_when_cursor_leaves_bottom() {
        let mut vp = Viewport::new(0, 3);
        assert_eq!(vp.fix(2), Scroll::Still);
        assert_eq!(vp.fix(3), Scroll::Down);
        assert_eq!(vp.first_line, 1);
        assert_eq!(vp.fix(0), Scroll::Up);
        assert_eq!(vp.first_line, 0);
    }

    #[test]
    fn jump_far_below_lands_cursor_on_bottom_row() {
        let mut vp = Viewport::new(0, 4);
        assert_eq!(vp.fix(10), Scroll::Down);
        assert_eq!(vp.first_line, 7);
        assert_eq!(vp.row_of(10), Some(3));
    }

    #[test]
    fn zero_height_is_clamped() {
        let mut vp = Viewport::new(0, 0);
        assert_eq!(vp.height, 1);
        vp.fix(5);
        assert_eq!(vp.first_line, 5);
    }

    proptest! {
        #[test]
        fn cursor_stays_inside_window(
            height in 1usize..12,
            moves in proptest::collection::vec(0usize..60, 1..80),
        ) {
            let mut vp = Viewport::new(0, height);
            for cursor in moves {
                let before = vp;
                let scroll = vp.fix(cursor);
                prop_assert!(vp.first_line <= cursor);
                prop_assert!(cursor < vp.first_line + vp.height);
                if before.contains(cursor) {
                    prop_assert_eq!(scroll, Scroll::Still);
                    prop_assert_eq!(before.first_line, vp.first_line);
                }
            }
        }
    }
}
