//! Column grid for completion candidates.
//!
//! Candidates fill the grid column by column (top to bottom, then left to right). Every
//! column has the width of the widest candidate plus a two-space gutter; the number of
//! columns is whatever fits in `width - 1`. Rows carry no trailing padding.

use core_text::cells::line_width;

const GUTTER: usize = 2;

pub fn listing_rows(items: &[String], width: usize) -> Vec<String> {
    if items.is_empty() {
        return Vec::new();
    }
    let widest = items.iter().map(|s| line_width(s)).max().unwrap_or(0);
    let column = widest + GUTTER;
    let columns = (width.saturating_sub(1) / column).max(1);
    let rows = items.len().div_ceil(columns);

    (0..rows)
        .map(|r| {
            let mut row = String::new();
            let mut pad = 0;
            for c in 0..columns {
                let Some(item) = items.get(c * rows + r) else {
                    break;
                };
                row.extend(std::iter::repeat_n(' ', pad));
                row.push_str(item);
                pad = column - line_width(item);
            }
            row
        })
        .collect()
}
