//! Header grouping and column bounds.
//!
//! The first clustered row is taken as the table header. Its tokens are grouped
//! into columns by horizontal overlap, and each group's union box becomes that
//! column's initial bound. Once content has been placed, bounds can be
//! re-estimated from the content and stretched to tile the page width.

use crate::document::Token;
use crate::geometry::{bounds_of, vertical_overlap_ratio, BoundingBox};
use crate::tables::cell::CellItem;

/// Group the tokens of a header row into columns.
///
/// Tokens are taken in row order (left to right). A token whose x-extent
/// overlaps the first token of any existing group joins the most recently
/// created group; otherwise it opens a new group. Groups are returned ordered by
/// the left edge of their first token.
///
/// The first token of each group carries ratio 1; merged tokens carry the last
/// ratio computed for them.
pub fn regroup_column_headers(row: Vec<Token>) -> Vec<Vec<CellItem>> {
    let mut groups: Vec<Vec<CellItem>> = Vec::new();

    for token in row {
        let mut matched = false;
        let mut ratio = 0.0;

        for group in &groups {
            ratio = vertical_overlap_ratio(&group[0].token.bounding_box, &token.bounding_box);
            if ratio > 0.0 {
                matched = true;
            }
        }

        match groups.last_mut() {
            Some(last) if matched => last.push(CellItem::new(token, ratio)),
            _ => groups.push(vec![CellItem::new(token, 1.0)]),
        }
    }

    groups.sort_by(|a, b| {
        a[0].token
            .bounding_box
            .left()
            .total_cmp(&b[0].token.bounding_box.left())
    });

    groups
}

/// Union of the boxes of a group of cell items.
pub fn items_bound(items: &[CellItem]) -> Option<BoundingBox> {
    bounds_of(items.iter().map(|item| &item.token.bounding_box))
}

/// Set the horizontal extent of a bound, keeping its vertical extent.
fn set_x_extent(bound: &mut BoundingBox, left: f32, right: f32) {
    let [tl, tr, br, bl] = &mut bound.vertices;
    tl.x = left;
    bl.x = left;
    tr.x = right;
    br.x = right;
}

/// Stretch column bounds so they tile `[0, page_width]` without gaps.
///
/// The first column starts at 0, the last ends at `page_width`, and each pair of
/// neighbours meets at the midpoint of the gap between their original extents.
///
/// # Examples
///
/// ```
/// use ocr_tables::geometry::BoundingBox;
/// use ocr_tables::layout::columns::maximize_column_bounds;
///
/// let mut bounds = vec![
///     BoundingBox::from_coords(10.0, 0.0, 40.0, 10.0),
///     BoundingBox::from_coords(60.0, 0.0, 90.0, 10.0),
/// ];
/// maximize_column_bounds(&mut bounds, 200.0);
///
/// assert_eq!((bounds[0].left(), bounds[0].right()), (0.0, 50.0));
/// assert_eq!((bounds[1].left(), bounds[1].right()), (50.0, 200.0));
/// ```
pub fn maximize_column_bounds(bounds: &mut [BoundingBox], page_width: f32) {
    let extents: Vec<(f32, f32)> = bounds.iter().map(|b| (b.left(), b.right())).collect();
    let last = extents.len().saturating_sub(1);

    for (index, bound) in bounds.iter_mut().enumerate() {
        let left = if index == 0 {
            0.0
        } else {
            gap_midpoint(extents[index - 1].1, extents[index].0)
        };
        let right = if index == last {
            page_width
        } else {
            gap_midpoint(extents[index].1, extents[index + 1].0)
        };
        set_x_extent(bound, left, right);
    }
}

fn gap_midpoint(right: f32, next_left: f32) -> f32 {
    right + (next_left - right) / 2.0
}
