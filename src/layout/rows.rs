//! Row clustering by vertical band overlap.
//!
//! Greedy single-linkage per seed: the top-most remaining token seeds a row and
//! one pass over the pool pulls in every token whose y-extent overlaps the
//! seed's. Tokens that only overlap another row member, and not the seed, are
//! left for a later row.

use crate::document::Token;
use crate::geometry::horizontal_overlap_ratio;

/// Partition tokens into rows.
///
/// Rows come back sorted by the top edge of their seed token, and each row's
/// tokens are ordered left to right. Every input token ends up in exactly one
/// row.
///
/// # Examples
///
/// ```
/// use ocr_tables::document::Token;
/// use ocr_tables::geometry::BoundingBox;
/// use ocr_tables::layout::rows::cluster_rows;
///
/// let tokens = vec![
///     Token::new("2", BoundingBox::from_coords(100.0, 31.0, 110.0, 45.0)),
///     Token::new("Qty", BoundingBox::from_coords(100.0, 0.0, 130.0, 14.0)),
///     Token::new("A1", BoundingBox::from_coords(0.0, 30.0, 20.0, 44.0)),
///     Token::new("Code", BoundingBox::from_coords(0.0, 1.0, 40.0, 15.0)),
/// ];
///
/// let rows = cluster_rows(tokens);
/// let texts: Vec<Vec<&str>> = rows
///     .iter()
///     .map(|row| row.iter().map(|t| t.text.as_str()).collect())
///     .collect();
/// assert_eq!(texts, vec![vec!["Code", "Qty"], vec!["A1", "2"]]);
/// ```
pub fn cluster_rows(mut pool: Vec<Token>) -> Vec<Vec<Token>> {
    pool.sort_by(|a, b| a.bounding_box.top().total_cmp(&b.bounding_box.top()));

    let mut rows: Vec<Vec<Token>> = Vec::new();

    while !pool.is_empty() {
        let seed = pool.remove(0);
        let seed_box = seed.bounding_box;
        let mut row = vec![seed];

        // index is not advanced on a match: the next candidate slides into place
        let mut index = 0;
        while index < pool.len() {
            if horizontal_overlap_ratio(&seed_box, &pool[index].bounding_box) > 0.0 {
                row.push(pool.remove(index));
            } else {
                index += 1;
            }
        }

        rows.push(row);
    }

    rows.sort_by(|a, b| a[0].bounding_box.top().total_cmp(&b[0].bounding_box.top()));

    for row in &mut rows {
        row.sort_by(|a, b| a.bounding_box.left().total_cmp(&b.bounding_box.left()));
    }

    log::debug!("clustered tokens into {} rows", rows.len());

    rows
}
