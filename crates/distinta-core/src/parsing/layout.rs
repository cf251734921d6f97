use crate::extraction::PageFragments;
use crate::model::TextFragment;

/// A visual row of fragments sharing approximately the same baseline.
///
/// Fragments are kept sorted left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Baseline of the first fragment that opened the row.
    pub y: f64,
    pub fragments: Vec<TextFragment>,
}

impl Row {
    /// Fragment texts joined left to right with single spaces.
    pub fn text(&self) -> String {
        self.fragments
            .iter()
            .map(|f| f.text.trim())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn texts(&self) -> Vec<&str> {
        self.fragments.iter().map(|f| f.text.as_str()).collect()
    }
}

/// Flatten per-page fragments into document coordinates, dropping
/// whitespace-only text runs.
///
/// Backends report `y` relative to each page. Pages are stacked bottom-up so
/// that every fragment of page `n` lies at least `vertical_tolerance` above
/// every fragment of page `n + 1`; positions within a page are preserved.
pub fn collect_fragments(pages: &[PageFragments], vertical_tolerance: f64) -> Vec<TextFragment> {
    let mut stacked: Vec<Vec<TextFragment>> = Vec::with_capacity(pages.len());
    let mut floor: Option<f64> = None;

    for page in pages.iter().rev() {
        let mut fragments: Vec<TextFragment> = page
            .fragments
            .iter()
            .filter(|f| !f.text.trim().is_empty())
            .cloned()
            .collect();
        let Some(bottom) = fragments.iter().map(|f| f.y).min_by(f64::total_cmp) else {
            continue;
        };

        let shift = floor.map_or(0.0, |floor| floor - bottom);
        let mut top = f64::NEG_INFINITY;
        for fragment in &mut fragments {
            fragment.y += shift;
            top = top.max(fragment.y);
        }
        floor = Some(top + vertical_tolerance.max(0.0));
        stacked.push(fragments);
    }

    stacked.into_iter().rev().flatten().collect()
}

/// Group fragments into rows, top of the page first.
///
/// A fragment joins the open row while its `y` is strictly within
/// `vertical_tolerance` of the row's anchor `y`; otherwise the row is closed
/// and a new one starts. The sort is global and stable, so fragments that tie
/// on `y` keep their input (page) order.
pub fn reconstruct_rows(fragments: &[TextFragment], vertical_tolerance: f64) -> Vec<Row> {
    let mut sorted: Vec<&TextFragment> = fragments.iter().collect();
    sorted.sort_by(|a, b| b.y.total_cmp(&a.y));

    let mut rows = Vec::new();
    let mut current: Option<Row> = None;

    for fragment in sorted {
        let joins = current
            .as_ref()
            .is_some_and(|row| (fragment.y - row.y).abs() < vertical_tolerance);
        if joins {
            if let Some(row) = current.as_mut() {
                row.fragments.push(fragment.clone());
            }
        } else {
            let opened = Row {
                y: fragment.y,
                fragments: vec![fragment.clone()],
            };
            if let Some(closed) = current.replace(opened) {
                rows.push(close_row(closed));
            }
        }
    }

    if let Some(closed) = current {
        rows.push(close_row(closed));
    }

    rows
}

fn close_row(mut row: Row) -> Row {
    row.fragments.sort_by(|a, b| a.x.total_cmp(&b.x));
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(text: &str, x: f64, y: f64) -> TextFragment {
        TextFragment::new(text, x, y, 10.0)
    }

    #[test]
    fn test_two_rows_x_sorted() {
        let fragments = vec![frag("B", 50.0, 101.0), frag("C", 0.0, 50.0), frag("A", 0.0, 100.0)];
        let rows = reconstruct_rows(&fragments, 5.0);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].texts(), vec!["A", "B"]);
        assert_eq!(rows[1].texts(), vec!["C"]);
    }

    #[test]
    fn test_empty_input_yields_no_rows() {
        assert!(reconstruct_rows(&[], 5.0).is_empty());
    }

    #[test]
    fn test_row_anchor_is_first_fragment() {
        // 100 -> 96 joins (diff 4), 92 is 8 away from the anchor and opens a new row.
        let fragments = vec![frag("a", 0.0, 100.0), frag("b", 10.0, 96.0), frag("c", 20.0, 92.0)];
        let rows = reconstruct_rows(&fragments, 5.0);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].texts(), vec!["a", "b"]);
        assert_eq!(rows[0].y, 100.0);
        assert_eq!(rows[1].texts(), vec!["c"]);
    }

    #[test]
    fn test_tolerance_is_strict() {
        let fragments = vec![frag("a", 0.0, 100.0), frag("b", 10.0, 95.0)];
        assert_eq!(reconstruct_rows(&fragments, 5.0).len(), 2);
        assert_eq!(reconstruct_rows(&fragments, 5.5).len(), 1);
    }

    #[test]
    fn test_row_text_joined() {
        let rows = reconstruct_rows(&[frag(" 4 ", 200.0, 10.0), frag("000514846", 12.0, 10.0)], 5.0);
        assert_eq!(rows[0].text(), "000514846 4");
    }

    #[test]
    fn test_collect_fragments_drops_blank_runs() {
        let pages = vec![
            PageFragments {
                page_number: 1,
                fragments: vec![frag("A", 0.0, 10.0), frag("  ", 5.0, 10.0)],
            },
            PageFragments {
                page_number: 2,
                fragments: vec![frag("B", 0.0, 10.0)],
            },
        ];
        let fragments = collect_fragments(&pages, 5.0);
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[1].text, "B");
    }

    #[test]
    fn test_pages_with_identical_layout_stay_apart() {
        let layout = |code: &str| PageFragments {
            page_number: 1,
            fragments: vec![frag("Code", 0.0, 790.0), frag(code, 0.0, 770.0), frag("4", 200.0, 770.0)],
        };
        let pages = vec![layout("514846"), layout("823301")];

        let fragments = collect_fragments(&pages, 5.0);
        let rows = reconstruct_rows(&fragments, 5.0);

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].texts(), vec!["Code"]);
        assert_eq!(rows[1].texts(), vec!["514846", "4"]);
        assert_eq!(rows[2].texts(), vec!["Code"]);
        assert_eq!(rows[3].texts(), vec!["823301", "4"]);
        // The last page keeps its own coordinates.
        assert_eq!(rows[3].y, 770.0);
    }

    #[test]
    fn test_page_boundary_respects_tolerance() {
        let pages = vec![
            PageFragments {
                page_number: 1,
                fragments: vec![frag("footer", 0.0, 10.0)],
            },
            PageFragments {
                page_number: 2,
                fragments: vec![frag("header", 0.0, 800.0), frag("body", 0.0, 300.0)],
            },
            PageFragments {
                page_number: 3,
                fragments: vec![],
            },
        ];
        let fragments = collect_fragments(&pages, 5.0);
        assert_eq!(fragments[0].text, "footer");
        assert_eq!(fragments[0].y, 805.0);

        let rows = reconstruct_rows(&fragments, 5.0);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].texts(), vec!["footer"]);
        assert_eq!(rows[1].texts(), vec!["header"]);
    }
}
