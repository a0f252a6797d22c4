//! Page-navigation helpers, all pages being zero-based

/// Pages shown on each side of the current one
const NEIGHBOURS: usize = 1;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

pub fn total_pages(total_items: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    (total_items + per_page - 1) / per_page
}

/// First page, last page and the neighbours of `current`, gaps collapsed to one ellipsis
pub fn page_range(current: usize, total_pages: usize) -> Vec<PageItem> {
    let mut res = Vec::new();
    for i in 0..total_pages {
        let near = i + NEIGHBOURS >= current && i <= current + NEIGHBOURS;
        if i == 0 || i + 1 == total_pages || near {
            res.push(PageItem::Page(i));
        } else if res.last() != Some(&PageItem::Ellipsis) {
            res.push(PageItem::Ellipsis);
        }
    }
    res
}

/// One-based indices of the first and last entries shown on `page`
pub fn entry_span(page: usize, per_page: usize, total_items: usize) -> (usize, usize) {
    if total_items == 0 {
        return (0, 0);
    }
    let first = page.saturating_mul(per_page).saturating_add(1).min(total_items);
    let last = page.saturating_add(1).saturating_mul(per_page).min(total_items);
    (first, last)
}

pub fn summary(page: usize, per_page: usize, total_items: usize) -> String {
    let (first, last) = entry_span(page, per_page, total_items);
    format!("Showing {first} to {last} of {total_items} entries")
}

#[cfg(test)]
mod tests {
    use super::PageItem::{Ellipsis as E, Page as P};
    use super::*;

    #[test]
    fn counts_round_up() {
        assert_eq!(total_pages(0, 5), 0);
        assert_eq!(total_pages(5, 5), 1);
        assert_eq!(total_pages(6, 5), 2);
        assert_eq!(total_pages(6, 0), 0);
    }

    #[test]
    fn ranges() {
        assert_eq!(page_range(0, 1), vec![P(0)]);
        assert_eq!(page_range(0, 3), vec![P(0), P(1), P(2)]);
        assert_eq!(page_range(0, 10), vec![P(0), P(1), E, P(9)]);
        assert_eq!(page_range(5, 10), vec![P(0), E, P(4), P(5), P(6), E, P(9)]);
        assert_eq!(page_range(9, 10), vec![P(0), E, P(8), P(9)]);
        assert_eq!(page_range(2, 10), vec![P(0), P(1), P(2), P(3), E, P(9)]);
    }

    #[test]
    fn summaries() {
        assert_eq!(summary(0, 5, 12), "Showing 1 to 5 of 12 entries");
        assert_eq!(summary(2, 5, 12), "Showing 11 to 12 of 12 entries");
        assert_eq!(summary(0, 5, 0), "Showing 0 to 0 of 0 entries");
        assert_eq!(summary(usize::MAX, 5, 12), "Showing 12 to 12 of 12 entries");
    }
}
