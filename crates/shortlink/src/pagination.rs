//! Page navigation helpers for paginated listings.

use serde::Serialize;

/// Most numbered slots shown by [`page_window`].
pub const MAX_PAGES_SHOWN: u32 = 5;

/// One slot of a page navigation control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

/// Number of pages needed for `items` at `per_page` each. Never less than 1.
pub fn total_pages(items: u64, per_page: u32) -> u32 {
    let per_page = u64::from(per_page.max(1));
    let pages = items.div_ceil(per_page).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// The page before `current`, stopping at 1.
pub fn prev_page(current: u32) -> u32 {
    current.saturating_sub(1).max(1)
}

/// The page after `current`, stopping at `total`.
pub fn next_page(current: u32, total: u32) -> u32 {
    current.saturating_add(1).min(total.max(1))
}

/// Slots to show for page `current` of `total`.
///
/// Every page is listed when there are at most [`MAX_PAGES_SHOWN`].
/// Otherwise the first and last pages are always present, with a run of
/// neighbours around `current` and an ellipsis wherever pages are skipped.
/// A single page needs no control, so the result is empty.
pub fn page_window(current: u32, total: u32) -> Vec<PageItem> {
    if total <= 1 {
        return Vec::new();
    }

    if total <= MAX_PAGES_SHOWN {
        return (1..=total).map(PageItem::Page).collect();
    }

    let current = current.clamp(1, total);
    let middle = MAX_PAGES_SHOWN - 3;

    let mut start = current.saturating_sub(1).max(2);
    let mut end = current.saturating_add(1).min(total - 1);

    if end.saturating_sub(start) < middle {
        // current < total / 2 without integer truncation
        if u64::from(current) * 2 < u64::from(total) {
            end = (start + middle).min(total - 1);
        } else {
            start = end.saturating_sub(middle).max(2);
        }
    }

    let mut items = vec![PageItem::Page(1)];
    if start > 2 {
        items.push(PageItem::Ellipsis);
    }
    items.extend((start..=end).map(PageItem::Page));
    if end < total - 1 {
        items.push(PageItem::Ellipsis);
    }
    items.push(PageItem::Page(total));
    items
}
