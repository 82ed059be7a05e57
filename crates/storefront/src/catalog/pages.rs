//! Page-number strip under the product grid.

use core::fmt;

/// One entry of the page strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page(u32),
    Ellipsis,
}

impl fmt::Display for PageLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(n) => write!(f, "{n}"),
            Self::Ellipsis => f.write_str("..."),
        }
    }
}

/// Pages shown before the strip collapses into ellipses.
const MAX_VISIBLE: u32 = 5;

/// Page links for `current` of `total`: every page when there are few,
/// otherwise the first, the last and the neighbours of `current`.
#[must_use]
pub fn page_window(current: u32, total: u32) -> Vec<PageLink> {
    if total <= MAX_VISIBLE {
        return (1..=total).map(PageLink::Page).collect();
    }

    let current = current.clamp(1, total);
    let mut links = vec![PageLink::Page(1)];
    if current > 3 {
        links.push(PageLink::Ellipsis);
    }
    let start = current.saturating_sub(1).max(2);
    let end = current.saturating_add(1).min(total - 1);
    links.extend((start..=end).map(PageLink::Page));
    if current.saturating_add(2) < total {
        links.push(PageLink::Ellipsis);
    }
    links.push(PageLink::Page(total));
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(links: &[PageLink]) -> String {
        links
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_few_pages_show_all() {
        assert_eq!(render(&page_window(1, 1)), "1");
        assert_eq!(render(&page_window(2, 5)), "1 2 3 4 5");
    }

    #[test]
    fn test_window_at_start() {
        assert_eq!(render(&page_window(1, 10)), "1 2 ... 10");
        assert_eq!(render(&page_window(3, 10)), "1 2 3 4 ... 10");
    }

    #[test]
    fn test_window_in_middle() {
        assert_eq!(render(&page_window(5, 10)), "1 ... 4 5 6 ... 10");
    }

    #[test]
    fn test_window_at_end() {
        assert_eq!(render(&page_window(8, 10)), "1 ... 7 8 9 10");
        assert_eq!(render(&page_window(10, 10)), "1 ... 9 10");
    }

    #[test]
    fn test_current_past_the_end() {
        assert_eq!(render(&page_window(u32::MAX, 10)), "1 ... 9 10");
        assert_eq!(render(&page_window(0, 10)), "1 2 ... 10");
    }
}
