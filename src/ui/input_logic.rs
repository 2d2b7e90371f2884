//! Cursor arithmetic shared by the menu model, kept free of UI types.

/// Move selection cursor one item up.
pub fn select_prev(selected: usize) -> usize {
    selected.saturating_sub(1)
}

/// Move selection cursor one item down if another item exists.
pub fn select_next(selected: usize, item_count: usize) -> usize {
    if selected + 1 < item_count {
        selected + 1
    } else {
        selected
    }
}

/// First visible row so that `selected` stays inside a window of `visible`
/// rows, scrolling as little as possible from `top`.
pub fn scroll_window(top: usize, selected: usize, visible: usize) -> usize {
    if visible == 0 || selected < top {
        selected
    } else if selected >= top + visible {
        selected + 1 - visible
    } else {
        top
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_stays_in_bounds() {
        assert_eq!(select_prev(0), 0);
        assert_eq!(select_prev(3), 2);
        assert_eq!(select_next(2, 3), 2);
        assert_eq!(select_next(0, 3), 1);
        assert_eq!(select_next(0, 0), 0);
    }

    #[test]
    fn window_follows_cursor() {
        assert_eq!(scroll_window(0, 4, 10), 0);
        assert_eq!(scroll_window(0, 10, 10), 1);
        assert_eq!(scroll_window(1, 10, 10), 1);
        assert_eq!(scroll_window(5, 2, 10), 2);
    }
}
