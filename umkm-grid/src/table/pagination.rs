//! Page-button layout.

/// Button label that stands for "more pages here" and has no action.
pub const ELLIPSIS: usize = 0;

/// Number of pages needed to show `total` rows at `page_size` rows per page.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Compute the page-button labels for a pager.
///
/// Returns at most `max_buttons` labels. [`ELLIPSIS`] marks a gap. When the
/// pages do not all fit, the first and the last page are always reachable:
///
/// - near the start the window is `1..=max_buttons` with the last two slots
///   replaced by an ellipsis and `total_pages`;
/// - near the end the window is the last `max_buttons` pages with the first
///   two slots replaced by `1` and an ellipsis;
/// - otherwise the window is centred on `current_page` and both ends are
///   replaced.
///
/// `max_buttons` below 3 is treated as 3. Values below 5 produce duplicate
/// labels for some inputs.
pub fn compute_buttons(current_page: usize, total_pages: usize, max_buttons: usize) -> Vec<usize> {
    let max_buttons = max_buttons.max(3);
    if total_pages <= max_buttons {
        return (1..=total_pages).collect();
    }

    let current_page = current_page.clamp(1, total_pages);
    let half = max_buttons / 2;

    let mut buttons: Vec<usize>;
    if current_page <= half {
        buttons = (1..=max_buttons).collect();
        buttons[max_buttons - 2] = ELLIPSIS;
        buttons[max_buttons - 1] = total_pages;
    } else if current_page >= total_pages - half {
        buttons = (total_pages - max_buttons + 1..=total_pages).collect();
        buttons[0] = 1;
        buttons[1] = ELLIPSIS;
    } else {
        // Even budgets would give a window one wider than the budget.
        let start = current_page - half;
        buttons = (start..start + max_buttons).collect();
        buttons[0] = 1;
        buttons[1] = ELLIPSIS;
        buttons[max_buttons - 2] = ELLIPSIS;
        buttons[max_buttons - 1] = total_pages;
    }

    log::trace!(
        "[pager] page {} of {} with {} buttons -> {:?}",
        current_page,
        total_pages,
        max_buttons,
        buttons
    );
    buttons
}
