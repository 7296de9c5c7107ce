//! Plain-text rendering of the console screen.

use std::fmt::Write;

use umkm_grid::notify::{Dialog, Toast, ToastLevel};
use umkm_grid::table::{
    Alignment, ELLIPSIS, HeaderCheck, LoadMoreState, SortMarker, TableController, TableMode,
    ViewState,
};
use umkm_grid::tree::{CheckState, CheckTree};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::registry::Umkm;

/// Widest a cell may get before it is truncated.
const MAX_CELL_WIDTH: usize = 28;

pub const HELP: &str = "\
Navigation   page N | next | prev | more | size 5|10|25|50|100
Query        search TEXT | sort COLUMN | filter CATEGORY|all | refresh
Rows         detail ROW | copy ROW COLUMN | device none|mobile|tablet|desktop|tv
Selection    select ID | select-all | clear | delete (then yes/no)
Menus        menu | menu open ID | menu check ID on|off | menu json
Forms        register NAME; OWNER; EMAIL; CATEGORY; REVENUE; YYYY-MM-DD
Other        help | quit";

pub fn display_width(s: &str) -> usize {
    s.width()
}

pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let target = max_width - 1;
    let mut out = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w > target {
            break;
        }
        out.push(ch);
        width += w;
    }
    out.push('…');
    out
}

fn pad(text: &str, width: usize, align: Alignment) -> String {
    let text = truncate_to_width(text, width);
    let gap = width.saturating_sub(display_width(&text));
    match align {
        Alignment::Left => format!("{}{}", text, " ".repeat(gap)),
        Alignment::Right => format!("{}{}", " ".repeat(gap), text),
        Alignment::Center => {
            let left = gap / 2;
            format!("{}{}{}", " ".repeat(left), text, " ".repeat(gap - left))
        }
    }
}

fn marker(marker: Option<SortMarker>) -> &'static str {
    match marker {
        None => "",
        Some(SortMarker::Unsorted) => " ↕",
        Some(SortMarker::Ascending) => " ▲",
        Some(SortMarker::Descending) => " ▼",
    }
}

fn checkbox(checked: Option<bool>) -> &'static str {
    match checked {
        None => "   ",
        Some(true) => "[x]",
        Some(false) => "[ ]",
    }
}

/// Header, body rows and open detail panels.
pub fn table(table: &TableController<Umkm>) -> String {
    let columns = table.visible_columns();
    let markers = table.order_markers();
    let headers: Vec<String> = columns
        .iter()
        .map(|(i, c)| format!("{}{}", c.name, marker(markers.get(*i).copied().flatten())))
        .collect();

    let rows = table.items().len();
    let widths: Vec<usize> = columns
        .iter()
        .zip(&headers)
        .map(|((i, _), header)| {
            (0..rows)
                .filter_map(|row| table.cell_text(row, *i))
                .map(|text| display_width(&text))
                .chain(std::iter::once(display_width(header)))
                .max()
                .unwrap_or(0)
                .min(MAX_CELL_WIDTH)
        })
        .collect();
    let number_width = rows.to_string().len().max(1);

    let mut out = String::new();
    let head = match table.header_checkbox() {
        HeaderCheck::All => "[x]",
        HeaderCheck::Some => "[-]",
        HeaderCheck::None => "[ ]",
    };
    let _ = write!(out, "{} {}", head, " ".repeat(number_width));
    for (header, width) in headers.iter().zip(&widths) {
        let _ = write!(out, " │ {}", pad(header, *width, Alignment::Left));
    }
    out.push('\n');

    match table.view_state() {
        ViewState::Loading => out.push_str("    Loading...\n"),
        ViewState::Empty => out.push_str("    No data available\n"),
        ViewState::Rows => {
            for row in 0..rows {
                let _ = write!(
                    out,
                    "{} {:>w$}",
                    checkbox(table.row_checkbox(row)),
                    row + 1,
                    w = number_width
                );
                for ((i, column), width) in columns.iter().zip(&widths) {
                    let text = table.cell_text(row, *i).unwrap_or_default();
                    let _ = write!(out, " │ {}", pad(&text, *width, column.align));
                }
                out.push('\n');

                if table.is_detail_open(row) {
                    for (i, column) in table.detail_columns() {
                        let text = table.cell_text(row, i).unwrap_or_default();
                        let _ = writeln!(out, "      {}: {}", column.name, text);
                    }
                }
            }
        }
    }
    out
}

/// Entry range, pager or load-more affordance, and selection status.
pub fn footer(table: &TableController<Umkm>) -> String {
    let mut out = String::new();
    let (first, last, total) = table.entry_range();
    let _ = write!(out, "Showing {} to {} of {} entries", first, last, total);
    if !table.search().is_empty() {
        let _ = write!(out, " (search: {:?})", table.search());
    }
    out.push('\n');

    match table.mode() {
        TableMode::Pagination => {
            let buttons: Vec<String> = table
                .page_buttons()
                .into_iter()
                .map(|page| match page {
                    ELLIPSIS => "…".to_string(),
                    p if p == table.page() => format!("[{}]", p),
                    p => p.to_string(),
                })
                .collect();
            if !buttons.is_empty() {
                let _ = writeln!(out, "Pages: {}   size {}", buttons.join(" "), table.page_size());
            }
        }
        TableMode::LoadMore => match table.load_more_state() {
            LoadMoreState::Available if table.is_loading() => out.push_str("Loading more...\n"),
            LoadMoreState::Available => out.push_str("Type `more` to load more\n"),
            LoadMoreState::Exhausted => out.push_str("No more data\n"),
            LoadMoreState::Hidden => {}
        },
    }

    if table.bulk_enabled() {
        let ids: Vec<String> = table.selected().iter().map(u32::to_string).collect();
        let _ = writeln!(
            out,
            "{} selected ({}); `delete` removes them",
            ids.len(),
            ids.join(", ")
        );
    }
    out
}

/// Visible rows of the permission tree.
pub fn tree(tree: &CheckTree) -> String {
    let mut out = String::new();
    for node in tree.visible() {
        let name = tree.node(node.id).map(|n| n.name.as_str()).unwrap_or("?");
        let expander = match (node.has_children, node.is_expanded) {
            (false, _) => " ",
            (true, true) => "▾",
            (true, false) => "▸",
        };
        let check = match node.state {
            CheckState::Checked => "[x]",
            CheckState::Unchecked => "[ ]",
            CheckState::Indeterminate => "[-]",
        };
        let _ = writeln!(
            out,
            "{}{} {} {} (#{})",
            "  ".repeat(node.depth as usize),
            expander,
            check,
            name,
            node.id
        );
    }
    out
}

pub fn toasts(toasts: &[(u64, Toast)]) -> String {
    let mut out = String::new();
    for (_, toast) in toasts {
        let icon = match toast.level {
            ToastLevel::Info => "i",
            ToastLevel::Success => "✓",
            ToastLevel::Warning => "!",
            ToastLevel::Error => "✗",
        };
        let _ = write!(out, "({}) {}", icon, toast.title);
        if let Some(body) = &toast.body {
            let _ = write!(out, ": {}", body);
        }
        out.push('\n');
    }
    out
}

pub fn dialog(dialog: &Dialog) -> String {
    let accent = if dialog.danger { "!! " } else { "" };
    format!(
        "{}{}\n{}\n[yes] {}   [no] {}\n",
        accent, dialog.title, dialog.message, dialog.confirm_label, dialog.cancel_label
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{columns, menu_fixture, seed};
    use umkm_grid::table::{Device, TableConfig};

    fn loaded(device: Device) -> TableController<Umkm> {
        let mut table = TableController::new(columns(), TableConfig::new().device(device));
        table.mount();
        table.set_data(seed(3), 3);
        table
    }

    #[test]
    fn test_truncate_and_pad() {
        assert_eq!(truncate_to_width("Warung Makmur", 6), "Warun…");
        assert_eq!(pad("7", 3, Alignment::Right), "  7");
        assert_eq!(pad("ab", 4, Alignment::Center), " ab ");
    }

    #[test]
    fn test_table_lists_rows_and_details() {
        let mut table = loaded(Device::Mobile);
        table.toggle_detail(1).unwrap();
        let text = super::table(&table);

        assert!(text.starts_with("[ ]"));
        assert!(text.contains("Name ↕"));
        assert!(text.contains("Toko Sari 1"));
        assert!(text.contains("      Code: UMKM-0002"));
        assert!(!text.contains("      Code: UMKM-0001"));
    }

    #[test]
    fn test_empty_and_loading_states() {
        let mut table = TableController::new(columns(), TableConfig::new());
        assert!(super::table(&table).contains("No data available"));
        table.set_loading(true);
        assert!(super::table(&table).contains("Loading..."));
    }

    #[test]
    fn test_footer_marks_current_page() {
        let mut table = TableController::new(columns(), TableConfig::new());
        table.mount();
        table.set_data(seed(10), 57);
        table.toggle_one(3);
        let text = footer(&table);
        assert!(text.contains("Showing 1 to 10 of 57 entries"));
        assert!(text.contains("Pages: [1] 2 3 4 5 6"));
        assert!(text.contains("1 selected (3)"));
    }

    #[test]
    fn test_tree_rows() {
        let tree = CheckTree::from_items(menu_fixture());
        let text = super::tree(&tree);
        assert!(text.starts_with(" [x] Dashboard (#1)"));
        assert!(text.contains("▾ [-] UMKM (#10)"));
        assert!(text.contains("  ▸ [ ] Reports (#13)"));
    }
}
