use std::sync::{Arc, Mutex};

use umkm_grid::GridError;
use umkm_grid::table::{
    CellClick, Column, Device, FieldValue, HeaderCheck, LoadMoreState, PageSize, SortDirection,
    SortMarker, TableConfig, TableController, TableMode, TableOptions, TableRow, ViewState,
};

#[derive(Clone, Debug)]
struct Business {
    id: Option<u32>,
    name: String,
    owner: Option<String>,
    code: String,
    notes: String,
}

impl TableRow for Business {
    type Key = u32;

    fn key(&self) -> Option<u32> {
        self.id
    }
}

fn business(id: u32) -> Business {
    Business {
        id: Some(id),
        name: format!("Shop {}", id),
        owner: None,
        code: format!("UMKM-{:03}", id),
        notes: format!("note {}", id),
    }
}

fn page_of(start: u32, len: u32) -> Vec<Business> {
    (start..start + len).map(business).collect()
}

fn columns() -> Vec<Column<Business>> {
    vec![
        Column::new("Name", |b: &Business| b.name.clone().into())
            .field("name")
            .orderable(),
        Column::new("Owner", |b: &Business| b.owner.clone().into())
            .field("owner")
            .orderable()
            .default_content(|| "-".to_string()),
        Column::new("Code", |b: &Business| b.code.clone().into()).copy(),
        Column::new("Notes", |b: &Business| b.notes.clone().into()).min_device(Device::None),
    ]
}

type Requests = Arc<Mutex<Vec<TableOptions>>>;

fn controller(config: TableConfig) -> (TableController<Business>, Requests) {
    let requests: Requests = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&requests);
    let table = TableController::new(columns(), config)
        .on_render(move |options| sink.lock().unwrap().push(options.clone()));
    (table, requests)
}

fn count(requests: &Requests) -> usize {
    requests.lock().unwrap().len()
}

fn last(requests: &Requests) -> TableOptions {
    requests.lock().unwrap().last().cloned().unwrap()
}

#[test]
fn test_mount_fetches_once_with_default_order() {
    let (mut table, requests) =
        controller(TableConfig::new().default_order("name", SortDirection::Desc));
    assert!(!table.is_mounted());

    table.mount();

    assert_eq!(count(&requests), 1);
    assert_eq!(
        last(&requests),
        TableOptions {
            page: 1,
            length: PageSize::Ten,
            search: String::new(),
            order: Some(("name".to_string(), SortDirection::Desc)),
        }
    );
    assert_eq!(table.order_markers()[0], Some(SortMarker::Descending));
}

#[test]
fn test_mount_without_matching_default_is_unordered() {
    let (mut table, requests) =
        controller(TableConfig::new().default_order("missing", SortDirection::Asc));
    table.mount();
    assert_eq!(last(&requests).order, None);
}

#[test]
fn test_typing_does_not_fetch_but_submit_does() {
    let (mut table, requests) = controller(TableConfig::new());
    table.mount();
    table.set_data(page_of(1, 10), 95);
    table.go_to_page(3).unwrap();

    table.set_search_text("warung");
    assert_eq!(count(&requests), 2);

    table.submit_search();
    assert_eq!(count(&requests), 3);
    let options = last(&requests);
    assert_eq!(options.page, 1);
    assert_eq!(options.search, "warung");
}

#[test]
fn test_page_size_change_resets_page() {
    let (mut table, requests) = controller(TableConfig::new());
    table.mount();
    table.set_data(page_of(1, 10), 95);
    table.go_to_page(5).unwrap();

    table.set_page_size(PageSize::TwentyFive);

    let options = last(&requests);
    assert_eq!(options.page, 1);
    assert_eq!(options.length, PageSize::TwentyFive);
    assert_eq!(table.total_pages(), 4);
}

#[test]
fn test_page_navigation() {
    let (mut table, requests) = controller(TableConfig::new());
    table.mount();
    table.set_data(page_of(1, 10), 95);

    assert_eq!(table.go_to_page(4), Ok(true));
    assert_eq!(last(&requests).page, 4);
    assert_eq!(last(&requests).offset(), 30);

    assert_eq!(table.go_to_page(0), Ok(false));
    assert_eq!(
        table.go_to_page(11),
        Err(GridError::PageOutOfRange {
            page: 11,
            total_pages: 10
        })
    );
    assert_eq!(count(&requests), 2);
}

#[test]
fn test_next_and_prev_are_bounded() {
    let (mut table, requests) = controller(TableConfig::new());
    table.mount();
    table.set_data(page_of(1, 10), 20);

    assert_eq!(table.prev_page(), Ok(false));
    assert_eq!(table.next_page(), Ok(true));
    assert_eq!(table.next_page(), Ok(false));
    assert_eq!(table.page(), 2);
    assert_eq!(count(&requests), 2);
}

#[test]
fn test_page_buttons_follow_total() {
    let (mut table, _) = controller(TableConfig::new());
    table.mount();
    table.set_data(page_of(1, 10), 200);
    table.go_to_page(5).unwrap();
    assert_eq!(table.page_buttons(), vec![1, 0, 4, 5, 6, 0, 20]);
}

#[test]
fn test_header_click_flips_and_keeps_page() {
    let (mut table, requests) =
        controller(TableConfig::new().default_order("name", SortDirection::Desc));
    table.mount();
    table.set_data(page_of(1, 10), 95);
    table.go_to_page(2).unwrap();

    assert_eq!(table.click_header(0), Ok(("name".to_string(), SortDirection::Asc)));
    let options = last(&requests);
    assert_eq!(options.page, 2);
    assert_eq!(options.order, Some(("name".to_string(), SortDirection::Asc)));

    assert_eq!(table.click_header(1), Ok(("owner".to_string(), SortDirection::Asc)));
    assert_eq!(
        table.order_markers(),
        &[
            Some(SortMarker::Unsorted),
            Some(SortMarker::Ascending),
            None,
            None
        ]
    );
    assert_eq!(count(&requests), 4);
}

#[test]
fn test_header_click_on_plain_column_does_not_fetch() {
    let (mut table, requests) = controller(TableConfig::new());
    table.mount();
    assert_eq!(
        table.click_header(2),
        Err(GridError::NotOrderable("Code".to_string()))
    );
    assert_eq!(count(&requests), 1);
}

#[test]
fn test_filter_change_keeps_order_and_search() {
    let (mut table, requests) = controller(TableConfig::new());
    table.mount();
    table.set_data(page_of(1, 10), 95);
    table.click_header(1).unwrap();
    table.set_search_text("batik");
    table.submit_search();
    table.go_to_page(3).unwrap();

    table.filter_changed();

    let options = last(&requests);
    assert_eq!(options.page, 1);
    assert_eq!(options.search, "batik");
    assert_eq!(options.order, Some(("owner".to_string(), SortDirection::Asc)));
}

#[test]
fn test_load_more_accumulates() {
    let (mut table, requests) = controller(TableConfig::new().mode(TableMode::LoadMore));
    table.mount();
    table.set_data(page_of(1, 10), 25);
    assert_eq!(table.load_more_state(), LoadMoreState::Available);

    assert_eq!(table.load_more(), Ok(true));
    assert_eq!(last(&requests).page, 2);
    table.set_data(page_of(11, 10), 25);

    assert_eq!(table.load_more(), Ok(true));
    table.set_data(page_of(21, 5), 25);

    assert_eq!(table.items().len(), 25);
    assert_eq!(table.load_more_state(), LoadMoreState::Exhausted);
    assert_eq!(table.load_more(), Ok(false));
    assert_eq!(count(&requests), 3);
    assert_eq!(table.entry_range(), (1, 25, 25));
}

#[test]
fn test_load_more_is_blocked_while_loading() {
    let (mut table, requests) = controller(TableConfig::new().mode(TableMode::LoadMore));
    table.mount();
    table.set_data(page_of(1, 10), 25);
    table.set_loading(true);
    assert_eq!(table.load_more(), Ok(false));
    assert_eq!(count(&requests), 1);
}

#[test]
fn test_load_more_back_to_first_page_clears_rows() {
    let (mut table, _) = controller(TableConfig::new().mode(TableMode::LoadMore));
    table.mount();
    table.set_data(page_of(1, 10), 40);
    table.load_more().unwrap();
    table.set_data(page_of(11, 10), 40);

    table.filter_changed();
    assert!(table.items().is_empty());

    table.set_data(page_of(100, 10), 12);
    assert_eq!(table.items().len(), 10);
    assert_eq!(table.items()[0].id, Some(100));
}

#[test]
fn test_mode_guards() {
    let (mut table, _) = controller(TableConfig::new());
    assert_eq!(table.load_more(), Err(GridError::WrongMode("load_more")));

    let (mut table, requests) = controller(TableConfig::new().mode(TableMode::LoadMore));
    assert_eq!(table.go_to_page(2), Err(GridError::WrongMode("pagination")));

    table.mount();
    table.set_data(page_of(1, 10), 40);
    assert_eq!(table.next_page(), Err(GridError::WrongMode("pagination")));
    assert_eq!(table.prev_page(), Err(GridError::WrongMode("pagination")));

    table.set_data(Vec::new(), 0);
    assert_eq!(table.next_page(), Err(GridError::WrongMode("pagination")));
    assert_eq!(count(&requests), 1);
}

#[test]
fn test_set_filter_refetches_only_on_change() {
    let (mut table, requests) = controller(TableConfig::new());

    assert!(table.set_filter(&None::<String>));
    assert!(table.is_mounted());
    assert_eq!(count(&requests), 1);

    table.set_data(page_of(1, 10), 40);
    table.go_to_page(3).unwrap();
    assert!(!table.set_filter(&None::<String>));
    assert_eq!(count(&requests), 2);
    assert_eq!(table.page(), 3);

    assert!(table.set_filter(&Some("kuliner".to_string())));
    assert_eq!(count(&requests), 3);
    assert_eq!(last(&requests).page, 1);

    assert!(!table.set_filter(&Some("kuliner".to_string())));
    table.filter_changed();
    assert_eq!(count(&requests), 4);
}

#[test]
fn test_caller_flag_overrides_load_more_state() {
    let (mut table, _) = controller(TableConfig::new().mode(TableMode::LoadMore));
    table.mount();
    table.set_data(page_of(1, 10), 25);
    table.set_load_more(LoadMoreState::from_flag(2));
    assert_eq!(table.load_more_state(), LoadMoreState::Hidden);
    assert_eq!(table.load_more(), Ok(false));
}

#[test]
fn test_refresh_resets_without_fetching() {
    let (mut table, requests) = controller(TableConfig::new());
    table.mount();
    table.set_data(page_of(1, 10), 95);
    table.set_search_text("kopi");
    table.submit_search();
    table.go_to_page(2).unwrap();

    table.refresh();

    assert_eq!(count(&requests), 3);
    assert!(table.items().is_empty());
    assert_eq!(table.page(), 1);
    assert_eq!(table.search(), "");
}

#[test]
fn test_detail_panels_are_independent_and_reset_on_navigation() {
    let (mut table, _) = controller(TableConfig::new());
    table.mount();
    table.set_data(page_of(1, 10), 95);

    assert_eq!(table.click_cell(0, 0), Ok(CellClick::Detail(true)));
    assert_eq!(table.toggle_detail(3), Ok(true));
    assert!(table.is_detail_open(0));
    assert!(table.is_detail_open(3));

    assert_eq!(table.click_cell(0, 0), Ok(CellClick::Detail(false)));
    assert!(table.is_detail_open(3));

    table.go_to_page(2).unwrap();
    assert!(!table.is_detail_open(3));
    assert_eq!(table.toggle_detail(42), Err(GridError::UnknownRow(42)));
}

#[test]
fn test_copy_column_does_not_toggle_detail() {
    let (mut table, _) = controller(TableConfig::new());
    table.mount();
    table.set_data(page_of(7, 1), 1);

    assert_eq!(
        table.click_cell(0, 2),
        Ok(CellClick::Copy("UMKM-007".to_string()))
    );
    assert!(!table.is_detail_open(0));
    assert_eq!(table.click_cell(0, 1), Ok(CellClick::Ignored));
}

#[test]
fn test_cell_text_uses_default_content() {
    let (mut table, _) = controller(TableConfig::new());
    table.mount();
    table.set_data(page_of(1, 1), 1);
    assert_eq!(table.cell_text(0, 1).as_deref(), Some("-"));
    assert_eq!(table.cell_text(0, 0).as_deref(), Some("Shop 1"));
    assert_eq!(table.cell_text(5, 0), None);
}

#[test]
fn test_device_tier_splits_columns() {
    let (mut table, _) = controller(TableConfig::new());
    let visible: Vec<usize> = table.visible_columns().iter().map(|(i, _)| *i).collect();
    assert_eq!(visible, vec![0, 1, 2]);
    assert_eq!(table.detail_columns().len(), 1);

    table.set_device(Device::None);
    assert!(table.visible_columns().is_empty());
    assert_eq!(table.detail_columns().len(), 4);
}

#[test]
fn test_keyless_rows_are_not_selectable() {
    let selections: Arc<Mutex<Vec<Vec<u32>>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&selections);
    let (table, _) = controller(TableConfig::new());
    let mut table = table.on_check_box(move |ids| sink.lock().unwrap().push(ids.to_vec()));

    let mut rows = page_of(1, 2);
    rows.push(Business {
        id: None,
        ..business(99)
    });
    table.set_data(rows, 3);

    assert_eq!(table.row_checkbox(2), None);
    assert_eq!(table.row_checkbox(0), Some(false));

    assert!(table.toggle_all());
    assert_eq!(table.selected(), &[1, 2]);
    assert_eq!(table.header_checkbox(), HeaderCheck::All);

    assert!(!table.toggle_all());
    assert!(table.selected().is_empty());

    assert!(table.toggle_one(2));
    assert_eq!(table.header_checkbox(), HeaderCheck::Some);
    assert!(table.bulk_enabled());

    let calls = selections.lock().unwrap();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0], vec![1, 2]);
    assert_eq!(calls[2], vec![2]);
}

#[test]
fn test_selection_survives_page_change() {
    let (mut table, _) = controller(TableConfig::new());
    table.mount();
    table.set_data(page_of(1, 10), 20);
    table.toggle_one(4);
    table.go_to_page(2).unwrap();
    table.set_data(page_of(11, 10), 20);

    assert_eq!(table.selected(), &[4]);
    assert_eq!(table.header_checkbox(), HeaderCheck::None);
}

#[test]
fn test_view_state() {
    let (mut table, _) = controller(TableConfig::new());
    assert_eq!(table.view_state(), ViewState::Empty);
    table.mount();
    table.set_loading(true);
    assert_eq!(table.view_state(), ViewState::Loading);
    table.set_data(page_of(1, 3), 3);
    table.set_loading(false);
    assert_eq!(table.view_state(), ViewState::Rows);
}

#[test]
fn test_entry_range_in_pagination() {
    let (mut table, _) = controller(TableConfig::new());
    assert_eq!(table.entry_range(), (0, 0, 0));
    table.mount();
    table.set_data(page_of(1, 10), 95);
    table.go_to_page(10).unwrap();
    table.set_data(page_of(91, 5), 95);
    assert_eq!(table.entry_range(), (91, 95, 95));
}

#[test]
fn test_page_size_rejects_unknown_values() {
    assert_eq!(PageSize::try_from(25_usize), Ok(PageSize::TwentyFive));
    assert_eq!(PageSize::try_from(20_usize), Err(GridError::InvalidPageSize(20)));
}

#[test]
fn test_field_value_display() {
    assert_eq!(FieldValue::Null.to_string(), "");
    assert_eq!(FieldValue::from(Some(3_i64)).to_string(), "3");
    assert_eq!(FieldValue::from(None::<i64>), FieldValue::Null);
    assert_eq!(FieldValue::Bool(true).to_string(), "Yes");
}
