use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use umkm_grid::form::{
    Choice, DateInput, DecimalInput, FileInput, FileMeta, Parsed, RadioGroup, Rules, Select,
    TextInput, TreeSelect, Validator,
};
use umkm_grid::tree::{CheckState, CheckTree, MenuItem};

fn menu_tree() -> CheckTree {
    CheckTree::from_items(vec![
        MenuItem::new(1, "Dashboard"),
        MenuItem::new(2, "Master")
            .child(MenuItem::new(3, "Users"))
            .child(MenuItem::new(4, "Roles")),
    ])
}

#[test]
fn test_required_and_first_error_per_field() {
    let name = TextInput::new("name", "  ".to_string());
    let email = TextInput::new("email", "not-an-email".to_string());

    let result = Validator::new()
        .field(&name, "name", |rules| {
            rules
                .required("Business name is required")
                .min_length(3, "Name is too short")
        })
        .field(&email, "email", |rules| rules.email("Please enter a valid email"))
        .validate();

    assert!(result.is_invalid());
    assert_eq!(result.errors().len(), 2);
    assert_eq!(result.first_invalid_control(), Some("name"));
    assert_eq!(result.error_for("email"), Some("Please enter a valid email"));
    assert_eq!(
        result.first_error().map(ToString::to_string).as_deref(),
        Some("name: Business name is required")
    );
    assert_eq!(
        name.error().as_deref(),
        Some("Business name is required")
    );
    assert!(email.has_error());
}

#[test]
fn test_validator_rereads_controls_on_each_run() {
    let email = TextInput::new("email", "owner@".to_string());
    let form = Validator::new().field(&email, "email", |rules| {
        rules
            .required("Email is required")
            .email("Please enter a valid email")
    });
    assert_eq!(form.len(), 1);

    assert!(form.validate().is_invalid());
    assert!(email.has_error());

    email.set("owner@warung.id".to_string());
    assert!(form.validate().is_valid());
    assert!(!email.has_error());
}

#[test]
fn test_pattern_rules() {
    let phone = TextInput::new("phone", "0812-3456".to_string());
    let result = Validator::new()
        .field(&phone, "phone", |rules| rules.pattern(r"^\d+$", "Digits only"))
        .validate();
    assert_eq!(result.first_error().map(|e| e.message.as_str()), Some("Digits only"));

    let broken = Validator::new()
        .field(&phone, "phone", |rules| rules.pattern(r"(", "Digits only"))
        .validate();
    assert!(broken.is_invalid());
}

#[test]
fn test_decimal_input_parsing() {
    let revenue = DecimalInput::new("revenue", Parsed::Empty);

    revenue.set_text("1 250_000.50");
    assert_eq!(
        revenue.get(),
        Parsed::Valid(Decimal::new(125_000_050, 2))
    );

    revenue.set_text("   ");
    assert!(revenue.get().is_empty());

    revenue.set_text("12abc");
    assert_eq!(revenue.get(), Parsed::Invalid("12abc".to_string()));
}

#[test]
fn test_decimal_rules() {
    let revenue = DecimalInput::new("revenue", Parsed::Empty);
    let form = Validator::new().field(&revenue, "revenue", |rules| {
        rules
            .present("Revenue is required")
            .parsed("Revenue must be a number")
            .min_value(Decimal::ZERO, "Revenue cannot be negative")
            .max_value(Decimal::new(1_000_000_000, 0), "Revenue is too large")
    });

    assert_eq!(form.validate().error_for("revenue"), Some("Revenue is required"));

    revenue.set_text("abc");
    assert_eq!(form.validate().error_for("revenue"), Some("Revenue must be a number"));

    revenue.set_text("-5");
    assert_eq!(form.validate().error_for("revenue"), Some("Revenue cannot be negative"));

    revenue.set_text("2000000000");
    assert_eq!(form.validate().error_for("revenue"), Some("Revenue is too large"));

    revenue.set_text("5000");
    assert!(form.validate().is_valid());
}

#[test]
fn test_date_input_and_bounds() {
    let founded = DateInput::new("founded", Parsed::Empty);
    founded.set_text("2031-02-01");
    assert_eq!(
        founded.get().value().copied(),
        NaiveDate::from_ymd_opt(2031, 2, 1)
    );

    let latest = NaiveDate::from_ymd_opt(2030, 12, 31).unwrap();
    let result = Validator::new()
        .field(&founded, "founded", |rules| {
            rules
                .parsed("Use YYYY-MM-DD")
                .not_before(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(), "Too early")
                .not_after(latest, "Date is in the future")
        })
        .validate();
    assert_eq!(
        result.first_error().map(|e| e.message.as_str()),
        Some("Date is in the future")
    );

    founded.set_text("01/02/2020");
    assert!(founded.get().is_invalid());
}

#[test]
fn test_choice_controls() {
    let category: Select = Select::new(
        "category",
        Choice::new([("food", "Food"), ("craft", "Craft")]),
    );
    let scale: RadioGroup = RadioGroup::new("scale", Choice::new([("micro", "Micro"), ("small", "Small")]));

    assert!(!category.select_value("textile"));
    assert!(category.select_value("craft"));
    assert_eq!(category.get().selected_value(), Some("craft"));

    let result = Validator::new()
        .field(&category, "category", |rules| rules.selected("Pick a category"))
        .field(&scale, "scale", |rules| rules.selected("Pick a scale"))
        .validate();
    assert_eq!(result.first_invalid_control(), Some("scale"));
}

#[test]
fn test_file_rules() {
    let logo = FileInput::new("logo", None);
    let form = Validator::new().field(&logo, "logo", |rules| {
        rules
            .file_required("Logo is required")
            .accepted(&["png", "JPG"], "Only PNG or JPG")
            .max_size(2 * 1024 * 1024, "Logo must be under 2 MB")
    });

    assert_eq!(form.validate().error_for("logo"), Some("Logo is required"));

    logo.set(Some(FileMeta::new("logo.PDF", 1_000)));
    assert_eq!(form.validate().error_for("logo"), Some("Only PNG or JPG"));

    logo.set(Some(FileMeta::new("logo.jpg", 3 * 1024 * 1024)));
    assert_eq!(form.validate().error_for("logo"), Some("Logo must be under 2 MB"));

    logo.set(Some(FileMeta::new("logo.Png", 10_000)));
    assert!(form.validate().is_valid());
    assert_eq!(FileMeta::new("archive", 1).extension(), None);
}

#[test]
fn test_tree_select_value_is_checked_ids() {
    let menus = TreeSelect::new("menus", menu_tree());
    let form = Validator::new()
        .field(&menus, "menus", |rules| rules.at_least(1, "Pick at least one menu"));

    assert!(form.validate().is_invalid());
    assert_eq!(menus.error().as_deref(), Some("Pick at least one menu"));

    menus.check(2, true).unwrap();
    assert_eq!(menus.checked_ids(), vec![2, 3, 4]);
    assert!(form.validate().is_valid());
    assert!(!menus.has_error());

    let visible = menus.with_tree(|tree| tree.visible().len());
    assert_eq!(visible, 4);
}

#[test]
fn test_tree_select_listener_may_read_the_control() {
    let slot: Arc<Mutex<Option<TreeSelect>>> = Arc::new(Mutex::new(None));
    let seen = Arc::new(Mutex::new(Vec::new()));

    let (slot_in, seen_in) = (Arc::clone(&slot), Arc::clone(&seen));
    let tree = menu_tree().on_checked_change(move |ids| {
        if let Some(menus) = slot_in.lock().unwrap().as_ref() {
            assert_eq!(menus.checked_ids(), ids);
            seen_in.lock().unwrap().push(menus.with_tree(|tree| tree.state(2)));
        }
    });
    let menus = TreeSelect::new("menus", tree);
    *slot.lock().unwrap() = Some(menus.clone());

    menus.check(3, true).unwrap();
    menus.with_tree(|tree| tree.check(4, true)).unwrap();
    menus.with_tree(|tree| tree.toggle_expanded(2)).unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![Some(CheckState::Indeterminate), Some(CheckState::Checked)]
    );
    slot.lock().unwrap().take();
}

#[test]
fn test_bool_rules() {
    use umkm_grid::form::Control;

    let terms = Control::new("terms", false);
    let form = Validator::new().field(&terms, "terms", |rules| rules.checked("Accept the terms"));
    assert!(form.validate().is_invalid());

    terms.set(true);
    assert!(form.validate().is_valid());
}

#[test]
fn test_string_comparison_rules() {
    let code = TextInput::new("code", "UMKM-0007".to_string());
    let form = Validator::new().field(&code, "code", |rules| {
        rules
            .contains("UMKM-", "Codes start with UMKM-")
            .equals("UMKM-0007", "Code does not match")
    });
    assert!(form.validate().is_valid());

    code.set("UMKM-0008".to_string());
    assert_eq!(form.validate().error_for("code"), Some("Code does not match"));
}

#[test]
fn test_rules_stand_alone() {
    let rules = Rules::<String>::new().required("x").max_length(3, "y");
    assert_eq!(rules.len(), 2);
    assert!(Rules::<bool>::new().is_empty());
}

#[tokio::test]
async fn test_async_rule_runs_in_declared_order() {
    let email = TextInput::new("email", "taken@warung.id".to_string());
    let lookups = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&lookups);

    let form = Validator::new().field(&email, "email", |rules| {
        rules
            .required("Email is required")
            .check_async(
                move |value: String| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    async move {
                        tokio::task::yield_now().await;
                        value != "taken@warung.id"
                    }
                },
                "Email already registered",
            )
            .email("Please enter a valid email")
    });

    let result = form.validate_async().await;
    assert_eq!(result.error_for("email"), Some("Email already registered"));
    assert_eq!(email.error().as_deref(), Some("Email already registered"));
    assert_eq!(lookups.load(Ordering::SeqCst), 1);

    email.set(String::new());
    let result = form.validate_async().await;
    assert_eq!(result.error_for("email"), Some("Email is required"));
    assert_eq!(lookups.load(Ordering::SeqCst), 1);

    email.set("fresh@warung.id".to_string());
    assert!(form.validate_async().await.is_valid());
    assert!(!email.has_error());
}

#[tokio::test]
async fn test_sync_validate_skips_async_rules() {
    let email = TextInput::new("email", "taken@warung.id".to_string());
    let form = Validator::new().field(&email, "email", |rules| {
        rules.check_async(|_value: String| async { false }, "never reached")
    });
    assert!(form.validate().is_valid());
    assert!(form.validate_async().await.is_invalid());
}
