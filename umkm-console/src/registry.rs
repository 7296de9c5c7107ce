//! The UMKM record, its table columns and the demo fixtures.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use umkm_grid::table::{Alignment, Column, Device, TableRow};
use umkm_grid::tree::MenuItem;

pub const CATEGORIES: [&str; 5] = ["kuliner", "fashion", "kerajinan", "pertanian", "jasa"];

const DISTRICTS: [&str; 6] = [
    "Bandung Wetan",
    "Cicendo",
    "Coblong",
    "Lengkong",
    "Sukajadi",
    "Antapani",
];

const PREFIXES: [&str; 8] = [
    "Warung", "Toko", "Batik", "Kopi", "Sentra", "Dapur", "Griya", "Kedai",
];

const SUFFIXES: [&str; 7] = ["Sari", "Makmur", "Jaya", "Lestari", "Abadi", "Barokah", "Mandiri"];

const OWNERS: [&str; 9] = [
    "Siti Rahma",
    "Budi Santoso",
    "Dewi Lestari",
    "Agus Pratama",
    "Rina Wati",
    "Joko Susilo",
    "Nur Aini",
    "Hendra Wijaya",
    "Lina Marlina",
];

/// One registered micro, small or medium enterprise.
#[derive(Debug, Clone, PartialEq)]
pub struct Umkm {
    /// `None` for drafts that were never saved.
    pub id: Option<u32>,
    pub code: String,
    pub name: String,
    pub owner: Option<String>,
    pub email: Option<String>,
    pub category: String,
    pub district: String,
    pub employees: i64,
    /// Annual revenue in rupiah.
    pub revenue: Decimal,
    pub registered: NaiveDate,
    pub verified: bool,
}

impl TableRow for Umkm {
    type Key = u32;

    fn key(&self) -> Option<u32> {
        self.id
    }
}

pub fn code_for(id: u32) -> String {
    format!("UMKM-{:04}", id)
}

/// `Rp 12.500.000` style amounts.
pub fn rupiah(amount: &Decimal) -> String {
    let whole = amount.round_dp(0).abs().to_string();
    let mut grouped = String::new();
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    let sign = if amount.is_sign_negative() && !amount.is_zero() { "-" } else { "" };
    format!("{}Rp {}", sign, grouped)
}

/// Table columns, widest tier last.
pub fn columns() -> Vec<Column<Umkm>> {
    vec![
        Column::new("Name", |u: &Umkm| u.name.clone().into())
            .field("name")
            .orderable()
            .width(30),
        Column::new("Code", |u: &Umkm| u.code.clone().into())
            .field("code")
            .copy()
            .min_device(Device::Tablet),
        Column::new("Owner", |u: &Umkm| u.owner.clone().into())
            .field("owner")
            .orderable()
            .min_device(Device::Desktop)
            .default_content(|| "-".to_string()),
        Column::new("Category", |u: &Umkm| u.category.clone().into())
            .field("category")
            .orderable()
            .min_device(Device::Tablet),
        Column::new("District", |u: &Umkm| u.district.clone().into())
            .field("district")
            .min_device(Device::Tv),
        Column::new("Employees", |u: &Umkm| u.employees.into())
            .field("employees")
            .orderable()
            .align(Alignment::Right)
            .min_device(Device::Desktop),
        Column::new("Revenue", |u: &Umkm| u.revenue.into())
            .field("revenue")
            .orderable()
            .align(Alignment::Right)
            .min_device(Device::Desktop)
            .render(|_, u| rupiah(&u.revenue)),
        Column::new("Registered", |u: &Umkm| u.registered.into())
            .field("registered")
            .orderable()
            .min_device(Device::Tablet),
        Column::new("Verified", |u: &Umkm| u.verified.into())
            .field("verified")
            .min_device(Device::None),
        Column::new("Email", |u: &Umkm| u.email.clone().into())
            .field("email")
            .copy()
            .min_device(Device::None)
            .default_content(|| "-".to_string()),
    ]
}

/// Deterministic demo registry.
pub fn seed(count: u32) -> Vec<Umkm> {
    (1..=count).map(seeded_row).collect()
}

fn seeded_row(id: u32) -> Umkm {
    let i = id as usize;
    let name = format!(
        "{} {} {}",
        PREFIXES[i % PREFIXES.len()],
        SUFFIXES[(i / PREFIXES.len()) % SUFFIXES.len()],
        id
    );
    let owner = (id % 5 != 0).then(|| OWNERS[(i * 7) % OWNERS.len()].to_string());
    let email = owner
        .as_ref()
        .filter(|_| id % 3 != 0)
        .map(|o| format!("{}@umkm.id", o.to_lowercase().replace(' ', ".")));
    let registered = NaiveDate::from_ymd_opt(
        2019 + (id % 6) as i32,
        1 + (id * 5) % 12,
        1 + (id * 11) % 28,
    )
    .unwrap_or_default();

    Umkm {
        id: Some(id),
        code: code_for(id),
        name,
        owner,
        email,
        category: CATEGORIES[i % CATEGORIES.len()].to_string(),
        district: DISTRICTS[(i * 3) % DISTRICTS.len()].to_string(),
        employees: 1 + ((id * 13) % 40) as i64,
        revenue: Decimal::from(((id * 7919) % 480 + 20) as u64 * 250_000),
        registered,
        verified: id % 4 != 1,
    }
}

/// Menu tree of the back office, as the role editor receives it.
pub fn menu_fixture() -> Vec<MenuItem> {
    vec![
        MenuItem::new(1, "Dashboard").icon("home").path("/").checked(true),
        MenuItem::new(10, "UMKM")
            .icon("store")
            .child(MenuItem::new(11, "Registry").path("/umkm").checked(true))
            .child(MenuItem::new(12, "Verification").path("/umkm/verification"))
            .child(
                MenuItem::new(13, "Reports")
                    .child(MenuItem::new(14, "Monthly").path("/umkm/reports/monthly"))
                    .child(MenuItem::new(15, "Annual").path("/umkm/reports/annual")),
            ),
        MenuItem::new(20, "Settings")
            .icon("gear")
            .child(MenuItem::new(21, "Users").path("/settings/users"))
            .child(MenuItem::new(22, "Roles").path("/settings/roles")),
    ]
}
