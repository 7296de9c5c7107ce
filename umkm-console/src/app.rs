//! Composition root.
//!
//! Wires the table controller, the permission tree and the notifier to the
//! in-memory registry. The controller only announces fetches through its
//! render callback; [`App::sync`] performs them.

use std::fmt::Write;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use rust_decimal::Decimal;
use tokio::sync::oneshot;
use umkm_grid::form::{
    Choice, DateInput, DecimalInput, Parsed, Select, TextInput, TreeSelect, ValidationResult,
    Validator,
};
use umkm_grid::notify::{Dialog, Notifier, NotifyCenter, Toast};
use umkm_grid::table::{CellClick, TableController, TableOptions};
use umkm_grid::tree::CheckTree;

use crate::backend::{NewUmkm, Registry};
use crate::command::{Command, CommandError, MenuCommand, RegisterInput};
use crate::registry::{self, CATEGORIES, Umkm};
use crate::render;
use crate::settings::ConsoleSettings;

/// What the prompt loop does after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Print this text once, above the next screen.
    Show(String),
    Quit,
}

/// A bulk delete waiting for its confirmation dialog.
struct PendingDelete {
    ids: Vec<u32>,
    answer: oneshot::Receiver<bool>,
}

pub struct App {
    table: TableController<Umkm>,
    /// Options of the fetch the controller asked for last.
    pending: Arc<Mutex<Option<TableOptions>>>,
    registry: Registry,
    center: NotifyCenter,
    menus: TreeSelect,
    show_menus: bool,
    category: Option<String>,
    settings: ConsoleSettings,
    pending_delete: Option<PendingDelete>,
    queries: usize,
}

impl App {
    pub fn new(settings: ConsoleSettings, registry: Registry, center: NotifyCenter) -> Self {
        let pending = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&pending);
        let table = TableController::new(registry::columns(), settings.table_config())
            .on_render(move |options| {
                *sink.lock().unwrap_or_else(|e| e.into_inner()) = Some(options.clone());
            })
            .on_check_box(|ids| log::debug!("[app] selection {:?}", ids));

        let tree = CheckTree::from_items(registry::menu_fixture())
            .on_checked_change(|ids| log::debug!("[app] role menus {:?}", ids));

        Self {
            table,
            pending,
            registry,
            center,
            menus: TreeSelect::new("menus", tree),
            show_menus: false,
            category: None,
            settings,
            pending_delete: None,
            queries: 0,
        }
    }

    pub fn settings(&self) -> &ConsoleSettings {
        &self.settings
    }

    pub fn table(&self) -> &TableController<Umkm> {
        &self.table
    }

    /// Backend queries issued so far.
    pub fn queries(&self) -> usize {
        self.queries
    }

    /// First activation.
    pub async fn start(&mut self) {
        self.table.set_filter(&self.category);
        self.sync().await;
    }

    /// Run the fetch the controller asked for, if any.
    async fn sync(&mut self) {
        let options = self.pending.lock().unwrap_or_else(|e| e.into_inner()).take();
        let Some(options) = options else { return };

        self.table.set_loading(true);
        let page = self
            .registry
            .query(&options, self.category.as_deref())
            .await;
        self.queries += 1;
        self.table.set_data(page.rows, page.total);
        self.table.set_loading(false);
    }

    pub fn prune(&self, now: Instant) {
        self.center.prune(now);
    }

    /// Surface a rejected command.
    pub fn report(&self, error: &CommandError) {
        log::warn!("[app] {}", error);
        self.center.toast(Toast::error(error.to_string()));
    }

    /// The whole screen.
    pub fn screen(&self) -> String {
        let mut out = String::new();
        out.push_str(&render::toasts(&self.center.toasts()));
        out.push_str(&render::table(&self.table));
        out.push_str(&render::footer(&self.table));
        if let Some(category) = &self.category {
            let _ = writeln!(out, "Category: {}", category);
        }
        if self.show_menus {
            out.push_str("\nRole menus\n");
            out.push_str(&self.menus.with_tree(|tree| render::tree(tree)));
        }
        if let Some(dialog) = self.center.top_dialog() {
            out.push('\n');
            out.push_str(&render::dialog(&dialog));
        }
        out
    }

    pub async fn handle(&mut self, command: Command) -> Result<Flow, CommandError> {
        if self.center.dialog_count() > 0 && !command.allowed_during_dialog() {
            return Err(CommandError::DialogOpen);
        }
        log::debug!("[app] {:?}", command);

        let flow = match command {
            Command::Page(page) => {
                self.table.go_to_page(page)?;
                Flow::Continue
            }
            Command::Next => {
                self.table.next_page()?;
                Flow::Continue
            }
            Command::Prev => {
                self.table.prev_page()?;
                Flow::Continue
            }
            Command::More => {
                if !self.table.load_more()? {
                    self.center.toast(Toast::info("No more data"));
                }
                Flow::Continue
            }
            Command::Size(size) => {
                self.settings.page_size = size;
                self.table.set_page_size(size);
                Flow::Continue
            }
            Command::Search(text) => {
                self.table.set_search_text(text);
                self.table.submit_search();
                Flow::Continue
            }
            Command::Sort(column) => {
                let index = self.column_index(&column)?;
                self.table.click_header(index)?;
                Flow::Continue
            }
            Command::Select(id) => {
                if !self.table.items().iter().any(|r| r.id == Some(id)) {
                    return Err(CommandError::UnknownId(id));
                }
                self.table.toggle_one(id);
                Flow::Continue
            }
            Command::SelectAll => {
                self.table.toggle_all();
                Flow::Continue
            }
            Command::ClearSelection => {
                self.table.clear_selection();
                Flow::Continue
            }
            Command::Detail(row) => {
                let index = row.checked_sub(1).ok_or(CommandError::NoSuchRow(row))?;
                self.table
                    .toggle_detail(index)
                    .map_err(|_| CommandError::NoSuchRow(row))?;
                Flow::Continue
            }
            Command::Copy { row, column } => self.copy(row, &column)?,
            Command::Device(device) => {
                self.settings.device = device;
                self.table.set_device(device);
                Flow::Continue
            }
            Command::Filter(category) => {
                if category.as_deref().is_some_and(|c| !CATEGORIES.contains(&c)) {
                    return Err(CommandError::UnknownCategory(category.unwrap_or_default()));
                }
                self.category = category;
                self.table.set_filter(&self.category);
                Flow::Continue
            }
            Command::Refresh => {
                self.table.refresh();
                self.table.filter_changed();
                Flow::Continue
            }
            Command::Delete => self.ask_delete()?,
            Command::Answer(confirmed) => self.answer(confirmed).await?,
            Command::Menu(menu) => self.menu(menu)?,
            Command::Register(input) => self.register(input).await,
            Command::Help => Flow::Show(render::HELP.to_string()),
            Command::Quit => Flow::Quit,
        };

        self.sync().await;
        Ok(flow)
    }

    /// Index of a column by header label or field name.
    fn column_index(&self, name: &str) -> Result<usize, CommandError> {
        self.table
            .columns()
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name) || c.field.eq_ignore_ascii_case(name))
            .ok_or_else(|| CommandError::NoSuchColumn(name.to_string()))
    }

    fn copy(&mut self, row: usize, column: &str) -> Result<Flow, CommandError> {
        let index = self.column_index(column)?;
        if !self.table.columns()[index].copy {
            self.center
                .toast(Toast::warning(format!("{} cannot be copied", column)));
            return Ok(Flow::Continue);
        }
        let row_index = row.checked_sub(1).ok_or(CommandError::NoSuchRow(row))?;
        match self
            .table
            .click_cell(row_index, index)
            .map_err(|_| CommandError::NoSuchRow(row))?
        {
            CellClick::Copy(text) => {
                self.center
                    .toast(Toast::success("Copied to clipboard").with_body(text.clone()));
                Ok(Flow::Show(text))
            }
            CellClick::Detail(_) | CellClick::Ignored => Ok(Flow::Continue),
        }
    }

    fn ask_delete(&mut self) -> Result<Flow, CommandError> {
        let ids = self.table.selected().to_vec();
        if ids.is_empty() {
            return Err(CommandError::NothingSelected);
        }
        let dialog = Dialog::new(
            "Delete businesses",
            format!("Delete {} selected business(es)? This cannot be undone.", ids.len()),
        )
        .labels("Delete", "Cancel")
        .danger();
        let answer = self.center.confirm(dialog);
        self.pending_delete = Some(PendingDelete { ids, answer });
        Ok(Flow::Continue)
    }

    async fn answer(&mut self, confirmed: bool) -> Result<Flow, CommandError> {
        if !self.center.answer(confirmed) {
            return Err(CommandError::NoDialog);
        }
        let Some(pending) = self.pending_delete.take() else {
            return Ok(Flow::Continue);
        };

        match pending.answer.await {
            Ok(true) => {
                let removed = self.registry.delete(&pending.ids).await;
                self.table.clear_selection();
                self.center
                    .toast(Toast::success(format!("Deleted {} business(es)", removed)));
                self.table.filter_changed();
            }
            Ok(false) => self.center.toast(Toast::info("Nothing deleted")),
            Err(_) => log::warn!("[app] delete dialog closed without an answer"),
        }
        Ok(Flow::Continue)
    }

    fn menu(&mut self, command: MenuCommand) -> Result<Flow, CommandError> {
        match command {
            MenuCommand::Show => self.show_menus = !self.show_menus,
            MenuCommand::Check(id, value) => {
                self.menus.check(id, value)?;
                self.show_menus = true;
            }
            MenuCommand::Open(id) => {
                self.menus.with_tree(|tree| tree.toggle_expanded(id))?;
                self.show_menus = true;
            }
            MenuCommand::Json => {
                let items = self.menus.with_tree(|tree| tree.to_items());
                let json = serde_json::to_string_pretty(&items)
                    .map_err(|e| CommandError::Encode(e.to_string()))?;
                return Ok(Flow::Show(json));
            }
        }
        Ok(Flow::Continue)
    }

    async fn register(&mut self, input: RegisterInput) -> Flow {
        let name = TextInput::new("name", input.name);
        let owner = TextInput::new("owner", input.owner);
        let email = TextInput::new("email", input.email);
        let category = Select::new(
            "category",
            Choice::new(CATEGORIES.iter().map(|c| (*c, *c))),
        );
        category.select_value(&input.category.to_ascii_lowercase());
        let revenue = DecimalInput::new("revenue", Parsed::Empty);
        revenue.set_text(&input.revenue);
        let registered = DateInput::new("registered", Parsed::Empty);
        registered.set_text(&input.registered);

        let registry = self.registry.clone();
        let today = chrono::Local::now().date_naive();

        let form = Validator::new()
            .field(&name, "name", |rules| {
                rules
                    .required("Business name is required")
                    .min_length(3, "Business name needs at least 3 characters")
                    .max_length(60, "Business name is too long")
                    .check_async(
                        move |value: String| {
                            let registry = registry.clone();
                            async move { !registry.name_taken(&value).await }
                        },
                        "A business with this name is already registered",
                    )
            })
            .field(&owner, "owner", |rules| {
                rules.max_length(60, "Owner name is too long")
            })
            .field(&email, "email", |rules| rules.email("Please enter a valid email"))
            .field(&category, "category", |rules| {
                rules.selected("Pick one of: kuliner, fashion, kerajinan, pertanian, jasa")
            })
            .field(&revenue, "revenue", |rules| {
                rules
                    .present("Revenue is required")
                    .parsed("Revenue must be a number")
                    .min_value(Decimal::ZERO, "Revenue cannot be negative")
            })
            .field(&registered, "registered", |rules| {
                rules
                    .present("Registration date is required")
                    .parsed("Use the YYYY-MM-DD date format")
                    .not_after(today, "Registration date cannot be in the future")
            });

        if let ValidationResult::Invalid(errors) = form.validate_async().await {
            let mut out = String::from("Registration rejected:\n");
            for error in &errors {
                let _ = writeln!(out, "  {}", error);
            }
            self.center.toast(Toast::error("Registration rejected").with_body(format!(
                "{} field(s) need attention",
                errors.len()
            )));
            return Flow::Show(out);
        }

        let (Parsed::Valid(revenue), Parsed::Valid(registered)) = (revenue.get(), registered.get())
        else {
            return Flow::Continue;
        };
        let optional = |value: String| (!value.trim().is_empty()).then_some(value);
        let new = NewUmkm {
            name: name.get().trim().to_string(),
            owner: optional(owner.get()),
            email: optional(email.get()),
            category: category
                .get()
                .selected_value()
                .unwrap_or(CATEGORIES[0])
                .to_string(),
            revenue,
            registered,
        };
        let id = self.registry.insert(new).await;
        self.center
            .toast(Toast::success(format!("Registered {}", registry::code_for(id))));
        self.table.filter_changed();
        Flow::Continue
    }
}
