//! Console command parsing.

use thiserror::Error;
use umkm_grid::GridError;
use umkm_grid::table::{Device, PageSize};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command `{0}`, type `help` for the list")]
    Unknown(String),
    #[error("`{command}` needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error("`{0}` is not a number")]
    InvalidNumber(String),
    #[error("unknown device `{0}` (none, mobile, tablet, desktop, tv)")]
    UnknownDevice(String),
    #[error("expected `on` or `off`, got `{0}`")]
    InvalidSwitch(String),
    #[error("register needs 6 fields separated by `;`, got {0}")]
    RegisterFields(usize),
    #[error("no column named `{0}`")]
    NoSuchColumn(String),
    #[error("no row {0} on screen")]
    NoSuchRow(usize),
    #[error("no business with id {0} on screen")]
    UnknownId(u32),
    #[error("unknown category `{0}`")]
    UnknownCategory(String),
    #[error("cannot encode menus: {0}")]
    Encode(String),
    #[error("nothing selected")]
    NothingSelected,
    #[error("answer the open dialog first (`yes` or `no`)")]
    DialogOpen,
    #[error("no dialog is open")]
    NoDialog,
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Raw text of a registration, one entry per form control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterInput {
    pub name: String,
    pub owner: String,
    pub email: String,
    pub category: String,
    pub revenue: String,
    pub registered: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuCommand {
    Show,
    Check(i64, bool),
    Open(i64),
    /// Print the tree as the API payload.
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Page(usize),
    Next,
    Prev,
    More,
    Size(PageSize),
    Search(String),
    /// Column header by label or field name.
    Sort(String),
    /// Select by business id.
    Select(u32),
    SelectAll,
    ClearSelection,
    /// 1-based row on screen.
    Detail(usize),
    Copy { row: usize, column: String },
    Device(Device),
    /// `None` shows every category.
    Filter(Option<String>),
    Refresh,
    Delete,
    Answer(bool),
    Menu(MenuCommand),
    Register(RegisterInput),
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. Returns `Ok(None)` for blank lines.
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "page" | "p" => Command::Page(number("page", "a page number", rest)?),
            "next" | "n" => Command::Next,
            "prev" => Command::Prev,
            "more" | "m" => Command::More,
            "size" => {
                let size: usize = number("size", "a page size", rest)?;
                Command::Size(PageSize::try_from(size)?)
            }
            "search" | "s" => Command::Search(rest.to_string()),
            "sort" => Command::Sort(required("sort", "a column", rest)?.to_string()),
            "select" => Command::Select(number("select", "a business id", rest)?),
            "select-all" => Command::SelectAll,
            "clear" => Command::ClearSelection,
            "detail" | "d" => Command::Detail(number("detail", "a row number", rest)?),
            "copy" => {
                let (row, column) = required("copy", "a row and a column", rest)?
                    .split_once(char::is_whitespace)
                    .ok_or(CommandError::MissingArgument {
                        command: "copy",
                        argument: "a row and a column",
                    })?;
                Command::Copy {
                    row: number("copy", "a row", row)?,
                    column: column.trim().to_string(),
                }
            }
            "device" => {
                let name = required("device", "a device name", rest)?;
                Command::Device(
                    Device::parse(name).ok_or_else(|| CommandError::UnknownDevice(name.to_string()))?,
                )
            }
            "filter" => match required("filter", "a category or `all`", rest)? {
                all if all.eq_ignore_ascii_case("all") => Command::Filter(None),
                category => Command::Filter(Some(category.to_ascii_lowercase())),
            },
            "refresh" => Command::Refresh,
            "delete" => Command::Delete,
            "yes" | "y" => Command::Answer(true),
            "no" => Command::Answer(false),
            "menu" => Command::Menu(parse_menu(rest)?),
            "register" => Command::Register(parse_register(rest)?),
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }

    /// Whether the command is allowed while a dialog waits for an answer.
    pub fn allowed_during_dialog(&self) -> bool {
        matches!(self, Command::Answer(_) | Command::Help | Command::Quit)
    }
}

fn required<'a>(
    command: &'static str,
    argument: &'static str,
    rest: &'a str,
) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument { command, argument })
    } else {
        Ok(rest)
    }
}

fn number<T: std::str::FromStr>(
    command: &'static str,
    argument: &'static str,
    rest: &str,
) -> Result<T, CommandError> {
    let raw = required(command, argument, rest)?;
    raw.parse()
        .map_err(|_| CommandError::InvalidNumber(raw.to_string()))
}

fn parse_menu(rest: &str) -> Result<MenuCommand, CommandError> {
    let mut parts = rest.split_whitespace();
    match parts.next() {
        None => Ok(MenuCommand::Show),
        Some("json") => Ok(MenuCommand::Json),
        Some("open") => Ok(MenuCommand::Open(number(
            "menu open",
            "a menu id",
            parts.next().unwrap_or(""),
        )?)),
        Some("check") => {
            let id = number("menu check", "a menu id", parts.next().unwrap_or(""))?;
            let value = match parts.next() {
                Some("on") => true,
                Some("off") => false,
                Some(other) => return Err(CommandError::InvalidSwitch(other.to_string())),
                None => {
                    return Err(CommandError::MissingArgument {
                        command: "menu check",
                        argument: "`on` or `off`",
                    });
                }
            };
            Ok(MenuCommand::Check(id, value))
        }
        Some(other) => Err(CommandError::Unknown(format!("menu {}", other))),
    }
}

/// `register NAME; OWNER; EMAIL; CATEGORY; REVENUE; YYYY-MM-DD`
fn parse_register(rest: &str) -> Result<RegisterInput, CommandError> {
    let fields: Vec<&str> = rest.split(';').map(str::trim).collect();
    let [name, owner, email, category, revenue, registered] = fields.as_slice() else {
        return Err(CommandError::RegisterFields(fields.len()));
    };
    Ok(RegisterInput {
        name: name.to_string(),
        owner: owner.to_string(),
        email: email.to_string(),
        category: category.to_string(),
        revenue: revenue.to_string(),
        registered: registered.to_string(),
    })
}
