//! # Operator Shell
//!
//! One command per line. Parsing is pure; execution forwards to the desk.
//!
//! ## Commands
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  login <id> <credential>      open a session                            │
//! │  logout                       close it                                  │
//! │  catalog                      numbered catalog                          │
//! │  home | waiting               numbered active / waiting queue           │
//! │  reserve <n>                  request catalog entry n                   │
//! │  promote <n>                  move waiting entry n up one slot          │
//! │  unreserve <n>                drop waiting entry n                      │
//! │  return <n>                   return home entry n                       │
//! │  accounts                     list account ids                          │
//! │  add <id> <credential> <max>  register an account (admin)               │
//! │  cancel <id>                  remove an account (admin)                 │
//! │  help | quit                                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::{self, BufRead, Write};

use flix_core::{ItemId, RequestOutcome};
use flix_system::{AccountManager, DeskResult, RentalDesk, SessionRole};
use thiserror::Error;

pub const HELP: &str = "\
login <id> <credential>      open a session
logout                       close the session
catalog                      show the catalog
home                         show titles at home
waiting                      show the waiting list
reserve <n>                  reserve catalog entry n
promote <n>                  move waiting entry n up one place
unreserve <n>                drop waiting entry n
return <n>                   return home entry n
accounts                     list accounts
add <id> <credential> <max>  add an account (admin)
cancel <id>                  cancel an account (admin)
help                         show this text
quit                         leave
";

// =============================================================================
// Parsing
// =============================================================================

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login { id: String, credential: String },
    Logout,
    Catalog,
    Home,
    Waiting,
    Reserve(usize),
    Promote(usize),
    Unreserve(usize),
    Return(usize),
    Accounts,
    Add { id: String, credential: String, limit: i64 },
    Cancel(String),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty line")]
    Empty,

    #[error("unknown command '{0}', try 'help'")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("'{0}' is not a number")]
    BadNumber(String),
}

/// Parses one input line.
pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Err(ParseError::Empty);
    };
    let args: Vec<&str> = words.collect();

    let command = match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("login", [id, credential]) => Command::Login {
            id: id.to_string(),
            credential: credential.to_string(),
        },
        ("login", _) => return Err(ParseError::Usage("login <id> <credential>")),
        ("logout", []) => Command::Logout,
        ("catalog", []) => Command::Catalog,
        ("home", []) => Command::Home,
        ("waiting", []) => Command::Waiting,
        ("reserve", [n]) => Command::Reserve(position(n)?),
        ("promote", [n]) => Command::Promote(position(n)?),
        ("unreserve", [n]) => Command::Unreserve(position(n)?),
        ("return", [n]) => Command::Return(position(n)?),
        ("reserve" | "promote" | "unreserve" | "return", _) => {
            return Err(ParseError::Usage("<reserve|promote|unreserve|return> <n>"))
        }
        ("accounts", []) => Command::Accounts,
        ("add", [id, credential, limit]) => Command::Add {
            id: id.to_string(),
            credential: credential.to_string(),
            limit: limit
                .parse()
                .map_err(|_| ParseError::BadNumber(limit.to_string()))?,
        },
        ("add", _) => return Err(ParseError::Usage("add <id> <credential> <max>")),
        ("cancel", [id]) => Command::Cancel(id.to_string()),
        ("cancel", _) => return Err(ParseError::Usage("cancel <id>")),
        ("help", _) => Command::Help,
        ("quit" | "exit", _) => Command::Quit,
        (other, _) => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(command)
}

fn position(word: &str) -> Result<usize, ParseError> {
    word.parse()
        .map_err(|_| ParseError::BadNumber(word.to_string()))
}

// =============================================================================
// Execution
// =============================================================================

/// Runs `command` against the desk and renders the reply.
pub fn execute(desk: &mut RentalDesk, command: Command) -> DeskResult<String> {
    let reply = match command {
        Command::Login { id, credential } => match desk.login(&id, &credential)? {
            SessionRole::Admin => "Logged in as administrator.\n".to_string(),
            SessionRole::Customer => format!("Welcome, {id}.\n"),
        },
        Command::Logout => match desk.logout() {
            Some(info) => format!("Goodbye, {}.\n", info.user),
            None => "Nobody is logged in.\n".to_string(),
        },
        Command::Catalog => numbered(desk.catalog_listing()),
        Command::Home => numbered(desk.active_listing()?),
        Command::Waiting => numbered(desk.waiting_listing()?),
        Command::Reserve(n) => match desk.reserve(n)? {
            RequestOutcome::Held => "Checked out.\n".to_string(),
            RequestOutcome::Waiting => "Added to the waiting list.\n".to_string(),
        },
        Command::Promote(n) => {
            desk.promote(n)?;
            "Moved up.\n".to_string()
        }
        Command::Unreserve(n) => {
            desk.unreserve(n)?;
            "Removed from the waiting list.\n".to_string()
        }
        Command::Return(n) => match desk.return_item(n)? {
            Some(item) => format!("Returned. {} is now at home.\n", title(desk, item)),
            None => "Returned.\n".to_string(),
        },
        Command::Accounts => desk
            .list_accounts()
            .unwrap_or_else(|| "(no accounts)\n".to_string()),
        Command::Add { id, credential, limit } => {
            let summary = desk.add_account(&id, &credential, limit)?;
            format!("Added {} (max {}).\n", summary.id, summary.limit)
        }
        Command::Cancel(id) => {
            let summary = desk.cancel_account(&id)?;
            format!("Cancelled {}.\n", summary.id)
        }
        Command::Help => HELP.to_string(),
        Command::Quit => String::new(),
    };
    Ok(reply)
}

fn title(desk: &RentalDesk, item: ItemId) -> String {
    desk.rentals()
        .catalog()
        .item(item)
        .map(|entry| entry.title().to_string())
        .unwrap_or_default()
}

/// Prefixes each listing line with its zero-based position.
fn numbered(listing: Option<String>) -> String {
    match listing {
        None => "(empty)\n".to_string(),
        Some(text) => text
            .lines()
            .enumerate()
            .map(|(n, line)| format!("{n:>3}  {line}\n"))
            .collect(),
    }
}

// =============================================================================
// Loop
// =============================================================================

/// Reads commands from `input` until `quit` or end of input.
pub fn run<R, W>(desk: &mut RentalDesk, input: R, mut out: W) -> io::Result<()>
where
    R: BufRead,
    W: Write,
{
    writeln!(out, "Flix Rental. Type 'help' for commands.")?;
    prompt(&mut out)?;
    for line in input.lines() {
        let line = line?;
        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => match execute(desk, command) {
                Ok(reply) => write!(out, "{reply}")?,
                Err(e) => writeln!(out, "error: {e}")?,
            },
            Err(ParseError::Empty) => {}
            Err(e) => writeln!(out, "error: {e}")?,
        }
        prompt(&mut out)?;
    }
    Ok(())
}

fn prompt<W: Write>(out: &mut W) -> io::Result<()> {
    write!(out, "> ")?;
    out.flush()
}
