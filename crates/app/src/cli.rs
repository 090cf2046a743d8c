use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use engine::Column;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Side {
    Debit,
    Credit,
}

impl From<Side> for Column {
    fn from(side: Side) -> Self {
        match side {
            Side::Debit => Column::Debit,
            Side::Credit => Column::Credit,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(flatten)]
    Ledger(LedgerCommand),
    /// Interactive session with undo/redo.
    Shell,
}

/// Actions available both one-shot and inside the shell. Entries are named
/// by id or by a unique id prefix.
#[derive(Debug, Subcommand)]
pub enum LedgerCommand {
    /// Show the active day.
    Show,
    /// Switch the active day (YYYY-MM-DD).
    Date { date: String },
    /// Add an entry; the amount may be an expression like `1200 - 350`.
    Add {
        #[arg(value_enum)]
        side: Side,
        account: String,
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        amount: Vec<String>,
    },
    /// Replace an entry's amount, sign included.
    SetAmount {
        id: String,
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        amount: Vec<String>,
    },
    /// Rename or re-amount an entry.
    Edit {
        id: String,
        #[arg(long)]
        account: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        amount: Option<String>,
    },
    /// Tick an entry (or clear it with --off).
    Check {
        id: String,
        #[arg(long)]
        off: bool,
    },
    Delete { id: String },
    /// Move an amount from one entry to another.
    Transfer {
        from: String,
        to: String,
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        amount: Vec<String>,
    },
    /// Activity of the active day, newest first.
    Log,
    /// Print the ledger sheet and write its metadata file.
    Print {
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Replace everything with the day stored in a PDF or JSON file.
    Restore { file: PathBuf },
    /// Delete the active day; pass `--confirm DELETE`.
    DeleteBook {
        #[arg(long, default_value = "")]
        confirm: String,
    },
    /// Search the command palette.
    Palette { query: Vec<String> },
}

/// One line typed into the shell.
#[derive(Debug, Parser)]
#[command(multicall = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Debug, Subcommand)]
pub enum ShellCommand {
    #[command(flatten)]
    Ledger(LedgerCommand),
    Undo,
    Redo,
    /// Run the n-th command of the last palette listing.
    Run { index: usize },
    /// Submit the open amount box.
    Set {
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        amount: Vec<String>,
    },
    /// Add with the account prefilled from the palette.
    Amount {
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        amount: Vec<String>,
    },
    /// Type the confirmation for a pending day deletion.
    Confirm { text: String },
    /// Turn the balanced-day message on or off.
    Celebrate,
    Quit,
}

/// The words of a trailing amount, rejoined into one expression.
pub fn amount_text(words: Vec<String>) -> String {
    words.join(" ")
}

/// Split a shell line into words; double quotes group words.
pub fn split_words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut in_word = false;
    for ch in line.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        words.push(current);
    }
    words
}
