// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Interactive shell over the accounts ledger.
//!
//! The shell is the trusted boundary: it authenticates nobody (usernames
//! are taken at face value, as the library expects from its caller), but it
//! does validate primitive input formats - amounts are parsed and truncated
//! to two decimal places before the core ever sees them - and it reports
//! every error kind distinctly instead of collapsing them.

use accounts_demo_rs::{AccountsError, Repository, Session, TransactionKind, logic};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::process;
use tracing_subscriber::EnvFilter;

/// Accounts Shell - drive the in-memory ledger from a command loop
///
/// Seeds a repository with admin users and reads commands from stdin.
/// Type `help` at the prompt for the command list.
#[derive(Parser, Debug)]
#[command(name = "accounts-demo-rs")]
#[command(about = "An interactive shell over the in-memory accounts ledger", long_about = None)]
struct Args {
    /// Seed a single admin with this username instead of the defaults
    /// (alice, bob)
    #[arg(long, value_name = "USERNAME")]
    admin: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let repository = match args.admin.as_deref() {
        Some(username) => Repository::make(username),
        None => Repository::make_default(),
    };

    if let Err(e) = run(&repository, io::stdin().lock(), io::stdout()) {
        eprintln!("shell error: {e}");
        process::exit(1);
    }
}

fn run<R: BufRead, W: Write>(
    repository: &Repository,
    input: R,
    mut output: W,
) -> io::Result<()> {
    let mut session: Option<Session<'_>> = None;

    writeln!(output, "accounts shell - type 'help' for commands")?;

    for line in input.lines() {
        let line = line?;
        let tokens: Vec<&str> = line.split_whitespace().collect();

        let Some((&command, args)) = tokens.split_first() else {
            continue;
        };

        if matches!(command, "quit" | "exit") {
            break;
        }

        match dispatch(repository, &mut session, command, args, &mut output)? {
            Ok(()) => {}
            Err(e) => writeln!(output, "error [{}]: {e}", error_kind(&e))?,
        }
    }

    Ok(())
}

/// Runs one command. The outer `Result` is shell I/O, the inner one is the
/// ledger's verdict.
fn dispatch<'r, W: Write>(
    repository: &'r Repository,
    session: &mut Option<Session<'r>>,
    command: &str,
    args: &[&str],
    output: &mut W,
) -> io::Result<Result<(), AccountsError>> {
    // Commands that manage the session itself.
    match (command, args) {
        ("help", _) => {
            print_help(output)?;
            return Ok(Ok(()));
        }
        ("login", [username]) => {
            return Ok(match logic::login(repository, username) {
                Ok(new_session) => {
                    writeln!(output, "logged in as '{username}'")?;
                    *session = Some(new_session);
                    Ok(())
                }
                Err(e) => Err(e),
            });
        }
        ("logout", []) => {
            let Some(mut current) = session.take() else {
                writeln!(output, "not logged in")?;
                return Ok(Ok(()));
            };
            return Ok(match logic::logout(&mut current) {
                Ok(()) => {
                    writeln!(output, "logged out")?;
                    Ok(())
                }
                Err(e) => Err(e),
            });
        }
        ("whoami", []) => {
            match session {
                Some(current) => {
                    let user = current.user();
                    let role = if user.is_admin { "admin" } else { "user" };
                    writeln!(output, "{} ({role})", user.username)?;
                }
                None => writeln!(output, "not logged in")?,
            }
            return Ok(Ok(()));
        }
        _ => {}
    }

    // Everything else needs a session.
    let Some(current) = session.as_ref() else {
        writeln!(output, "not logged in - use: login <username>")?;
        return Ok(Ok(()));
    };

    let result = match (command, args) {
        ("create-user", [username]) => logic::create_user(current, username).map(|user| {
            let _ = writeln!(output, "created user '{}'", user.username);
        }),
        ("create-client", [owner, first, last]) => {
            logic::create_client(current, owner, first, last).map(|client| {
                let _ = writeln!(output, "created client {}", client.client_id);
            })
        }
        ("create-account", [client_id]) => {
            logic::create_account(current, client_id).map(|account| {
                let _ = writeln!(output, "created account {}", account.account_number);
            })
        }
        ("create-account", [owner, first, last]) => {
            logic::create_account_with_owner(current, owner, first, last).map(|account| {
                let _ = writeln!(output, "created account {}", account.account_number);
            })
        }
        ("credit" | "debit", [account_number, amount, memo @ ..]) => {
            let kind = if command == "credit" {
                TransactionKind::Credit
            } else {
                TransactionKind::Debit
            };
            match parse_amount(amount) {
                Ok(amount) => {
                    let memo = (!memo.is_empty()).then(|| memo.join(" "));
                    logic::execute_transaction(
                        current,
                        account_number,
                        kind,
                        amount,
                        memo.as_deref(),
                    )
                    .map(|()| {
                        let _ = writeln!(output, "ok");
                    })
                }
                Err(reason) => {
                    writeln!(output, "invalid amount '{amount}': {reason}")?;
                    return Ok(Ok(()));
                }
            }
        }
        ("balance", [account_number]) => {
            logic::get_balance(current, account_number).map(|balance| {
                let _ = writeln!(output, "{balance:.2}");
            })
        }
        ("history", [account_number]) => {
            logic::get_transaction_history(current, account_number).map(|history| {
                for entry in &history {
                    let _ = writeln!(
                        output,
                        "{}  {:>6}  {:>12.2}  {}",
                        entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                        entry.kind.to_string(),
                        entry.amount,
                        entry.memo.as_deref().unwrap_or("")
                    );
                }
                let _ = writeln!(output, "({} entries)", history.len());
            })
        }
        _ => {
            writeln!(output, "unknown command '{command}' - type 'help'")?;
            return Ok(Ok(()));
        }
    };

    Ok(result)
}

/// Boundary-side amount validation: parse, require a sane magnitude, and
/// truncate to two decimal places. The core stores whatever it is given.
fn parse_amount(raw: &str) -> Result<f64, &'static str> {
    let amount: f64 = raw.parse().map_err(|_| "not a number")?;

    if !amount.is_finite() {
        return Err("not a finite number");
    }
    if amount < 0.0 {
        return Err("must not be negative");
    }

    Ok((amount * 100.0).trunc() / 100.0)
}

fn error_kind(error: &AccountsError) -> &'static str {
    match error {
        AccountsError::Authentication(_) => "authentication",
        AccountsError::InvalidSession => "invalid-session",
        AccountsError::InvalidRequest(_) => "invalid-request",
        AccountsError::Authorization(_) => "authorization",
        AccountsError::Overdraft(_) => "overdraft",
    }
}

fn print_help<W: Write>(output: &mut W) -> io::Result<()> {
    writeln!(
        output,
        "commands:\n  \
         login <username>\n  \
         logout\n  \
         whoami\n  \
         create-user <username>\n  \
         create-client <owner> <first> <last>\n  \
         create-account <C#####>\n  \
         create-account <owner> <first> <last>\n  \
         credit <A#####> <amount> [memo...]\n  \
         debit <A#####> <amount> [memo...]\n  \
         balance <A#####>\n  \
         history <A#####>\n  \
         quit"
    )
}
