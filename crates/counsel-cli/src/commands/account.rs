//! Account management commands

use crate::app::{AccountAction, AccountArgs, OutputFormat};
use crate::output::print_json;
use anyhow::Result;
use counsel_core::{Database, Role};
use serde_json::json;

pub fn run(args: AccountArgs, db: &Database, format: OutputFormat) -> Result<()> {
    match args.action {
        AccountAction::Add {
            name,
            role,
            email,
            credits,
        } => {
            let role = Role::parse(&role)?;
            let owner_id = db.create_account(&name, email.as_deref(), role, credits)?;
            match format {
                OutputFormat::Json => print_json(&json!({
                    "owner_id": owner_id,
                    "name": name,
                    "role": role.as_str(),
                    "balance": credits,
                }))?,
                OutputFormat::Cli => {
                    println!(
                        "Created {} account #{} ({} credits)",
                        role.as_str(),
                        owner_id,
                        credits
                    );
                }
            }
        }
        AccountAction::List => {
            let accounts = db.list_accounts()?;
            match format {
                OutputFormat::Json => {
                    let rows: Vec<_> = accounts
                        .iter()
                        .map(|a| {
                            json!({
                                "owner_id": a.owner_id,
                                "name": a.name,
                                "role": a.role.as_str(),
                                "balance": a.balance,
                            })
                        })
                        .collect();
                    print_json(&rows)?;
                }
                OutputFormat::Cli => {
                    for a in &accounts {
                        println!(
                            "#{} {} ({}) - {} credits",
                            a.owner_id,
                            a.name,
                            a.role.as_str(),
                            a.balance
                        );
                    }
                }
            }
        }
        AccountAction::Topup { owner_id, amount } => {
            if amount <= 0 {
                return Err(counsel_core::CounselError::InvalidAmount(amount).into());
            }
            let balance = db.top_up(owner_id, amount)?;
            match format {
                OutputFormat::Json => {
                    print_json(&json!({ "owner_id": owner_id, "balance": balance }))?
                }
                OutputFormat::Cli => {
                    println!("Account #{} balance: {} credits", owner_id, balance);
                }
            }
        }
        AccountAction::Balance { owner_id } => {
            let balance = db.balance(owner_id)?;
            match format {
                OutputFormat::Json => {
                    print_json(&json!({ "owner_id": owner_id, "balance": balance }))?
                }
                OutputFormat::Cli => {
                    println!("{}", balance);
                }
            }
        }
    }
    Ok(())
}
