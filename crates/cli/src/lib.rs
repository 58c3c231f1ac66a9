pub mod bootstrap;
pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use trolley_core::config::{AppConfig, LoadOptions};

#[derive(Debug, Parser)]
#[command(
    name = "trolley",
    about = "Trolley storefront CLI",
    long_about = "Browse the product catalog and manage the stock-validated shopping cart.",
    after_help = "Examples:\n  trolley catalog\n  trolley add 1\n  trolley set-amount 1 3\n  trolley cart"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "List catalog products with their cart quantity badges")]
    Catalog,
    #[command(about = "Show the current cart lines and item total")]
    Cart,
    #[command(about = "Add one unit of a product to the cart")]
    Add {
        #[arg(help = "Catalog product id")]
        product_id: u64,
    },
    #[command(about = "Remove a product's line from the cart")]
    Remove {
        #[arg(help = "Catalog product id")]
        product_id: u64,
    },
    #[command(about = "Set a product's cart amount to an absolute value")]
    SetAmount {
        #[arg(help = "Catalog product id")]
        product_id: u64,
        #[arg(help = "Desired amount; zero or less is a no-op", allow_hyphen_values = true)]
        amount: i64,
    },
    #[command(about = "Apply pending snapshot store migrations")]
    Migrate,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config, store connectivity, and catalog reachability")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Command::Catalog => commands::catalog::run(),
        Command::Cart => commands::cart::run(),
        Command::Add { product_id } => commands::ops::run(commands::ops::CartOp::Add(product_id)),
        Command::Remove { product_id } => {
            commands::ops::run(commands::ops::CartOp::Remove(product_id))
        }
        Command::SetAmount { product_id, amount } => {
            commands::ops::run(commands::ops::CartOp::SetAmount(product_id, amount))
        }
        Command::Migrate => commands::migrate::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => commands::doctor::run(json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

fn init_logging() {
    use trolley_core::config::LogFormat::*;
    use tracing::Level;

    let Ok(config) = AppConfig::load(LoadOptions::default()) else {
        // Commands re-load config and report the failure themselves.
        return;
    };
    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    let init = match config.logging.format {
        Compact => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .compact()
            .try_init(),
        Pretty => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .pretty()
            .try_init(),
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().try_init()
        }
    };
    let _ = init;
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Command};

    #[test]
    fn parses_add_with_product_id() {
        let cli = Cli::try_parse_from(["trolley", "add", "7"]).expect("parse add");
        assert!(matches!(cli.command, Command::Add { product_id: 7 }));
    }

    #[test]
    fn parses_set_amount_with_negative_value() {
        let cli =
            Cli::try_parse_from(["trolley", "set-amount", "1", "-3"]).expect("parse set-amount");
        assert!(matches!(cli.command, Command::SetAmount { product_id: 1, amount: -3 }));
    }

    #[test]
    fn rejects_non_numeric_product_id() {
        assert!(Cli::try_parse_from(["trolley", "add", "sneaker"]).is_err());
    }
}
