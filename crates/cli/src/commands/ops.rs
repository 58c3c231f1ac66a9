use crate::bootstrap::{bootstrap, BootstrapError};
use crate::commands::CommandResult;
use trolley_core::config::LoadOptions;
use trolley_core::{CartError, ProductId};

/// The three cart mutations exposed on the command line.
#[derive(Debug, Clone, Copy)]
pub enum CartOp {
    Add(u64),
    Remove(u64),
    SetAmount(u64, i64),
}

impl CartOp {
    fn command(self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Remove(_) => "remove",
            Self::SetAmount(..) => "set-amount",
        }
    }

    fn product_id(self) -> ProductId {
        match self {
            Self::Add(id) | Self::Remove(id) | Self::SetAmount(id, _) => ProductId(id),
        }
    }
}

pub fn run(op: CartOp) -> CommandResult {
    let command = op.command();

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                command,
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let result = runtime.block_on(async {
        let rt = bootstrap(LoadOptions::default()).await.map_err(classify_bootstrap)?;
        let product_id = op.product_id();

        let outcome = match op {
            CartOp::Add(_) => rt.manager.add_product(product_id).await,
            CartOp::Remove(_) => rt.manager.remove_product(product_id).await,
            CartOp::SetAmount(_, amount) => {
                rt.manager.update_product_amount(product_id, amount).await
            }
        };
        outcome.map_err(classify_cart_error)?;

        let message = match op {
            CartOp::Add(_) => {
                let amount = rt.manager.quantity_of(product_id).await;
                format!("added product {product_id}; cart amount is now {amount}")
            }
            CartOp::Remove(_) => format!("removed product {product_id} from the cart"),
            CartOp::SetAmount(_, amount) if amount <= 0 => {
                format!("amount {amount} is not positive; cart left unchanged")
            }
            CartOp::SetAmount(_, amount) => {
                format!("set product {product_id} amount to {amount}")
            }
        };

        rt.db_pool.close().await;
        Ok::<String, (&'static str, String, u8)>(message)
    });

    match result {
        Ok(message) => CommandResult::success(command, message),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure(command, error_class, message, exit_code)
        }
    }
}

fn classify_bootstrap(error: BootstrapError) -> (&'static str, String, u8) {
    match error {
        BootstrapError::Config(error) => ("config_validation", error.to_string(), 2),
        BootstrapError::DatabaseConnect(error) => ("store_connectivity", error.to_string(), 4),
        BootstrapError::Migration(error) => ("migration", error.to_string(), 5),
        BootstrapError::Client(error) => ("service_client", error.to_string(), 6),
        BootstrapError::Restore(error) => ("cart_restore", error.to_string(), 6),
    }
}

fn classify_cart_error(error: CartError) -> (&'static str, String, u8) {
    let notice = error.user_notice().to_string();
    let class = match error {
        CartError::StockExceeded { .. } => "stock_exceeded",
        CartError::NotInCart(_) => "not_in_cart",
        CartError::Provider(_) => "provider",
        CartError::Store(_) => "store",
    };
    (class, notice, 1)
}
