use crate::bootstrap::bootstrap;
use crate::commands::CommandResult;
use trolley_core::config::LoadOptions;
use trolley_core::Cart;

pub fn run() -> CommandResult {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "cart",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let result = runtime.block_on(async {
        let rt = bootstrap(LoadOptions::default())
            .await
            .map_err(|error| ("bootstrap", error.to_string(), 2u8))?;
        let cart = rt.manager.cart().await;
        rt.db_pool.close().await;
        Ok::<Cart, (&'static str, String, u8)>(cart)
    });

    match result {
        Ok(cart) => CommandResult::plain(render(&cart)),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("cart", error_class, message, exit_code)
        }
    }
}

fn render(cart: &Cart) -> String {
    if cart.is_empty() {
        return "cart is empty".to_string();
    }

    let mut lines = vec![format!("{:>4}  {:>6}  {:>10}  title", "id", "amount", "price")];
    for line in cart.lines() {
        lines.push(format!(
            "{:>4}  {:>6}  {:>10}  {}",
            line.product.id, line.amount, line.product.price, line.product.title
        ));
    }
    lines.push(format!("{} line(s), {} item(s)", cart.len(), cart.total_items()));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use trolley_core::{Cart, CartLine, Product, ProductId};

    use super::render;

    #[test]
    fn renders_an_empty_cart() {
        assert_eq!(render(&Cart::default()), "cart is empty");
    }

    #[test]
    fn renders_lines_and_totals() {
        let cart = Cart::new(vec![
            CartLine::new(
                Product {
                    id: ProductId(1),
                    title: "Sneaker 1".to_string(),
                    price: Decimal::new(17990, 2),
                    image: "https://cdn.example.com/1.jpg".to_string(),
                },
                2,
            ),
            CartLine::new(
                Product {
                    id: ProductId(2),
                    title: "Sneaker 2".to_string(),
                    price: Decimal::new(13990, 2),
                    image: "https://cdn.example.com/2.jpg".to_string(),
                },
                1,
            ),
        ]);

        let rendered = render(&cart);
        assert!(rendered.contains("Sneaker 1"));
        assert!(rendered.contains("2 line(s), 3 item(s)"));
    }
}
