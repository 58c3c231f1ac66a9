use crate::bootstrap::bootstrap;
use crate::commands::CommandResult;
use trolley_core::config::LoadOptions;
use trolley_core::{Product, ProductCatalog};

pub fn run() -> CommandResult {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "catalog",
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

        let products = rt
            .client
            .products()
            .await
            .map_err(|error| ("catalog_fetch", error.to_string(), 1u8))?;

        let mut rows = Vec::with_capacity(products.len());
        for product in &products {
            let badge = rt.manager.quantity_of(product.id).await;
            rows.push((product.clone(), badge));
        }

        rt.db_pool.close().await;
        Ok::<Vec<(Product, u32)>, (&'static str, String, u8)>(rows)
    });

    match result {
        Ok(rows) => CommandResult::plain(render(&rows)),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("catalog", error_class, message, exit_code)
        }
    }
}

fn render(rows: &[(Product, u32)]) -> String {
    if rows.is_empty() {
        return "catalog is empty".to_string();
    }

    let mut lines = vec![format!("{:>4}  {:>10}  {:>7}  title", "id", "price", "in cart")];
    for (product, badge) in rows {
        lines.push(format!(
            "{:>4}  {:>10}  {:>7}  {}",
            product.id, product.price, badge, product.title
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use trolley_core::{Product, ProductId};

    use super::render;

    #[test]
    fn renders_an_empty_catalog() {
        assert_eq!(render(&[]), "catalog is empty");
    }

    #[test]
    fn renders_badges_next_to_products() {
        let rows = vec![(
            Product {
                id: ProductId(1),
                title: "Sneaker 1".to_string(),
                price: Decimal::new(17990, 2),
                image: "https://cdn.example.com/1.jpg".to_string(),
            },
            3,
        )];

        let rendered = render(&rows);
        assert!(rendered.contains("Sneaker 1"));
        assert!(rendered.contains('3'));
    }
}
