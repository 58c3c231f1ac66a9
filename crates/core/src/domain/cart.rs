use serde::{Deserialize, Serialize};

use crate::domain::product::{Product, ProductId};

/// One product's entry in the cart. The product fields are flattened so the
/// serialized form stays a flat object of `{id, title, price, image, amount}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub product: Product,
    pub amount: u32,
}

impl CartLine {
    pub fn new(product: Product, amount: u32) -> Self {
        Self { product, amount }
    }

    pub fn product_id(&self) -> ProductId {
        self.product.id
    }
}

/// Ordered sequence of cart lines, one per distinct product id. Insertion
/// order is the order products were first added. Serializes transparently as
/// a JSON array of lines.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Builds a cart from lines, keeping only the first line per product id.
    pub fn new(lines: Vec<CartLine>) -> Self {
        let mut cart = Self::default();
        for line in lines {
            if cart.line(line.product_id()).is_none() {
                cart.lines.push(line);
            }
        }
        cart
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id() == product_id)
    }

    /// Quantity currently in the cart for a product, 0 when absent.
    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.line(product_id).map_or(0, |line| line.amount)
    }

    /// Total number of items across all lines.
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.amount)).sum()
    }

    pub(crate) fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.product_id() == product_id)
    }

    /// Appends a new line. Existing line for the same product wins; the
    /// duplicate is dropped to preserve the uniqueness invariant.
    pub(crate) fn push(&mut self, line: CartLine) {
        if self.line(line.product_id()).is_none() {
            self.lines.push(line);
        }
    }

    /// Removes the line for a product. Returns false when no line matched.
    pub(crate) fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.product_id() != product_id);
        self.lines.len() < before
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{Cart, CartLine};
    use crate::domain::product::{Product, ProductId};

    fn line(id: u64, amount: u32) -> CartLine {
        CartLine::new(
            Product {
                id: ProductId(id),
                title: format!("Sneaker {id}"),
                price: Decimal::new(17990, 2),
                image: format!("https://cdn.example.com/{id}.jpg"),
            },
            amount,
        )
    }

    #[test]
    fn keeps_insertion_order() {
        let cart = Cart::new(vec![line(3, 1), line(1, 2), line(2, 1)]);
        let ids: Vec<u64> = cart.lines().iter().map(|l| l.product_id().0).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn drops_duplicate_product_ids_on_construction() {
        let cart = Cart::new(vec![line(1, 2), line(1, 5)]);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(ProductId(1)), 2);
    }

    #[test]
    fn quantity_of_absent_product_is_zero() {
        let cart = Cart::new(vec![line(1, 2)]);
        assert_eq!(cart.quantity_of(ProductId(9)), 0);
    }

    #[test]
    fn remove_reports_whether_a_line_matched() {
        let mut cart = Cart::new(vec![line(1, 2), line(2, 1)]);
        assert!(cart.remove(ProductId(1)));
        assert!(!cart.remove(ProductId(1)));
        assert_eq!(cart.len(), 1);
        assert!(cart.line(ProductId(1)).is_none());
    }

    #[test]
    fn serializes_as_flat_line_array() {
        let cart = Cart::new(vec![line(1, 2)]);
        let json = serde_json::to_value(&cart).expect("serialize cart");
        let entry = &json[0];
        assert_eq!(entry["id"], 1);
        assert_eq!(entry["amount"], 2);
        assert_eq!(entry["title"], "Sneaker 1");
    }

    #[test]
    fn snapshot_round_trip_preserves_ids_amounts_and_order() {
        let cart = Cart::new(vec![line(2, 1), line(7, 4)]);
        let raw = serde_json::to_string(&cart).expect("serialize cart");
        let reloaded: Cart = serde_json::from_str(&raw).expect("deserialize cart");
        assert_eq!(reloaded, cart);
    }
}
