//! Cart domain types and the priced cart view.

use serde::Serialize;

use cartline_core::{CartId, CartItemId, CustomerId, Price, ProductId};

use super::product::Product;

/// A named cart owned by one customer.
///
/// `(customer_id, name)` identifies a cart; the same name may be used by
/// different customers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    pub id: CartId,
    pub customer_id: CustomerId,
    pub name: String,
}

/// One product line in a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub id: CartItemId,
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub quantity: i32,
}

/// What adding a product to a cart did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was created with the requested quantity.
    ItemAdded,
    /// An existing line's quantity was increased.
    QuantityUpdated,
}

impl AddOutcome {
    /// Client-facing message.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ItemAdded => "Product added to cart successfully",
            Self::QuantityUpdated => "Product quantity updated successfully",
        }
    }
}

/// A priced cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i32,
    pub price: Price,
    pub total_price: Price,
}

impl CartItemView {
    /// Price `item` using the catalog entry for its product.
    #[must_use]
    pub fn priced(item: &CartItem, product: Product) -> Self {
        Self {
            product_id: product.id,
            product_name: product.name,
            quantity: item.quantity,
            price: product.price,
            total_price: product.price.line_total(item.quantity),
        }
    }
}

/// A cart with its priced lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub cart_id: CartId,
    pub cart_name: String,
    pub items: Vec<CartItemView>,
    pub subtotal: Price,
}

impl CartView {
    #[must_use]
    pub fn new(cart: Cart, items: Vec<CartItemView>) -> Self {
        let subtotal = items.iter().map(|i| i.total_price).sum();
        Self {
            cart_id: cart.id,
            cart_name: cart.name,
            items,
            subtotal,
        }
    }
}

/// All carts of one customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartListing {
    /// The customer owns no carts at all.
    NoCarts,
    /// At least one cart; individual carts may still be empty.
    Carts(Vec<CartView>),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(price: &str, quantity: i32) -> CartItemView {
        let item = CartItem {
            id: CartItemId::new(1),
            cart_id: CartId::new(1),
            product_id: ProductId::new(7),
            quantity,
        };
        let product = Product {
            id: ProductId::new(7),
            name: "Teapot".to_owned(),
            description: "short and stout".to_owned(),
            price: Price::parse(price).unwrap(),
        };
        CartItemView::priced(&item, product)
    }

    #[test]
    fn test_line_total() {
        let view = line("12.50", 4);
        assert_eq!(view.total_price, Price::parse("50.00").unwrap());
        assert_eq!(view.product_name, "Teapot");
    }

    #[test]
    fn test_subtotal() {
        let cart = Cart {
            id: CartId::new(3),
            customer_id: CustomerId::new(1),
            name: "default".to_owned(),
        };
        let view = CartView::new(cart, vec![line("1.25", 2), line("0.10", 3)]);
        assert_eq!(view.subtotal, Price::parse("2.80").unwrap());
    }

    #[test]
    fn test_empty_cart_serializes_empty_items() {
        let cart = Cart {
            id: CartId::new(3),
            customer_id: CustomerId::new(1),
            name: "later".to_owned(),
        };
        let json = serde_json::to_value(CartView::new(cart, Vec::new())).unwrap();
        assert_eq!(json["items"], serde_json::json!([]));
        assert_eq!(json["subtotal"], "0");
        assert_eq!(json["cart_name"], "later");
    }
}
