//! Cart line items

use serde::{Deserialize, Serialize};

use crate::{
    prices::Price,
    products::{Product, ProductId},
};

/// Identity of a cart row: two additions with the same key merge.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    /// Product identifier
    pub id: ProductId,

    /// Selected size label
    pub size: String,

    /// Selected colour label
    pub color: String,
}

impl LineKey {
    /// Build a key from borrowed parts.
    pub fn new(id: ProductId, size: &str, color: &str) -> Self {
        LineKey {
            id,
            size: size.to_string(),
            color: color.to_string(),
        }
    }
}

/// One cart row: a product snapshot plus the chosen variant and quantity.
///
/// The product is copied in, so later catalog changes never alter stored rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    /// Product as it was when added
    #[serde(flatten)]
    pub product: Product,

    /// Chosen size
    pub selected_size: String,

    /// Chosen colour
    pub selected_color: String,

    /// Units, at least 1 once in a cart
    pub quantity: u32,
}

impl CartLineItem {
    /// Snapshot `product` with the chosen variant.
    pub fn new(
        product: &Product,
        size: impl Into<String>,
        color: impl Into<String>,
        quantity: u32,
    ) -> Self {
        CartLineItem {
            product: product.clone(),
            selected_size: size.into(),
            selected_color: color.into(),
            quantity,
        }
    }

    /// Product identifier
    pub fn id(&self) -> ProductId {
        self.product.id
    }

    /// The row's identity key.
    pub fn key(&self) -> LineKey {
        LineKey::new(self.product.id, &self.selected_size, &self.selected_color)
    }

    /// Whether this row has the given identity.
    pub fn matches(&self, id: ProductId, size: &str, color: &str) -> bool {
        self.product.id == id && self.selected_size == size && self.selected_color == color
    }

    /// Whether the chosen size and colour are among the product's options.
    pub fn has_valid_selection(&self) -> bool {
        self.product.has_size(&self.selected_size) && self.product.has_color(&self.selected_color)
    }

    /// Unit price paid: the sale price when present.
    pub fn unit_price(&self) -> Price {
        self.product.effective_price()
    }

    /// Unit price times quantity.
    pub fn line_total(&self) -> Price {
        self.unit_price().times(self.quantity)
    }
}
