//! Products

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::prices::Price;

/// Size labels offered for a product, in display order.
pub type SizeOptions = SmallVec<[String; 6]>;

/// Colour labels offered for a product, in display order.
pub type ColorOptions = SmallVec<[String; 4]>;

/// Product identifier, stable across sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u32);

impl ProductId {
    /// Wrap a raw identifier.
    pub const fn new(id: u32) -> Self {
        ProductId(id)
    }

    /// The raw identifier.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        ProductId(id)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for ProductId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(ProductId)
    }
}

/// Raised when a category label is not one of the fixed set.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

/// Product category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Shirts
    Shirts,

    /// Trousers
    Trousers,

    /// T-Shirts
    #[serde(rename = "T-Shirts")]
    TShirts,

    /// Suits
    Suits,
}

impl Category {
    /// Every category, in navigation order.
    pub const ALL: [Category; 4] = [
        Category::Shirts,
        Category::Trousers,
        Category::TShirts,
        Category::Suits,
    ];

    /// Display label, also used in the `category` query parameter.
    pub const fn label(self) -> &'static str {
        match self {
            Category::Shirts => "Shirts",
            Category::Trousers => "Trousers",
            Category::TShirts => "T-Shirts",
            Category::Suits => "Suits",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.label() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Category filter used by the product listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Every product.
    #[default]
    All,

    /// Only products in the given category.
    Only(Category),
}

impl CategoryFilter {
    /// Build a filter from an optional `category` query value.
    ///
    /// Missing, `All` and unrecognised values all select every product.
    pub fn from_query(value: Option<&str>) -> Self {
        value
            .and_then(|value| value.parse::<Category>().ok())
            .map_or(CategoryFilter::All, CategoryFilter::Only)
    }

    /// Check whether a product passes this filter.
    pub fn matches(self, product: &Product) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => product.category == category,
        }
    }
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        CategoryFilter::Only(category)
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("All"),
            CategoryFilter::Only(category) => fmt::Display::fmt(category, f),
        }
    }
}

/// Advisory stock level; never enforced against cart quantities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockStatus {
    /// Plenty available.
    #[default]
    InStock,

    /// Few left.
    LowStock,

    /// None available.
    OutOfStock,
}

/// Product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product identifier
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Brand name
    pub brand: String,

    /// Long description
    #[serde(default)]
    pub description: String,

    /// Static asset reference
    #[serde(default)]
    pub image: String,

    /// Shelf price
    pub price: Price,

    /// Sale price, never above the shelf price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<Price>,

    /// Rating in `[0, 5]`
    #[serde(default)]
    pub rating: f32,

    /// Product category
    pub category: Category,

    /// Available sizes
    pub size_options: SizeOptions,

    /// Available colours
    pub color_options: ColorOptions,

    /// Advisory stock level
    #[serde(default)]
    pub stock_status: StockStatus,
}

impl Product {
    /// The price a customer pays for one unit: the sale price when present.
    pub fn effective_price(&self) -> Price {
        self.discount_price.unwrap_or(self.price)
    }

    /// Whether the product carries a sale price.
    pub fn on_sale(&self) -> bool {
        self.discount_price.is_some()
    }

    /// Whether `size` is one of the offered sizes.
    pub fn has_size(&self, size: &str) -> bool {
        self.size_options.iter().any(|option| option == size)
    }

    /// Whether `color` is one of the offered colours.
    pub fn has_color(&self, color: &str) -> bool {
        self.color_options.iter().any(|option| option == color)
    }
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;
    use testresult::TestResult;

    use super::*;

    fn shirt() -> Product {
        Product {
            id: ProductId::new(1),
            name: "Oxford Shirt".to_string(),
            brand: "MenStyle".to_string(),
            description: String::new(),
            image: String::new(),
            price: Price::from_major(80),
            discount_price: Some(Price::from_major(60)),
            rating: 4.5,
            category: Category::Shirts,
            size_options: smallvec!["S".to_string(), "M".to_string()],
            color_options: smallvec!["White".to_string()],
            stock_status: StockStatus::InStock,
        }
    }

    #[test]
    fn effective_price_prefers_discount() {
        let mut product = shirt();

        assert_eq!(product.effective_price(), Price::from_major(60));
        assert!(product.on_sale());

        product.discount_price = None;

        assert_eq!(product.effective_price(), Price::from_major(80));
        assert!(!product.on_sale());
    }

    #[test]
    fn option_membership() {
        let product = shirt();

        assert!(product.has_size("M"));
        assert!(!product.has_size("XL"));
        assert!(product.has_color("White"));
        assert!(!product.has_color("white"));
    }

    #[test]
    fn category_round_trips_through_label() -> TestResult {
        for category in Category::ALL {
            assert_eq!(category.label().parse::<Category>()?, category);
        }

        Ok(())
    }

    #[test]
    fn tshirt_label_has_hyphen() -> TestResult {
        assert_eq!(serde_json::to_string(&Category::TShirts)?, "\"T-Shirts\"");
        assert_eq!("T-Shirts".parse::<Category>()?, Category::TShirts);

        Ok(())
    }

    #[test]
    fn filter_from_query() {
        assert_eq!(CategoryFilter::from_query(None), CategoryFilter::All);
        assert_eq!(CategoryFilter::from_query(Some("All")), CategoryFilter::All);
        assert_eq!(CategoryFilter::from_query(Some("Hats")), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::from_query(Some("Suits")),
            CategoryFilter::Only(Category::Suits)
        );
    }

    #[test]
    fn filter_matches_category() {
        let product = shirt();

        assert!(CategoryFilter::All.matches(&product));
        assert!(CategoryFilter::Only(Category::Shirts).matches(&product));
        assert!(!CategoryFilter::Only(Category::Suits).matches(&product));
    }

    #[test]
    fn product_json_uses_camel_case() -> TestResult {
        let json = serde_json::to_value(shirt())?;

        assert_eq!(json["discountPrice"], 6000);
        assert_eq!(json["sizeOptions"][1], "M");
        assert_eq!(json["stockStatus"], "InStock");

        Ok(())
    }

    #[test]
    fn product_id_parses_route_parameter() -> TestResult {
        assert_eq!(" 12 ".parse::<ProductId>()?, ProductId::new(12));
        assert!("abc".parse::<ProductId>().is_err());

        Ok(())
    }
}
