//! Catalog Fixtures

use rusty_money::iso::Currency;
use serde::Deserialize;

use crate::{
    catalog::CatalogError,
    prices::{Price, currency_from_code, parse_price},
    products::{Category, Product, ProductId, StockStatus},
};

/// Wrapper for a catalog in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Currency code every product price must use (e.g., "USD")
    pub currency: String,

    /// Products in catalog order
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product identifier
    pub id: u32,

    /// Product name
    pub name: String,

    /// Brand name
    pub brand: String,

    /// Long description
    #[serde(default)]
    pub description: String,

    /// Static asset path
    #[serde(default)]
    pub image: String,

    /// Shelf price (e.g., "79.99 USD")
    pub price: String,

    /// Optional sale price, same format as `price`
    #[serde(default)]
    pub discount_price: Option<String>,

    /// Rating in `[0, 5]`
    #[serde(default)]
    pub rating: f32,

    /// Category label
    pub category: Category,

    /// Size labels
    pub sizes: Vec<String>,

    /// Colour labels
    pub colors: Vec<String>,

    /// Stock status
    #[serde(default)]
    pub stock: StockStatus,
}

impl CatalogFixture {
    /// Parse fixture YAML.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Yaml`] when the document does not match the fixture shape.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        Ok(serde_norway::from_str(yaml)?)
    }

    /// Resolve the fixture currency.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Price`] for unsupported currency codes.
    pub fn currency(&self) -> Result<&'static Currency, CatalogError> {
        Ok(currency_from_code(&self.currency)?)
    }
}

impl ProductFixture {
    /// Convert into a product, checking every price is in `currency`.
    ///
    /// # Errors
    ///
    /// Returns an error if a price cannot be parsed or uses another currency.
    pub fn into_product(self, currency: &'static Currency) -> Result<Product, CatalogError> {
        let id = ProductId::new(self.id);
        let price = parse_in_currency(id, &self.price, currency)?;
        let discount_price = self
            .discount_price
            .as_deref()
            .map(|discount| parse_in_currency(id, discount, currency))
            .transpose()?;

        Ok(Product {
            id,
            name: self.name,
            brand: self.brand,
            description: self.description,
            image: self.image,
            price,
            discount_price,
            rating: self.rating,
            category: self.category,
            size_options: self.sizes.into_iter().collect(),
            color_options: self.colors.into_iter().collect(),
            stock_status: self.stock,
        })
    }
}

fn parse_in_currency(
    id: ProductId,
    value: &str,
    currency: &'static Currency,
) -> Result<Price, CatalogError> {
    let (price, parsed_currency) = parse_price(value)?;

    if parsed_currency != currency {
        return Err(CatalogError::CurrencyMismatch {
            id,
            expected: currency.iso_alpha_code,
            found: parsed_currency.iso_alpha_code,
        });
    }

    Ok(price)
}
