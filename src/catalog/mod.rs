//! Catalog
//!
//! The static, read-only product list. Products are validated once when the
//! catalog is built; lookups never fail beyond "not found".

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    prices::PriceError,
    products::{CategoryFilter, Product, ProductId},
};

pub mod fixture;

use fixture::CatalogFixture;

const BUNDLED_CATALOG_YAML: &str = include_str!("../../fixtures/catalog/menstyle.yml");

/// Catalog construction errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// YAML parsing error
    #[error("failed to parse catalog YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Price string could not be parsed
    #[error(transparent)]
    Price(#[from] PriceError),

    /// Product priced in a different currency from the catalog
    #[error("product {id} is priced in {found}, but the catalog uses {expected}")]
    CurrencyMismatch {
        /// Offending product
        id: ProductId,

        /// Catalog currency code
        expected: &'static str,

        /// Product currency code
        found: &'static str,
    },

    /// Two products share an identifier
    #[error("duplicate product id {0}")]
    DuplicateId(ProductId),

    /// Shelf or sale price is zero
    #[error("product {0} must have a positive price")]
    NonPositivePrice(ProductId),

    /// Sale price is higher than the shelf price
    #[error("product {0} has a discount price above its price")]
    DiscountAbovePrice(ProductId),

    /// Rating outside `[0, 5]`
    #[error("product {0} has rating {1}, expected a value between 0 and 5")]
    RatingOutOfRange(ProductId, f32),

    /// No size labels
    #[error("product {0} has no size options")]
    NoSizeOptions(ProductId),

    /// No colour labels
    #[error("product {0} has no colour options")]
    NoColorOptions(ProductId),
}

/// Catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    index: FxHashMap<ProductId, usize>,
    currency: &'static Currency,
}

impl Catalog {
    /// Build a catalog from products in display order.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if any product breaks a catalog invariant.
    pub fn new(
        products: impl Into<Vec<Product>>,
        currency: &'static Currency,
    ) -> Result<Self, CatalogError> {
        let products = products.into();
        let mut index = FxHashMap::default();

        for (position, product) in products.iter().enumerate() {
            validate(product)?;

            if index.insert(product.id, position).is_some() {
                return Err(CatalogError::DuplicateId(product.id));
            }
        }

        Ok(Catalog {
            products,
            index,
            currency,
        })
    }

    /// Load a catalog from fixture YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML cannot be parsed, a price is malformed,
    /// or a product breaks a catalog invariant.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let fixture = CatalogFixture::from_yaml(yaml)?;
        let currency = fixture.currency()?;

        let products = fixture
            .products
            .into_iter()
            .map(|product| product.into_product(currency))
            .collect::<Result<Vec<_>, _>>()?;

        Catalog::new(products, currency)
    }

    /// The catalog shipped with the storefront.
    ///
    /// # Errors
    ///
    /// Returns an error only if the embedded fixture is invalid.
    pub fn bundled() -> Result<Self, CatalogError> {
        Catalog::from_yaml(BUNDLED_CATALOG_YAML)
    }

    /// Find a product by identifier.
    pub fn find_by_id(&self, id: ProductId) -> Option<&Product> {
        self.index
            .get(&id)
            .and_then(|position| self.products.get(*position))
    }

    /// Find a product from the raw `:id` route parameter.
    pub fn find_by_route_param(&self, id: &str) -> Option<&Product> {
        id.parse().ok().and_then(|id| self.find_by_id(id))
    }

    /// Products matching the filter, in catalog order.
    pub fn filter_by_category(&self, filter: impl Into<CategoryFilter>) -> Vec<&Product> {
        let filter = filter.into();

        self.products
            .iter()
            .filter(|product| filter.matches(product))
            .collect()
    }

    /// Iterate over every product in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Currency every price is expressed in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

fn validate(product: &Product) -> Result<(), CatalogError> {
    let id = product.id;

    if product.price.minor() == 0 {
        return Err(CatalogError::NonPositivePrice(id));
    }

    if let Some(discount) = product.discount_price {
        if discount.minor() == 0 {
            return Err(CatalogError::NonPositivePrice(id));
        }

        if discount > product.price {
            return Err(CatalogError::DiscountAbovePrice(id));
        }
    }

    if !(0.0..=5.0).contains(&product.rating) {
        return Err(CatalogError::RatingOutOfRange(id, product.rating));
    }

    if product.size_options.is_empty() {
        return Err(CatalogError::NoSizeOptions(id));
    }

    if product.color_options.is_empty() {
        return Err(CatalogError::NoColorOptions(id));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use smallvec::smallvec;
    use testresult::TestResult;

    use crate::{
        prices::Price,
        products::{Category, StockStatus},
    };

    use super::*;

    fn product(id: u32, category: Category) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            brand: "Brand".to_string(),
            description: String::new(),
            image: String::new(),
            price: Price::from_major(50),
            discount_price: None,
            rating: 4.0,
            category,
            size_options: smallvec!["S".to_string()],
            color_options: smallvec!["Black".to_string()],
            stock_status: StockStatus::InStock,
        }
    }

    #[test]
    fn bundled_catalog_loads() -> TestResult {
        let catalog = Catalog::bundled()?;

        assert_eq!(catalog.len(), 8);
        assert_eq!(catalog.currency(), USD);

        for category in Category::ALL {
            assert!(
                !catalog.filter_by_category(category).is_empty(),
                "bundled catalog should stock {category}"
            );
        }

        Ok(())
    }

    #[test]
    fn find_by_id_and_route_param() -> TestResult {
        let catalog = Catalog::new(
            [product(1, Category::Shirts), product(2, Category::Suits)],
            USD,
        )?;

        assert_eq!(
            catalog.find_by_id(ProductId::new(2)).map(|p| p.category),
            Some(Category::Suits)
        );
        assert!(catalog.find_by_id(ProductId::new(3)).is_none());
        assert!(catalog.find_by_route_param("1").is_some());
        assert!(catalog.find_by_route_param("shirt").is_none());

        Ok(())
    }

    #[test]
    fn filter_preserves_catalog_order() -> TestResult {
        let catalog = Catalog::new(
            [
                product(3, Category::Shirts),
                product(1, Category::Suits),
                product(2, Category::Shirts),
            ],
            USD,
        )?;

        let shirts: Vec<u32> = catalog
            .filter_by_category(Category::Shirts)
            .iter()
            .map(|product| product.id.get())
            .collect();
        let all: Vec<u32> = catalog
            .filter_by_category(CategoryFilter::All)
            .iter()
            .map(|product| product.id.get())
            .collect();

        assert_eq!(shirts, vec![3, 2]);
        assert_eq!(all, vec![3, 1, 2]);

        Ok(())
    }

    #[test]
    fn duplicate_ids_rejected() {
        let result = Catalog::new(
            [product(1, Category::Shirts), product(1, Category::Suits)],
            USD,
        );

        assert!(matches!(result, Err(CatalogError::DuplicateId(id)) if id.get() == 1));
    }

    #[test]
    fn discount_above_price_rejected() {
        let mut bad = product(1, Category::Shirts);
        bad.discount_price = Some(Price::from_major(51));

        let result = Catalog::new([bad], USD);

        assert!(matches!(result, Err(CatalogError::DiscountAbovePrice(_))));
    }

    #[test]
    fn rating_out_of_range_rejected() {
        let mut bad = product(1, Category::Shirts);
        bad.rating = 5.5;

        let result = Catalog::new([bad], USD);

        assert!(matches!(result, Err(CatalogError::RatingOutOfRange(_, _))));
    }

    #[test]
    fn empty_options_rejected() {
        let mut no_sizes = product(1, Category::Shirts);
        no_sizes.size_options.clear();
        let mut no_colors = product(2, Category::Shirts);
        no_colors.color_options.clear();

        assert!(matches!(
            Catalog::new([no_sizes], USD),
            Err(CatalogError::NoSizeOptions(_))
        ));
        assert!(matches!(
            Catalog::new([no_colors], USD),
            Err(CatalogError::NoColorOptions(_))
        ));
    }

    #[test]
    fn zero_price_rejected() {
        let mut free = product(1, Category::Shirts);
        free.price = Price::default();

        assert!(matches!(
            Catalog::new([free], USD),
            Err(CatalogError::NonPositivePrice(_))
        ));
    }
}
