//! Routes

use std::{borrow::Cow, fmt};

use url::form_urlencoded;

use crate::products::{Category, CategoryFilter, ProductId};

/// Pages of the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    /// Landing page, `/`
    #[default]
    Home,

    /// Product listing, `/products?category=...`
    Products {
        /// Category from the query string, if one was given
        category: Option<Category>,
    },

    /// Product detail, `/product/:id`
    Product {
        /// Product identifier from the path
        id: ProductId,
    },

    /// Checkout, `/checkout`
    Checkout,
}

impl Route {
    /// Parse a path with an optional query string.
    ///
    /// Returns `None` for paths the storefront does not serve.
    pub fn parse(path: &str) -> Option<Self> {
        let (path, query) = path.split_once('?').unwrap_or((path, ""));
        let path = path.trim_end_matches('/');

        match path {
            "" => Some(Route::Home),
            "/products" => {
                let category = query_value(query, "category");
                let category = match CategoryFilter::from_query(category.as_deref()) {
                    CategoryFilter::All => None,
                    CategoryFilter::Only(category) => Some(category),
                };

                Some(Route::Products { category })
            }
            "/checkout" => Some(Route::Checkout),
            _ => path
                .strip_prefix("/product/")
                .and_then(|id| id.parse().ok())
                .map(|id| Route::Product { id }),
        }
    }

    /// Category filter for the listing page, `All` elsewhere.
    pub fn category_filter(self) -> CategoryFilter {
        match self {
            Route::Products {
                category: Some(category),
            } => CategoryFilter::Only(category),
            _ => CategoryFilter::All,
        }
    }
}

/// First value of `name` in a query string, with `+` and `%XX` decoded.
fn query_value<'a>(query: &'a str, name: &str) -> Option<Cow<'a, str>> {
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value)
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => f.write_str("/"),
            Route::Products { category: None } => f.write_str("/products"),
            Route::Products {
                category: Some(category),
            } => write!(f, "/products?category={category}"),
            Route::Product { id } => write!(f, "/product/{id}"),
            Route::Checkout => f.write_str("/checkout"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_paths() {
        assert_eq!(Route::parse("/"), Some(Route::Home));
        assert_eq!(Route::parse("/checkout"), Some(Route::Checkout));
        assert_eq!(
            Route::parse("/product/7"),
            Some(Route::Product {
                id: ProductId::new(7)
            })
        );
        assert_eq!(
            Route::parse("/products"),
            Some(Route::Products { category: None })
        );
    }

    #[test]
    fn parses_category_query() {
        assert_eq!(
            Route::parse("/products?category=T-Shirts"),
            Some(Route::Products {
                category: Some(Category::TShirts)
            })
        );
        assert_eq!(
            Route::parse("/products?sort=price&category=Hats"),
            Some(Route::Products { category: None })
        );
    }

    #[test]
    fn decodes_category_query() {
        assert_eq!(
            Route::parse("/products?category=T%2DShirts"),
            Some(Route::Products {
                category: Some(Category::TShirts)
            })
        );
        assert_eq!(
            Route::parse("/products?category=%53uits"),
            Some(Route::Products {
                category: Some(Category::Suits)
            })
        );
    }

    #[test]
    fn query_value_decodes_plus_as_space() {
        assert_eq!(
            query_value("q=navy+suit&category=Suits", "q").as_deref(),
            Some("navy suit")
        );
        assert_eq!(query_value("sort=price", "category"), None);
    }

    #[test]
    fn rejects_unknown_paths() {
        assert_eq!(Route::parse("/cart"), None);
        assert_eq!(Route::parse("/product/abc"), None);
    }

    #[test]
    fn display_is_canonical_path() {
        let routes = [
            Route::Home,
            Route::Products {
                category: Some(Category::Suits),
            },
            Route::Product {
                id: ProductId::new(3),
            },
            Route::Checkout,
        ];

        for route in routes {
            assert_eq!(Route::parse(&route.to_string()), Some(route));
        }

        assert_eq!(
            Route::Products {
                category: Some(Category::Suits)
            }
            .to_string(),
            "/products?category=Suits"
        );
    }
}
