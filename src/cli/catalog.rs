use std::io::Write;

use clap::Args;
use menstyle::products::CategoryFilter;

use super::{
    CliError, Shop,
    render::{money, product_table, stock_label},
};

#[derive(Debug, Args)]
pub(crate) struct ProductsArgs {
    /// Category label (Shirts, Trousers, T-Shirts, Suits); all products when omitted
    #[arg(long)]
    category: Option<String>,
}

#[derive(Debug, Args)]
pub(crate) struct ProductArgs {
    /// Product id
    id: String,
}

pub(crate) fn products(
    shop: &Shop,
    args: &ProductsArgs,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let catalog = shop.storefront.catalog();
    let filter = CategoryFilter::from_query(args.category.as_deref());
    let products = catalog.filter_by_category(filter);

    writeln!(out, "{filter}")?;

    if products.is_empty() {
        writeln!(out, "No products found.")?;

        return Ok(());
    }

    writeln!(out, "{}", product_table(&products, catalog.currency()))?;
    writeln!(out, "{} products", products.len())?;

    Ok(())
}

pub(crate) fn product(shop: &Shop, args: &ProductArgs, out: &mut impl Write) -> Result<(), CliError> {
    let catalog = shop.storefront.catalog();
    let currency = catalog.currency();
    let product = catalog
        .find_by_route_param(&args.id)
        .ok_or_else(|| CliError::ProductNotFound(args.id.clone()))?;

    writeln!(out, "{} ({})", product.name, product.brand)?;
    writeln!(out, "{}", product.category)?;

    match product.discount_price {
        Some(sale) => writeln!(
            out,
            "{} (was {})",
            money(sale, currency),
            money(product.price, currency)
        )?,
        None => writeln!(out, "{}", money(product.price, currency))?,
    }

    writeln!(out, "Rating: {:.1} / 5", product.rating)?;
    writeln!(out, "{}", stock_label(product.stock_status))?;
    writeln!(out, "Sizes: {}", product.size_options.join(", "))?;
    writeln!(out, "Colours: {}", product.color_options.join(", "))?;
    writeln!(out)?;
    writeln!(out, "{}", product.description)?;

    Ok(())
}
