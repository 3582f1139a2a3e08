//! Table rendering

use menstyle::{
    cart::Cart,
    checkout::OrderSummary,
    prices::{Price, format_money},
    products::{Product, StockStatus},
    storage::KeyValueStore,
};
use rusty_money::iso::Currency;
use tabled::{
    Table,
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};

pub(crate) fn money(price: Price, currency: &'static Currency) -> String {
    format_money(&price.to_money(currency))
}

pub(crate) fn stock_label(status: StockStatus) -> &'static str {
    match status {
        StockStatus::InStock => "In stock",
        StockStatus::LowStock => "Low stock",
        StockStatus::OutOfStock => "Out of stock",
    }
}

pub(crate) fn product_table(products: &[&Product], currency: &'static Currency) -> Table {
    let mut builder = Builder::default();

    builder.push_record(["ID", "Name", "Brand", "Category", "Price", "Sale", "Rating", "Stock"]);

    for product in products {
        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            product.brand.clone(),
            product.category.to_string(),
            money(product.price, currency),
            product
                .discount_price
                .map(|price| money(price, currency))
                .unwrap_or_default(),
            format!("{:.1}", product.rating),
            stock_label(product.stock_status).to_string(),
        ]);
    }

    finish(builder, 4..7)
}

pub(crate) fn cart_table<S: KeyValueStore>(cart: &Cart<S>) -> Table {
    let currency = cart.currency();
    let mut builder = Builder::default();

    builder.push_record(["ID", "Item", "Size", "Colour", "Qty", "Unit", "Total"]);

    for item in cart.iter() {
        builder.push_record([
            item.id().to_string(),
            item.product.name.clone(),
            item.selected_size.clone(),
            item.selected_color.clone(),
            item.quantity.to_string(),
            money(item.unit_price(), currency),
            money(item.line_total(), currency),
        ]);
    }

    finish(builder, 4..7)
}

pub(crate) fn summary_table(summary: &OrderSummary, currency: &'static Currency) -> Table {
    let mut builder = Builder::default();

    builder.push_record(["Item", "Size", "Colour", "Qty", "Total"]);

    for line in &summary.lines {
        builder.push_record([
            line.name.clone(),
            line.size.clone(),
            line.color.clone(),
            line.quantity.to_string(),
            money(line.line_total, currency),
        ]);
    }

    let shipping = if summary.shipping == Price::default() {
        "Free".to_string()
    } else {
        money(summary.shipping, currency)
    };

    let subtotal = money(summary.subtotal, currency);
    let total = money(summary.total, currency);

    builder.push_record(["Subtotal", "", "", "", subtotal.as_str()]);
    builder.push_record(["Shipping", "", "", "", shipping.as_str()]);
    builder.push_record(["Total", "", "", "", total.as_str()]);

    let mut table = finish(builder, 3..5);
    table.modify(Rows::last(), Color::BOLD);

    table
}

fn finish(builder: Builder, numeric: std::ops::Range<usize>) -> Table {
    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(numeric), Alignment::right());

    table
}

#[cfg(test)]
mod tests {
    use menstyle::{
        catalog::Catalog,
        products::ProductId,
        storage::{MemoryStore, PersistentStore},
    };
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn product_table_shows_sale_price() -> TestResult {
        let catalog = Catalog::bundled()?;
        let linen = catalog
            .find_by_id(ProductId::new(2))
            .ok_or("missing product 2")?;

        let rendered = product_table(&[linen], USD).to_string();

        assert!(rendered.contains("Linen Summer Shirt"));
        assert!(rendered.contains("$80.00"));
        assert!(rendered.contains("$60.00"));

        Ok(())
    }

    #[test]
    fn summary_table_marks_free_shipping() -> TestResult {
        let catalog = Catalog::bundled()?;
        let oxford = catalog
            .find_by_id(ProductId::new(1))
            .ok_or("missing product 1")?;
        let mut cart = Cart::load(PersistentStore::new(MemoryStore::new()), USD);
        cart.add_product_variant(oxford, "M", "White", 2);

        let rendered = summary_table(&OrderSummary::from_cart(&cart), USD).to_string();

        assert!(rendered.contains("Free"));
        assert!(rendered.contains("$100.00"));

        Ok(())
    }
}
