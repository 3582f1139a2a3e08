use rusty_money::iso::USD;

use crate::{
    cart::Cart,
    prices::Price,
    products::{Category, Product, ProductId, StockStatus},
    storage::{MemoryStore, PersistentStore},
};

pub(crate) fn product(id: u32, price: u64, sizes: &[&str], colors: &[&str]) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        brand: "MenStyle".to_string(),
        description: String::new(),
        image: format!("/assets/products/{id}.jpg"),
        price: Price::from_major(price),
        discount_price: None,
        rating: 4.0,
        category: Category::Shirts,
        size_options: sizes.iter().map(ToString::to_string).collect(),
        color_options: colors.iter().map(ToString::to_string).collect(),
        stock_status: StockStatus::InStock,
    }
}

pub(crate) fn discounted(id: u32, price: u64, discount: u64) -> Product {
    Product {
        discount_price: Some(Price::from_major(discount)),
        ..product(id, price, &["M", "L"], &["Navy"])
    }
}

pub(crate) fn empty_cart() -> (Cart<MemoryStore>, MemoryStore) {
    let backend = MemoryStore::new();
    let cart = Cart::load(PersistentStore::new(backend.clone()), USD);

    (cart, backend)
}
