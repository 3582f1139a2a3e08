use std::io::Write;

use clap::Args;
use menstyle::{
    cart::AddOutcome,
    checkout::OrderSummary,
    products::ProductId,
    routes::Route,
    selection::Commit,
};

use super::{
    CliError, Shop,
    render::{cart_table, money, summary_table},
};

#[derive(Debug, Args)]
pub(crate) struct AddArgs {
    /// Product id
    id: String,

    /// Size label; with `--color` and `--quantity` omitted too, one unit of
    /// the first size and colour is added
    #[arg(long)]
    size: Option<String>,

    /// Colour label
    #[arg(long)]
    color: Option<String>,

    /// Units to add [default: 1]
    #[arg(long)]
    quantity: Option<u32>,

    /// Go straight to checkout after adding
    #[arg(long)]
    buy_now: bool,
}

#[derive(Debug, Args)]
pub(crate) struct LineArgs {
    /// Product id
    id: ProductId,

    /// Size label of the row
    #[arg(long)]
    size: String,

    /// Colour label of the row
    #[arg(long)]
    color: String,
}

#[derive(Debug, Args)]
pub(crate) struct SetQuantityArgs {
    #[command(flatten)]
    line: LineArgs,

    /// New quantity; anything below 1 is stored as 1
    #[arg(allow_negative_numbers = true)]
    quantity: i64,
}

pub(crate) fn add(shop: &mut Shop, args: AddArgs, out: &mut impl Write) -> Result<(), CliError> {
    let id = shop
        .storefront
        .catalog()
        .find_by_route_param(&args.id)
        .map(|product| product.id)
        .ok_or_else(|| CliError::ProductNotFound(args.id.clone()))?;

    if args.is_quick_add() {
        let commit = shop.storefront.quick_add(id)?;

        return report_added(shop, &commit, out);
    }

    let now = shop.now();
    shop.storefront.navigate(Route::Product { id }, now);

    if let Some(selection) = shop.storefront.selection_mut() {
        if let Some(size) = args.size {
            if !selection.product().has_size(&size) {
                let product = selection.product();

                return Err(CliError::UnavailableOption {
                    product: product.name.clone(),
                    option: "size",
                    value: size,
                    available: product.size_options.join(", "),
                });
            }

            selection.select_size(&size);
        }

        if let Some(color) = args.color {
            if !selection.product().has_color(&color) {
                let product = selection.product();

                return Err(CliError::UnavailableOption {
                    product: product.name.clone(),
                    option: "colour",
                    value: color,
                    available: product.color_options.join(", "),
                });
            }

            selection.select_color(&color);
        }

        selection.set_quantity(args.quantity.unwrap_or(1));
    }

    if !args.buy_now {
        let commit = shop.storefront.add_selection_to_cart()?;

        return report_added(shop, &commit, out);
    }

    let commit = shop.storefront.buy_selection_now(now)?;
    writeln!(out, "{}", commit.notice)?;

    if let Some(navigation) = commit.navigation {
        shop.wait_until(navigation.timer.due_at());
    }

    let cart = shop.storefront.cart();
    writeln!(
        out,
        "{}",
        summary_table(&OrderSummary::from_cart(cart), cart.currency())
    )?;
    writeln!(out, "Run `menstyle checkout` with your shipping details to place the order.")?;

    Ok(())
}

impl AddArgs {
    fn is_quick_add(&self) -> bool {
        self.size.is_none() && self.color.is_none() && self.quantity.is_none() && !self.buy_now
    }
}

fn report_added(shop: &Shop, commit: &Commit, out: &mut impl Write) -> Result<(), CliError> {
    writeln!(out, "{}", commit.notice)?;

    if let AddOutcome::Merged { quantity, .. } = commit.outcome {
        writeln!(out, "Now {quantity} in your cart.")?;
    }

    show(shop, out)
}

pub(crate) fn remove(shop: &mut Shop, args: &LineArgs, out: &mut impl Write) -> Result<(), CliError> {
    let removed = shop
        .storefront
        .cart_mut()
        .remove_item(args.id, &args.size, &args.color);

    match removed {
        Some(item) => writeln!(
            out,
            "Removed {} ({}, {}).",
            item.product.name, item.selected_size, item.selected_color
        )?,
        None => writeln!(out, "No matching item in the cart.")?,
    }

    Ok(())
}

pub(crate) fn set_quantity(
    shop: &mut Shop,
    args: &SetQuantityArgs,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let LineArgs { id, size, color } = &args.line;
    let stored = shop
        .storefront
        .cart_mut()
        .set_quantity(*id, size, color, args.quantity);

    match stored {
        Some(quantity) => writeln!(out, "Quantity set to {quantity}.")?,
        None => writeln!(out, "No matching item in the cart.")?,
    }

    Ok(())
}

pub(crate) fn show(shop: &Shop, out: &mut impl Write) -> Result<(), CliError> {
    let cart = shop.storefront.cart();

    if cart.is_empty() {
        writeln!(out, "Your cart is empty.")?;

        return Ok(());
    }

    writeln!(out, "{}", cart_table(cart))?;
    writeln!(
        out,
        "{} items, total {}",
        cart.badge(),
        money(cart.total(), cart.currency())
    )?;

    Ok(())
}

pub(crate) fn clear(shop: &mut Shop, out: &mut impl Write) -> Result<(), CliError> {
    shop.storefront.cart_mut().clear();
    writeln!(out, "Cart cleared.")?;

    Ok(())
}
