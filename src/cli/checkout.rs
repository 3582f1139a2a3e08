use std::io::Write;

use clap::Args;
use menstyle::{
    checkout::{CheckoutState, OrderSummary, ShippingForm},
    prices::format_money,
};

use super::{CliError, Shop, render::summary_table};

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Full name
    #[arg(long)]
    name: Option<String>,

    /// Street address
    #[arg(long)]
    address: Option<String>,

    /// City
    #[arg(long)]
    city: Option<String>,

    /// State or region
    #[arg(long)]
    state: Option<String>,

    /// Postal code
    #[arg(long)]
    postal_code: Option<String>,

    /// Phone number
    #[arg(long)]
    phone: Option<String>,

    /// Clear the cart as soon as the order is placed instead of waiting on the confirmation
    #[arg(long)]
    no_wait: bool,
}

impl CheckoutArgs {
    fn form(&self) -> ShippingForm {
        ShippingForm {
            name: self.name.clone().unwrap_or_default(),
            address: self.address.clone().unwrap_or_default(),
            city: self.city.clone().unwrap_or_default(),
            state: self.state.clone().unwrap_or_default(),
            postal_code: self.postal_code.clone().unwrap_or_default(),
            phone: self.phone.clone().unwrap_or_default(),
        }
    }
}

pub(crate) fn run(mut shop: Shop, args: &CheckoutArgs, out: &mut impl Write) -> Result<(), CliError> {
    let now = shop.now();
    shop.storefront.begin_checkout(now);

    if shop.storefront.checkout_state() == Some(CheckoutState::EmptyCart) {
        writeln!(out, "Your cart is empty. Browse products with `menstyle products`.")?;

        return Ok(());
    }

    let cart = shop.storefront.cart();
    writeln!(
        out,
        "{}",
        summary_table(&OrderSummary::from_cart(cart), cart.currency())
    )?;

    let now = shop.now();
    let confirmation = shop.storefront.place_order(&args.form(), now)?;

    writeln!(
        out,
        "Order placed! {} items, {} charged.",
        confirmation.items,
        format_money(&confirmation.total)
    )?;

    if args.no_wait {
        shop.close();
    } else {
        shop.wait_until(confirmation.completes_at);
    }

    writeln!(out, "Thank you for shopping with MenStyle!")?;

    Ok(())
}
