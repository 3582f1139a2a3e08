use std::io::Write;

use clap::Args;
use menstyle::auth::{AuthForm, AuthMode};

use super::{CliError, Shop};

#[derive(Debug, Args)]
pub(crate) struct RegisterArgs {
    /// Display name
    #[arg(long)]
    name: String,

    /// E-mail address
    #[arg(long)]
    email: String,

    /// Password (accepted, never stored)
    #[arg(long)]
    password: Option<String>,
}

#[derive(Debug, Args)]
pub(crate) struct LoginArgs {
    /// E-mail address
    #[arg(long)]
    email: String,

    /// Display name; taken from the e-mail address when omitted
    #[arg(long)]
    name: Option<String>,

    /// Password (accepted, never stored)
    #[arg(long)]
    password: Option<String>,
}

pub(crate) fn register(
    shop: &mut Shop,
    args: RegisterArgs,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let form = AuthForm {
        name: args.name,
        email: args.email,
        password: args.password.unwrap_or_default(),
    };

    submit(shop, AuthMode::Register, form, out)
}

pub(crate) fn login(shop: &mut Shop, args: LoginArgs, out: &mut impl Write) -> Result<(), CliError> {
    let form = AuthForm {
        name: args.name.unwrap_or_default(),
        email: args.email,
        password: args.password.unwrap_or_default(),
    };

    submit(shop, AuthMode::Login, form, out)
}

fn submit(
    shop: &mut Shop,
    mode: AuthMode,
    form: AuthForm,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let auth = shop.storefront.auth_mut();
    auth.open_modal(mode);

    let identity = auth.submit_auth(mode, form)?;
    writeln!(out, "Welcome, {}!", identity.name)?;

    Ok(())
}

pub(crate) fn logout(shop: &mut Shop, out: &mut impl Write) -> Result<(), CliError> {
    shop.storefront.auth_mut().logout();
    writeln!(out, "Signed out.")?;

    Ok(())
}

pub(crate) fn whoami(shop: &Shop, out: &mut impl Write) -> Result<(), CliError> {
    match shop.storefront.auth().session() {
        Some(identity) => writeln!(out, "{} <{}>", identity.name, identity.email)?,
        None => writeln!(out, "Not signed in.")?,
    }

    Ok(())
}
