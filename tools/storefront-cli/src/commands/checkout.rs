//! Order submission.

use anyhow::{bail, Context as _, Result};
use serde::Serialize;

use storefront_commerce::checkout::{CheckoutSession, ValidationErrors};
use storefront_commerce::gateway::OrderGateway;
use storefront_commerce::{CheckoutError, OrderId};

use super::quote::{apply_overrides, print_breakdown};
use super::{load_form, CheckoutArgs};
use crate::context::Context;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutResult<'a> {
    order_id: &'a OrderId,
    state: &'static str,
}

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let mut cart = ctx.cart_store()?;
    if cart.is_empty() {
        bail!("The cart is empty; add items with `storefront cart add`");
    }

    let mut form = load_form(&ctx.resolve_path(&args.form))?;
    apply_overrides(&mut form, None, args.discount.as_deref())?;

    let spinner = ctx.output.spinner("Loading checkout options...");
    let settings = ctx.checkout_settings().await?;
    spinner.finish_and_clear();

    let mut session = CheckoutSession::with_form(settings, form);
    if let Err(errors) = session.validate() {
        report_invalid(&errors, ctx);
        bail!("Checkout form is invalid: {}", errors);
    }

    if args.dry_run {
        let payload = session
            .build_order_payload(cart.cart())
            .context("Failed to build the order")?;
        ctx.output.json(&payload);
        return Ok(());
    }

    let pricing = session.pricing(cart.cart())?.rounded();
    ctx.output.header("Placing order");
    print_breakdown(&pricing, session.form(), ctx);

    let client = ctx.backend()?;
    let spinner = ctx.output.spinner("Sending order...");
    let result = session.submit(&mut cart, &client).await;
    spinner.finish_and_clear();

    let order_id = match result {
        Ok(order_id) => order_id,
        Err(CheckoutError::Validation(errors)) => {
            report_invalid(&errors, ctx);
            bail!("Checkout form is invalid: {}", errors);
        }
        Err(e) => {
            ctx.output
                .warn("Your cart has been kept; fix the problem and run checkout again.");
            return Err(e.into());
        }
    };

    if ctx.output.is_json() {
        ctx.output.json(&CheckoutResult {
            order_id: &order_id,
            state: session.state().name(),
        });
        return Ok(());
    }

    ctx.output.success(&format!("Order {} placed", order_id));
    match client.get_order_by_id(&order_id).await {
        Ok(order) => {
            ctx.output.info("");
            for line in order.receipt_lines() {
                ctx.output.line(&line);
            }
        }
        Err(e) => ctx
            .output
            .debug(&format!("receipt unavailable for {}: {}", order_id, e)),
    }

    Ok(())
}

fn report_invalid(errors: &ValidationErrors, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(errors);
        return;
    }
    ctx.output.header("Please fix the following");
    for error in errors.iter() {
        ctx.output
            .list_item(&format!("{}: {}", error.field, error.message));
    }
}
