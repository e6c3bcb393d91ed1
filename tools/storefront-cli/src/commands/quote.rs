//! Price breakdown for the current cart.

use anyhow::{bail, Context as _, Result};

use storefront_commerce::cart::{DiscountPercent, OrderPricing};
use storefront_commerce::checkout::{CheckoutForm, DeliveryType, DeliveryZone};
use storefront_commerce::ZoneId;

use super::{load_form, QuoteArgs};
use crate::context::Context;

/// Run the quote command.
pub async fn run(args: QuoteArgs, ctx: &Context) -> Result<()> {
    let cart = ctx.cart_store()?;
    if cart.is_empty() {
        bail!("The cart is empty; add items with `storefront cart add`");
    }

    let mut form = match &args.form {
        Some(path) => load_form(&ctx.resolve_path(path))?,
        None => CheckoutForm::blank(),
    };
    apply_overrides(&mut form, args.zone, args.discount.as_deref())?;

    let zones = if form.delivery.is_delivery() {
        let spinner = ctx.output.spinner("Loading delivery zones...");
        let zones = ctx.catalog()?.delivery_zones().await;
        spinner.finish_and_clear();
        zones
    } else {
        Vec::new()
    };

    let pricing = form
        .pricing(cart.cart(), &zones)
        .context("Failed to price the cart")?
        .rounded();

    if ctx.output.is_json() {
        ctx.output.json(&pricing);
        return Ok(());
    }

    ctx.output.header("Quote");
    print_breakdown(&pricing, &form, ctx);

    if let Some(zone) = form.delivery.zone(&zones) {
        if let Some(estimate) = zone.delivery_estimate() {
            ctx.output.kv("delivery to", &format!("{} ({})", zone.name, estimate));
        }
    } else if form.delivery.is_delivery() {
        warn_unknown_zone(&form, &zones, ctx);
    }

    Ok(())
}

/// Apply command-line zone and discount overrides to a form.
pub fn apply_overrides(
    form: &mut CheckoutForm,
    zone: Option<String>,
    discount: Option<&str>,
) -> Result<()> {
    if let Some(zone) = zone {
        form.delivery.delivery_type = DeliveryType::Delivery;
        form.delivery.zone_id = Some(ZoneId::new(zone));
    }
    if let Some(discount) = discount {
        form.discount = discount.parse::<DiscountPercent>()?;
    }
    Ok(())
}

/// Print subtotal, discount, delivery fee and total.
pub fn print_breakdown(pricing: &OrderPricing, form: &CheckoutForm, ctx: &Context) {
    ctx.output.amount("Subtotal", &pricing.subtotal);
    if pricing.has_discount() {
        ctx.output.amount(
            &format!("Discount ({})", form.discount),
            &pricing.discount_amount,
        );
    }
    if form.delivery.is_delivery() {
        ctx.output.amount("Delivery", &pricing.delivery_fee);
    }
    ctx.output.amount("Total", &pricing.total);
}

fn warn_unknown_zone(form: &CheckoutForm, zones: &[DeliveryZone], ctx: &Context) {
    match &form.delivery.zone_id {
        Some(id) if !zones.is_empty() => ctx
            .output
            .warn(&format!("Unknown delivery zone '{}'; no fee applied", id)),
        Some(_) => ctx
            .output
            .warn("Delivery zones unavailable; no fee applied"),
        None => ctx.output.warn("No delivery zone selected; no fee applied"),
    }
}
