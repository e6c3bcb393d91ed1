//! Placed order lookup.

use anyhow::{bail, Result};

use storefront_commerce::gateway::{GatewayError, OrderGateway};
use storefront_commerce::OrderId;

use super::{OrderArgs, OrderCommand};
use crate::context::Context;
use crate::output::status_badge;

/// Run the order command.
pub async fn run(args: OrderArgs, ctx: &Context) -> Result<()> {
    match args.command {
        OrderCommand::Show { id } => show_order(&id, ctx).await,
    }
}

async fn show_order(id: &str, ctx: &Context) -> Result<()> {
    let client = ctx.backend()?;
    let order_id = OrderId::new(id);

    let spinner = ctx.output.spinner("Fetching order...");
    let result = client.get_order_by_id(&order_id).await;
    spinner.finish_and_clear();

    let order = match result {
        Ok(order) => order,
        Err(GatewayError::NotFound(_)) => bail!("Order '{}' not found", id),
        Err(e) => return Err(e.into()),
    };

    if ctx.output.is_json() {
        ctx.output.json(&order);
        return Ok(());
    }

    ctx.output.header(&format!("Order {}", order.id));
    ctx.output.kv("status", &status_badge(order.status));
    ctx.output.kv("items", &order.item_count().to_string());
    ctx.output.info("");
    for line in order.receipt_lines() {
        ctx.output.line(&line);
    }

    Ok(())
}
