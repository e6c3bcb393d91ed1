//! Cart management commands.

use anyhow::{bail, Context as _, Result};
use serde::Serialize;

use storefront_cache::KvStore;
use storefront_commerce::cart::{CartStore, LineItem};
use storefront_commerce::{Money, ProductId};

use super::{CartArgs, CartCommand};
use crate::context::Context;

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let mut cart = ctx.cart_store()?;
    ctx.output.debug(&format!("cart key: {}", cart.key()));

    match args.command {
        Some(CartCommand::Show) | None => {}
        Some(CartCommand::Add {
            product,
            quantity,
            notes,
        }) => add_item(&mut cart, &product, quantity, notes, ctx).await?,
        Some(CartCommand::Update {
            product,
            quantity,
            notes,
        }) => update_item(&mut cart, &product, quantity, notes, ctx)?,
        Some(CartCommand::Remove { product }) => {
            if cart.remove_item(&ProductId::new(&product)) {
                ctx.output.success(&format!("Removed {product}"));
            } else {
                ctx.output.warn(&format!("{product} is not in the cart"));
            }
        }
        Some(CartCommand::Clear) => {
            cart.clear();
            ctx.output.success("Cart cleared");
        }
    }

    show_cart(&cart, ctx);
    Ok(())
}

async fn add_item<S: KvStore>(
    cart: &mut CartStore<S>,
    product_id: &str,
    quantity: i64,
    notes: Option<String>,
    ctx: &Context,
) -> Result<()> {
    if quantity <= 0 {
        bail!("Quantity must be at least 1");
    }

    let spinner = ctx.output.spinner("Loading catalog...");
    let products = ctx.catalog()?.products().await;
    spinner.finish_and_clear();

    let id = ProductId::new(product_id);
    let Some(product) = products.iter().find(|p| p.id == id) else {
        bail!("Product '{}' not found in the catalog", product_id);
    };
    if !product.is_available() {
        bail!("{} is not available right now", product.name);
    }

    cart.add_item(product, quantity, notes)
        .with_context(|| format!("Failed to add {}", product.name))?;
    ctx.output
        .success(&format!("Added {} x {}", quantity, product.name));
    Ok(())
}

fn update_item<S: KvStore>(
    cart: &mut CartStore<S>,
    product_id: &str,
    quantity: i64,
    notes: Option<String>,
    ctx: &Context,
) -> Result<()> {
    let id = ProductId::new(product_id);
    if cart.cart().get_item(&id).is_none() {
        bail!("{} is not in the cart", product_id);
    }

    if notes.is_some() && quantity > 0 {
        cart.update_notes(&id, notes);
    }
    cart.update_quantity(&id, quantity)
        .with_context(|| format!("Failed to update {}", product_id))?;

    if quantity <= 0 {
        ctx.output.success(&format!("Removed {product_id}"));
    } else {
        ctx.output
            .success(&format!("{product_id} quantity set to {quantity}"));
    }
    Ok(())
}

#[derive(Serialize)]
struct CartView<'a> {
    key: &'a str,
    items: &'a [LineItem],
    item_count: i64,
    total: Money,
}

/// Print the cart contents.
pub fn show_cart<S: KvStore>(cart: &CartStore<S>, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(&CartView {
            key: cart.key(),
            items: cart.items(),
            item_count: cart.item_count(),
            total: cart.total().rounded(),
        });
        return;
    }

    ctx.output.header("Cart");
    if cart.is_empty() {
        ctx.output.info("Your cart is empty.");
        return;
    }

    let widths = [10, 28, 5, 12];
    ctx.output.table_row(&["ID", "ITEM", "QTY", "TOTAL"], &widths);
    for item in cart.items() {
        let quantity = item.quantity.to_string();
        let total = item.line_total().display();
        ctx.output
            .table_row(&[item.id.as_str(), &item.name, &quantity, &total], &widths);
        if let Some(notes) = &item.notes {
            ctx.output.line(&format!("{:10}  ↳ {}", "", notes));
        }
    }
    ctx.output.info("");
    ctx.output.amount(
        &format!("{} item(s)", cart.item_count()),
        &cart.total(),
    );
}
