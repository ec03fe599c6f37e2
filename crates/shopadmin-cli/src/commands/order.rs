use anyhow::Result;

use shopadmin_core::{CoreError, EntityId, OrderStatus};

use crate::cli::{DeleteArgs, PageArgs};
use crate::commands::{AppContext, confirm};
use crate::output::{print_orders, print_success};

pub async fn list(ctx: &AppContext, args: &PageArgs) -> Result<()> {
    let orders = {
        let _loading = ctx.loading.begin("list orders");
        ctx.client.list_orders(ctx.page(args)).await?
    };
    print_orders(&orders, ctx.format)
}

/// Move an order to `target`, refusing when its current status is final.
pub async fn transition(ctx: &AppContext, id: EntityId, target: OrderStatus) -> Result<()> {
    let order = ctx
        .track("find order", ctx.client.find_order(id, ctx.page_size))
        .await?
        .ok_or_else(|| CoreError::not_found("order", id))?;
    order.status.ensure_transition(&target)?;

    ctx.track(
        "update order status",
        ctx.client.update_order_status(id, &target),
    )
    .await?;
    tracing::info!(id, from = %order.status, to = %target, "order status updated");
    print_success(&format!("Order {id} marked {target}"));
    Ok(())
}

pub async fn fulfill(ctx: &AppContext, id: EntityId) -> Result<()> {
    transition(ctx, id, OrderStatus::Fulfilled).await
}

pub async fn cancel(ctx: &AppContext, args: &DeleteArgs) -> Result<()> {
    if !confirm(&format!("Cancel order {}?", args.id), args.confirm.yes)? {
        println!("Aborted.");
        return Ok(());
    }
    transition(ctx, args.id, OrderStatus::Cancelled).await
}
