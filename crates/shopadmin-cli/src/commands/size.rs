use anyhow::Result;
use serde_json::Value;

use shopadmin_core::CoreError;

use crate::cli::{FileArgs, SizeUpdateArgs};
use crate::commands::{AppContext, read_body};
use crate::output::{print_success, print_value};

/// Size records are passed through as JSON, but a quantity, when given, must
/// be a non-negative integer.
pub fn check_size_record(body: &Value) -> Result<()> {
    let Some(record) = body.as_object() else {
        anyhow::bail!("Size record must be a JSON object");
    };
    if let Some(quantity) = record.get("quantity")
        && !quantity.as_i64().is_some_and(|q| q >= 0)
    {
        return Err(CoreError::validation("quantity must be a non-negative integer").into());
    }
    Ok(())
}

pub async fn list(ctx: &AppContext) -> Result<()> {
    let sizes = ctx.track("list sizes", ctx.client.list_sizes()).await?;
    print_value(&sizes)
}

pub async fn create(ctx: &AppContext, args: &FileArgs) -> Result<()> {
    let body = read_body(&args.file)?;
    check_size_record(&body)?;
    let created = ctx
        .track("create size", ctx.client.create_size(&body))
        .await?;
    print_success("Created size");
    print_value(&created)
}

pub async fn update(ctx: &AppContext, args: &SizeUpdateArgs) -> Result<()> {
    let body = read_body(&args.file)?;
    check_size_record(&body)?;
    let updated = ctx
        .track("update size", ctx.client.update_size(args.id, &body))
        .await?;
    print_success(&format!("Updated size {}", args.id));
    print_value(&updated)
}
