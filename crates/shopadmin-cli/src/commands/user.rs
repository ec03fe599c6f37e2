use anyhow::Result;

use crate::cli::{DeleteArgs, PageArgs};
use crate::commands::{AppContext, confirm};
use crate::output::{print_success, print_users};

pub async fn list(ctx: &AppContext, args: &PageArgs) -> Result<()> {
    let users = {
        let _loading = ctx.loading.begin("list users");
        ctx.client.list_users(ctx.page(args)).await?
    };
    print_users(&users, ctx.format)
}

pub async fn delete(ctx: &AppContext, args: &DeleteArgs) -> Result<()> {
    if !confirm(&format!("Delete user {}?", args.id), args.confirm.yes)? {
        println!("Aborted.");
        return Ok(());
    }
    ctx.track("delete user", ctx.client.delete_user(args.id))
        .await?;
    print_success(&format!("Deleted user {}", args.id));
    Ok(())
}
