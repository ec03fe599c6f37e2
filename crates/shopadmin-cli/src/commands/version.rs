use anyhow::Result;
use colored::Colorize;

use shopadmin_core::{EditSession, Editable, EntityId, Version};

use crate::cli::{DeleteArgs, VersionCreateArgs, VersionEditArgs};
use crate::commands::{
    AppContext, apply_overrides, confirm, encode_image, finish_edit, read_body,
};
use crate::output::{print_success, print_value, print_version, print_warning};
use crate::store::CatalogStore;

pub async fn get(ctx: &AppContext, id: EntityId) -> Result<()> {
    let version = {
        let _loading = ctx.loading.begin("get version");
        ctx.client.get_version(id).await?
    };
    print_version(&version, ctx.format)
}

pub async fn create(ctx: &AppContext, args: &VersionCreateArgs) -> Result<()> {
    let body = read_body(&args.file)?;
    let version: Version = serde_json::from_value(body.clone())?;
    version.validate()?;

    let created = ctx
        .track(
            "create version",
            ctx.client.create_version(args.product_id, &body),
        )
        .await?;
    print_success(&format!(
        "Created version {} for product {}",
        version.style.cyan(),
        args.product_id
    ));
    print_value(&created)
}

/// Apply the size flags in a fixed order: removals, resets, quantity sets,
/// then additions.
pub fn apply_size_edits(version: &mut Version, args: &VersionEditArgs) -> Result<()> {
    for label in &args.remove_sizes {
        version.remove_size(label)?;
    }
    for label in &args.reset_sizes {
        version.reset_size(label)?;
    }
    for spec in &args.set_sizes {
        version.set_size_quantity(&spec.label, spec.quantity)?;
    }
    for spec in &args.add_sizes {
        version.add_size(&spec.label, spec.quantity)?;
    }
    Ok(())
}

pub async fn edit(ctx: &AppContext, args: &VersionEditArgs) -> Result<()> {
    let mut session: EditSession<Version, CatalogStore> =
        EditSession::new(ctx.store(), ctx.loading.clone());
    session.open(args.id).await?;

    let version = session.current_mut()?;
    if args.edit.file.is_some() {
        apply_overrides(version, read_body(&args.edit.file)?)?;
    }
    if let Some(style) = &args.style {
        version.style = style.clone();
    }
    if let Some(stock) = args.stock {
        version.stock = stock;
    }
    apply_size_edits(version, args)?;
    for image in &args.remove_images {
        if !version.remove_image(image) {
            print_warning(&format!("Image not found on version: {image}"));
        }
    }
    for image in &args.attach_images {
        version.attach_image(image.clone(), encode_image(image)?)?;
    }

    finish_edit(ctx, &mut session, args.edit.dry_run).await
}

pub async fn delete(ctx: &AppContext, args: &DeleteArgs) -> Result<()> {
    if !confirm(&format!("Delete version {}?", args.id), args.confirm.yes)? {
        println!("Aborted.");
        return Ok(());
    }
    ctx.track("delete version", ctx.client.delete_version(args.id))
        .await?;
    print_success(&format!("Deleted version {}", args.id));
    Ok(())
}
