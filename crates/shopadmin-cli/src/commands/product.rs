use anyhow::Result;
use colored::Colorize;

use shopadmin_core::{CategoryCatalog, EditSession, Editable, EntityId, FieldDiffer, Product};

use crate::cli::{CreateArgs, DeleteArgs, ProductEditArgs, ProductListArgs};
use crate::commands::{
    AppContext, apply_overrides, confirm, encode_image, finish_edit, read_body,
};
use crate::output::{print_products, print_success, print_value, print_versions, print_warning};
use crate::store::CatalogStore;

pub async fn list(ctx: &AppContext, args: &ProductListArgs) -> Result<()> {
    let page = ctx.page(&args.page);
    let products = {
        let _loading = ctx.loading.begin("list products");
        ctx.client.list_products(page, &args.search).await?
    };
    print_products(&products, ctx.format)
}

pub async fn create(ctx: &AppContext, args: &CreateArgs) -> Result<()> {
    let body = read_body(&args.file)?;
    let product: Product = serde_json::from_value(body.clone())?;
    product.validate()?;
    let categories = ctx
        .track("list categories", ctx.client.list_categories())
        .await?;
    CategoryCatalog::new(categories).validate_selection(&product.category)?;

    let created = ctx
        .track("create product", ctx.client.create_product(&body))
        .await?;
    print_success(&format!("Created product {}", product.name.cyan()));
    print_value(&created)
}

pub async fn edit(ctx: &AppContext, args: &ProductEditArgs) -> Result<()> {
    let mut differ = FieldDiffer::new();
    if args.ignore_category_order {
        differ = differ.unordered("category");
    }
    let mut session: EditSession<Product, CatalogStore> =
        EditSession::new(ctx.store(), ctx.loading.clone()).with_differ(differ);
    session.open(args.id).await?;

    let product = session.current_mut()?;
    if args.edit.file.is_some() {
        apply_overrides(product, read_body(&args.edit.file)?)?;
    }
    if let Some(name) = &args.name {
        product.name = name.clone();
    }
    if let Some(price) = args.price {
        product.price = price;
    }
    if let Some(brand) = &args.brand {
        product.brand = brand.clone();
    }
    if let Some(description) = &args.description {
        product.description = description.clone();
    }
    if let Some(stock) = args.stock {
        product.stock = stock;
    }
    if !args.categories.is_empty() {
        product.category = args.categories.clone();
    }
    for image in &args.remove_images {
        if !product.remove_image(image) {
            print_warning(&format!("Image not found on product: {image}"));
        }
    }
    for image in &args.attach_images {
        product.attach_image(image.clone(), encode_image(image)?)?;
    }

    let selected = session.current()?.category.clone();
    if selected != session.original()?.category {
        let categories = ctx
            .track("list categories", ctx.client.list_categories())
            .await?;
        CategoryCatalog::new(categories).validate_selection(&selected)?;
    }

    finish_edit(ctx, &mut session, args.edit.dry_run).await
}

pub async fn delete(ctx: &AppContext, args: &DeleteArgs) -> Result<()> {
    if !confirm(&format!("Delete product {}?", args.id), args.confirm.yes)? {
        println!("Aborted.");
        return Ok(());
    }
    ctx.track("delete product", ctx.client.delete_product(args.id))
        .await?;
    print_success(&format!("Deleted product {}", args.id));
    Ok(())
}

pub async fn versions(ctx: &AppContext, product_id: EntityId) -> Result<()> {
    let versions = ctx
        .track("list versions", ctx.client.versions_of_product(product_id))
        .await?;
    print_versions(&versions, ctx.format)
}
