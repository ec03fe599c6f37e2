use anyhow::Result;
use colored::Colorize;
use serde_json::{Map, Value};

use shopadmin_core::{Category, CategoryCatalog, CoreError};

use crate::cli::{
    CategoryCreateArgs, CategoryDeleteArgs, CategoryProductsArgs, CategoryUpdateArgs,
};
use crate::commands::{AppContext, confirm};
use crate::output::{print_categories, print_products, print_success, print_value};

async fn catalog(ctx: &AppContext) -> Result<CategoryCatalog> {
    let _loading = ctx.loading.begin("list categories");
    Ok(CategoryCatalog::new(ctx.client.list_categories().await?))
}

pub async fn list(ctx: &AppContext) -> Result<()> {
    let catalog = catalog(ctx).await?;
    print_categories(catalog.categories(), ctx.format)
}

pub async fn create(ctx: &AppContext, args: &CategoryCreateArgs) -> Result<()> {
    let name = args.name.trim();
    if name.is_empty() {
        return Err(CoreError::validation("category name is required").into());
    }
    let mut category = Category::new(name);
    if let Some(image) = &args.image {
        category = category.with_image(image.clone());
    }
    let catalog = catalog(ctx).await?;
    if catalog.contains(name) {
        anyhow::bail!("Category {name} already exists");
    }
    let created = ctx
        .track("create category", ctx.client.create_category(&category))
        .await?;
    print_success(&format!("Created category {}", created.name.cyan()));
    Ok(())
}

/// Body for a category update: only the fields being changed.
pub fn update_body(args: &CategoryUpdateArgs) -> Result<Value> {
    let mut body = Map::new();
    if let Some(rename) = &args.rename {
        let rename = rename.trim();
        if rename.is_empty() {
            return Err(CoreError::validation("category name is required").into());
        }
        if rename != args.name {
            body.insert("name".to_string(), Value::String(rename.to_string()));
        }
    }
    if let Some(image) = &args.image {
        body.insert("image".to_string(), Value::String(image.clone()));
    }
    Ok(Value::Object(body))
}

pub async fn update(ctx: &AppContext, args: &CategoryUpdateArgs) -> Result<()> {
    let body = update_body(args)?;
    if body.as_object().is_some_and(Map::is_empty) {
        print_success(&format!("No changes to category {}", args.name));
        return Ok(());
    }
    let catalog = catalog(ctx).await?;
    catalog.validate_selection(std::slice::from_ref(&args.name))?;
    let updated = ctx
        .track(
            "update category",
            ctx.client.update_category(&args.name, &body),
        )
        .await?;
    print_success(&format!("Updated category {}", args.name.cyan()));
    print_value(&updated)
}

pub async fn delete(ctx: &AppContext, args: &CategoryDeleteArgs) -> Result<()> {
    if !confirm(&format!("Delete category {}?", args.name), args.confirm.yes)? {
        println!("Aborted.");
        return Ok(());
    }
    ctx.track("delete category", ctx.client.delete_category(&args.name))
        .await?;
    print_success(&format!("Deleted category {}", args.name.cyan()));
    Ok(())
}

pub async fn products(ctx: &AppContext, args: &CategoryProductsArgs) -> Result<()> {
    let products = ctx
        .track(
            "list category products",
            ctx.client.products_of_category(&args.name, ctx.page(&args.page)),
        )
        .await?;
    print_products(&products, ctx.format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(rename: Option<&str>, image: Option<&str>) -> CategoryUpdateArgs {
        CategoryUpdateArgs {
            name: "Shirts".into(),
            rename: rename.map(str::to_string),
            image: image.map(str::to_string),
        }
    }

    #[test]
    fn update_body_carries_changed_fields_only() {
        assert_eq!(update_body(&args(None, None)).unwrap(), json!({}));
        assert_eq!(update_body(&args(Some("Shirts"), None)).unwrap(), json!({}));
        assert_eq!(
            update_body(&args(Some("Tops"), Some("/img/tops.png"))).unwrap(),
            json!({"name": "Tops", "image": "/img/tops.png"})
        );
        assert!(update_body(&args(Some("  "), None)).is_err());
    }
}
