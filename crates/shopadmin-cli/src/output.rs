use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::Style;

use shopadmin_core::{
    Category, ChangeSet, Order, OrderStatus, Paginated, Product, User, Version, sort_sizes,
};

use crate::cli::OutputFormat;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Untyped payloads (size records, raw server replies) are shown as JSON in
/// either format.
pub fn print_value(value: &Value) -> Result<()> {
    print_json(value)
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_warning(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Group thousands with dots, no fractional part: `1250000.0` -> `1.250.000`.
pub fn format_vnd(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn render(builder: Builder) -> String {
    builder.build().with(Style::rounded()).to_string()
}

fn print_page_footer<T>(page: &Paginated<T>) {
    println!("Page {} of {}", page.current_page, page.total_pages.max(1));
}

pub fn print_products(page: &Paginated<Product>, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(page);
    }
    if page.is_empty() {
        println!("No products found.");
        return Ok(());
    }
    let mut builder = Builder::default();
    builder.push_record(["ID", "Name", "Brand", "Price", "Categories", "Stock", "Sold"]);
    for p in &page.items {
        builder.push_record([
            p.id.to_string(),
            p.name.clone(),
            p.brand.clone(),
            format_vnd(p.price as f64),
            p.category.join(", "),
            p.stock.to_string(),
            p.sold.to_string(),
        ]);
    }
    println!("{}", render(builder));
    print_page_footer(page);
    Ok(())
}

pub fn print_versions(versions: &[Version], format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(versions);
    }
    if versions.is_empty() {
        println!("No versions found.");
        return Ok(());
    }
    let mut builder = Builder::default();
    builder.push_record(["ID", "Style", "Sizes", "Stock", "Sold", "Images"]);
    for v in versions {
        let sizes = v
            .sorted_sizes()
            .iter()
            .map(|s| format!("{}:{}", s.size, s.quantity))
            .collect::<Vec<_>>()
            .join(" ");
        builder.push_record([
            v.id.to_string(),
            v.style.clone(),
            sizes,
            v.stock.to_string(),
            v.sold.to_string(),
            v.images.len().to_string(),
        ]);
    }
    println!("{}", render(builder));
    Ok(())
}

pub fn print_version(version: &Version, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(version);
    }
    println!(
        "{} {} (product {})",
        "Version:".cyan(),
        version.style.cyan(),
        version.product_id
    );
    let mut sizes = version.sizes.clone();
    sort_sizes(&mut sizes);
    let mut builder = Builder::default();
    builder.push_record(["Size", "Quantity"]);
    for s in &sizes {
        builder.push_record([s.size.clone(), s.quantity.to_string()]);
    }
    println!("{}", render(builder));
    println!("Total: {}", version.total_quantity());
    for image in &version.images {
        println!("  {image}");
    }
    Ok(())
}

pub fn print_categories(categories: &[Category], format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(categories);
    }
    if categories.is_empty() {
        println!("No categories found.");
        return Ok(());
    }
    let mut builder = Builder::default();
    builder.push_record(["Name", "Image"]);
    for c in categories {
        builder.push_record([c.name.as_str(), c.image.as_deref().unwrap_or("-")]);
    }
    println!("{}", render(builder));
    Ok(())
}

fn colored_status(status: &OrderStatus) -> String {
    match status {
        OrderStatus::Pending => status.as_str().yellow().to_string(),
        OrderStatus::Fulfilled => status.as_str().green().to_string(),
        OrderStatus::Cancelled => status.as_str().red().to_string(),
        OrderStatus::Other(s) => s.clone(),
    }
}

pub fn print_orders(page: &Paginated<Order>, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(page);
    }
    if page.is_empty() {
        println!("No orders found.");
        return Ok(());
    }
    let mut builder = Builder::default();
    builder.push_record(["ID", "Customer", "Created", "Items", "Total (vnd)", "Payment", "Status"]);
    for o in &page.items {
        builder.push_record([
            o.id.to_string(),
            o.user_name.clone(),
            o.created_at.clone(),
            o.item_count().to_string(),
            format_vnd(o.total_amount),
            o.payment_method.clone(),
            colored_status(&o.status),
        ]);
    }
    println!("{}", render(builder));
    print_page_footer(page);
    Ok(())
}

pub fn print_users(page: &Paginated<User>, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(page);
    }
    if page.is_empty() {
        println!("No users found.");
        return Ok(());
    }
    let mut builder = Builder::default();
    builder.push_record(["ID", "Name", "Email", "Phone", "Address"]);
    for u in &page.items {
        builder.push_record([
            u.id.to_string(),
            u.name.clone(),
            u.email.clone(),
            u.phone.clone().unwrap_or_else(|| "-".to_string()),
            u.address_or_placeholder().to_string(),
        ]);
    }
    println!("{}", render(builder));
    print_page_footer(page);
    Ok(())
}

/// Rows for a change set: `~` changed field, `+` added size, `~` updated
/// size, `-` removed size.
pub fn change_rows(changes: &ChangeSet) -> Vec<[String; 3]> {
    let mut rows = Vec::new();
    for (field, value) in changes.fields.iter() {
        rows.push(["~".to_string(), field.clone(), compact(value)]);
    }
    if let Some(sizes) = &changes.sizes {
        for s in &sizes.added {
            rows.push(["+".to_string(), format!("size {}", s.size), s.quantity.to_string()]);
        }
        for s in &sizes.updated {
            rows.push(["~".to_string(), format!("size {}", s.size), s.quantity.to_string()]);
        }
        for s in &sizes.removed {
            rows.push(["-".to_string(), format!("size {}", s.size), s.quantity.to_string()]);
        }
    }
    rows
}

fn compact(value: &Value) -> String {
    match value {
        Value::String(s) => data_url_summary(s).unwrap_or_else(|| s.clone()),
        Value::Array(items) if items.iter().any(|v| v.as_str().is_some_and(is_data_url)) => items
            .iter()
            .map(compact)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

fn is_data_url(s: &str) -> bool {
    s.starts_with("data:")
}

/// Encoded uploads are shown by type and size, not content.
fn data_url_summary(s: &str) -> Option<String> {
    let (header, payload) = s.strip_prefix("data:")?.split_once(',')?;
    let mime = header.split(';').next().unwrap_or_default();
    Some(format!("<{mime}, {} bytes encoded>", payload.len()))
}

pub fn print_change_set(changes: &ChangeSet, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(&changes.to_body()?);
    }
    if changes.is_noop() {
        println!("No changes.");
        return Ok(());
    }
    let mut builder = Builder::default();
    builder.push_record(["", "Field", "Value"]);
    for row in change_rows(changes) {
        builder.push_record(row);
    }
    println!("{}", render(builder));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopadmin_core::{Size, compute_changes};

    #[test]
    fn vnd_groups_thousands_with_dots() {
        assert_eq!(format_vnd(0.0), "0");
        assert_eq!(format_vnd(999.0), "999");
        assert_eq!(format_vnd(1000.0), "1.000");
        assert_eq!(format_vnd(1_250_000.4), "1.250.000");
        assert_eq!(format_vnd(-45_500.0), "-45.500");
    }

    #[test]
    fn encoded_uploads_are_summarised() {
        let original = Version {
            id: 1,
            style: "Red".into(),
            ..Version::default()
        };
        let mut current = original.clone();
        current
            .attach_image("/tmp/a.png", "data:image/png;base64,aGk=")
            .unwrap();

        let rows = change_rows(&compute_changes(&original, &current).unwrap());
        assert_eq!(
            rows,
            vec![[
                "~".to_string(),
                "imageNews".to_string(),
                "<image/png, 4 bytes encoded>".to_string()
            ]]
        );
    }

    #[test]
    fn change_rows_mark_each_kind() {
        let original = Version {
            id: 1,
            style: "Red".into(),
            sizes: vec![Size::new("S", 1), Size::new("M", 2)],
            ..Version::default()
        };
        let mut current = original.clone();
        current.stock = 4;
        current.sizes = vec![Size::new("M", 5), Size::new("L", 1)];

        let rows = change_rows(&compute_changes(&original, &current).unwrap());
        assert_eq!(
            rows,
            vec![
                ["~".to_string(), "stock".to_string(), "4".to_string()],
                ["+".to_string(), "size L".to_string(), "1".to_string()],
                ["~".to_string(), "size M".to_string(), "5".to_string()],
                ["-".to_string(), "size S".to_string(), "1".to_string()],
            ]
        );
    }
}
