use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::commands::AppContext;
use crate::output::{format_vnd, print_json};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_revenue: f64,
    pub total_users: f64,
    pub total_stock: f64,
}

/// Pull the number out of a totals payload. The backend answers either with
/// a bare number or an object holding one (`{"totalRevenue": 123}`).
pub fn extract_total(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Object(map) => map
            .iter()
            .find(|(key, _)| key.to_lowercase().contains("total"))
            .or_else(|| map.iter().find(|(_, v)| v.is_number()))
            .and_then(|(_, v)| extract_total(v)),
        _ => None,
    }
}

fn total(value: &Value, what: &str) -> Result<f64> {
    extract_total(value).ok_or_else(|| anyhow::anyhow!("Unexpected {what} payload: {value}"))
}

pub async fn show(ctx: &AppContext) -> Result<()> {
    let (revenue, users, stock) = {
        let _loading = ctx.loading.begin("stats");
        tokio::try_join!(
            ctx.client.total_revenue(),
            ctx.client.total_users(),
            ctx.client.total_stock(),
        )?
    };
    let stats = DashboardStats {
        total_revenue: total(&revenue, "revenue")?,
        total_users: total(&users, "user total")?,
        total_stock: total(&stock, "stock total")?,
    };

    match ctx.format {
        OutputFormat::Json => print_json(&stats)?,
        OutputFormat::Table => {
            println!("{}: {} vnd", "Revenue".cyan(), format_vnd(stats.total_revenue));
            println!("{}: {}", "Users".cyan(), format_vnd(stats.total_users));
            println!("{}: {}", "Stock".cyan(), format_vnd(stats.total_stock));
        }
    }
    Ok(())
}
