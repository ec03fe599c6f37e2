pub mod category;
pub mod order;
pub mod product;
pub mod size;
pub mod stats;
pub mod user;
pub mod version;

use std::fs;
use std::future::Future;
use std::io::{self, BufRead, Read, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use base64::Engine;
use serde_json::Value;

use shopadmin_core::{
    EditSession, Editable, EntityStore, LoadingTracker, PageRequest, SubmitOutcome,
};

use crate::cli::{OutputFormat, PageArgs};
use crate::client::ApiClient;
use crate::output::{print_change_set, print_success};
use crate::store::CatalogStore;

/// Everything a command needs, resolved once from flags and profile config.
#[derive(Clone)]
pub struct AppContext {
    pub client: Arc<ApiClient>,
    pub loading: LoadingTracker,
    pub format: OutputFormat,
    pub page_size: u32,
}

impl AppContext {
    pub fn new(client: ApiClient, format: OutputFormat, page_size: u32) -> Self {
        Self {
            client: Arc::new(client),
            loading: LoadingTracker::new(),
            format,
            page_size,
        }
    }

    pub fn store(&self) -> Arc<CatalogStore> {
        Arc::new(CatalogStore::new(Arc::clone(&self.client), self.page_size))
    }

    pub fn page(&self, args: &PageArgs) -> PageRequest {
        PageRequest::new(args.page, args.limit.unwrap_or(self.page_size))
    }

    /// Await one backend call with the loading state held until it settles.
    pub async fn track<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        let _loading = self.loading.begin(operation);
        call.await
    }
}

pub fn read_body(file: &Option<String>) -> Result<Value> {
    let content = match file {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            buf
        }
    };
    serde_json::from_str(&content).context("Invalid JSON")
}

/// Read a local image and encode it as a `data:` URL for upload.
pub fn encode_image(path: &str) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read image: {path}"))?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(format!("data:{};base64,{encoded}", image_mime(path)))
}

fn image_mime(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Overlay the top-level keys of `overrides` onto the entity. Keys the file
/// leaves out keep their current value.
pub fn apply_overrides<E: Editable>(entity: &mut E, overrides: Value) -> Result<()> {
    let Value::Object(overrides) = overrides else {
        anyhow::bail!("Edit file must contain a JSON object");
    };
    let mut merged = serde_json::to_value(&*entity)?;
    if let Value::Object(fields) = &mut merged {
        fields.extend(overrides);
    }
    *entity = serde_json::from_value(merged)
        .with_context(|| format!("Edit file does not describe a valid {}", E::KIND))?;
    Ok(())
}

pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    let stdin = io::stdin();
    confirm_with(&mut stdin.lock(), &mut io::stderr(), prompt)
}

pub fn confirm_with(input: &mut impl BufRead, out: &mut impl Write, prompt: &str) -> Result<bool> {
    write!(out, "{prompt} [y/N] ")?;
    out.flush()?;
    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Submit an edit session, or only print what would be sent on a dry run.
pub async fn finish_edit<E: Editable>(
    ctx: &AppContext,
    session: &mut EditSession<E, CatalogStore>,
    dry_run: bool,
) -> Result<()>
where
    CatalogStore: EntityStore<E>,
{
    let id = session.original()?.id();
    if dry_run {
        let changes = session.pending_changes()?;
        print_change_set(&changes, ctx.format)?;
        session.cancel();
        return Ok(());
    }
    match session.submit().await? {
        SubmitOutcome::Unchanged => {
            print_success(&format!("No changes to {} {id}", E::KIND));
        }
        SubmitOutcome::Applied(changes) => {
            print_success(&format!("Updated {} {id}", E::KIND));
            print_change_set(&changes, ctx.format)?;
        }
    }
    Ok(())
}
