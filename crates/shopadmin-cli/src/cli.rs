use clap::{Parser, Subcommand, ValueEnum};

use shopadmin_core::EntityId;

#[derive(Parser)]
#[command(name = "shopadmin")]
#[command(about = "Shop admin CLI for catalog, orders and users")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Server API base URL (overrides config and SHOPADMIN_URL env var)
    #[arg(short, long, global = true, env = "SHOPADMIN_URL")]
    pub server: Option<String>,

    /// Config profile name
    #[arg(short, long, global = true, env = "SHOPADMIN_PROFILE", default_value = "default")]
    pub profile: String,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(value, true).ok()
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage products
    Product(ProductArgs),
    /// Manage product versions (styles) and their sizes
    Version(VersionArgs),
    /// Manage size records
    Size(SizeArgs),
    /// Manage categories
    Category(CategoryArgs),
    /// List and process orders
    Order(OrderArgs),
    /// List and remove users
    User(UserArgs),
    /// Show dashboard totals
    Stats,
    /// Manage CLI configuration
    Config(ConfigArgs),
}

#[derive(clap::Args, Debug, Clone, Copy)]
pub struct PageArgs {
    /// Page number (1-based)
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    /// Items per page (defaults to the profile page_size)
    #[arg(long)]
    pub limit: Option<u32>,
}

#[derive(clap::Args)]
pub struct EditArgs {
    /// Path to a JSON file with the edited snapshot (fields not given keep their value)
    #[arg(long)]
    pub file: Option<String>,
    /// Print the change set without sending it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(clap::Args)]
pub struct ConfirmArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

// Products

#[derive(clap::Args)]
pub struct ProductArgs {
    #[command(subcommand)]
    pub command: ProductCommands,
}

#[derive(Subcommand)]
pub enum ProductCommands {
    /// List products
    List(ProductListArgs),
    /// Create a product from JSON
    Create(CreateArgs),
    /// Edit a product and send only the changed fields
    Edit(ProductEditArgs),
    /// Delete a product
    Delete(DeleteArgs),
    /// List the versions of a product
    Versions(IdArgs),
}

#[derive(clap::Args)]
pub struct ProductListArgs {
    #[command(flatten)]
    pub page: PageArgs,
    /// Search term
    #[arg(long, default_value = "")]
    pub search: String,
}

#[derive(clap::Args)]
pub struct ProductEditArgs {
    /// Product ID
    pub id: EntityId,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub price: Option<i64>,
    #[arg(long)]
    pub brand: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Replace the category selection (repeatable)
    #[arg(long = "category")]
    pub categories: Vec<String>,
    #[arg(long)]
    pub stock: Option<i64>,
    /// Remove a stored image by path (repeatable)
    #[arg(long = "remove-image")]
    pub remove_images: Vec<String>,
    /// Queue a local image file for upload (repeatable)
    #[arg(long = "attach-image")]
    pub attach_images: Vec<String>,
    /// Treat a reordered category list as unchanged
    #[arg(long)]
    pub ignore_category_order: bool,
    #[command(flatten)]
    pub edit: EditArgs,
}

// Versions

#[derive(clap::Args)]
pub struct VersionArgs {
    #[command(subcommand)]
    pub command: VersionCommands,
}

#[derive(Subcommand)]
pub enum VersionCommands {
    /// Show a version with its sizes
    Get(IdArgs),
    /// Create a version for a product from JSON
    Create(VersionCreateArgs),
    /// Edit a version and its sizes
    Edit(VersionEditArgs),
    /// Delete a version
    Delete(DeleteArgs),
}

#[derive(clap::Args)]
pub struct VersionCreateArgs {
    /// Owning product ID
    pub product_id: EntityId,
    /// Path to JSON file (reads from stdin if omitted)
    #[arg(long)]
    pub file: Option<String>,
}

#[derive(clap::Args)]
pub struct VersionEditArgs {
    /// Version ID
    pub id: EntityId,
    #[arg(long)]
    pub style: Option<String>,
    #[arg(long)]
    pub stock: Option<i64>,
    /// Add stock to a size, creating it if missing (e.g. --add-size XL=4)
    #[arg(long = "add-size", value_parser = parse_size_spec)]
    pub add_sizes: Vec<SizeSpec>,
    /// Set the quantity of an existing size (e.g. --set-size M=2)
    #[arg(long = "set-size", value_parser = parse_size_spec)]
    pub set_sizes: Vec<SizeSpec>,
    /// Reset a size's quantity to zero
    #[arg(long = "reset-size")]
    pub reset_sizes: Vec<String>,
    /// Remove a size entirely
    #[arg(long = "remove-size")]
    pub remove_sizes: Vec<String>,
    /// Remove a stored image by path (repeatable)
    #[arg(long = "remove-image")]
    pub remove_images: Vec<String>,
    /// Queue a local image file for upload (repeatable)
    #[arg(long = "attach-image")]
    pub attach_images: Vec<String>,
    #[command(flatten)]
    pub edit: EditArgs,
}

/// `LABEL=QUANTITY` as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeSpec {
    pub label: String,
    pub quantity: i64,
}

pub fn parse_size_spec(raw: &str) -> Result<SizeSpec, String> {
    let (label, quantity) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected LABEL=QUANTITY, got \"{raw}\""))?;
    let label = label.trim();
    if label.is_empty() {
        return Err("size label cannot be empty".to_string());
    }
    let quantity = quantity
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("invalid quantity \"{quantity}\" for size {label}"))?;
    Ok(SizeSpec {
        label: label.to_string(),
        quantity,
    })
}

// Sizes

#[derive(clap::Args)]
pub struct SizeArgs {
    #[command(subcommand)]
    pub command: SizeCommands,
}

#[derive(Subcommand)]
pub enum SizeCommands {
    /// List all size records
    List,
    /// Create a size record from JSON
    Create(FileArgs),
    /// Update a size record from JSON
    Update(SizeUpdateArgs),
}

#[derive(clap::Args)]
pub struct SizeUpdateArgs {
    /// Size record ID
    pub id: EntityId,
    /// Path to JSON file (reads from stdin if omitted)
    #[arg(long)]
    pub file: Option<String>,
}

// Categories

#[derive(clap::Args)]
pub struct CategoryArgs {
    #[command(subcommand)]
    pub command: CategoryCommands,
}

#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List categories
    List,
    /// Create a category
    Create(CategoryCreateArgs),
    /// Rename a category or change its image
    Update(CategoryUpdateArgs),
    /// Delete a category
    Delete(CategoryDeleteArgs),
    /// List products in a category
    Products(CategoryProductsArgs),
}

#[derive(clap::Args)]
pub struct CategoryCreateArgs {
    pub name: String,
    /// Image path or URL
    #[arg(long)]
    pub image: Option<String>,
}

#[derive(clap::Args)]
pub struct CategoryUpdateArgs {
    /// Current category name
    pub name: String,
    /// New name
    #[arg(long)]
    pub rename: Option<String>,
    #[arg(long)]
    pub image: Option<String>,
}

#[derive(clap::Args)]
pub struct CategoryDeleteArgs {
    pub name: String,
    #[command(flatten)]
    pub confirm: ConfirmArgs,
}

#[derive(clap::Args)]
pub struct CategoryProductsArgs {
    pub name: String,
    #[command(flatten)]
    pub page: PageArgs,
}

// Orders

#[derive(clap::Args)]
pub struct OrderArgs {
    #[command(subcommand)]
    pub command: OrderCommands,
}

#[derive(Subcommand)]
pub enum OrderCommands {
    /// List orders
    List(PageArgs),
    /// Mark a pending order as fulfilled
    Fulfill(IdArgs),
    /// Cancel a pending order
    Cancel(DeleteArgs),
}

// Users

#[derive(clap::Args)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommands,
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// List users
    List(PageArgs),
    /// Delete a user
    Delete(DeleteArgs),
}

// Shared

#[derive(clap::Args)]
pub struct IdArgs {
    pub id: EntityId,
}

#[derive(clap::Args)]
pub struct DeleteArgs {
    pub id: EntityId,
    #[command(flatten)]
    pub confirm: ConfirmArgs,
}

#[derive(clap::Args)]
pub struct CreateArgs {
    /// Path to JSON file (reads from stdin if omitted)
    #[arg(long)]
    pub file: Option<String>,
}

pub type FileArgs = CreateArgs;

#[derive(clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current config
    Show,
    /// Set config value
    Set(ConfigSetArgs),
}

#[derive(clap::Args)]
pub struct ConfigSetArgs {
    /// Key to set (server, format, page_size, timeout_secs, log_level)
    pub key: String,
    /// Value
    pub value: String,
}
