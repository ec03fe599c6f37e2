use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use shopadmin_cli::cli::{
    CategoryCommands, Cli, Commands, ConfigCommands, OrderCommands, ProductCommands, SizeCommands,
    UserCommands, VersionCommands,
};
use shopadmin_cli::client::ApiClient;
use shopadmin_cli::commands::{self, AppContext};
use shopadmin_cli::config::{self, ProfileConfig};
use shopadmin_cli::observability;
use shopadmin_cli::output::{print_error, print_success};

#[tokio::main]
async fn main() {
    if let Err(e) = dotenvy::dotenv()
        && !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
    {
        print_error(&format!("Failed to load .env: {e}"));
    }

    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let profile_name = &cli.profile;
    let profile = config::load_profile(profile_name)?;

    observability::init_tracing_with_level(
        cli.log_level.as_deref().or(profile.log_level.as_deref()),
    );

    if let Commands::Config(args) = &cli.command {
        return match &args.command {
            ConfigCommands::Show => {
                show_config(profile_name, &profile);
                Ok(())
            }
            ConfigCommands::Set(set_args) => {
                let mut cfg = profile;
                cfg.set_key(&set_args.key, &set_args.value)?;
                config::save_profile(profile_name, &cfg)?;
                print_success(&format!("Set {} = {}", set_args.key, set_args.value));
                Ok(())
            }
        };
    }

    let server = config::resolve_server(cli.server.as_deref(), &profile);
    let format = cli
        .format
        .or_else(|| profile.output_format())
        .unwrap_or_default();
    tracing::debug!(%server, profile = %profile_name, "resolved server");
    let client = ApiClient::new(&server, profile.timeout())?;
    let ctx = AppContext::new(client, format, profile.page_size());

    match &cli.command {
        Commands::Product(args) => match &args.command {
            ProductCommands::List(a) => commands::product::list(&ctx, a).await?,
            ProductCommands::Create(a) => commands::product::create(&ctx, a).await?,
            ProductCommands::Edit(a) => commands::product::edit(&ctx, a).await?,
            ProductCommands::Delete(a) => commands::product::delete(&ctx, a).await?,
            ProductCommands::Versions(a) => commands::product::versions(&ctx, a.id).await?,
        },
        Commands::Version(args) => match &args.command {
            VersionCommands::Get(a) => commands::version::get(&ctx, a.id).await?,
            VersionCommands::Create(a) => commands::version::create(&ctx, a).await?,
            VersionCommands::Edit(a) => commands::version::edit(&ctx, a).await?,
            VersionCommands::Delete(a) => commands::version::delete(&ctx, a).await?,
        },
        Commands::Size(args) => match &args.command {
            SizeCommands::List => commands::size::list(&ctx).await?,
            SizeCommands::Create(a) => commands::size::create(&ctx, a).await?,
            SizeCommands::Update(a) => commands::size::update(&ctx, a).await?,
        },
        Commands::Category(args) => match &args.command {
            CategoryCommands::List => commands::category::list(&ctx).await?,
            CategoryCommands::Create(a) => commands::category::create(&ctx, a).await?,
            CategoryCommands::Update(a) => commands::category::update(&ctx, a).await?,
            CategoryCommands::Delete(a) => commands::category::delete(&ctx, a).await?,
            CategoryCommands::Products(a) => commands::category::products(&ctx, a).await?,
        },
        Commands::Order(args) => match &args.command {
            OrderCommands::List(a) => commands::order::list(&ctx, a).await?,
            OrderCommands::Fulfill(a) => commands::order::fulfill(&ctx, a.id).await?,
            OrderCommands::Cancel(a) => commands::order::cancel(&ctx, a).await?,
        },
        Commands::User(args) => match &args.command {
            UserCommands::List(a) => commands::user::list(&ctx, a).await?,
            UserCommands::Delete(a) => commands::user::delete(&ctx, a).await?,
        },
        Commands::Stats => commands::stats::show(&ctx).await?,
        Commands::Config(_) => {}
    }

    Ok(())
}

fn show_config(profile_name: &str, cfg: &ProfileConfig) {
    let unset = || "(not set)".to_string();
    println!("{}: {}", "Profile".cyan(), profile_name);
    println!(
        "{}: {}",
        "Server".cyan(),
        cfg.server.clone().unwrap_or_else(unset)
    );
    println!(
        "{}: {}",
        "Format".cyan(),
        cfg.format.clone().unwrap_or_else(|| "table".to_string())
    );
    println!("{}: {}", "Page size".cyan(), cfg.page_size());
    println!("{}: {}s", "Timeout".cyan(), cfg.timeout().as_secs());
    println!(
        "{}: {}",
        "Log level".cyan(),
        cfg.log_level.clone().unwrap_or_else(unset)
    );
}
