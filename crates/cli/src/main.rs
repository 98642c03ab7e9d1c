//! HarvestHub CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations (tables and session store)
//! hh-cli migrate
//!
//! # First run: migrate, then make sure the admin account exists
//! hh-cli setup --admin-password 'a long password'
//!
//! # Load the default produce catalog
//! hh-cli seed catalog
//!
//! # Coupons
//! hh-cli coupon create --code SAVE15 --discount 15
//! hh-cli coupon list
//!
//! # Create another admin
//! hh-cli admin create -e ops@harvest.com -n "Ops" -p 'a long password'
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

mod commands;

#[derive(Parser)]
#[command(name = "hh-cli")]
#[command(author, version, about = "HarvestHub CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Run migrations and create the default admin if missing
    Setup {
        /// Admin email address
        #[arg(long, default_value = "admin@harvest.com")]
        admin_email: String,

        /// Admin display name
        #[arg(long, default_value = "System Admin")]
        admin_name: String,

        /// Admin password (at least 8 characters)
        #[arg(long, env = "HH_ADMIN_PASSWORD")]
        admin_password: String,
    },
    /// Seed the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Manage coupons
    Coupon {
        #[command(subcommand)]
        action: CouponAction,
    },
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert or update the default produce catalog
    Catalog,
}

#[derive(Subcommand)]
enum CouponAction {
    /// Create a coupon
    Create {
        /// Code shoppers type at checkout (matched exactly)
        #[arg(short, long)]
        code: String,

        /// Discount percentage, 0 to 100
        #[arg(short, long)]
        discount: Decimal,

        /// Create the coupon switched off
        #[arg(long)]
        inactive: bool,
    },
    /// List all coupons
    List,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin user
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin display name
        #[arg(short, long)]
        name: String,

        /// Admin password (at least 8 characters)
        #[arg(short, long, env = "HH_ADMIN_PASSWORD")]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Setup {
            admin_email,
            admin_name,
            admin_password,
        } => {
            commands::migrate::run().await?;
            commands::admin::ensure_user(&admin_email, &admin_name, &admin_password).await?;
        }
        Commands::Seed { target } => match target {
            SeedTarget::Catalog => commands::seed::catalog().await?,
        },
        Commands::Coupon { action } => match action {
            CouponAction::Create {
                code,
                discount,
                inactive,
            } => {
                commands::coupon::create(&code, discount, !inactive).await?;
            }
            CouponAction::List => commands::coupon::list().await?,
        },
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                name,
                password,
            } => {
                commands::admin::create_user(&email, &name, &password).await?;
            }
        },
    }
    Ok(())
}
