use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use log::*;
use order_sync_engine::{
    traits::{LogNotifier, Notifier, SyncDatabase},
    ReconciliationDriver,
    SqliteDatabase,
};
use osync_common::Secret;
use sellercloud_tools::{SellerCloudApi, SellerCloudConfig};
use ziptax_tools::ZipTaxApi;

#[derive(Parser, Debug)]
#[command(version, about = "Syncs local purchase orders to SellerCloud")]
pub struct Arguments {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one reconciliation pass. This is the default when no subcommand is given.
    #[clap(name = "run")]
    Run,
    /// Look up the sales tax rate for a zip code
    #[clap(name = "tax-rate")]
    TaxRate {
        /// The zip code to look up. Only the first 5 digits are used.
        zip: String,
    },
    /// Cancel a purchase order locally, deleting it from SellerCloud first if it was already uploaded
    #[clap(name = "cancel")]
    Cancel {
        /// The purchase order number to cancel
        purchase_order_number: String,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();
    let cli = Arguments::parse();
    let result = match cli.command.unwrap_or(Command::Run) {
        Command::Run => run_sync().await,
        Command::TaxRate { zip } => print_tax_rate(&zip).await,
        Command::Cancel { purchase_order_number } => cancel_order(&purchase_order_number).await,
    };
    if let Err(e) = result {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

/// Opens the configured database, migrating the schema first unless `OSYNC_MIGRATE_ON_START` is set to false.
async fn new_database() -> Result<SqliteDatabase> {
    let db = SqliteDatabase::new(5).await?;
    if switch_is_on(std::env::var("OSYNC_MIGRATE_ON_START").ok(), true) {
        db.run_migrations().await?;
    }
    Ok(db)
}

/// Interprets a boolean environment switch. An unset or unrecognized value falls back to the default.
fn switch_is_on(value: Option<String>, default: bool) -> bool {
    let Some(value) = value else { return default };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

async fn run_sync() -> Result<()> {
    let mut db = new_database().await?;
    let api = SellerCloudApi::new(SellerCloudConfig::new_from_env_or_default())?;
    let result = ReconciliationDriver::new(db.clone(), api, LogNotifier).run().await;
    if let Err(e) = db.close().await {
        warn!("🗃️ Could not close the database cleanly: {e}");
    }
    let summary = result?;
    println!(
        "{} order(s) loaded, {} created, {} duplicate(s) resolved, {} skipped, {} written back",
        summary.loaded, summary.created, summary.duplicates_resolved, summary.skipped, summary.written_back
    );
    Ok(())
}

/// Prints the sales-tax rate for a zip code. A lookup failure is reported but still prints a zero rate, so
/// scripted callers always get a usable number.
async fn print_tax_rate(zip: &str) -> Result<()> {
    let api_key = Secret::new(
        std::env::var("OSYNC_ZIPTAX_API_KEY").map_err(|_| anyhow!("OSYNC_ZIPTAX_API_KEY is not set"))?,
    );
    let api = ZipTaxApi::new(api_key)?;
    let rate = match api.tax_rate(zip).await {
        Ok(rate) => rate,
        Err(e) => {
            warn!("Could not fetch the tax rate for {zip}: {e}. Falling back to a zero rate.");
            LogNotifier.notify("There was an error getting a tax rate", &format!("Zip: {zip}\n\nError: {e}")).await;
            0.0
        },
    };
    println!("{rate}");
    Ok(())
}

async fn cancel_order(purchase_order_number: &str) -> Result<()> {
    let mut db = new_database().await?;
    let numbers = [purchase_order_number.to_string()];
    let remote_ids = db.remote_order_ids(Some(&numbers)).await?;
    if !remote_ids.is_empty() {
        let api = SellerCloudApi::new(SellerCloudConfig::new_from_env_or_default())?;
        for remote_id in remote_ids {
            api.delete_order(remote_id).await?;
            info!("📦️ Deleted SellerCloud order #{remote_id}");
        }
    }
    db.mark_cancelled(purchase_order_number).await?;
    println!("Cancelled {purchase_order_number}");
    if let Err(e) = db.close().await {
        warn!("🗃️ Could not close the database cleanly: {e}");
    }
    Ok(())
}
