use osync_common::Money;
use sqlx::SqliteConnection;

use crate::{db_types::ShippingCostTable, traits::SyncDatabaseError};

/// Loads the per-unit shipping cost table. Each part contributes its sku and, when present, its alias; if two
/// parts claim the same key the first one loaded wins.
pub async fn fetch_shipping_costs(conn: &mut SqliteConnection) -> Result<ShippingCostTable, SyncDatabaseError> {
    let rows = sqlx::query_as::<_, (String, Option<String>, Money)>(
        "SELECT sku, alias, shipping_cost FROM part_shipping_costs ORDER BY id",
    )
    .fetch_all(conn)
    .await?;
    let mut table = ShippingCostTable::with_capacity(rows.len() * 2);
    for (sku, alias, cost) in rows {
        table.entry(sku).or_insert(cost);
        if let Some(alias) = alias {
            table.entry(alias).or_insert(cost);
        }
    }
    Ok(table)
}
