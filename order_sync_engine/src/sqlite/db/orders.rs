use chrono::Utc;
use log::*;
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db_types::{OrderItem, PurchaseOrder, PurchaseOrderRow, UnsyncedOrders},
    traits::SyncDatabaseError,
};

/// Loads every order that still needs to be pushed to SellerCloud, grouped by SellerCloud customer id, along
/// with the sku universe of the run. Cancelled orders are never candidates.
pub async fn fetch_unsynced_orders(conn: &mut SqliteConnection) -> Result<UnsyncedOrders, SyncDatabaseError> {
    let rows: Vec<PurchaseOrderRow> = sqlx::query_as(
        r#"SELECT
          id, purchase_order_number, sellercloud_customer_id, dropshipper_code, date_added,
          customer_first_name, customer_last_name, phone, address, city, state, zip, country,
          is_exempt, ships_with_company_account, ship_method
        FROM purchase_orders
        WHERE in_sellercloud = 0 AND is_cancelled = 0
        ORDER BY date_added, id"#,
    )
    .fetch_all(&mut *conn)
    .await?;
    let mut result = UnsyncedOrders::default();
    for row in rows {
        let items = fetch_order_items(row.id, conn).await?;
        for item in &items {
            result.sku_universe.insert(item.sku.clone());
        }
        let order = row.into_order(items);
        result.by_customer.entry(order.remote_customer_id).or_default().push(order);
    }
    Ok(result)
}

pub async fn fetch_order_items(
    purchase_order_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderItem>, SyncDatabaseError> {
    let items = sqlx::query_as::<_, (String, i64)>(
        "SELECT sku, quantity FROM purchase_order_items WHERE purchase_order_id = $1 ORDER BY id",
    )
    .bind(purchase_order_id)
    .fetch_all(conn)
    .await?
    .into_iter()
    .map(|(sku, quantity)| OrderItem { sku, quantity })
    .collect();
    Ok(items)
}

/// Records one successfully synced order: the remote id, the shipping cost that was charged, the sync flag and
/// timestamp. The caller wraps a batch of these in a single transaction.
pub async fn write_back_order(order: &PurchaseOrder, conn: &mut SqliteConnection) -> Result<(), SyncDatabaseError> {
    let remote_id = order
        .sellercloud_order_id
        .ok_or_else(|| SyncDatabaseError::MissingRemoteId(order.purchase_order_number.clone()))?;
    let amounts = order
        .order_amounts
        .as_ref()
        .ok_or_else(|| SyncDatabaseError::MissingAmounts(order.purchase_order_number.clone()))?;
    let _ = sqlx::query(
        r#"UPDATE purchase_orders SET
          in_sellercloud = 1,
          in_sellercloud_date = $1,
          sellercloud_order_id = $2,
          shipping_cost = $3
        WHERE id = $4"#,
    )
    .bind(Utc::now())
    .bind(remote_id)
    .bind(amounts.shipping_total)
    .bind(order.id)
    .execute(conn)
    .await?;
    trace!("🗃️ Order {} recorded as SellerCloud #{remote_id}", order.purchase_order_number);
    Ok(())
}

/// Flags the order as cancelled so no future run picks it up. Returns false if the order is unknown.
pub async fn mark_cancelled(
    purchase_order_number: &str,
    conn: &mut SqliteConnection,
) -> Result<bool, SyncDatabaseError> {
    let result = sqlx::query("UPDATE purchase_orders SET is_cancelled = 1 WHERE purchase_order_number = $1")
        .bind(purchase_order_number)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// The SellerCloud order ids on record, either for the given purchase order numbers or for every synced order.
pub async fn fetch_remote_order_ids(
    purchase_order_numbers: Option<&[String]>,
    conn: &mut SqliteConnection,
) -> Result<Vec<i64>, SyncDatabaseError> {
    let mut builder =
        QueryBuilder::new("SELECT sellercloud_order_id FROM purchase_orders WHERE sellercloud_order_id IS NOT NULL");
    if let Some(numbers) = purchase_order_numbers {
        builder.push(" AND purchase_order_number IN (");
        let mut separated = builder.separated(", ");
        for number in numbers {
            separated.push_bind(number);
        }
        separated.push_unseparated(")");
    }
    let ids = builder.build_query_scalar::<i64>().fetch_all(conn).await?;
    Ok(ids)
}
