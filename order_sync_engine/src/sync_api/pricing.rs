use osync_common::Money;
use sellercloud_tools::OrderLine;

use crate::{
    db_types::{OrderAmounts, ShippingCostTable, ValidatedItem},
    sync_api::errors::BuildFailure,
};

/// SellerCloud discount type 1: the discount value is a percentage off.
pub const DISCOUNT_TYPE_PERCENT_OFF: i64 = 1;

/// Turns validated items into SellerCloud order lines and the order's [`OrderAmounts`].
///
/// When the dropshipper ships on the company shipping account, every item's per-unit shipping cost is looked
/// up in the shipping table and accumulated as `cost * quantity`; an item without a table entry fails the
/// whole order (partial orders are never submitted). Otherwise the shipping total is fixed at zero.
///
/// The discount rate is applied uniformly to every line as a percentage-off discount. Tax exemption plays no
/// role here; it rides along as order metadata.
pub fn price_order(
    items: &[ValidatedItem],
    shipping_costs: &ShippingCostTable,
    discount_rate: f64,
    ships_with_company_account: bool,
    purchase_order_number: &str,
) -> Result<(Vec<OrderLine>, OrderAmounts), BuildFailure> {
    let mut shipping_total = Money::default();
    let mut lines = Vec::with_capacity(items.len());
    let mut amounts = OrderAmounts::default();

    for item in items {
        if ships_with_company_account {
            let unit_cost = shipping_costs.get(&item.sku).ok_or_else(|| BuildFailure::MissingShippingCost {
                purchase_order_number: purchase_order_number.to_string(),
                sku: item.sku.clone(),
            })?;
            shipping_total += *unit_cost * item.quantity;
        }
        lines.push(OrderLine {
            product_id: item.sku.clone(),
            qty: item.quantity,
            discount_value: discount_rate,
            discount_type: DISCOUNT_TYPE_PERCENT_OFF,
        });
        amounts.sku_prices.insert(item.sku.clone(), item.unit_price);
    }

    amounts.shipping_total = shipping_total;
    Ok((lines, amounts))
}
