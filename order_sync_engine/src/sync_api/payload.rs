use osync_common::Money;
use sellercloud_tools::{
    CustomerDetails,
    CustomerRecord,
    OrderDetails,
    OrderSubmission,
    ShippingAddress,
    ShippingMethodDetails,
};

use crate::{
    db_types::{OrderAmounts, PurchaseOrder, ShippingCostTable, SkuPriceIndex, ValidatedItem},
    sync_api::{
        errors::{BuildFailure, MissingPart, MissingPartsReport},
        pricing::price_order,
    },
};

/// SellerCloud company the orders are created under.
pub const COMPANY_ID: i64 = 1;
/// SellerCloud sales channel code for wholesale orders.
pub const SALES_CHANNEL_WHOLESALE: i64 = 21;

const ORDER_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Assembles the SellerCloud submission for one purchase order, or a [`BuildFailure`] describing why the order
/// must be skipped this run. No partial orders: one invalid item fails the whole order.
pub fn build_order(
    order: &PurchaseOrder,
    customer: &CustomerRecord,
    sku_prices: &SkuPriceIndex,
    shipping_costs: &ShippingCostTable,
) -> Result<(OrderSubmission, OrderAmounts), BuildFailure> {
    let items = validate_items(order, customer, sku_prices)?;
    let (products, amounts) = price_order(
        &items,
        shipping_costs,
        customer.wholesale_discount(),
        order.ships_with_company_account,
        &order.purchase_order_number,
    )?;
    let shipping_method_details = shipping_details_for(&order.ship_method, amounts.shipping_total).ok_or_else(|| {
        BuildFailure::UnmappedShipMethod {
            purchase_order_number: order.purchase_order_number.clone(),
            ship_method: order.ship_method.clone(),
        }
    })?;

    let submission = OrderSubmission {
        customer_details: CustomerDetails {
            id: order.remote_customer_id,
            email: customer.email().to_string(),
            first_name: customer.name().to_string(),
            business: customer.name().to_string(),
            is_wholesale: true,
        },
        order_details: OrderDetails {
            company_id: COMPANY_ID,
            tax_exempt: order.tax_exempt,
            channel: SALES_CHANNEL_WHOLESALE,
            order_source_order_id: order.reference_id(),
            order_date: order.date_added.format(ORDER_DATE_FORMAT).to_string(),
        },
        products,
        shipping_address: ShippingAddress {
            first_name: order.customer_first_name.clone(),
            last_name: order.customer_last_name.clone(),
            country: order.country.clone(),
            city: order.city.clone(),
            state: order.state.clone(),
            zip_code: order.zip.clone(),
            address: order.address.clone(),
            phone: order.phone.clone(),
        },
        shipping_method_details,
    };
    Ok((submission, amounts))
}

/// Checks every item against the sku price index, requiring a positive wholesale price. Valid items come back
/// with their unit price attached; any invalid item fails the order with a missing-parts report naming every
/// offender.
fn validate_items(
    order: &PurchaseOrder,
    customer: &CustomerRecord,
    sku_prices: &SkuPriceIndex,
) -> Result<Vec<ValidatedItem>, BuildFailure> {
    let mut valid = Vec::with_capacity(order.items.len());
    let mut invalid = Vec::new();
    for item in &order.items {
        match sku_prices.get(&item.sku) {
            Some(price) if price.is_positive() => {
                valid.push(ValidatedItem { sku: item.sku.clone(), quantity: item.quantity, unit_price: *price })
            },
            known => invalid.push(MissingPart {
                sku: item.sku.clone(),
                quantity: item.quantity,
                known_but_unpriced: known.is_some(),
            }),
        }
    }
    if !invalid.is_empty() {
        return Err(BuildFailure::InvalidSkus(MissingPartsReport {
            purchase_order_number: order.purchase_order_number.clone(),
            dropshipper_name: customer.name().to_string(),
            parts: invalid,
        }));
    }
    Ok(valid)
}

/// The fixed ship-method label → carrier/method mapping. An unmapped label is rejected upstream rather than
/// silently defaulted: shipping on the wrong carrier account is worse than skipping the order for a run.
fn shipping_details_for(ship_method: &str, shipping_fee: Money) -> Option<ShippingMethodDetails> {
    let (carrier, shipping_method) = match ship_method {
        "UPS Ground" => ("UPS", "UPSGround"),
        "FEDEX Ground HD" => ("Fedex", "FedExGround"),
        _ => return None,
    };
    Some(ShippingMethodDetails {
        shipping_method: shipping_method.to_string(),
        carrier: carrier.to_string(),
        shipping_fee,
        allow_shipping_even_not_paid: true,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_utils::{sample_customer, sample_order};

    fn index(entries: &[(&str, i64)]) -> SkuPriceIndex {
        entries.iter().map(|(sku, cents)| (sku.to_string(), Money::from_cents(*cents))).collect()
    }

    #[test]
    fn the_happy_path_assembles_a_full_submission() {
        let order = sample_order("PO1001", "ABC");
        let customer = sample_customer("Acme Wholesale", 0.10);
        let costs = ShippingCostTable::from([("X1".to_string(), Money::from_dollars(1.50))]);
        let (submission, amounts) =
            build_order(&order, &customer, &index(&[("X1", 1000)]), &costs).unwrap();

        assert_eq!(submission.order_details.order_source_order_id, "ABCPO1001");
        assert_eq!(submission.order_details.channel, SALES_CHANNEL_WHOLESALE);
        assert_eq!(submission.customer_details.id, order.remote_customer_id);
        assert!(submission.customer_details.is_wholesale);
        assert_eq!(submission.products.len(), 1);
        assert_eq!(submission.products[0].qty, 2);
        assert!((submission.products[0].discount_value - 0.10).abs() < f64::EPSILON);
        // sample_order ships on the company account: 2 * $1.50
        assert_eq!(amounts.shipping_total, Money::from_cents(300));
        assert_eq!(submission.shipping_method_details.shipping_fee, Money::from_cents(300));
        assert_eq!(submission.shipping_method_details.carrier, "UPS");
        assert_eq!(submission.shipping_method_details.shipping_method, "UPSGround");
    }

    #[test]
    fn an_unknown_sku_fails_the_order_with_a_report() {
        let order = sample_order("PO1001", "ABC");
        let customer = sample_customer("Acme Wholesale", 0.10);
        let err = build_order(&order, &customer, &index(&[]), &ShippingCostTable::new()).unwrap_err();
        match err {
            BuildFailure::InvalidSkus(report) => {
                assert_eq!(report.purchase_order_number, "PO1001");
                assert_eq!(report.dropshipper_name, "Acme Wholesale");
                assert_eq!(report.parts.len(), 1);
                assert_eq!(report.parts[0].sku, "X1");
                assert!(!report.parts[0].known_but_unpriced);
            },
            other => panic!("unexpected failure: {other:?}"),
        }
    }

    #[test]
    fn a_known_sku_with_no_positive_price_is_flagged_as_unpriced() {
        let order = sample_order("PO1001", "ABC");
        let customer = sample_customer("Acme Wholesale", 0.10);
        let err = build_order(&order, &customer, &index(&[("X1", 0)]), &ShippingCostTable::new())
            .unwrap_err();
        match err {
            BuildFailure::InvalidSkus(report) => assert!(report.parts[0].known_but_unpriced),
            other => panic!("unexpected failure: {other:?}"),
        }
    }

    #[test]
    fn an_unmapped_ship_method_is_rejected() {
        let mut order = sample_order("PO1001", "ABC");
        order.ship_method = "Carrier Pigeon".to_string();
        order.ships_with_company_account = false;
        let customer = sample_customer("Acme Wholesale", 0.10);
        let err = build_order(&order, &customer, &index(&[("X1", 1000)]), &ShippingCostTable::new())
            .unwrap_err();
        assert!(matches!(err, BuildFailure::UnmappedShipMethod { .. }));
    }

    #[test]
    fn fedex_ground_hd_maps_to_fedex_ground() {
        let details = shipping_details_for("FEDEX Ground HD", Money::from_cents(0)).unwrap();
        assert_eq!(details.carrier, "Fedex");
        assert_eq!(details.shipping_method, "FedExGround");
        assert!(details.allow_shipping_even_not_paid);
    }
}
