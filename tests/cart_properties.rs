//! Integration tests for cart aggregation and store syncing

use rusty_money::{Money, iso::CNY};
use serde_json::{Value, json};
use testresult::TestResult;

use heikeji_cart::{
    prelude::*,
    transport::{ApiResponse, MockTransport},
};

fn item<'a>(id: u64, spec: Option<u64>, merchant: u64, price_minor: i64, stock: u32) -> NewCartItem<'a> {
    NewCartItem {
        id: ProductId::new(id),
        spec_id: spec.map(SpecId::new),
        spec_name: spec.map(|spec| format!("Spec {spec}")),
        name: format!("Product {id}"),
        price: Money::from_minor(price_minor, CNY),
        image: String::new(),
        merchant_id: MerchantId::new(merchant),
        merchant_name: format!("Merchant {merchant}"),
        stock,
    }
}

#[test]
fn same_variant_added_twice_sums_quantity() -> TestResult {
    let mut cart = Cart::new(CNY);

    cart.add_item(item(1, Some(2), 1, 1000, 10), 2)?;
    let quantity = cart.add_item(item(1, Some(2), 1, 1000, 10), 3)?;

    assert_eq!(quantity, 5);
    assert_eq!(cart.len(), 1);

    Ok(())
}

#[test]
fn other_variant_of_same_product_is_a_new_line() -> TestResult {
    let mut cart = Cart::new(CNY);

    cart.add_item(item(1, Some(2), 1, 1000, 10), 1)?;
    cart.add_item(item(1, Some(3), 1, 1200, 10), 1)?;
    cart.add_item(item(1, None, 1, 900, 10), 1)?;

    assert_eq!(cart.len(), 3);

    Ok(())
}

#[test]
fn add_does_not_clamp_but_update_does() -> TestResult {
    let mut cart = Cart::new(CNY);
    let key = ItemKey::from(ProductId::new(1));

    cart.add_item(item(1, None, 1, 1000, 3), 8)?;
    assert_eq!(cart.get(key).map(CartItem::quantity), Some(8));

    cart.update_quantity(key, 8);
    assert_eq!(cart.get(key).map(CartItem::quantity), Some(3));

    cart.update_quantity(key, 0);
    assert!(!cart.contains(key));

    Ok(())
}

#[test]
fn missing_lines_are_silent_no_ops() -> TestResult {
    let mut cart = Cart::new(CNY);
    cart.add_item(item(1, None, 1, 1000, 3), 1)?;

    let missing = ItemKey::from(ProductId::new(99));

    cart.update_quantity(missing, 4);
    assert!(cart.remove_item(missing).is_none());
    assert_eq!(cart.len(), 1);

    Ok(())
}

#[test]
fn total_count_tracks_quantities_through_mutations() -> TestResult {
    let mut cart = Cart::new(CNY);
    let policy = DeliveryPolicy::default();

    cart.add_item(item(1, None, 1, 100, 50), 4)?;
    cart.add_item(item(2, None, 2, 100, 50), 2)?;
    cart.add_item(item(1, None, 1, 100, 50), 1)?;
    cart.update_quantity(ItemKey::from(ProductId::new(2)), 7);
    cart.add_item(item(3, Some(1), 3, 100, 50), 3)?;
    cart.remove_item(ItemKey::from(ProductId::new(1)));

    let expected: u64 = cart.iter().map(|line| u64::from(line.quantity())).sum();

    assert_eq!(cart.totals(&policy)?.total_count(), expected);
    assert_eq!(expected, 10);

    cart.clear();
    assert_eq!(cart.totals(&policy)?.total_count(), 0);

    Ok(())
}

#[test]
fn delivery_fee_is_charged_once_per_merchant() -> TestResult {
    let mut cart = Cart::new(CNY);
    let policy = DeliveryPolicy::default();

    for id in 1..=4 {
        cart.add_item(item(id, None, 1, 100, 10), 1)?;
    }
    cart.add_item(item(5, None, 2, 100, 10), 1)?;

    let totals = cart.totals(&policy)?;

    assert_eq!(totals.merchant_count(), 2);
    assert_eq!(totals.total_delivery_fee(), Money::from_minor(400, CNY));

    Ok(())
}

#[test]
fn goods_and_total_for_one_merchant() -> TestResult {
    let mut cart = Cart::new(CNY);
    let policy = DeliveryPolicy::default();

    cart.add_item(item(1, None, 1, 1000, 10), 2)?;
    cart.add_item(item(2, None, 1, 500, 10), 1)?;

    let totals = cart.totals(&policy)?;

    assert_eq!(totals.goods_amount(), Money::from_minor(2500, CNY));
    assert_eq!(totals.total_delivery_fee(), policy.per_merchant_fee());
    assert_eq!(totals.total_amount(), Money::from_minor(2700, CNY));
    assert!(totals.meets_min_order_requirement());

    Ok(())
}

#[tokio::test]
async fn store_syncs_refresh_then_checkout_selection() -> TestResult {
    let mut transport = MockTransport::new();
    transport
        .expect_send()
        .withf(|request| request.method == Method::Get)
        .times(1)
        .returning(|_| {
            Ok(ApiResponse::success(json!([
                {
                    "productId": 1,
                    "specId": 2,
                    "productName": "牛肉拉面",
                    "price": "28.00",
                    "quantity": 1,
                    "merchantId": 1,
                    "merchantName": "兰州拉面",
                    "stock": 30
                },
                {
                    "productId": 9,
                    "name": "四季奶青",
                    "price": 12,
                    "quantity": 2,
                    "merchantId": 3,
                    "merchantName": "一点点奶茶",
                    "stock": 50,
                    "checked": false
                }
            ])))
        });
    transport
        .expect_send()
        .withf(|request| request.method == Method::Delete)
        .times(1)
        .returning(|_| Ok(ApiResponse::success(Value::Null)));

    let mut store = CartStore::new(transport, CNY, DeliveryPolicy::default());

    assert_eq!(store.refresh().await?, 2);
    assert_eq!(store.totals()?.goods_amount(), Money::from_minor(5200, CNY));
    assert_eq!(store.checked_totals()?.total_amount(), Money::from_minor(3000, CNY));

    assert_eq!(store.remove_checked().await?, 1);
    assert_eq!(store.cart().len(), 1);
    assert_eq!(store.totals()?.merchant_count(), 1);

    Ok(())
}
