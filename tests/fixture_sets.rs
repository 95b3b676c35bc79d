//! Integration tests over the bundled fixture sets

use rusty_money::{Money, iso::CNY};
use testresult::TestResult;

use heikeji_cart::{
    fixtures::Fixture,
    items::{ItemKey, ProductId, SpecId},
    merchants::MerchantId,
    pricing::DeliveryPolicy,
    receipt::Receipt,
};

#[test]
fn canteen_totals_cover_every_line() -> TestResult {
    let cart = Fixture::from_set("canteen")?.cart()?;

    let totals = cart.totals(&DeliveryPolicy::default())?;

    assert_eq!(cart.len(), 5);
    assert_eq!(totals.total_count(), 7);
    assert_eq!(totals.merchant_count(), 3);
    assert_eq!(totals.goods_amount(), Money::from_minor(11_900, CNY));
    assert_eq!(totals.total_delivery_fee(), Money::from_minor(600, CNY));
    assert_eq!(totals.total_amount(), Money::from_minor(12_500, CNY));
    assert!(totals.meets_min_order_requirement());

    Ok(())
}

#[test]
fn canteen_repeated_line_is_merged() -> TestResult {
    let cart = Fixture::from_set("canteen")?.cart()?;

    let medium = ItemKey::from((ProductId::new(1), SpecId::new(2)));
    let large = ItemKey::from((ProductId::new(1), SpecId::new(3)));

    assert_eq!(cart.get(medium).map(|line| line.quantity()), Some(2));
    assert_eq!(cart.get(large).map(|line| line.quantity()), Some(1));

    Ok(())
}

#[test]
fn canteen_checked_totals_skip_unchecked_merchant() -> TestResult {
    let cart = Fixture::from_set("canteen")?.cart()?;

    let totals = cart.checked_totals(&DeliveryPolicy::default())?;

    assert_eq!(totals.merchant_count(), 2);
    assert_eq!(totals.goods_amount(), Money::from_minor(10_700, CNY));
    assert_eq!(totals.total_delivery_fee(), Money::from_minor(400, CNY));
    assert_eq!(totals.total_amount(), Money::from_minor(11_100, CNY));

    Ok(())
}

#[test]
fn canteen_groups_follow_first_appearance() -> TestResult {
    let cart = Fixture::from_set("canteen")?.cart()?;

    let merchants: Vec<MerchantId> = cart
        .merchant_groups()
        .iter()
        .map(|group| group.merchant_id())
        .collect();

    assert_eq!(
        merchants,
        vec![MerchantId::new(1), MerchantId::new(2), MerchantId::new(3)]
    );

    Ok(())
}

#[test]
fn canteen_receipt_lists_checked_lines() -> TestResult {
    let cart = Fixture::from_set("canteen")?.cart()?;

    let receipt = Receipt::from_cart(&cart, &DeliveryPolicy::default())?;

    let mut out = Vec::new();
    receipt.write_to(&mut out)?;
    let output = String::from_utf8(out)?;

    assert_eq!(receipt.lines().len(), 4);
    assert!(output.contains("兰州拉面"));
    assert!(!output.contains("四季奶青"));

    Ok(())
}

#[test]
fn snack_misses_minimum_order() -> TestResult {
    let cart = Fixture::from_set("snack")?.cart()?;

    let totals = cart.totals(&DeliveryPolicy::default())?;

    assert_eq!(totals.goods_amount(), Money::from_minor(1050, CNY));
    assert_eq!(totals.total_delivery_fee(), Money::from_minor(200, CNY));
    assert_eq!(totals.total_amount(), Money::from_minor(1250, CNY));
    assert!(!totals.meets_min_order_requirement());

    Ok(())
}

#[test]
fn oversold_reports_shortage_and_clamps_on_update() -> TestResult {
    let mut cart = Fixture::from_set("oversold")?.cart()?;
    let cheesecake = ItemKey::from(ProductId::new(12));

    let shortages = cart.stock_shortages();

    assert_eq!(shortages.len(), 1);
    assert_eq!(shortages.first().map(|s| (s.requested, s.available)), Some((5, 2)));

    cart.update_quantity(cheesecake, 5);

    assert_eq!(cart.get(cheesecake).map(|line| line.quantity()), Some(2));
    assert!(cart.stock_shortages().is_empty());

    Ok(())
}
