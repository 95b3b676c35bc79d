//! Pricing
//!
//! Derived cart values: goods amount, per-merchant delivery fee, grand total
//! and the minimum order check. Nothing here is cached; a [`CartTotals`] is a
//! snapshot computed from whatever lines are passed in.

use rustc_hash::FxHashSet;
use rusty_money::{
    Money, MoneyError,
    iso::{self, Currency},
};
use thiserror::Error;

use crate::items::CartItem;

/// Flat delivery fee charged once per merchant, in minor units (2.00 CNY).
pub const DEFAULT_DELIVERY_FEE_MINOR: i64 = 200;

/// Minimum order total required for delivery, in minor units (15.00 CNY).
pub const DEFAULT_MINIMUM_ORDER_MINOR: i64 = 1500;

/// Errors that can occur while computing cart totals.
#[derive(Debug, Error, PartialEq)]
pub enum TotalsError {
    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// The delivery policy is priced in a different currency than the cart (policy, cart).
    #[error("Delivery policy has currency {0}, but cart has currency {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// An amount did not fit in minor units.
    #[error("amount overflow")]
    Overflow,
}

/// Delivery pricing rules applied on top of the goods amount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeliveryPolicy<'a> {
    per_merchant_fee: Money<'a, Currency>,
    minimum_order: Money<'a, Currency>,
}

impl<'a> DeliveryPolicy<'a> {
    /// Create a policy with the given flat fee and minimum order.
    pub fn new(per_merchant_fee: Money<'a, Currency>, minimum_order: Money<'a, Currency>) -> Self {
        Self {
            per_merchant_fee,
            minimum_order,
        }
    }

    /// Fee charged once for every distinct merchant in the cart
    pub fn per_merchant_fee(&self) -> Money<'a, Currency> {
        self.per_merchant_fee
    }

    /// Total the cart must reach before it can be ordered
    pub fn minimum_order(&self) -> Money<'a, Currency> {
        self.minimum_order
    }
}

impl Default for DeliveryPolicy<'static> {
    fn default() -> Self {
        Self {
            per_merchant_fee: Money::from_minor(DEFAULT_DELIVERY_FEE_MINOR, iso::CNY),
            minimum_order: Money::from_minor(DEFAULT_MINIMUM_ORDER_MINOR, iso::CNY),
        }
    }
}

/// Snapshot of the values derived from a set of cart lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartTotals<'a> {
    total_count: u64,
    merchant_count: usize,
    goods_amount: Money<'a, Currency>,
    total_delivery_fee: Money<'a, Currency>,
    total_amount: Money<'a, Currency>,
    meets_min_order_requirement: bool,
}

impl<'a> CartTotals<'a> {
    /// Compute totals over the given lines.
    ///
    /// # Errors
    ///
    /// - [`TotalsError::Money`]: a line is priced in a different currency than `currency`.
    /// - [`TotalsError::CurrencyMismatch`]: the policy is priced in a different currency.
    /// - [`TotalsError::Overflow`]: an amount does not fit in minor units.
    pub fn compute<'i>(
        items: impl IntoIterator<Item = &'i CartItem<'a>>,
        currency: &'a Currency,
        policy: &DeliveryPolicy<'a>,
    ) -> Result<Self, TotalsError>
    where
        'a: 'i,
    {
        for amount in [policy.per_merchant_fee, policy.minimum_order] {
            if amount.currency() != currency {
                return Err(TotalsError::CurrencyMismatch(
                    amount.currency().iso_alpha_code,
                    currency.iso_alpha_code,
                ));
            }
        }

        let mut total_count = 0u64;
        let mut goods_amount = Money::from_minor(0, currency);
        let mut merchants = FxHashSet::default();

        for item in items {
            total_count += u64::from(item.quantity());

            let line_total = item.line_total().ok_or(TotalsError::Overflow)?;
            goods_amount = goods_amount.add(line_total)?;

            merchants.insert(item.merchant_id());
        }

        let merchant_count = merchants.len();

        let fee_minor = i64::try_from(merchant_count)
            .ok()
            .and_then(|count| policy.per_merchant_fee.to_minor_units().checked_mul(count))
            .ok_or(TotalsError::Overflow)?;

        let total_delivery_fee = Money::from_minor(fee_minor, currency);
        let total_amount = goods_amount.add(total_delivery_fee)?;

        let meets_min_order_requirement =
            total_amount.to_minor_units() >= policy.minimum_order.to_minor_units();

        Ok(Self {
            total_count,
            merchant_count,
            goods_amount,
            total_delivery_fee,
            total_amount,
            meets_min_order_requirement,
        })
    }

    /// Sum of all line quantities
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Number of distinct merchants the lines belong to
    pub fn merchant_count(&self) -> usize {
        self.merchant_count
    }

    /// Sum of unit price times quantity, before delivery
    pub fn goods_amount(&self) -> Money<'a, Currency> {
        self.goods_amount
    }

    /// Flat fee times the number of distinct merchants
    pub fn total_delivery_fee(&self) -> Money<'a, Currency> {
        self.total_delivery_fee
    }

    /// Goods amount plus delivery
    pub fn total_amount(&self) -> Money<'a, Currency> {
        self.total_amount
    }

    /// Whether the total reaches the policy's minimum order
    pub fn meets_min_order_requirement(&self) -> bool {
        self.meets_min_order_requirement
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{CNY, USD};
    use testresult::TestResult;

    use crate::{
        items::{NewCartItem, ProductId},
        merchants::MerchantId,
    };

    use super::*;

    fn line<'a>(id: u64, merchant: u64, price_minor: i64, quantity: u32) -> CartItem<'a> {
        CartItem::new(
            NewCartItem {
                id: ProductId::new(id),
                spec_id: None,
                spec_name: None,
                name: format!("Product {id}"),
                price: Money::from_minor(price_minor, CNY),
                image: String::new(),
                merchant_id: MerchantId::new(merchant),
                merchant_name: format!("Merchant {merchant}"),
                stock: 100,
            },
            quantity,
        )
    }

    #[test]
    fn empty_lines_have_zero_totals() -> TestResult {
        let items: [CartItem<'_>; 0] = [];

        let totals = CartTotals::compute(&items, CNY, &DeliveryPolicy::default())?;

        assert_eq!(totals.total_count(), 0);
        assert_eq!(totals.merchant_count(), 0);
        assert_eq!(totals.goods_amount(), Money::from_minor(0, CNY));
        assert_eq!(totals.total_delivery_fee(), Money::from_minor(0, CNY));
        assert_eq!(totals.total_amount(), Money::from_minor(0, CNY));
        assert!(!totals.meets_min_order_requirement());

        Ok(())
    }

    #[test]
    fn single_merchant_pays_one_fee() -> TestResult {
        let items = [line(1, 1, 1000, 2), line(2, 1, 500, 1)];

        let totals = CartTotals::compute(&items, CNY, &DeliveryPolicy::default())?;

        assert_eq!(totals.total_count(), 3);
        assert_eq!(totals.goods_amount(), Money::from_minor(2500, CNY));
        assert_eq!(totals.total_delivery_fee(), Money::from_minor(200, CNY));
        assert_eq!(totals.total_amount(), Money::from_minor(2700, CNY));
        assert!(totals.meets_min_order_requirement());

        Ok(())
    }

    #[test]
    fn each_merchant_pays_one_fee() -> TestResult {
        let items = [
            line(1, 1, 100, 1),
            line(2, 2, 100, 1),
            line(3, 2, 100, 4),
            line(4, 3, 100, 1),
        ];

        let totals = CartTotals::compute(&items, CNY, &DeliveryPolicy::default())?;

        assert_eq!(totals.merchant_count(), 3);
        assert_eq!(totals.total_delivery_fee(), Money::from_minor(600, CNY));

        Ok(())
    }

    #[test]
    fn minimum_order_is_inclusive() -> TestResult {
        // 13.00 goods + 2.00 delivery is exactly the minimum
        let items = [line(1, 1, 1300, 1)];

        let totals = CartTotals::compute(&items, CNY, &DeliveryPolicy::default())?;

        assert_eq!(totals.total_amount(), Money::from_minor(1500, CNY));
        assert!(totals.meets_min_order_requirement());

        let items = [line(1, 1, 1299, 1)];

        let totals = CartTotals::compute(&items, CNY, &DeliveryPolicy::default())?;

        assert!(!totals.meets_min_order_requirement());

        Ok(())
    }

    #[test]
    fn policy_currency_mismatch_errors() {
        let policy = DeliveryPolicy::new(Money::from_minor(200, USD), Money::from_minor(1500, USD));
        let items = [line(1, 1, 100, 1)];

        let result = CartTotals::compute(&items, CNY, &policy);

        assert_eq!(
            result,
            Err(TotalsError::CurrencyMismatch(
                USD.iso_alpha_code,
                CNY.iso_alpha_code
            ))
        );
    }

    #[test]
    fn line_overflow_errors() {
        let items = [line(1, 1, i64::MAX, 2)];

        let result = CartTotals::compute(&items, CNY, &DeliveryPolicy::default());

        assert_eq!(result, Err(TotalsError::Overflow));
    }
}
