//! Merchant Groups

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;

use crate::{
    cart::Cart,
    items::CartItem,
    merchants::MerchantId,
    pricing::TotalsError,
};

/// Cart lines belonging to one merchant.
#[derive(Debug, Clone)]
pub struct MerchantGroup<'c, 'a> {
    merchant_id: MerchantId,
    merchant_name: &'c str,
    items: SmallVec<[&'c CartItem<'a>; 4]>,
}

impl<'c, 'a> MerchantGroup<'c, 'a> {
    /// Merchant identifier
    pub fn merchant_id(&self) -> MerchantId {
        self.merchant_id
    }

    /// Merchant display name, taken from the group's first line
    pub fn merchant_name(&self) -> &'c str {
        self.merchant_name
    }

    /// Iterate over the group's lines in cart order.
    pub fn iter(&self) -> impl Iterator<Item = &'c CartItem<'a>> + '_ {
        self.items.iter().copied()
    }

    /// Number of lines in the group
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the group has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of unit price times quantity over the group, without delivery.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalsError`] if a line overflows or lines disagree on currency.
    pub fn goods_amount(&self, currency: &'a Currency) -> Result<Money<'a, Currency>, TotalsError> {
        self.items
            .iter()
            .try_fold(Money::from_minor(0, currency), |acc, item| {
                let line_total = item.line_total().ok_or(TotalsError::Overflow)?;

                Ok(acc.add(line_total)?)
            })
    }
}

impl<'a> Cart<'a> {
    /// Group the lines by merchant, in order of each merchant's first line.
    pub fn merchant_groups(&self) -> Vec<MerchantGroup<'_, 'a>> {
        let mut positions: FxHashMap<MerchantId, usize> = FxHashMap::default();
        let mut groups: Vec<MerchantGroup<'_, 'a>> = Vec::new();

        for item in self.iter() {
            let merchant_id = item.merchant_id();

            let position = *positions.entry(merchant_id).or_insert_with(|| {
                groups.push(MerchantGroup {
                    merchant_id,
                    merchant_name: item.merchant_name(),
                    items: SmallVec::new(),
                });

                groups.len() - 1
            });

            if let Some(group) = groups.get_mut(position) {
                group.items.push(item);
            }
        }

        groups
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::CNY;
    use testresult::TestResult;

    use crate::items::{NewCartItem, ProductId};

    use super::*;

    fn product<'a>(id: u64, merchant: u64, price_minor: i64) -> NewCartItem<'a> {
        NewCartItem {
            id: ProductId::new(id),
            spec_id: None,
            spec_name: None,
            name: format!("Product {id}"),
            price: Money::from_minor(price_minor, CNY),
            image: String::new(),
            merchant_id: MerchantId::new(merchant),
            merchant_name: format!("Merchant {merchant}"),
            stock: 10,
        }
    }

    #[test]
    fn groups_follow_first_appearance_order() -> TestResult {
        let mut cart = Cart::new(CNY);
        cart.add_item(product(1, 2, 100), 1)?;
        cart.add_item(product(2, 1, 100), 1)?;
        cart.add_item(product(3, 2, 100), 1)?;

        let groups = cart.merchant_groups();

        let merchants: Vec<u64> = groups.iter().map(|g| g.merchant_id().get()).collect();
        assert_eq!(merchants, vec![2, 1]);

        let first: Vec<u64> = groups
            .first()
            .map(|g| g.iter().map(|item| item.id().get()).collect())
            .unwrap_or_default();
        assert_eq!(first, vec![1, 3]);

        Ok(())
    }

    #[test]
    fn group_goods_amount_sums_lines() -> TestResult {
        let mut cart = Cart::new(CNY);
        cart.add_item(product(1, 1, 1000), 2)?;
        cart.add_item(product(2, 1, 500), 1)?;
        cart.add_item(product(3, 2, 9900), 1)?;

        let groups = cart.merchant_groups();
        let group = groups.first().ok_or("missing group")?;

        assert_eq!(group.merchant_name(), "Merchant 1");
        assert_eq!(group.len(), 2);
        assert_eq!(group.goods_amount(CNY)?, Money::from_minor(2500, CNY));

        Ok(())
    }

    #[test]
    fn empty_cart_has_no_groups() {
        let cart = Cart::new(CNY);

        assert!(cart.merchant_groups().is_empty());
    }
}
