//! Cart
//!
//! In-memory collection of cart lines with at most one line per
//! [`ItemKey`]. Every derived value is computed on read through
//! [`CartTotals`].

use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    items::{CartItem, ItemKey, NewCartItem},
    merchants::MerchantId,
    pricing::{CartTotals, DeliveryPolicy, TotalsError},
};

pub mod groups;

/// Errors related to cart mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// An item's currency differs from the cart currency (item key, item currency, cart currency).
    #[error("Item {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(ItemKey, &'static str, &'static str),

    /// Merging would take the line's quantity past `u32::MAX` (item key, current quantity, added quantity).
    #[error("Adding {2} to item {0} with quantity {1} overflows")]
    QuantityOverflow(ItemKey, u32, u32),
}

/// A line whose quantity exceeds the merchant's stock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockShortage {
    /// Line identity
    pub key: ItemKey,

    /// Product name
    pub name: String,

    /// Quantity in the cart
    pub requested: u32,

    /// Quantity the merchant can supply
    pub available: u32,
}

/// Shopping cart
#[derive(Debug, Clone)]
pub struct Cart<'a> {
    items: Vec<CartItem<'a>>,
    currency: &'static Currency,
}

impl<'a> Cart<'a> {
    /// Create an empty cart priced in the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            items: Vec::new(),
            currency,
        }
    }

    /// Add `quantity` of an item, merging into the existing line for the same
    /// product and variant. A quantity of zero counts as one. Stock is not
    /// checked here.
    ///
    /// Returns the resulting quantity of the line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CurrencyMismatch`] if the item is priced in a
    /// different currency than the cart, or [`CartError::QuantityOverflow`]
    /// if the merged quantity does not fit. The cart is left unchanged.
    pub fn add_item(&mut self, item: NewCartItem<'a>, quantity: u32) -> Result<u32, CartError> {
        let merged = self.check_add(&item, quantity)?;
        let key = item.key();

        if let Some(line) = self.items.iter_mut().find(|line| line.key() == key) {
            line.set_quantity(merged);
        } else {
            self.items.push(CartItem::new(item, merged));
        }

        Ok(merged)
    }

    /// Check that `quantity` of an item can be added, returning the quantity
    /// the line would end up with.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CurrencyMismatch`] for a foreign-currency item and
    /// [`CartError::QuantityOverflow`] if the merged quantity does not fit.
    pub fn check_add(&self, item: &NewCartItem<'_>, quantity: u32) -> Result<u32, CartError> {
        self.check_currency(item)?;

        let key = item.key();
        let quantity = quantity.max(1);

        match self.get(key) {
            Some(line) => line
                .quantity()
                .checked_add(quantity)
                .ok_or(CartError::QuantityOverflow(key, line.quantity(), quantity)),
            None => Ok(quantity),
        }
    }

    /// Check that an item can be added to this cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CurrencyMismatch`] if the item is priced in a
    /// different currency than the cart.
    pub fn check_currency(&self, item: &NewCartItem<'_>) -> Result<(), CartError> {
        let item_currency = item.price.currency();

        if item_currency == self.currency {
            Ok(())
        } else {
            Err(CartError::CurrencyMismatch(
                item.key(),
                item_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ))
        }
    }

    /// Set the quantity of a line, clamped to its stock. Zero removes the
    /// line, as does a clamp to zero when stock has run out. Unknown keys are
    /// ignored.
    pub fn update_quantity(&mut self, key: ItemKey, quantity: u32) {
        let Some(line) = self.items.iter_mut().find(|line| line.key() == key) else {
            return;
        };

        let clamped = quantity.min(line.stock());

        if clamped == 0 {
            self.remove_item(key);
        } else {
            line.set_quantity(clamped);
        }
    }

    /// Remove a line, returning it if it was present.
    pub fn remove_item(&mut self, key: ItemKey) -> Option<CartItem<'a>> {
        let idx = self.items.iter().position(|line| line.key() == key)?;

        Some(self.items.remove(idx))
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Select or deselect a line for checkout. Returns `false` if the key is unknown.
    pub fn set_checked(&mut self, key: ItemKey, checked: bool) -> bool {
        match self.items.iter_mut().find(|line| line.key() == key) {
            Some(line) => {
                line.set_checked(checked);
                true
            }
            None => false,
        }
    }

    /// Select or deselect every line.
    pub fn set_all_checked(&mut self, checked: bool) {
        for line in &mut self.items {
            line.set_checked(checked);
        }
    }

    /// Remove every selected line, returning how many were removed.
    pub fn remove_checked(&mut self) -> usize {
        let before = self.items.len();

        self.items.retain(|line| !line.is_checked());

        before - self.items.len()
    }

    /// Look up a line.
    pub fn get(&self, key: ItemKey) -> Option<&CartItem<'a>> {
        self.items.iter().find(|line| line.key() == key)
    }

    /// Whether a line exists for the key.
    pub fn contains(&self, key: ItemKey) -> bool {
        self.get(key).is_some()
    }

    /// Iterate over the lines in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartItem<'a>> {
        self.items.iter()
    }

    /// Iterate over the lines selected for checkout.
    pub fn checked_items(&self) -> impl Iterator<Item = &CartItem<'a>> {
        self.items.iter().filter(|line| line.is_checked())
    }

    /// Lines owned by a single merchant.
    pub fn items_by_merchant(&self, merchant: MerchantId) -> impl Iterator<Item = &CartItem<'a>> {
        self.items
            .iter()
            .filter(move |line| line.merchant_id() == merchant)
    }

    /// Lines whose quantity exceeds the available stock.
    pub fn stock_shortages(&self) -> Vec<StockShortage> {
        self.items
            .iter()
            .filter(|line| line.quantity() > line.stock())
            .map(|line| StockShortage {
                key: line.key(),
                name: line.name().to_string(),
                requested: line.quantity(),
                available: line.stock(),
            })
            .collect()
    }

    /// Totals over every line.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalsError`] if the policy currency differs from the cart
    /// currency or an amount overflows.
    pub fn totals(&self, policy: &DeliveryPolicy<'a>) -> Result<CartTotals<'a>, TotalsError> {
        CartTotals::compute(&self.items, self.currency, policy)
    }

    /// Totals over the lines selected for checkout.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalsError`] if the policy currency differs from the cart
    /// currency or an amount overflows.
    pub fn checked_totals(
        &self,
        policy: &DeliveryPolicy<'a>,
    ) -> Result<CartTotals<'a>, TotalsError> {
        CartTotals::compute(self.checked_items(), self.currency, policy)
    }

    /// Sum of quantities over every line.
    pub fn total_count(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity())).sum()
    }

    /// Number of lines (not units) in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
