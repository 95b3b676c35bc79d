//! Cart Store
//!
//! A [`CartStore`] owns one [`Cart`] and keeps it in step with the remote
//! cart through a [`Transport`]. Every mutation is sent first and applied
//! locally only after the API accepted it, so a failed request leaves the
//! local cart untouched.

use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    cart::{Cart, CartError},
    items::{CartItem, ItemKey, NewCartItem, ProductId, SpecId},
    merchants::MerchantId,
    money::{MoneyParseError, money_from_decimal},
    pricing::{CartTotals, DeliveryPolicy, TotalsError},
    transport::{ApiRequest, Method, Transport, TransportError},
};

const CART_PATH: &str = "/api/cart";
const QUANTITY_PATH: &str = "/api/cart/quantity";
const SELECTED_PATH: &str = "/api/cart/selected";
const SELECTED_ALL_PATH: &str = "/api/cart/selected/all";
const BATCH_PATH: &str = "/api/cart/batch";
const COUNT_PATH: &str = "/api/cart/count";

/// Errors returned by [`CartStore`] operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The remote API rejected or never received the request.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The local cart refused the change.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// A remote cart line carried a price that cannot be represented.
    #[error(transparent)]
    Price(#[from] MoneyParseError),
}

/// Cart line as returned by `GET /api/cart`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteCartLine {
    product_id: ProductId,
    #[serde(default)]
    spec_id: Option<SpecId>,
    #[serde(default)]
    spec_name: Option<String>,
    #[serde(alias = "productName")]
    name: String,
    price: Decimal,
    #[serde(default, alias = "mainImage")]
    image: String,
    quantity: u32,
    merchant_id: MerchantId,
    #[serde(default)]
    merchant_name: String,
    stock: u32,
    #[serde(default = "selected_by_default")]
    checked: bool,
}

fn selected_by_default() -> bool {
    true
}

fn key_payload(key: ItemKey) -> Value {
    json!({
        "productId": key.product_id,
        "specId": key.spec_id,
    })
}

fn selected_flag(checked: bool) -> u8 {
    u8::from(checked)
}

/// Cart owned by one session and synced through a [`Transport`].
#[derive(Debug)]
pub struct CartStore<'a, T: Transport> {
    cart: Cart<'a>,
    policy: DeliveryPolicy<'a>,
    transport: T,
}

impl<'a, T: Transport> CartStore<'a, T> {
    /// Create a store with an empty cart.
    pub fn new(transport: T, currency: &'static Currency, policy: DeliveryPolicy<'a>) -> Self {
        Self::with_cart(transport, Cart::new(currency), policy)
    }

    /// Create a store around an existing cart.
    pub fn with_cart(transport: T, cart: Cart<'a>, policy: DeliveryPolicy<'a>) -> Self {
        Self {
            cart,
            policy,
            transport,
        }
    }

    /// Current local cart
    pub fn cart(&self) -> &Cart<'a> {
        &self.cart
    }

    /// Delivery policy used for totals
    pub fn policy(&self) -> &DeliveryPolicy<'a> {
        &self.policy
    }

    /// Totals over every line.
    ///
    /// # Errors
    ///
    /// See [`Cart::totals`].
    pub fn totals(&self) -> Result<CartTotals<'a>, TotalsError> {
        self.cart.totals(&self.policy)
    }

    /// Totals over the lines selected for checkout.
    ///
    /// # Errors
    ///
    /// See [`Cart::checked_totals`].
    pub fn checked_totals(&self) -> Result<CartTotals<'a>, TotalsError> {
        self.cart.checked_totals(&self.policy)
    }

    /// Number of units in the remote cart.
    ///
    /// Falls back to the local count when the request fails or the reply is
    /// not a count. A reply without data counts as an empty cart.
    #[tracing::instrument(name = "cart.store.count", skip(self))]
    pub async fn count(&self) -> u64 {
        let remote = self
            .send(ApiRequest::new(Method::Get, COUNT_PATH))
            .await
            .and_then(|data| {
                if data.is_null() {
                    return Ok(0);
                }

                serde_json::from_value::<u64>(data)
                    .map_err(|error| StoreError::Transport(TransportError::from(error)))
            });

        match remote {
            Ok(count) => count,
            Err(error) => {
                let local = self.cart.total_count();

                warn!(%error, local, "cart count unavailable, using local count");

                local
            }
        }
    }

    async fn send(&self, request: ApiRequest) -> Result<Value, StoreError> {
        debug!(method = %request.method, path = %request.path, "sending cart request");

        let response = self.transport.send(request).await?;

        Ok(response.into_data()?)
    }

    /// Replace the local cart with the remote one.
    ///
    /// Returns the number of lines loaded.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the request fails or a line cannot be
    /// decoded. The local cart is kept on error.
    #[tracing::instrument(name = "cart.store.refresh", skip(self), err)]
    pub async fn refresh(&mut self) -> Result<usize, StoreError> {
        let data = self.send(ApiRequest::new(Method::Get, CART_PATH)).await?;

        let lines: Vec<RemoteCartLine> = if data.is_null() {
            Vec::new()
        } else {
            serde_json::from_value(data).map_err(TransportError::from)?
        };

        let currency = self.cart.currency();
        let mut cart = Cart::new(currency);

        for line in lines {
            let key = ItemKey::new(line.product_id, line.spec_id);
            let item = NewCartItem {
                id: line.product_id,
                spec_id: line.spec_id,
                spec_name: line.spec_name,
                name: line.name,
                price: money_from_decimal(line.price, currency)?,
                image: line.image,
                merchant_id: line.merchant_id,
                merchant_name: line.merchant_name,
                stock: line.stock,
            };

            cart.add_item(item, line.quantity)?;

            if !line.checked {
                cart.set_checked(key, false);
            }
        }

        self.cart = cart;

        info!(lines = self.cart.len(), "refreshed cart");

        Ok(self.cart.len())
    }

    /// Add an item to the remote cart, then locally.
    ///
    /// Returns the resulting quantity of the line.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the item is in a foreign currency, the
    /// merged quantity would overflow, or the request fails. Nothing is sent
    /// when the local cart would refuse the item.
    #[tracing::instrument(
        name = "cart.store.add_item",
        skip(self, item),
        fields(key = %item.key()),
        err
    )]
    pub async fn add_item(&mut self, item: NewCartItem<'a>, quantity: u32) -> Result<u32, StoreError> {
        self.cart.check_add(&item, quantity)?;

        let key = item.key();
        let quantity = quantity.max(1);

        let mut payload = key_payload(key);
        if let Some(body) = payload.as_object_mut() {
            body.insert("quantity".to_string(), json!(quantity));
        }

        self.send(ApiRequest::new(Method::Post, CART_PATH).with_payload(payload))
            .await?;

        let quantity = self.cart.add_item(item, quantity)?;

        info!(quantity, "added item to cart");

        Ok(quantity)
    }

    /// Change the quantity of a line, clamped to stock. A resulting quantity
    /// of zero deletes the line remotely and locally. Unknown keys are
    /// ignored without a request.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the request fails.
    #[tracing::instrument(name = "cart.store.update_quantity", skip(self), fields(key = %key), err)]
    pub async fn update_quantity(&mut self, key: ItemKey, quantity: u32) -> Result<(), StoreError> {
        let Some(stock) = self.cart.get(key).map(CartItem::stock) else {
            debug!("line not in cart, nothing to update");
            return Ok(());
        };

        let clamped = quantity.min(stock);

        if clamped == 0 {
            self.remove_item(key).await?;
            return Ok(());
        }

        let mut payload = key_payload(key);
        if let Some(body) = payload.as_object_mut() {
            body.insert("quantity".to_string(), json!(clamped));
        }

        self.send(ApiRequest::new(Method::Put, QUANTITY_PATH).with_payload(payload))
            .await?;

        self.cart.update_quantity(key, clamped);

        Ok(())
    }

    /// Delete a line remotely and locally, returning it. Unknown keys are
    /// ignored without a request.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the request fails.
    #[tracing::instrument(name = "cart.store.remove_item", skip(self), fields(key = %key), err)]
    pub async fn remove_item(&mut self, key: ItemKey) -> Result<Option<CartItem<'a>>, StoreError> {
        if !self.cart.contains(key) {
            debug!("line not in cart, nothing to remove");
            return Ok(None);
        }

        let path = format!("{CART_PATH}/{}", key.product_id);
        let payload = json!({ "specId": key.spec_id });

        self.send(ApiRequest::new(Method::Delete, path).with_payload(payload))
            .await?;

        Ok(self.cart.remove_item(key))
    }

    /// Select or deselect a line. Returns `false` for unknown keys, which
    /// are ignored without a request.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the request fails.
    #[tracing::instrument(name = "cart.store.set_checked", skip(self), fields(key = %key), err)]
    pub async fn set_checked(&mut self, key: ItemKey, checked: bool) -> Result<bool, StoreError> {
        if !self.cart.contains(key) {
            return Ok(false);
        }

        let mut payload = key_payload(key);
        if let Some(body) = payload.as_object_mut() {
            body.insert("selected".to_string(), json!(selected_flag(checked)));
        }

        self.send(ApiRequest::new(Method::Put, SELECTED_PATH).with_payload(payload))
            .await?;

        Ok(self.cart.set_checked(key, checked))
    }

    /// Select or deselect every line.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the request fails.
    #[tracing::instrument(name = "cart.store.set_all_checked", skip(self), err)]
    pub async fn set_all_checked(&mut self, checked: bool) -> Result<(), StoreError> {
        let payload = json!({ "selected": selected_flag(checked) });

        self.send(ApiRequest::new(Method::Put, SELECTED_ALL_PATH).with_payload(payload))
            .await?;

        self.cart.set_all_checked(checked);

        Ok(())
    }

    /// Delete every selected line, returning how many were removed. Nothing
    /// is sent when no line is selected.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the request fails.
    #[tracing::instrument(name = "cart.store.remove_checked", skip(self), err)]
    pub async fn remove_checked(&mut self) -> Result<usize, StoreError> {
        let keys: Vec<Value> = self
            .cart
            .checked_items()
            .map(|line| key_payload(line.key()))
            .collect();

        if keys.is_empty() {
            debug!("no selected lines");
            return Ok(0);
        }

        self.send(ApiRequest::new(Method::Delete, BATCH_PATH).with_payload(Value::Array(keys)))
            .await?;

        let removed = self.cart.remove_checked();

        info!(removed, "removed selected lines");

        Ok(removed)
    }

    /// Empty the remote and local cart.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the request fails.
    #[tracing::instrument(name = "cart.store.clear", skip(self), err)]
    pub async fn clear(&mut self) -> Result<(), StoreError> {
        self.send(ApiRequest::new(Method::Delete, CART_PATH)).await?;

        self.cart.clear();

        Ok(())
    }
}
