//! Items

use std::fmt;

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

use crate::merchants::MerchantId;

/// Product identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    /// Wrap a raw product identifier.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw identifier value
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Product variant (size, colour, portion...) identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpecId(u64);

impl SpecId {
    /// Wrap a raw spec identifier.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw identifier value
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for SpecId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Identity of a cart line: a product together with its optional variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey {
    /// Product identifier
    pub product_id: ProductId,

    /// Variant identifier, `None` for products without variants
    pub spec_id: Option<SpecId>,
}

impl ItemKey {
    /// Key for a specific product variant.
    pub fn new(product_id: impl Into<ProductId>, spec_id: Option<SpecId>) -> Self {
        Self {
            product_id: product_id.into(),
            spec_id,
        }
    }
}

impl From<ProductId> for ItemKey {
    fn from(product_id: ProductId) -> Self {
        Self {
            product_id,
            spec_id: None,
        }
    }
}

impl From<(ProductId, SpecId)> for ItemKey {
    fn from((product_id, spec_id): (ProductId, SpecId)) -> Self {
        Self {
            product_id,
            spec_id: Some(spec_id),
        }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.spec_id {
            Some(spec_id) => write!(f, "{}/{}", self.product_id, spec_id.get()),
            None => write!(f, "{}", self.product_id),
        }
    }
}

/// Everything needed to put a product into the cart, minus the quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem<'a> {
    /// Product identifier
    pub id: ProductId,

    /// Variant identifier
    pub spec_id: Option<SpecId>,

    /// Variant display name, e.g. "中份"
    pub spec_name: Option<String>,

    /// Product name
    pub name: String,

    /// Unit price
    pub price: Money<'a, Currency>,

    /// Image URL
    pub image: String,

    /// Owning merchant
    pub merchant_id: MerchantId,

    /// Owning merchant display name
    pub merchant_name: String,

    /// Maximum purchasable quantity
    pub stock: u32,
}

impl NewCartItem<'_> {
    /// Cart line identity of this item.
    pub fn key(&self) -> ItemKey {
        ItemKey {
            product_id: self.id,
            spec_id: self.spec_id,
        }
    }
}

/// A line in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem<'a> {
    id: ProductId,
    spec_id: Option<SpecId>,
    spec_name: Option<String>,
    name: String,
    price: Money<'a, Currency>,
    image: String,
    quantity: u32,
    merchant_id: MerchantId,
    merchant_name: String,
    stock: u32,
    checked: bool,
}

impl<'a> CartItem<'a> {
    /// Create a selected cart line from a new item and a quantity.
    pub fn new(item: NewCartItem<'a>, quantity: u32) -> Self {
        Self {
            id: item.id,
            spec_id: item.spec_id,
            spec_name: item.spec_name,
            name: item.name,
            price: item.price,
            image: item.image,
            quantity,
            merchant_id: item.merchant_id,
            merchant_name: item.merchant_name,
            stock: item.stock,
            checked: true,
        }
    }

    /// Cart line identity
    pub fn key(&self) -> ItemKey {
        ItemKey {
            product_id: self.id,
            spec_id: self.spec_id,
        }
    }

    /// Product identifier
    pub fn id(&self) -> ProductId {
        self.id
    }

    /// Variant identifier
    pub fn spec_id(&self) -> Option<SpecId> {
        self.spec_id
    }

    /// Variant display name
    pub fn spec_name(&self) -> Option<&str> {
        self.spec_name.as_deref()
    }

    /// Product name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price
    pub fn price(&self) -> &Money<'a, Currency> {
        &self.price
    }

    /// Image URL
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Quantity in the cart
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Owning merchant
    pub fn merchant_id(&self) -> MerchantId {
        self.merchant_id
    }

    /// Owning merchant display name
    pub fn merchant_name(&self) -> &str {
        &self.merchant_name
    }

    /// Maximum purchasable quantity
    pub fn stock(&self) -> u32 {
        self.stock
    }

    /// Whether the line is selected for checkout
    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Unit price multiplied by quantity, `None` on overflow.
    pub fn line_total(&self) -> Option<Money<'a, Currency>> {
        self.price
            .to_minor_units()
            .checked_mul(i64::from(self.quantity))
            .map(|minor| Money::from_minor(minor, self.price.currency()))
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    pub(crate) fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }
}
