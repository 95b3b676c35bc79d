//! Heikeji Cart prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, StockShortage, groups::MerchantGroup},
    items::{CartItem, ItemKey, NewCartItem, ProductId, SpecId},
    merchants::{Merchant, MerchantId},
    money::{MoneyParseError, parse_price},
    pricing::{CartTotals, DeliveryPolicy, TotalsError},
    receipt::{Receipt, ReceiptError},
    store::{CartStore, StoreError},
    transport::{ApiRequest, ApiResponse, Method, Transport, TransportError},
};
