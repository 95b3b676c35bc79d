//! Heikeji Cart
//!
//! Shopping cart aggregator for the Heikeji campus marketplace. A [`cart::Cart`]
//! keeps one line per product variant, grouped by merchant, and derives goods
//! amount, per-merchant delivery fee and grand total on demand. A
//! [`store::CartStore`] keeps a cart in step with the remote API through a
//! caller-supplied [`transport::Transport`].

pub mod cart;
pub mod config;
pub mod fixtures;
pub mod items;
pub mod merchants;
pub mod money;
pub mod prelude;
pub mod pricing;
pub mod receipt;
pub mod store;
pub mod transport;
