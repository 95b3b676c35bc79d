//! Receipt
//!
//! Checkout summary for the lines selected in a cart, grouped by merchant.

use std::io;

use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::Cart,
    merchants::MerchantId,
    pricing::{CartTotals, DeliveryPolicy, TotalsError},
};

/// Errors that can occur when building or writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error calculating cart totals.
    #[error(transparent)]
    Totals(#[from] TotalsError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// One printed line of the receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptLine<'a> {
    /// Merchant the line belongs to
    pub merchant_id: MerchantId,

    /// Merchant display name
    pub merchant_name: String,

    /// Product name
    pub name: String,

    /// Variant name, if any
    pub spec_name: Option<String>,

    /// Unit price
    pub unit_price: Money<'a, Currency>,

    /// Quantity
    pub quantity: u32,

    /// Unit price times quantity
    pub line_total: Money<'a, Currency>,
}

/// Receipt for the selected lines of a cart.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    lines: Vec<ReceiptLine<'a>>,
    totals: CartTotals<'a>,
    minimum_order: Money<'a, Currency>,
}

impl<'a> Receipt<'a> {
    /// Build a receipt from the cart's selected lines.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError::Totals`] if the totals cannot be computed.
    pub fn from_cart(cart: &Cart<'a>, policy: &DeliveryPolicy<'a>) -> Result<Self, ReceiptError> {
        let totals = cart.checked_totals(policy)?;

        let mut lines = Vec::with_capacity(cart.len());

        for group in cart.merchant_groups() {
            for item in group.iter().filter(|item| item.is_checked()) {
                let line_total = item.line_total().ok_or(TotalsError::Overflow)?;

                lines.push(ReceiptLine {
                    merchant_id: group.merchant_id(),
                    merchant_name: group.merchant_name().to_string(),
                    name: item.name().to_string(),
                    spec_name: item.spec_name().map(str::to_string),
                    unit_price: *item.price(),
                    quantity: item.quantity(),
                    line_total,
                });
            }
        }

        Ok(Self {
            lines,
            totals,
            minimum_order: policy.minimum_order(),
        })
    }

    /// Printed lines, grouped by merchant
    pub fn lines(&self) -> &[ReceiptLine<'a>] {
        &self.lines
    }

    /// Totals over the printed lines
    pub fn totals(&self) -> &CartTotals<'a> {
        &self.totals
    }

    /// Write the receipt as a table followed by a summary.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError::Io`] if writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["Merchant", "Item", "Spec", "Price", "Qty", "Total"]);

        let mut previous_merchant = None;

        for line in &self.lines {
            // Only the first line of each merchant carries its name.
            let merchant = if previous_merchant == Some(line.merchant_id) {
                String::new()
            } else {
                line.merchant_name.clone()
            };

            previous_merchant = Some(line.merchant_id);

            builder.push_record([
                merchant,
                line.name.clone(),
                line.spec_name.clone().unwrap_or_default(),
                format!("{}", line.unit_price),
                line.quantity.to_string(),
                format!("{}", line.line_total),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(3..6), Alignment::right());

        writeln!(out, "\n{table}")?;

        self.write_summary(&mut out)?;

        Ok(())
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let totals = &self.totals;

        let delivery_label = match totals.merchant_count() {
            1 => " Delivery (1 merchant):".to_string(),
            count => format!(" Delivery ({count} merchants):"),
        };

        let minimum = if totals.meets_min_order_requirement() {
            "met".to_string()
        } else {
            format!("not met, {} required", self.minimum_order)
        };

        let rows = [
            (" Items:".to_string(), totals.total_count().to_string()),
            (" Goods:".to_string(), format!("{}", totals.goods_amount())),
            (delivery_label, format!("{}", totals.total_delivery_fee())),
            (
                " Total:".to_string(),
                format!("\x1b[1m{}\x1b[0m", totals.total_amount()),
            ),
            (" Minimum order:".to_string(), minimum),
        ];

        let label_width = rows
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or_default();

        for (label, value) in &rows {
            writeln!(out, "{label:<label_width$}  {value}")?;
        }

        writeln!(out)?;

        Ok(())
    }
}
