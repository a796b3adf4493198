// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pit checkout` - take payment for a finished ticket

use crate::adapters::App;
use crate::output::{clip, money, print, OutputFormat};
use anyhow::Result;
use clap::Args;
use pit_core::{Permission, SystemClock, TicketId};
use pit_engine::{Checkout, PartLine, Receipt};
use serde::Serialize;
use std::fmt;

#[derive(Args)]
pub struct CheckoutArgs {
    /// Ticket to settle
    pub ticket: String,
    /// Part drawn from stock, as ITEM_ID=QUANTITY (repeatable)
    #[arg(long = "part", value_parser = parse_part)]
    pub parts: Vec<(String, i64)>,
    /// Labour charge
    #[arg(long, default_value = "0")]
    pub labour: i64,
    /// Price the job without charging or touching stock
    #[arg(long)]
    pub quote: bool,
}

pub fn parse_part(s: &str) -> Result<(String, i64), String> {
    let (id, qty) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid part '{}', expected ITEM_ID=QUANTITY", s))?;
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("invalid part '{}': missing item id", s));
    }
    let qty = qty
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("invalid quantity in '{}'", s))?;
    Ok((id.to_string(), qty))
}

#[derive(Serialize)]
#[serde(transparent)]
struct ReceiptView(Receipt);

impl fmt::Display for ReceiptView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = &self.0;
        writeln!(f, "Ticket {}", r.ticket_id)?;
        for line in &r.lines {
            writeln!(
                f,
                "  {:<28} {:>3} x {:>10} = {:>12}",
                clip(&line.name, 28),
                line.quantity,
                money(line.unit_price),
                money(line.amount)
            )?;
        }
        writeln!(f, "  {:<45} {:>12}", "Parts", money(r.parts_total))?;
        writeln!(f, "  {:<45} {:>12}", "Labour", money(r.labour))?;
        write!(f, "  {:<45} {:>12}", "Total", money(r.total))
    }
}

pub async fn handle(args: CheckoutArgs, app: &App, format: OutputFormat) -> Result<()> {
    let parts: Vec<PartLine> = args
        .parts
        .iter()
        .map(|(id, qty)| PartLine::new(id.as_str(), *qty))
        .collect();
    let ticket = TicketId::from(args.ticket.as_str());
    let checkout = Checkout::new(app.store.clone(), SystemClock);

    let receipt = if args.quote {
        checkout.quote(&ticket, &parts, args.labour).await
    } else {
        app.authorize(Permission::Checkout).await?;
        checkout.settle(&ticket, &parts, args.labour).await
    }
    .map_err(|e| app.explain(e))?;

    print(&ReceiptView(receipt), format);
    Ok(())
}

#[cfg(test)]
#[path = "checkout_tests.rs"]
mod tests;
