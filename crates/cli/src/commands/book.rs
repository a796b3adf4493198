// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pit book` - diagnosis booking behind the payment gate

use super::ticket::{prepare, IntakeArgs};
use super::TicketDetail;
use crate::adapters::App;
use crate::error::PitError;
use crate::output::{money, print, OutputFormat};
use anyhow::Result;
use clap::Args;
use pit_adapters::Customer;
use pit_core::{Permission, UuidIdGen};
use pit_engine::DiagnosisBooking;

#[derive(Args)]
pub struct BookArgs {
    #[command(flatten)]
    pub intake: IntakeArgs,
    /// Customer email for the payment page
    #[arg(long)]
    pub email: Option<String>,
    /// Resume waiting on an order that was already started
    #[arg(long)]
    pub order: Option<String>,
}

pub async fn handle(args: BookArgs, app: &App, format: OutputFormat) -> Result<()> {
    app.authorize(Permission::ManageQueue).await?;
    let payment = app.payment()?;
    let Some((fee, poll)) = app.payment_terms() else {
        return Err(PitError::payment_not_configured().into());
    };
    let booking = DiagnosisBooking::new(app.desk(), payment, UuidIdGen);
    let new = prepare(&args.intake, app).await?;

    let order_id = match args.order {
        Some(order_id) => order_id,
        None => {
            let mut customer = Customer::new(args.intake.name.trim());
            customer.phone = args.intake.phone.clone();
            customer.email = args.email.clone();
            let session = booking
                .start(customer, fee)
                .await
                .map_err(|e| app.explain(e))?;
            eprintln!("Diagnosis fee {} for order {}", money(fee), session.order_id);
            match &session.redirect_url {
                Some(url) => eprintln!("Pay at: {}", url),
                None => eprintln!("Payment token: {}", session.token),
            }
            eprintln!("Waiting for payment (up to {}s)...", poll.timeout.as_secs());
            session.order_id
        }
    };

    let ticket = booking
        .confirm(&order_id, new, poll)
        .await
        .map_err(|e| app.explain(e))?;
    print(&TicketDetail(&ticket), format);
    Ok(())
}
