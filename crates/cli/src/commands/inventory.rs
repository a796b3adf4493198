// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pit inventory` - stock lookup and invoice import

use crate::adapters::App;
use crate::output::{clip, money, print, print_list, OutputFormat};
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use pit_adapters::ImageData;
use pit_core::{InventoryItem, Permission, ScannedLine, SystemClock, UuidIdGen};
use pit_engine::{ImportSummary, InventoryImport};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct InventoryArgs {
    #[command(subcommand)]
    pub command: InventoryCommand,
}

#[derive(Subcommand)]
pub enum InventoryCommand {
    /// List all items
    List,
    /// Find items by name, tolerating typos
    Search {
        /// Keyword
        query: String,
    },
    /// Read a supplier invoice photo and add its lines to stock
    Import {
        /// Invoice image (jpg, png or webp)
        image: PathBuf,
        /// Only show the scanned lines
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Serialize)]
#[serde(transparent)]
struct ItemRow(InventoryItem);

impl fmt::Display for ItemRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let item = &self.0;
        write!(
            f,
            "{:<14} {:<30} stock {:>5}  {:>12}",
            clip(&item.id.0, 14),
            clip(&item.name, 30),
            item.stock,
            money(item.price)
        )
    }
}

#[derive(Serialize)]
#[serde(transparent)]
struct LineRow(ScannedLine);

impl fmt::Display for LineRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = &self.0;
        write!(f, "{:>5} x {}", line.quantity, line.name)?;
        if let Some(price) = line.unit_price {
            write!(f, " @ {}", money(price))?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(transparent)]
struct SummaryView(ImportSummary);

impl fmt::Display for SummaryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in &self.0.restocked {
            writeln!(f, "Restocked {} (now {})", item.name, item.stock)?;
        }
        for item in &self.0.created {
            writeln!(f, "Created {} ({} in stock)", item.name, item.stock)?;
        }
        write!(
            f,
            "{} restocked, {} created",
            self.0.restocked.len(),
            self.0.created.len()
        )
    }
}

/// Guess the image type from the file extension
pub fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        _ => None,
    }
}

pub async fn handle(args: InventoryArgs, app: &App, format: OutputFormat) -> Result<()> {
    let inventory =
        InventoryImport::new(app.store.clone(), app.inference(), SystemClock, UuidIdGen);
    match args.command {
        InventoryCommand::List => {
            let items = inventory.list().await.map_err(|e| app.explain(e))?;
            let rows: Vec<_> = items.into_iter().map(ItemRow).collect();
            print_list(&rows, format, "No items");
        }
        InventoryCommand::Search { query } => {
            let items = inventory.search(&query).await.map_err(|e| app.explain(e))?;
            let rows: Vec<_> = items.into_iter().map(ItemRow).collect();
            print_list(&rows, format, "No matching items");
        }
        InventoryCommand::Import { image, dry_run } => {
            app.authorize(Permission::ManageInventory).await?;
            let mime = mime_for(&image).with_context(|| {
                format!("unsupported image type: {}", image.display())
            })?;
            let bytes = std::fs::read(&image)
                .with_context(|| format!("could not read {}", image.display()))?;

            let lines = inventory
                .scan_invoice(ImageData::new(mime, bytes))
                .await
                .map_err(|e| app.explain(e))?;
            if dry_run || lines.is_empty() {
                let rows: Vec<_> = lines.into_iter().map(LineRow).collect();
                print_list(&rows, format, "No lines found on the invoice");
                return Ok(());
            }
            let summary = inventory.import(&lines).await.map_err(|e| app.explain(e))?;
            print(&SummaryView(summary), format);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "inventory_tests.rs"]
mod tests;
