use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, bail};
use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;

use storefront_cart::Cart;
use storefront_catalog::{
    CatalogConfig, DefineVariants, Product, ProductCommand, ProductEvent, ProductId, ProductRecord,
    Selection, derive_key,
};
use storefront_core::{Aggregate, Quantity};

/// One `-s Group=Value` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionArg {
    pub group: String,
    pub value: String,
}

impl FromStr for SelectionArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (group, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected GROUP=VALUE, got '{s}'"))?;
        let group = group.trim();
        if group.is_empty() {
            return Err(format!("missing group name in '{s}'"));
        }
        Ok(Self {
            group: group.to_string(),
            value: value.trim().to_string(),
        })
    }
}

/// No arguments means no selection; a repeated group keeps the last value.
fn selection(args: &[SelectionArg]) -> Option<Selection> {
    if args.is_empty() {
        return None;
    }
    Some(
        args.iter()
            .map(|arg| (arg.group.clone(), arg.value.clone()))
            .collect(),
    )
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn read_cart(path: &Path) -> anyhow::Result<Cart> {
    match fs::read_to_string(path) {
        Ok(raw) => serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display())),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(Cart::new()),
        Err(err) => Err(err).with_context(|| format!("reading {}", path.display())),
    }
}

fn emit<T: Serialize>(value: &T, target: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match target {
        Some(path) => fs::write(path, json + "\n").with_context(|| format!("writing {}", path.display())),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

pub fn sync(path: &Path, in_place: bool) -> anyhow::Result<()> {
    let record: ProductRecord = read_json(path)?;
    let product_id = record.id;
    let groups = record.variants.clone();

    let mut product = Product::from_record(record, 0).with_config(CatalogConfig::from_env());
    let events = product
        .execute(&ProductCommand::DefineVariants(DefineVariants {
            product_id,
            groups,
            occurred_at: Utc::now(),
        }))
        .with_context(|| format!("regenerating the matrix of product {product_id}"))?;

    for event in &events {
        if let ProductEvent::VariantsDefined(defined) = event {
            for entry in &defined.dropped {
                eprintln!(
                    "dropped {}: stock {}, price {}",
                    entry.options,
                    entry.stock,
                    entry.price.map_or_else(|| "-".to_string(), |p| p.to_string())
                );
            }
        }
    }

    emit(product.record(), in_place.then_some(path))
}

pub fn resolve(path: &Path, select: &[SelectionArg]) -> anyhow::Result<()> {
    let record: ProductRecord = read_json(path)?;
    let resolution = storefront_catalog::resolve(&record, selection(select).as_ref());
    if !resolution.matched {
        tracing::info!(product = %record.id, "selection does not identify a combination");
    }
    emit(&resolution, None)
}

pub fn key(product_id: &str, select: &[SelectionArg]) -> anyhow::Result<()> {
    let product_id: ProductId = product_id
        .parse()
        .with_context(|| format!("invalid product id '{product_id}'"))?;
    println!("{}", derive_key(&product_id, selection(select).as_ref()));
    Ok(())
}

pub fn add_to_cart(
    cart_path: &Path,
    product_path: &Path,
    select: &[SelectionArg],
    quantity: u32,
    in_place: bool,
) -> anyhow::Result<()> {
    let quantity = Quantity::new(quantity).context("invalid quantity")?;
    let record: ProductRecord = read_json(product_path)?;
    let cart = read_cart(cart_path)?;

    let selection = selection(select);
    if record.has_variants() && selection.is_none() {
        bail!("'{}' has variants; pass them with -s GROUP=VALUE", record.name);
    }

    let cart = storefront_cart::add_to_cart(cart, &record, selection.as_ref(), quantity)
        .with_context(|| format!("adding '{}' to the cart", record.name))?;
    emit(&cart, in_place.then_some(cart_path))
}
