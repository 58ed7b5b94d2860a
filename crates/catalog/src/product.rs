use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{Aggregate, AggregateRoot, DomainError, Event};

use crate::config::CatalogConfig;
use crate::generator::generate_capped;
use crate::reconcile::reconcile_with_report;
use crate::record::{ProductId, ProductRecord};
use crate::sku::SkuAllocator;
use crate::variant::{Selection, VariantCombination, VariantGroup, active_groups};

/// Aggregate root: Product, as edited from the admin console.
///
/// State is a [`ProductRecord`]; every change goes through a command and an
/// event so that replaying the events rebuilds the same record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    record: ProductRecord,
    config: CatalogConfig,
    version: u64,
    created: bool,
}

impl Product {
    /// Create an empty, not-yet-created aggregate instance for rehydration.
    pub fn empty(id: ProductId) -> Self {
        Self {
            record: ProductRecord::new(id, String::new(), 0, 0),
            config: CatalogConfig::default(),
            version: 0,
            created: false,
        }
    }

    /// Load a product from its persisted payload rather than from events.
    pub fn from_record(record: ProductRecord, version: u64) -> Self {
        Self {
            record,
            config: CatalogConfig::default(),
            version,
            created: true,
        }
    }

    pub fn with_config(mut self, config: CatalogConfig) -> Self {
        self.config = config;
        self
    }

    pub fn id_typed(&self) -> ProductId {
        self.record.id
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn record(&self) -> &ProductRecord {
        &self.record
    }

    pub fn into_record(self) -> ProductRecord {
        self.record
    }

    pub fn variants(&self) -> &[VariantGroup] {
        &self.record.variants
    }

    pub fn inventory(&self) -> &[VariantCombination] {
        &self.record.inventory
    }
}

impl AggregateRoot for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.record.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: CreateProduct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProduct {
    pub product_id: ProductId,
    pub name: String,
    pub price: u64,
    pub stock: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DefineVariants (replace the variant groups and re-sync the matrix).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefineVariants {
    pub product_id: ProductId,
    pub groups: Vec<VariantGroup>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: EditCombination (operator edit of one matrix entry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditCombination {
    pub product_id: ProductId,
    pub options: Selection,
    pub stock: u32,
    pub price: Option<u64>,
    pub sku: Option<String>,
    pub image: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: SetBaseInventory (price/stock used when there are no variants).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetBaseInventory {
    pub product_id: ProductId,
    pub price: u64,
    pub stock: u32,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductCommand {
    CreateProduct(CreateProduct),
    DefineVariants(DefineVariants),
    EditCombination(EditCombination),
    SetBaseInventory(SetBaseInventory),
}

/// Event: ProductCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCreated {
    pub product_id: ProductId,
    pub name: String,
    pub price: u64,
    pub stock: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: VariantsDefined.
///
/// Carries the reconciled matrix (including any freshly allocated SKUs) and
/// the entries the reconciliation discarded, so the loss is on record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantsDefined {
    pub product_id: ProductId,
    pub variants: Vec<VariantGroup>,
    pub inventory: Vec<VariantCombination>,
    pub dropped: Vec<VariantCombination>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CombinationEdited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinationEdited {
    pub product_id: ProductId,
    pub options: Selection,
    pub stock: u32,
    pub price: Option<u64>,
    pub sku: Option<String>,
    pub image: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: BaseInventorySet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseInventorySet {
    pub product_id: ProductId,
    pub price: u64,
    pub stock: u32,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductEvent {
    ProductCreated(ProductCreated),
    VariantsDefined(VariantsDefined),
    CombinationEdited(CombinationEdited),
    BaseInventorySet(BaseInventorySet),
}

impl Event for ProductEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ProductEvent::ProductCreated(_) => "catalog.product.created",
            ProductEvent::VariantsDefined(_) => "catalog.product.variants_defined",
            ProductEvent::CombinationEdited(_) => "catalog.product.combination_edited",
            ProductEvent::BaseInventorySet(_) => "catalog.product.base_inventory_set",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ProductEvent::ProductCreated(e) => e.occurred_at,
            ProductEvent::VariantsDefined(e) => e.occurred_at,
            ProductEvent::CombinationEdited(e) => e.occurred_at,
            ProductEvent::BaseInventorySet(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Product {
    type Command = ProductCommand;
    type Event = ProductEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            ProductEvent::ProductCreated(e) => {
                self.record = ProductRecord::new(e.product_id, e.name.clone(), e.price, e.stock);
                self.created = true;
            }
            ProductEvent::VariantsDefined(e) => {
                self.record.variants = e.variants.clone();
                self.record.inventory = e.inventory.clone();
            }
            ProductEvent::CombinationEdited(e) => {
                if let Some(entry) = self
                    .record
                    .inventory
                    .iter_mut()
                    .find(|c| c.options == e.options)
                {
                    entry.stock = e.stock;
                    entry.price = e.price;
                    entry.sku = e.sku.clone();
                    entry.image = e.image.clone();
                }
            }
            ProductEvent::BaseInventorySet(e) => {
                self.record.price = e.price;
                self.record.stock = e.stock;
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            ProductCommand::CreateProduct(cmd) => self.handle_create(cmd),
            ProductCommand::DefineVariants(cmd) => self.handle_define_variants(cmd),
            ProductCommand::EditCombination(cmd) => self.handle_edit_combination(cmd),
            ProductCommand::SetBaseInventory(cmd) => self.handle_set_base_inventory(cmd),
        }
    }
}

impl Product {
    fn ensure_existing(&self, product_id: ProductId) -> Result<(), DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        if self.record.id != product_id {
            return Err(DomainError::invariant("product_id mismatch"));
        }
        Ok(())
    }

    fn handle_create(&self, cmd: &CreateProduct) -> Result<Vec<ProductEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("product already exists"));
        }
        if cmd.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        Ok(vec![ProductEvent::ProductCreated(ProductCreated {
            product_id: cmd.product_id,
            name: cmd.name.trim().to_string(),
            price: cmd.price,
            stock: cmd.stock,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_define_variants(&self, cmd: &DefineVariants) -> Result<Vec<ProductEvent>, DomainError> {
        self.ensure_existing(cmd.product_id)?;

        let groups = active_groups(&cmd.groups);
        let mut seen = HashSet::new();
        for group in &groups {
            if !seen.insert(group.name.as_str()) {
                return Err(DomainError::validation(format!(
                    "duplicate variant group '{}'",
                    group.name
                )));
            }
        }

        let fresh = generate_capped(&groups, self.config.max_combinations)?;
        let mut allocator = SkuAllocator::new().with_placeholder(self.config.sku_placeholder.clone());
        let report = reconcile_with_report(&fresh, &self.record.inventory, &mut allocator, &self.record.name);

        Ok(vec![ProductEvent::VariantsDefined(VariantsDefined {
            product_id: cmd.product_id,
            variants: groups,
            inventory: report.matrix,
            dropped: report.dropped,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_edit_combination(&self, cmd: &EditCombination) -> Result<Vec<ProductEvent>, DomainError> {
        self.ensure_existing(cmd.product_id)?;

        if !self.record.inventory.iter().any(|c| c.options == cmd.options) {
            return Err(DomainError::not_found());
        }
        if cmd.price == Some(0) {
            return Err(DomainError::validation("price override must be positive"));
        }

        Ok(vec![ProductEvent::CombinationEdited(CombinationEdited {
            product_id: cmd.product_id,
            options: cmd.options.clone(),
            stock: cmd.stock,
            price: cmd.price,
            sku: non_blank(cmd.sku.as_deref()),
            image: non_blank(cmd.image.as_deref()),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_set_base_inventory(&self, cmd: &SetBaseInventory) -> Result<Vec<ProductEvent>, DomainError> {
        self.ensure_existing(cmd.product_id)?;

        Ok(vec![ProductEvent::BaseInventorySet(BaseInventorySet {
            product_id: cmd.product_id,
            price: cmd.price,
            stock: cmd.stock,
            occurred_at: cmd.occurred_at,
        })])
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}
