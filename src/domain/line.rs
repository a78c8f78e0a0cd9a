//! Inventory line model
//!
//! Every source table is reduced to the same three-field schema: sku,
//! warehouse and one quantity whose meaning depends on the [`SourceRole`].

use super::ids::{Sku, WarehouseCode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The part a source table plays in the availability calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceRole {
    /// Outstanding purchase order lines
    Purchases,
    /// Item ledger entries (stock on hand)
    OnHand,
    /// Outstanding sales order lines
    Sales,
    /// Outstanding warehouse shipment lines
    WarehouseShipments,
}

impl SourceRole {
    /// All roles, in the order they are fetched
    pub const ALL: [SourceRole; 4] = [
        SourceRole::Purchases,
        SourceRole::OnHand,
        SourceRole::Sales,
        SourceRole::WarehouseShipments,
    ];

    /// Name of the quantity column this role contributes
    pub fn quantity_column(self) -> &'static str {
        match self {
            SourceRole::Purchases => "PO",
            SourceRole::OnHand => "OH",
            SourceRole::Sales => "SO",
            SourceRole::WarehouseShipments => "WSHIP",
        }
    }

    /// Source field names for (sku, warehouse, quantity)
    pub fn source_fields(self) -> [&'static str; 3] {
        match self {
            SourceRole::Purchases | SourceRole::Sales => {
                ["number", "locationCode", "outstandingQuantity"]
            }
            SourceRole::OnHand => ["Item_No", "Location_Code", "Quantity"],
            SourceRole::WarehouseShipments => ["Item_No", "Location_Code", "Qty_Outstanding"],
        }
    }

    /// Server-side filter that drops lines with nothing outstanding
    pub fn filter(self) -> &'static str {
        match self {
            SourceRole::Purchases | SourceRole::Sales => "outstandingQuantity ne 0",
            SourceRole::OnHand => "Quantity ne 0",
            SourceRole::WarehouseShipments => "Qty_Outstanding ne 0",
        }
    }

    /// Default web service table for this role
    pub fn default_table(self) -> &'static str {
        match self {
            SourceRole::Purchases => "purchaseDocumentLines",
            SourceRole::OnHand => "ItemLedgerEntries",
            SourceRole::Sales => "salesDocumentLines",
            SourceRole::WarehouseShipments => "WarehouseShipmentsLines",
        }
    }
}

impl fmt::Display for SourceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceRole::Purchases => "purchases",
            SourceRole::OnHand => "onhand",
            SourceRole::Sales => "sales",
            SourceRole::WarehouseShipments => "shipments",
        };
        write!(f, "{name}")
    }
}

/// Report metric, in report column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metric {
    #[serde(rename = "PO")]
    Po,
    #[serde(rename = "OH")]
    Oh,
    #[serde(rename = "SO")]
    So,
    #[serde(rename = "ATShip")]
    AtShip,
    #[serde(rename = "ATSell")]
    AtSell,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Po,
        Metric::Oh,
        Metric::So,
        Metric::AtShip,
        Metric::AtSell,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Metric::Po => "PO",
            Metric::Oh => "OH",
            Metric::So => "SO",
            Metric::AtShip => "ATShip",
            Metric::AtSell => "ATSell",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One source record reduced to (sku, warehouse, quantity)
///
/// `quantity` is `None` when the source left it empty; it only becomes zero
/// when lines are merged for aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedLine {
    pub sku: Sku,
    pub warehouse: WarehouseCode,
    pub role: SourceRole,
    pub quantity: Option<f64>,
}

impl NormalizedLine {
    pub fn new(sku: Sku, warehouse: WarehouseCode, role: SourceRole, quantity: Option<f64>) -> Self {
        Self {
            sku,
            warehouse,
            role,
            quantity,
        }
    }

    /// Convenience constructor for literal lines
    ///
    /// # Errors
    ///
    /// Returns the validation message when `sku` or `warehouse` is empty.
    pub fn parse(
        sku: &str,
        warehouse: &str,
        role: SourceRole,
        quantity: Option<f64>,
    ) -> Result<Self, String> {
        Ok(Self::new(
            Sku::new(sku)?,
            WarehouseCode::new(warehouse)?,
            role,
            quantity,
        ))
    }
}
