//! Role-specific table fetches
//!
//! Each role fetches three fields of its table with the role's server-side
//! filter, renames them to `sku`, `warehouse` and the role's quantity column,
//! and reduces the rows to [`NormalizedLine`]s.

use crate::core::fetch::{Fetcher, QueryOptions};
use crate::domain::{
    AtsError, NormalizedLine, RecordSet, Result, Sku, SourceRole, WarehouseCode,
};

pub const SKU_COLUMN: &str = "sku";
pub const WAREHOUSE_COLUMN: &str = "warehouse";

/// Fetches outstanding purchase lines (`PO`)
pub async fn get_purchases(fetcher: &Fetcher<'_>, table: &str) -> Result<Vec<NormalizedLine>> {
    fetch_lines(fetcher, SourceRole::Purchases, table).await
}

/// Fetches item ledger entries (`OH`)
pub async fn get_onhand(fetcher: &Fetcher<'_>, table: &str) -> Result<Vec<NormalizedLine>> {
    fetch_lines(fetcher, SourceRole::OnHand, table).await
}

/// Fetches outstanding sales lines (`SO`)
pub async fn get_sales(fetcher: &Fetcher<'_>, table: &str) -> Result<Vec<NormalizedLine>> {
    fetch_lines(fetcher, SourceRole::Sales, table).await
}

/// Fetches outstanding warehouse shipment lines (`WSHIP`)
pub async fn get_warehouse_shipments(
    fetcher: &Fetcher<'_>,
    table: &str,
) -> Result<Vec<NormalizedLine>> {
    fetch_lines(fetcher, SourceRole::WarehouseShipments, table).await
}

/// Fetches `table` in the shape of `role` and normalizes it
pub async fn fetch_lines(
    fetcher: &Fetcher<'_>,
    role: SourceRole,
    table: &str,
) -> Result<Vec<NormalizedLine>> {
    let options = QueryOptions::new()
        .fields(role.source_fields())
        .filter(role.filter());

    let records = fetcher
        .fetch(table, &options)
        .await?
        .rename_columns(&[SKU_COLUMN, WAREHOUSE_COLUMN, role.quantity_column()])?;

    normalize(&records, role)
}

/// Reduces a renamed record set to normalized lines
///
/// Rows without a sku or warehouse are skipped. An empty quantity stays
/// `None` here and is only zero-filled during aggregation.
///
/// # Errors
///
/// [`AtsError::Shape`] when one of the three columns is missing or a quantity
/// is not numeric.
pub fn normalize(records: &RecordSet, role: SourceRole) -> Result<Vec<NormalizedLine>> {
    let quantity_column = role.quantity_column();
    let column = |name: &str| {
        records.column_index(name).ok_or_else(|| {
            AtsError::Shape(format!(
                "{role} lines have no '{name}' field (columns: {})",
                records.columns().join(", ")
            ))
        })
    };
    let sku_idx = column(SKU_COLUMN)?;
    let warehouse_idx = column(WAREHOUSE_COLUMN)?;
    let quantity_idx = column(quantity_column)?;

    let mut lines = Vec::with_capacity(records.len());
    let mut skipped = 0usize;

    for (position, row) in records.iter().enumerate() {
        let values = row.values();

        let key = values[sku_idx]
            .as_text()
            .and_then(|s| Sku::new(s).ok())
            .zip(values[warehouse_idx].as_text().and_then(|w| WarehouseCode::new(w).ok()));

        let Some((sku, warehouse)) = key else {
            skipped += 1;
            continue;
        };

        let quantity = values[quantity_idx].to_quantity().map_err(|e| {
            AtsError::Shape(format!(
                "{role} line {position} ({sku}, {warehouse}): {quantity_column} {e}"
            ))
        })?;

        lines.push(NormalizedLine::new(sku, warehouse, role, quantity));
    }

    if skipped > 0 {
        tracing::warn!(
            role = %role,
            skipped,
            "Skipped lines without sku or warehouse"
        );
    }

    tracing::debug!(role = %role, lines = lines.len(), "Normalized lines");

    Ok(lines)
}
