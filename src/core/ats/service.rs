//! End-to-end ATS computation against a record source

use super::aggregate::compute_ats;
use super::report::AtsReport;
use super::roles::{get_onhand, get_purchases, get_sales, get_warehouse_shipments};
use crate::config::TablesConfig;
use crate::core::fetch::Fetcher;
use crate::domain::{Result, SourceRole, WarehouseCode};
use std::time::Instant;

/// Table names for the four source roles
pub type AtsTables = TablesConfig;

/// Fetches the four source tables and aggregates them
///
/// # Example
///
/// ```no_run
/// use bcats::adapters::businesscentral::BusinessCentralClient;
/// use bcats::config::load_config;
/// use bcats::core::ats::AtsService;
/// use bcats::core::fetch::Fetcher;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config("bcats.toml")?;
/// let client = BusinessCentralClient::new(&config.business_central)?;
/// let service = AtsService::new(Fetcher::new(&client), config.tables.clone());
///
/// let report = service.get_ats(None, None).await?;
/// print!("{}", report.render_table());
/// # Ok(())
/// # }
/// ```
pub struct AtsService<'a> {
    fetcher: Fetcher<'a>,
    tables: AtsTables,
}

impl<'a> AtsService<'a> {
    pub fn new(fetcher: Fetcher<'a>, tables: AtsTables) -> Self {
        Self { fetcher, tables }
    }

    pub fn tables(&self) -> &AtsTables {
        &self.tables
    }

    /// Computes the ATS report
    ///
    /// `tables` replaces the configured table names for this call only.
    /// Tables are fetched one after another; the first failure aborts the call.
    pub async fn get_ats(
        &self,
        warehouses: Option<&[WarehouseCode]>,
        tables: Option<&AtsTables>,
    ) -> Result<AtsReport> {
        let start = Instant::now();
        let tables = tables.unwrap_or(&self.tables);

        tracing::info!(
            purchases = %tables.purchases,
            onhand = %tables.onhand,
            sales = %tables.sales,
            shipments = %tables.shipments,
            "Computing availability to sell"
        );

        let purchases = get_purchases(&self.fetcher, tables.for_role(SourceRole::Purchases)).await?;
        let onhand = get_onhand(&self.fetcher, tables.for_role(SourceRole::OnHand)).await?;
        let sales = get_sales(&self.fetcher, tables.for_role(SourceRole::Sales)).await?;
        let shipments = get_warehouse_shipments(
            &self.fetcher,
            tables.for_role(SourceRole::WarehouseShipments),
        )
        .await?;

        let report = compute_ats(&purchases, &onhand, &sales, &shipments, warehouses);

        tracing::info!(
            skus = report.len(),
            warehouses = report.warehouses().len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Availability report ready"
        );

        Ok(report)
    }
}
