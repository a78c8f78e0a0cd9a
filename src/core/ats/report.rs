//! ATS report table and its renderings

use crate::config::ReportFormat;
use crate::domain::{AtsError, Metric, Result, Sku, WarehouseCode};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};
use std::fmt;

/// One report column: a metric for a warehouse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportColumn {
    pub warehouse: WarehouseCode,
    pub metric: Metric,
}

impl ReportColumn {
    /// Flat column label, e.g. `ATSell_EAST`
    pub fn label(&self) -> String {
        format!("{}_{}", self.metric, self.warehouse)
    }
}

impl fmt::Display for ReportColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One sku with a value per report column
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    sku: Sku,
    cells: Vec<f64>,
}

impl ReportRow {
    pub(crate) fn new(sku: Sku, cells: Vec<f64>) -> Self {
        Self { sku, cells }
    }

    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    /// Values in [`AtsReport::columns`] order
    pub fn cells(&self) -> &[f64] {
        &self.cells
    }
}

/// Availability-to-sell report
///
/// Rows are indexed by sku in ascending order. Columns are every warehouse
/// crossed with every [`Metric`], the metric varying fastest.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AtsReport {
    warehouses: Vec<WarehouseCode>,
    rows: Vec<ReportRow>,
}

impl AtsReport {
    pub(crate) fn new(warehouses: Vec<WarehouseCode>, rows: Vec<ReportRow>) -> Self {
        Self { warehouses, rows }
    }

    pub fn warehouses(&self) -> &[WarehouseCode] {
        &self.warehouses
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> Vec<ReportColumn> {
        self.warehouses
            .iter()
            .flat_map(|warehouse| {
                Metric::ALL.into_iter().map(move |metric| ReportColumn {
                    warehouse: warehouse.clone(),
                    metric,
                })
            })
            .collect()
    }

    /// Value of `metric` for `sku` in `warehouse`
    ///
    /// `None` if the sku is not in the report or the warehouse is not a column.
    pub fn value(&self, sku: &str, metric: Metric, warehouse: &str) -> Option<f64> {
        let position = self.warehouses.iter().position(|w| w.as_str() == warehouse)?;
        let metric_index = Metric::ALL.iter().position(|m| *m == metric)?;
        let row = self
            .rows
            .binary_search_by(|row| row.sku.as_str().cmp(sku))
            .ok()
            .map(|i| &self.rows[i])?;

        row.cells
            .get(position * Metric::ALL.len() + metric_index)
            .copied()
    }

    /// Renders the report in the requested format
    pub fn render(&self, format: ReportFormat, generated_at: DateTime<Utc>) -> Result<String> {
        match format {
            ReportFormat::Table => Ok(self.render_table()),
            ReportFormat::Csv => self.to_csv(),
            ReportFormat::Json => self.to_json(generated_at),
        }
    }

    /// Aligned text table, one line per sku
    pub fn render_table(&self) -> String {
        let mut header = vec!["SKU".to_string()];
        header.extend(self.columns().iter().map(ReportColumn::label));

        let body: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| {
                let mut line = vec![row.sku.to_string()];
                line.extend(row.cells.iter().map(|v| format_quantity(*v)));
                line
            })
            .collect();

        let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
        for line in &body {
            for (width, cell) in widths.iter_mut().zip(line) {
                *width = (*width).max(cell.len());
            }
        }

        let format_line = |cells: &[String]| {
            cells
                .iter()
                .zip(widths.iter().copied())
                .enumerate()
                .map(|(i, (cell, width))| {
                    if i == 0 {
                        format!("{cell:<width$}")
                    } else {
                        format!("{cell:>width$}")
                    }
                })
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut out = String::new();
        out.push_str(&format_line(&header));
        out.push('\n');
        let rule_len = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        out.push_str(&"-".repeat(rule_len));
        out.push('\n');
        for line in &body {
            out.push_str(&format_line(line));
            out.push('\n');
        }
        out
    }

    /// CSV with a `sku` column followed by one column per [`ReportColumn`]
    pub fn to_csv(&self) -> Result<String> {
        let mut wtr = csv::Writer::from_writer(Vec::new());

        let mut header = vec!["sku".to_string()];
        header.extend(self.columns().iter().map(ReportColumn::label));
        wtr.write_record(&header)?;

        for row in &self.rows {
            let mut record = vec![row.sku.to_string()];
            record.extend(row.cells.iter().map(|v| format_quantity(*v)));
            wtr.write_record(&record)?;
        }

        let bytes = wtr
            .into_inner()
            .map_err(|e| AtsError::Serialization(e.to_string()))?;

        String::from_utf8(bytes).map_err(|e| AtsError::Serialization(e.to_string()))
    }

    /// JSON document with per-warehouse metric objects for each sku
    pub fn to_json(&self, generated_at: DateTime<Utc>) -> Result<String> {
        let rows: Vec<Value> = self
            .rows
            .iter()
            .map(|row| {
                let mut by_warehouse = Map::new();
                for (position, warehouse) in self.warehouses.iter().enumerate() {
                    let offset = position * Metric::ALL.len();
                    let metrics: Map<String, Value> = Metric::ALL
                        .iter()
                        .enumerate()
                        .map(|(i, metric)| (metric.label().to_string(), json!(row.cells[offset + i])))
                        .collect();
                    by_warehouse.insert(warehouse.to_string(), Value::Object(metrics));
                }
                json!({ "sku": row.sku, "warehouses": by_warehouse })
            })
            .collect();

        let document = json!({
            "generated_at": generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            "warehouses": self.warehouses,
            "metrics": Metric::ALL,
            "rows": rows,
        });

        Ok(serde_json::to_string_pretty(&document)?)
    }
}

/// Integral quantities print without a fraction, negative zero prints as 0
fn format_quantity(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}
