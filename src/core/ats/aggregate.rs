//! Availability-to-sell aggregation
//!
//! Union, zero-fill, warehouse filter, group-and-sum, derived metrics and
//! pivot, in that order. The computation is pure: the same inputs always give
//! the same report.

use super::report::{AtsReport, ReportRow};
use crate::domain::{Metric, NormalizedLine, Sku, WarehouseCode};
use std::collections::{BTreeMap, BTreeSet, HashSet};

const PO: usize = 0;
const OH: usize = 1;
const SO: usize = 2;
const WSHIP: usize = 3;

/// Figures for one (warehouse, sku) group after derivation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AtsFigures {
    pub po: f64,
    pub oh: f64,
    pub so: f64,
    pub at_ship: f64,
    pub at_sell: f64,
}

impl AtsFigures {
    /// Derives the report figures from summed quantities
    ///
    /// Shipped quantities are taken off both stock on hand and open sales
    /// before availability is computed. Negative results are kept.
    pub fn derive(sums: [f64; 4]) -> Self {
        let po = sums[PO];
        let oh = sums[OH] - sums[WSHIP];
        let so = sums[SO] - sums[WSHIP];
        let at_sell = po + oh - so;
        let at_ship = at_sell.min(oh);

        Self {
            po,
            oh,
            so,
            at_ship,
            at_sell,
        }
    }

    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Po => self.po,
            Metric::Oh => self.oh,
            Metric::So => self.so,
            Metric::AtShip => self.at_ship,
            Metric::AtSell => self.at_sell,
        }
    }

    /// Values in [`Metric::ALL`] order
    pub fn values(&self) -> [f64; 5] {
        Metric::ALL.map(|m| self.get(m))
    }
}

/// Sums `N` quantity slots per key
///
/// Keys come back in ascending order.
pub fn group_sum<K, I, const N: usize>(rows: I) -> BTreeMap<K, [f64; N]>
where
    K: Ord,
    I: IntoIterator<Item = (K, [f64; N])>,
{
    let mut groups: BTreeMap<K, [f64; N]> = BTreeMap::new();
    for (key, quantities) in rows {
        let sums = groups.entry(key).or_insert([0.0; N]);
        for (sum, quantity) in sums.iter_mut().zip(quantities) {
            *sum += quantity;
        }
    }
    groups
}

/// Computes the availability-to-sell report
///
/// Each argument supplies one quantity column (`PO`, `OH`, `SO`, `WSHIP`).
/// With `warehouse_filter`, only those warehouses are kept and they become the
/// report columns in the given order, repeated entries counting once.
/// Without it, every warehouse with data is reported in ascending order.
///
/// # Example
///
/// ```
/// use bcats::core::ats::compute_ats;
/// use bcats::domain::{Metric, NormalizedLine, SourceRole};
///
/// let purchases = vec![NormalizedLine::parse("A", "W1", SourceRole::Purchases, Some(5.0)).unwrap()];
/// let report = compute_ats(&purchases, &[], &[], &[], None);
///
/// assert_eq!(report.value("A", Metric::Po, "W1"), Some(5.0));
/// assert_eq!(report.value("A", Metric::AtSell, "W1"), Some(5.0));
/// assert_eq!(report.value("A", Metric::AtShip, "W1"), Some(0.0));
/// ```
pub fn compute_ats(
    purchases: &[NormalizedLine],
    onhand: &[NormalizedLine],
    sales: &[NormalizedLine],
    shipments: &[NormalizedLine],
    warehouse_filter: Option<&[WarehouseCode]>,
) -> AtsReport {
    let filter = warehouse_filter.map(dedup_warehouses);

    let groups = {
        let allowed: Option<HashSet<&WarehouseCode>> =
            filter.as_ref().map(|f| f.iter().collect());

        // Union: each line fills its own slot, every other slot is zero.
        let union = [(PO, purchases), (OH, onhand), (SO, sales), (WSHIP, shipments)]
            .into_iter()
            .flat_map(|(slot, lines)| lines.iter().map(move |line| (slot, line)))
            .filter(|(_, line)| {
                allowed
                    .as_ref()
                    .map_or(true, |allowed| allowed.contains(&line.warehouse))
            })
            .map(|(slot, line)| {
                let mut quantities = [0.0; 4];
                quantities[slot] = line.quantity.unwrap_or(0.0);
                ((line.warehouse.clone(), line.sku.clone()), quantities)
            });

        group_sum(union)
    };

    let warehouses: Vec<WarehouseCode> = match filter {
        Some(filter) => filter,
        None => groups
            .keys()
            .map(|(warehouse, _)| warehouse.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect(),
    };

    let positions: BTreeMap<&WarehouseCode, usize> = warehouses
        .iter()
        .enumerate()
        .map(|(i, w)| (w, i))
        .collect();

    let mut pivot: BTreeMap<Sku, Vec<f64>> = BTreeMap::new();
    for ((warehouse, sku), sums) in &groups {
        let Some(&position) = positions.get(warehouse) else {
            continue;
        };
        let cells = pivot
            .entry(sku.clone())
            .or_insert_with(|| vec![0.0; warehouses.len() * Metric::ALL.len()]);
        let offset = position * Metric::ALL.len();
        cells[offset..offset + Metric::ALL.len()].copy_from_slice(&AtsFigures::derive(*sums).values());
    }

    tracing::debug!(
        lines = purchases.len() + onhand.len() + sales.len() + shipments.len(),
        groups = groups.len(),
        skus = pivot.len(),
        warehouses = warehouses.len(),
        "Aggregated availability"
    );

    let rows = pivot
        .into_iter()
        .map(|(sku, cells)| ReportRow::new(sku, cells))
        .collect();

    AtsReport::new(warehouses, rows)
}

/// Keeps the first occurrence of each warehouse
fn dedup_warehouses(warehouses: &[WarehouseCode]) -> Vec<WarehouseCode> {
    let mut seen = HashSet::new();
    warehouses
        .iter()
        .filter(|w| seen.insert(*w))
        .cloned()
        .collect()
}
