//! Rank stability of the composite index when one indicator is dropped.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

use super::correlation::spearman;
use crate::config::{IndicatorConfig, WeightConfig};
use crate::core::{Dataset, Domain};
use crate::errors::Result;
use crate::scoring::{compute_index, IndexOptions, IndexedDataset};

pub const LEAVE_ONE_OUT_COLUMNS: [&str; 4] =
    ["dimension", "removed_indicator", "spearman_rho", "p_value"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaveOneOutRow {
    pub dimension: Domain,
    pub removed_indicator: String,
    pub spearman_rho: f64,
    pub p_value: f64,
}

/// One row per (domain, removed indicator), most stable removal first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LeaveOneOutTable {
    rows: Vec<LeaveOneOutRow>,
}

impl LeaveOneOutTable {
    pub fn rows(&self) -> &[LeaveOneOutRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn find(&self, dimension: Domain, removed_indicator: &str) -> Option<&LeaveOneOutRow> {
        self.rows
            .iter()
            .find(|r| r.dimension == dimension && r.removed_indicator == removed_indicator)
    }
}

/// Recompute the index from `raw` once per indicator with that indicator
/// removed from its domain, and correlate each result with the full-index
/// ranking.
///
/// Every reduced configuration is checked before anything is computed: if
/// removing an indicator would leave its domain empty, the whole analysis
/// fails with `EmptyDomain`.
pub fn compute_leave_one_out_sensitivity(
    raw: &Dataset,
    indicators: &IndicatorConfig,
    weights: &WeightConfig,
    options: &IndexOptions,
) -> Result<LeaveOneOutTable> {
    let plan = removal_plan(indicators)?;
    let baseline = compute_index(raw, indicators, weights, options)?;

    let mut rows = Vec::with_capacity(plan.len());
    for (domain, removed, reduced) in plan {
        let modified = compute_index(raw, &reduced, weights, options)?;
        let (base_scores, loo_scores) = inner_join(&baseline, &modified);
        let correlation = spearman(&base_scores, &loo_scores)?;
        log::debug!(
            "Without {domain}/{removed}: rho={:.6} p={:.6} over {} districts",
            correlation.rho,
            correlation.p_value,
            correlation.n
        );
        rows.push(LeaveOneOutRow {
            dimension: domain,
            removed_indicator: removed,
            spearman_rho: correlation.rho,
            p_value: correlation.p_value,
        });
    }

    rows.sort_by(|a, b| descending_nan_last(a.spearman_rho, b.spearman_rho));
    Ok(LeaveOneOutTable { rows })
}

fn removal_plan(indicators: &IndicatorConfig) -> Result<Vec<(Domain, String, IndicatorConfig)>> {
    indicators
        .iter()
        .flat_map(|(domain, columns)| columns.iter().map(move |c| (domain, c)))
        .map(|(domain, removed)| {
            let reduced = indicators.without(domain, removed);
            reduced.ensure_non_empty()?;
            Ok((domain, removed.clone(), reduced))
        })
        .collect()
}

// Composite pairs for districts present on both sides, in baseline order
fn inner_join(baseline: &IndexedDataset, modified: &IndexedDataset) -> (Vec<f64>, Vec<f64>) {
    let modified: HashMap<i64, f64> = modified.composite_by_id().into_iter().collect();
    baseline
        .composite_by_id()
        .into_iter()
        .filter_map(|(id, base)| modified.get(&id).map(|loo| (base, *loo)))
        .unzip()
}

fn descending_nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
