//! Rank comparison of districts across weight scenarios.

use serde::Serialize;

use super::ranking::competition_rank;
use crate::config::{ScenarioSet, BASELINE_SCENARIO};
use crate::core::{Cell, ID_COLUMN, NAME_COLUMN};
use crate::errors::Result;
use crate::scoring::IndexedDataset;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightSensitivityRow {
    pub bez_nr: i64,
    pub name: String,
    /// Composite score per scenario, in scenario order
    pub scores: Vec<f64>,
    /// Rank per scenario, in scenario order
    pub ranks: Vec<u32>,
    /// `rank[scenario] - rank[equal]` per compared scenario
    pub deltas: Vec<i64>,
}

/// One row per district, sorted by rank under the `equal` scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightSensitivityTable {
    scenarios: Vec<String>,
    baseline: usize,
    rows: Vec<WeightSensitivityRow>,
}

impl WeightSensitivityTable {
    pub fn scenarios(&self) -> &[String] {
        &self.scenarios
    }

    /// Position of the `equal` scenario in [`Self::scenarios`].
    pub fn baseline_index(&self) -> usize {
        self.baseline
    }

    /// Every scenario except the baseline, in scenario order.
    pub fn compared_scenarios(&self) -> Vec<&str> {
        self.scenarios
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != self.baseline)
            .map(|(_, name)| name.as_str())
            .collect()
    }

    pub fn rows(&self) -> &[WeightSensitivityRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, bez_nr: i64) -> Option<&WeightSensitivityRow> {
        self.rows.iter().find(|r| r.bez_nr == bez_nr)
    }

    fn scenario_index(&self, scenario: &str) -> Option<usize> {
        self.scenarios.iter().position(|s| s == scenario)
    }

    pub fn score(&self, bez_nr: i64, scenario: &str) -> Option<f64> {
        let idx = self.scenario_index(scenario)?;
        self.row(bez_nr).map(|r| r.scores[idx])
    }

    pub fn rank(&self, bez_nr: i64, scenario: &str) -> Option<u32> {
        let idx = self.scenario_index(scenario)?;
        self.row(bez_nr).map(|r| r.ranks[idx])
    }

    pub fn delta(&self, bez_nr: i64, scenario: &str) -> Option<i64> {
        let idx = self
            .compared_scenarios()
            .iter()
            .position(|s| *s == scenario)?;
        self.row(bez_nr).map(|r| r.deltas[idx])
    }

    /// `bez_nr`, `name`, `aci_*`, `rank_*`, `delta_rank_*_vs_equal`.
    pub fn column_names(&self) -> Vec<String> {
        let mut names = vec![ID_COLUMN.to_string(), NAME_COLUMN.to_string()];
        names.extend(self.scenarios.iter().map(|s| score_column(s)));
        names.extend(self.scenarios.iter().map(|s| rank_column(s)));
        names.extend(self.compared_scenarios().into_iter().map(delta_column));
        names
    }

    /// Value of a named column for one row, `None` for unknown columns.
    pub fn value(&self, row: &WeightSensitivityRow, column: &str) -> Option<Cell> {
        match column {
            ID_COLUMN => return Some(Cell::Number(row.bez_nr as f64)),
            NAME_COLUMN => return Some(Cell::Text(row.name.clone())),
            _ => {}
        }
        for (i, scenario) in self.scenarios.iter().enumerate() {
            if column == score_column(scenario) {
                return Some(Cell::Number(row.scores[i]));
            }
            if column == rank_column(scenario) {
                return Some(Cell::Number(f64::from(row.ranks[i])));
            }
        }
        self.compared_scenarios()
            .into_iter()
            .position(|s| column == delta_column(s))
            .map(|i| Cell::Number(row.deltas[i] as f64))
    }
}

pub fn score_column(scenario: &str) -> String {
    format!("aci_{scenario}")
}

pub fn rank_column(scenario: &str) -> String {
    format!("rank_{scenario}")
}

pub fn delta_column(scenario: &str) -> String {
    format!("delta_rank_{scenario}_vs_{BASELINE_SCENARIO}")
}

/// Score and rank every district under each scenario and compare ranks to
/// the `equal` scenario.
///
/// Scores come straight from the sub-indices already in `indexed`; nothing
/// is re-normalized. All scenarios are validated before anything is
/// computed.
pub fn compute_weight_sensitivity(
    indexed: &IndexedDataset,
    scenarios: &ScenarioSet,
) -> Result<WeightSensitivityTable> {
    scenarios.validate()?;
    let baseline = scenarios.baseline_index()?;

    let scores: Vec<Vec<f64>> = scenarios
        .iter()
        .map(|scenario| {
            indexed
                .districts()
                .iter()
                .map(|d| d.sub_indices.composite(&scenario.weights))
                .collect()
        })
        .collect();
    let ranks: Vec<Vec<u32>> = scores.iter().map(|s| competition_rank(s)).collect();

    let mut rows: Vec<WeightSensitivityRow> = indexed
        .districts()
        .iter()
        .enumerate()
        .map(|(i, district)| {
            let base_rank = i64::from(ranks[baseline][i]);
            WeightSensitivityRow {
                bez_nr: district.bez_nr(),
                name: district.name().to_string(),
                scores: scores.iter().map(|s| s[i]).collect(),
                ranks: ranks.iter().map(|r| r[i]).collect(),
                deltas: ranks
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != baseline)
                    .map(|(_, r)| i64::from(r[i]) - base_rank)
                    .collect(),
            }
        })
        .collect();
    rows.sort_by_key(|r| r.ranks[baseline]);

    log::debug!(
        "Weight sensitivity over {} scenarios and {} districts",
        scenarios.len(),
        rows.len()
    );

    Ok(WeightSensitivityTable {
        scenarios: scenarios.names().into_iter().map(String::from).collect(),
        baseline,
        rows,
    })
}
