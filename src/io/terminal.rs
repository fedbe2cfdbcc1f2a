//! Terminal summary of a build: top districts and rank stability.

use comfy_table::presets::{ASCII_FULL, UTF8_FULL};
use comfy_table::{CellAlignment, ContentArrangement, Table};

use crate::core::Domain;
use crate::formatting::FormattingConfig;
use crate::scoring::IndexedDataset;
use crate::sensitivity::{LeaveOneOutTable, WeightSensitivityTable};

pub struct SummaryPrinter {
    config: FormattingConfig,
    top: usize,
}

impl SummaryPrinter {
    pub fn new(config: FormattingConfig, top: usize) -> Self {
        Self { config, top }
    }

    pub fn render(
        &self,
        indexed: &IndexedDataset,
        weights: &WeightSensitivityTable,
        leave_one_out: &LeaveOneOutTable,
    ) -> String {
        let mut out = String::new();
        out.push_str(&self.config.header(&format!(
            "Active City Index: top {} of {} districts",
            self.top.min(weights.len()),
            weights.len()
        )));
        out.push('\n');
        out.push_str(&self.top_districts(indexed, weights).to_string());
        out.push_str("\n\n");
        out.push_str(&self.config.header("Leave-one-out rank stability"));
        out.push('\n');
        out.push_str(&self.leave_one_out(leave_one_out).to_string());
        out.push('\n');
        out
    }

    pub fn print(
        &self,
        indexed: &IndexedDataset,
        weights: &WeightSensitivityTable,
        leave_one_out: &LeaveOneOutTable,
    ) {
        print!("{}", self.render(indexed, weights, leave_one_out));
    }

    fn table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(if self.config.ascii { ASCII_FULL } else { UTF8_FULL })
            .set_content_arrangement(ContentArrangement::Dynamic);
        table
    }

    fn top_districts(&self, indexed: &IndexedDataset, weights: &WeightSensitivityTable) -> Table {
        let mut table = self.table();
        let mut header = vec!["Rank".to_string(), "District".to_string()];
        header.extend(Domain::ALL.iter().map(|d| d.sub_index_column().to_string()));
        header.push("Index".to_string());
        table.set_header(header);

        for row in weights.rows().iter().take(self.top) {
            let Some(district) = indexed.find(row.bez_nr) else {
                continue;
            };
            let mut cells = vec![
                row.ranks[weights.baseline_index()].to_string(),
                row.name.clone(),
            ];
            cells.extend(
                Domain::ALL
                    .iter()
                    .map(|d| format!("{:.3}", district.sub_indices.get(*d))),
            );
            cells.push(format!("{:.3}", district.active_city_index));
            table.add_row(cells);
        }
        right_align(&mut table, &[0, 2, 3, 4, 5]);
        table
    }

    fn leave_one_out(&self, leave_one_out: &LeaveOneOutTable) -> Table {
        let mut table = self.table();
        table.set_header(vec!["Domain", "Removed indicator", "Spearman rho", "p-value"]);
        for row in leave_one_out.rows() {
            table.add_row(vec![
                row.dimension.key().to_string(),
                row.removed_indicator.clone(),
                self.number(row.spearman_rho),
                self.number(row.p_value),
            ]);
        }
        right_align(&mut table, &[2, 3]);
        table
    }

    fn number(&self, value: f64) -> String {
        if value.is_nan() {
            self.config.dim("n/a")
        } else {
            format!("{value:.3}")
        }
    }
}

fn right_align(table: &mut Table, columns: &[usize]) {
    for idx in columns {
        if let Some(column) = table.column_mut(*idx) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
}
