//! Full Table Widget
//! Scrollable grid over every loaded row, virtualized with `show_rows`.

use crate::data::column_names;
use egui::{Label, RichText, ScrollArea};
use polars::prelude::*;

const TABLE_HEIGHT: f32 = 420.0;
const COL_WIDTH: f32 = 110.0;

/// Cell text for every row, prepared once per load.
pub struct TableView {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TableView {
    pub fn new(df: &DataFrame) -> Self {
        let headers = column_names(df);

        let columns: Vec<Vec<String>> = df
            .get_columns()
            .iter()
            .map(|col| {
                col.as_materialized_series()
                    .rechunk()
                    .iter()
                    .map(|v| {
                        if v.is_null() {
                            String::new()
                        } else {
                            v.to_string().trim_matches('"').to_string()
                        }
                    })
                    .collect()
            })
            .collect();

        let rows: Vec<Vec<String>> = (0..df.height())
            .map(|i| columns.iter().map(|c| c[i].clone()).collect::<Vec<String>>())
            .collect();

        Self { headers, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        ui.separator();
        ui.label(
            RichText::new(format!("📋 Full Dataset ({} rows)", self.row_count()))
                .size(18.0)
                .strong(),
        );
        ui.add_space(8.0);

        let row_height = ui.text_style_height(&egui::TextStyle::Body) + 4.0;
        ScrollArea::horizontal()
            .id_salt("full_table_columns")
            .auto_shrink([false, true])
            .show(ui, |ui| {
                // Header stays outside the virtualized body so it never scrolls away.
                Self::show_row(ui, &self.headers, row_height, true);
                ui.separator();

                ScrollArea::vertical()
                    .id_salt("full_table")
                    .max_height(TABLE_HEIGHT)
                    .auto_shrink([false, true])
                    .show_rows(ui, row_height, self.rows.len(), |ui, row_range| {
                        for row in &self.rows[row_range] {
                            Self::show_row(ui, row, row_height, false);
                        }
                    });
            });
    }

    /// One line of fixed-width cells so header and body columns line up.
    fn show_row(ui: &mut egui::Ui, cells: &[String], row_height: f32, header: bool) {
        ui.horizontal(|ui| {
            for cell in cells {
                let text = if header {
                    RichText::new(cell).strong()
                } else {
                    RichText::new(cell)
                };
                ui.add_sized([COL_WIDTH, row_height], Label::new(text).truncate());
            }
        });
    }
}
