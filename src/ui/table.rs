use bioink_dash::data::model::{Table, Value};
use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

const ROW_HEIGHT: f32 = 18.0;
const MAX_HEIGHT: f32 = 320.0;

/// Scrollable grid of every row and column of `table`.
pub fn data_table(ui: &mut Ui, table: &Table, idx: usize) {
    if table.is_empty() {
        ui.label("Sin filas.");
        return;
    }
    ui.label(RichText::new(format!("{} filas", table.len())).small().weak());

    ui.push_id(("data_table", idx), |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(MAX_HEIGHT)
            .columns(Column::auto().at_least(60.0), table.columns().len())
            .header(ROW_HEIGHT + 2.0, |mut header| {
                for name in table.columns() {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, table.len(), |mut row| {
                    let Some(record) = table.row(row.index()) else {
                        return;
                    };
                    for value in record.values() {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell_text(value));
                        });
                    }
                });
            });
    });
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Float(f) => format!("{f:.3}"),
        other => other.to_string(),
    }
}
