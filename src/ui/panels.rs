use bioink_dash::pages::{Choice, Control, ControlKind, Page, SectionBody};
use bioink_dash::stats::MetricTile;
use eframe::egui::{self, Color32, Frame, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use super::{plot, table};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – section choice and filter widgets
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Proyecto Biotintas");
    if let Some(date) = state.config.last_updated.clone() {
        Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
            ui.label(RichText::new(format!("📅 Última actualización: {date}")).strong());
        });
    }
    ui.add_space(4.0);

    ui.strong("Secciones");
    let current = state.page;
    egui::ComboBox::from_id_salt("page_select")
        .selected_text(current.title())
        .show_ui(ui, |ui: &mut Ui| {
            for page in Page::ALL {
                if ui.selectable_label(current == page, page.title()).clicked() {
                    state.set_page(page);
                }
            }
        });
    ui.separator();

    // Clone so widgets can mutate state while iterating.
    let controls = state.view.sidebar.clone();
    if controls.is_empty() {
        return;
    }
    ui.heading("Filtros");
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for control in &controls {
                control_widget(ui, state, control);
                ui.separator();
            }
        });
}

// ---------------------------------------------------------------------------
// Widgets
// ---------------------------------------------------------------------------

/// Render one control and write the user's answer back into `state`.
fn control_widget(ui: &mut Ui, state: &mut AppState, control: &Control) {
    match &control.kind {
        ControlKind::MultiSelect { options, selected } => {
            // Show count of selected / total in the header
            let header = format!("{}  ({}/{})", control.label, selected.len(), options.len());
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt(&control.id)
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all(&control.id, options);
                        }
                        if ui.small_button("None").clicked() {
                            state.select_none(&control.id);
                        }
                    });
                    for value in options {
                        let mut checked = selected.contains(value);
                        if ui.checkbox(&mut checked, value.to_string()).changed() {
                            state.toggle_value(&control.id, value, selected);
                        }
                    }
                });
        }
        ControlKind::SingleSelect { options, selected } => {
            ui.strong(&control.label);
            let text = selected.as_ref().map(|v| v.to_string()).unwrap_or_default();
            egui::ComboBox::from_id_salt(&control.id)
                .selected_text(text)
                .width(ui.available_width().min(360.0))
                .show_ui(ui, |ui: &mut Ui| {
                    for value in options {
                        let is_selected = selected.as_ref() == Some(value);
                        let clicked = ui.selectable_label(is_selected, value.to_string()).clicked();
                        if clicked && !is_selected {
                            state.set_choice(&control.id, Choice::One(value.clone()));
                        }
                    }
                });
        }
        ControlKind::DateRange { from, to } => {
            ui.strong(&control.label);
            let today = chrono::Local::now().date_naive();
            let mut new_from = from.unwrap_or(today);
            let mut new_to = to.unwrap_or(today);
            let mut changed = false;
            ui.horizontal(|ui: &mut Ui| {
                let mut use_from = from.is_some();
                changed |= ui.checkbox(&mut use_from, "Desde").changed();
                if use_from {
                    let salt = format!("{}.from", control.id);
                    changed |= ui
                        .add(DatePickerButton::new(&mut new_from).id_salt(&salt))
                        .changed();
                }
                if !use_from {
                    new_from = chrono::NaiveDate::MIN;
                }
            });
            ui.horizontal(|ui: &mut Ui| {
                let mut use_to = to.is_some();
                changed |= ui.checkbox(&mut use_to, "Hasta").changed();
                if use_to {
                    let salt = format!("{}.to", control.id);
                    changed |= ui
                        .add(DatePickerButton::new(&mut new_to).id_salt(&salt))
                        .changed();
                }
                if !use_to {
                    new_to = chrono::NaiveDate::MAX;
                }
            });
            if changed {
                let from = (new_from != chrono::NaiveDate::MIN).then_some(new_from);
                let to = (new_to != chrono::NaiveDate::MAX).then_some(new_to);
                state.set_choice(&control.id, Choice::Dates { from, to });
            }
        }
    }
}

fn metric_tiles(ui: &mut Ui, tiles: &[MetricTile]) {
    if tiles.is_empty() {
        ui.label("No hay variables disponibles.");
        return;
    }
    ui.columns(tiles.len(), |cols: &mut [Ui]| {
        for (ui, tile) in cols.iter_mut().zip(tiles) {
            Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
                ui.label(RichText::new(&tile.label).small());
                ui.label(RichText::new(tile.value_text()).heading().strong());
                if let Some(delta) = tile.delta_text() {
                    ui.label(RichText::new(delta).weak());
                }
            });
        }
    });
}

// ---------------------------------------------------------------------------
// Central panel – the page sections
// ---------------------------------------------------------------------------

/// Render the current page.
pub fn page(ui: &mut Ui, state: &mut AppState) {
    ui.heading(&state.view.title);
    ui.separator();

    // Clone so inline controls can rebuild the view mid-frame.
    let sections = state.view.sections.clone();
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (idx, section) in sections.iter().enumerate() {
                if let Some(heading) = &section.heading {
                    if !matches!(section.body, Ok(SectionBody::Table(_))) {
                        ui.add_space(8.0);
                        ui.heading(heading);
                    }
                }
                match &section.body {
                    Ok(body) => section_body(ui, state, body, section.heading.as_deref(), idx),
                    Err(message) => {
                        ui.label(
                            RichText::new(format!("⚠ {message}"))
                                .color(Color32::from_rgb(200, 120, 0)),
                        );
                    }
                }
                ui.separator();
            }
        });
}

fn section_body(
    ui: &mut Ui,
    state: &mut AppState,
    body: &SectionBody,
    heading: Option<&str>,
    idx: usize,
) {
    match body {
        SectionBody::Note(text) => {
            Frame::group(ui.style())
                .fill(Color32::from_rgb(225, 238, 250))
                .show(ui, |ui: &mut Ui| {
                    ui.label(
                        RichText::new(format!("📌 Nota: {text}"))
                            .color(Color32::from_rgb(20, 60, 110)),
                    );
                });
        }
        SectionBody::Info { title, lines } => {
            egui::CollapsingHeader::new(format!("ℹ {title}"))
                .id_salt(("info", idx))
                .show(ui, |ui: &mut Ui| {
                    for line in lines {
                        ui.label(format!("• {line}"));
                    }
                });
        }
        SectionBody::Chart(spec) => plot::chart(ui, spec, &format!("{:?}.{idx}", state.page)),
        SectionBody::Metrics(tiles) => metric_tiles(ui, tiles),
        SectionBody::Table(data) => {
            egui::CollapsingHeader::new(heading.unwrap_or("Ver Tabla"))
                .id_salt(("table", idx))
                .show(ui, |ui: &mut Ui| {
                    table::data_table(ui, data, idx);
                });
        }
        SectionBody::Control(control) => control_widget(ui, state, control),
        SectionBody::Warning(text) => {
            ui.label(RichText::new(format!("⚠ {text}")).color(Color32::from_rgb(200, 120, 0)));
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload data").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(format!(
            "{} · {} table(s) cached",
            state.config.data_dir.display(),
            state.cache.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open laboratory data folder")
        .set_directory(&state.config.data_dir)
        .pick_folder();

    if let Some(dir) = folder {
        log::info!("switching data folder to {}", dir.display());
        state.set_data_dir(dir);
        let failures = state.view.failures().count();
        state.status_message =
            (failures > 0).then(|| format!("{failures} section(s) could not be built"));
    }
}
