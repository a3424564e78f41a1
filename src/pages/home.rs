use super::{Page, PageView, Section, SectionBody};
use crate::config::DashboardConfig;

pub fn build(config: &DashboardConfig) -> PageView {
    let mut view = PageView::new(Page::Home);
    view.push(Section::new(
        Some("Inicio"),
        SectionBody::Info {
            title: "Bienvenido al Dashboard del Proyecto Biotintas".to_string(),
            lines: vec![
                "Utiliza el panel lateral para explorar las secciones del proyecto.".to_string(),
            ],
        },
    ));
    if let Some(date) = &config.last_updated {
        view.push(Section::plain(SectionBody::Note(format!(
            "Última actualización: {date}"
        ))));
    }
    view
}
