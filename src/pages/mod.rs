//! Dashboard pages as plain functions: `Selections -> filtered tables -> sections`.
//!
//! A page never talks to a UI toolkit. It describes the widgets it wants
//! ([`Control`]), reads the user's current answers from [`Selections`], and
//! returns a [`PageView`] whose sections each carry their own outcome, so one
//! failing chart never hides its siblings.

pub mod biological;
pub mod home;
pub mod print;
pub mod rheology;
pub mod shape;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::chart::ChartSpec;
use crate::config::DashboardConfig;
use crate::data::cache::{TableCache, TableReader};
use crate::data::filter;
use crate::data::model::{Table, Value};
use crate::data::source::DataSource;
use crate::error::{PipelineError, PipelineResult};
use crate::stats::MetricTile;

// ---------------------------------------------------------------------------
// Page catalogue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Page {
    Home,
    PrintParameters,
    ShapeParameters,
    Rheology,
    Biological,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Home,
        Page::PrintParameters,
        Page::ShapeParameters,
        Page::Rheology,
        Page::Biological,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "Inicio",
            Page::PrintParameters => "Parámetros de Impresión",
            Page::ShapeParameters => "Parámetros de Forma",
            Page::Rheology => "Ensayos Reológicos",
            Page::Biological => "Ensayos Biológicos",
        }
    }

    /// Short name accepted by `--dump`.
    pub fn slug(self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::PrintParameters => "print",
            Page::ShapeParameters => "shape",
            Page::Rheology => "rheology",
            Page::Biological => "biological",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Page> {
        Page::ALL.into_iter().find(|p| p.slug() == slug)
    }

    /// Source tables the page reads.
    pub fn sources(self) -> &'static [DataSource] {
        match self {
            Page::Home => &[],
            Page::PrintParameters => &[DataSource::PrintParameters],
            Page::ShapeParameters => &[DataSource::Shape],
            Page::Rheology => &[DataSource::Rheology, DataSource::CurveFits],
            Page::Biological => &[DataSource::Viability],
        }
    }

    pub fn build(
        self,
        sources: &Sources,
        selections: &Selections,
        config: &DashboardConfig,
    ) -> PageView {
        match self {
            Page::Home => home::build(config),
            Page::PrintParameters => print::build(sources, selections),
            Page::ShapeParameters => shape::build(sources, selections),
            Page::Rheology => rheology::build(sources, selections),
            Page::Biological => biological::build(sources, selections),
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Load what `page` needs from disk and render its default view as JSON.
pub fn dump(page: Page, config: &DashboardConfig) -> anyhow::Result<String> {
    let mut cache = TableCache::default();
    let sources = Sources::load(&mut cache, config, page.sources());
    let view = page.build(&sources, &Selections::new(), config);
    Ok(serde_json::to_string_pretty(&view)?)
}

// ---------------------------------------------------------------------------
// Loaded source tables
// ---------------------------------------------------------------------------

/// The tables a page needs, each loaded (or failed) independently.
#[derive(Debug, Default, Clone)]
pub struct Sources {
    tables: BTreeMap<DataSource, PipelineResult<Arc<Table>>>,
}

impl Sources {
    /// Load `wanted` through the cache, validating each against its schema.
    pub fn load<R: TableReader>(
        cache: &mut TableCache<R>,
        config: &DashboardConfig,
        wanted: &[DataSource],
    ) -> Self {
        let tables = wanted
            .iter()
            .map(|&source| {
                let result = cache.load_validated(&config.path_for(source), &source.schema());
                if let Err(e) = &result {
                    log::warn!("{source}: {e}");
                }
                (source, result)
            })
            .collect();
        Sources { tables }
    }

    pub fn insert(&mut self, source: DataSource, table: Table) {
        self.tables.insert(source, Ok(Arc::new(table)));
    }

    pub fn get(&self, source: DataSource) -> PipelineResult<&Table> {
        match self.tables.get(&source) {
            Some(Ok(table)) => Ok(table.as_ref()),
            Some(Err(e)) => Err(e.clone()),
            None => Err(PipelineError::SourceUnavailable {
                source_name: source.default_file_name().to_string(),
                reason: "not loaded".to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Widgets and the user's answers
// ---------------------------------------------------------------------------

/// A user's answer to one control.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Choice {
    Many(BTreeSet<Value>),
    One(Value),
    Dates {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
}

/// Answers keyed by control id. Absent ids take the control's default.
pub type Selections = BTreeMap<String, Choice>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Placement {
    Sidebar,
    Inline,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ControlKind {
    MultiSelect {
        options: Vec<Value>,
        selected: BTreeSet<Value>,
    },
    SingleSelect {
        options: Vec<Value>,
        selected: Option<Value>,
    },
    DateRange {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
}

/// A selection widget definition handed to the rendering surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Control {
    pub id: String,
    pub label: String,
    pub placement: Placement,
    pub kind: ControlKind,
}

/// Multi-select answer: the stored set, or every option when unanswered.
pub fn multi_choice(selections: &Selections, id: &str, options: &[Value]) -> BTreeSet<Value> {
    match selections.get(id) {
        Some(Choice::Many(set)) => set.clone(),
        _ => options.iter().cloned().collect(),
    }
}

/// Single-select answer: the stored value while it is still an option, else the first option.
pub fn single_choice(selections: &Selections, id: &str, options: &[Value]) -> Option<Value> {
    match selections.get(id) {
        Some(Choice::One(v)) if options.contains(v) => Some(v.clone()),
        _ => options.first().cloned(),
    }
}

pub fn date_choice(selections: &Selections, id: &str) -> (Option<NaiveDate>, Option<NaiveDate>) {
    match selections.get(id) {
        Some(Choice::Dates { from, to }) => (*from, *to),
        _ => (None, None),
    }
}

/// Build a multi-select control and return it with the current answer.
pub fn multi_select(
    selections: &Selections,
    id: &str,
    label: &str,
    placement: Placement,
    options: Vec<Value>,
) -> (Control, BTreeSet<Value>) {
    let selected = multi_choice(selections, id, &options);
    let control = Control {
        id: id.to_string(),
        label: label.to_string(),
        placement,
        kind: ControlKind::MultiSelect {
            options,
            selected: selected.clone(),
        },
    };
    (control, selected)
}

/// Build a single-select control and return it with the current answer.
pub fn single_select(
    selections: &Selections,
    id: &str,
    label: &str,
    placement: Placement,
    options: Vec<Value>,
) -> (Control, Option<Value>) {
    let selected = single_choice(selections, id, &options);
    let control = Control {
        id: id.to_string(),
        label: label.to_string(),
        placement,
        kind: ControlKind::SingleSelect {
            options,
            selected: selected.clone(),
        },
    };
    (control, selected)
}

/// Build a date-range control, narrow `table` by it and return both.
pub fn date_range(
    selections: &Selections,
    id: &str,
    label: &str,
    table: &Table,
    column: &str,
) -> PipelineResult<(Control, Table)> {
    let (from, to) = date_choice(selections, id);
    let control = Control {
        id: id.to_string(),
        label: label.to_string(),
        placement: Placement::Sidebar,
        kind: ControlKind::DateRange { from, to },
    };
    let table = if from.is_none() && to.is_none() {
        table.clone()
    } else {
        filter::filter_date_range(table, column, from, to)?
    };
    Ok((control, table))
}

// ---------------------------------------------------------------------------
// Page output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SectionBody {
    /// Highlighted note ("📌 Nota: …").
    Note(String),
    /// Collapsible explanation: title plus bullet lines.
    Info { title: String, lines: Vec<String> },
    Chart(ChartSpec),
    Metrics(Vec<MetricTile>),
    /// Collapsible data table.
    Table(Table),
    /// Inline widget (e.g. geometry or variable choice).
    Control(Control),
    Warning(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub heading: Option<String>,
    pub body: Result<SectionBody, String>,
}

impl Section {
    pub fn new(heading: Option<&str>, body: SectionBody) -> Self {
        Section {
            heading: heading.map(str::to_string),
            body: Ok(body),
        }
    }

    pub fn plain(body: SectionBody) -> Self {
        Section::new(None, body)
    }

    /// Wrap a fallible section; the error becomes an inline notice.
    pub fn from_result(heading: Option<&str>, body: PipelineResult<SectionBody>) -> Self {
        if let Err(e) = &body {
            log::warn!("section {:?} skipped: {e}", heading.unwrap_or("<untitled>"));
        }
        Section {
            heading: heading.map(str::to_string),
            body: body.map_err(|e| e.to_string()),
        }
    }
}

/// Everything one page shows, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub page: Page,
    pub title: String,
    pub sidebar: Vec<Control>,
    pub sections: Vec<Section>,
}

impl PageView {
    pub fn new(page: Page) -> Self {
        PageView {
            page,
            title: page.title().to_string(),
            sidebar: Vec::new(),
            sections: Vec::new(),
        }
    }

    pub fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Charts that were built successfully, in order.
    pub fn charts(&self) -> impl Iterator<Item = &ChartSpec> {
        self.sections.iter().filter_map(|s| match &s.body {
            Ok(SectionBody::Chart(c)) => Some(c),
            _ => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().filter_map(|s| s.body.as_ref().err().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unanswered_multi_select_selects_everything() {
        let options = vec![Value::from("A"), Value::from("B")];
        let (control, selected) =
            multi_select(&Selections::new(), "m", "Muestra", Placement::Sidebar, options);
        assert_eq!(selected.len(), 2);
        assert!(matches!(control.kind, ControlKind::MultiSelect { .. }));
    }

    #[test]
    fn stale_single_choice_falls_back_to_first_option() {
        let mut selections = Selections::new();
        selections.insert("g".into(), Choice::One(Value::from("Panal")));
        let options = vec![Value::from("Rejilla"), Value::from("Cruz")];
        assert_eq!(single_choice(&selections, "g", &options), Some(Value::from("Rejilla")));
        selections.insert("g".into(), Choice::One(Value::from("Cruz")));
        assert_eq!(single_choice(&selections, "g", &options), Some(Value::from("Cruz")));
    }

    #[test]
    fn slugs_round_trip() {
        for page in Page::ALL {
            assert_eq!(Page::from_slug(page.slug()), Some(page));
        }
        assert_eq!(Page::from_slug("mechanical"), None);
    }

    #[test]
    fn unloaded_source_is_unavailable() {
        let err = Sources::default().get(DataSource::Viability).unwrap_err();
        assert!(matches!(err, PipelineError::SourceUnavailable { .. }));
    }
}
