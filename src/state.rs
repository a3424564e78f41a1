use std::collections::BTreeSet;
use std::path::PathBuf;

use bioink_dash::config::DashboardConfig;
use bioink_dash::data::cache::TableCache;
use bioink_dash::data::model::Value;
use bioink_dash::pages::{Choice, Page, PageView, Selections, Sources};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded tables, one per source file, kept until an explicit reload.
    pub cache: TableCache,

    /// Page chosen in the sidebar.
    pub page: Page,

    /// Every widget answer, keyed by control id (ids are page-scoped).
    pub selections: Selections,

    /// The current page, rebuilt after every interaction.
    pub view: PageView,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let page = Page::Home;
        let view = page.build(&Sources::default(), &Selections::new(), &config);
        let mut state = Self {
            config,
            cache: TableCache::default(),
            page,
            selections: Selections::new(),
            view,
            status_message: None,
        };
        state.rebuild();
        state
    }

    /// Re-run the pipeline for the current page (tables come from the cache).
    pub fn rebuild(&mut self) {
        let sources = Sources::load(&mut self.cache, &self.config, self.page.sources());
        self.view = self.page.build(&sources, &self.selections, &self.config);
    }

    pub fn set_page(&mut self, page: Page) {
        if self.page != page {
            self.page = page;
            self.rebuild();
        }
    }

    /// Record an answer and rebuild.
    pub fn set_choice(&mut self, id: &str, choice: Choice) {
        self.selections.insert(id.to_string(), choice);
        self.rebuild();
    }

    /// Toggle a single value in a multi-select answer.
    pub fn toggle_value(&mut self, id: &str, value: &Value, current: &BTreeSet<Value>) {
        let mut selected = current.clone();
        if !selected.remove(value) {
            selected.insert(value.clone());
        }
        self.set_choice(id, Choice::Many(selected));
    }

    /// Select all values of a multi-select.
    pub fn select_all(&mut self, id: &str, options: &[Value]) {
        self.set_choice(id, Choice::Many(options.iter().cloned().collect()));
    }

    /// Deselect all values of a multi-select.
    pub fn select_none(&mut self, id: &str) {
        self.set_choice(id, Choice::Many(BTreeSet::new()));
    }

    /// Drop every cached table and read the files again.
    pub fn reload(&mut self) {
        self.cache.invalidate_all();
        self.status_message = None;
        self.rebuild();
        log::info!("reloaded data from {}", self.config.data_dir.display());
    }

    /// Point the dashboard at another data folder.
    pub fn set_data_dir(&mut self, dir: PathBuf) {
        self.config.data_dir = dir;
        self.reload();
    }
}
