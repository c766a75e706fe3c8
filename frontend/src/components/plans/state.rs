//! Runtime state of the plan editor.
//!
//! The editor is the only owner of the [`PlanStore`]; every edit replaces the
//! store's snapshot and schedules a save through the [`SaveQueue`]. Filters
//! and sort order are per table and live only here, never on the server.

use std::collections::HashMap;

use gloo_timers::callback::Timeout;
use yew::prelude::*;

use common::model::table::{PlanTable, TableKey};
use common::save_queue::SaveQueue;
use common::store::PlanStore;
use common::view::{PlanView, RowFilter, SortSpec};

use crate::api::{LoadError, References};

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Failed(LoadError),
    Ready,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableUi {
    pub filter: RowFilter,
    pub sort: SortSpec,
}

pub struct PlanEditor {
    pub load: LoadState,
    pub store: PlanStore,
    pub references: References,
    pub ui: HashMap<TableKey, TableUi>,

    pub queue: SaveQueue,
    /// Pending wake-up for the save queue; replacing it cancels the old one.
    pub save_timer: Option<Timeout>,

    pub new_table_ref: NodeRef,
    pub new_table_date: String,

    /// Table whose export is being generated.
    pub exporting: Option<TableKey>,
    /// Guard for the first-render load.
    pub loaded: bool,
}

impl PlanEditor {
    pub fn new() -> Self {
        Self {
            load: LoadState::Loading,
            store: PlanStore::default(),
            references: References::default(),
            ui: HashMap::new(),
            queue: SaveQueue::default(),
            save_timer: None,
            new_table_ref: NodeRef::default(),
            new_table_date: String::new(),
            exporting: None,
            loaded: false,
        }
    }

    pub fn ui_for(&self, key: &TableKey) -> TableUi {
        self.ui.get(key).cloned().unwrap_or_default()
    }

    /// What the grid shows (and what an export contains) for `table`.
    pub fn view_of(&self, table: &PlanTable) -> PlanView {
        let ui = self.ui_for(&table.id);
        PlanView::derive(&table.rows, &ui.filter, &ui.sort, &self.references.forests)
    }
}
