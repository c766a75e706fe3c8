use common::model::row::RowEdit;
use common::model::table::TableKey;
use common::responses::SaveReport;
use common::view::SortField;

use crate::api::{LoadError, References, SaveFailed, Workspace};

/// Which text filter of a table an input drives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FilterField {
    Forest,
    Buyer,
    Species,
}

pub enum Msg {
    Load,
    Loaded(Result<Workspace, LoadError>),
    ReloadReferences,
    ReferencesLoaded(Result<References, String>),

    OpenNewTable,
    SetNewTableDate(String),
    CreateTable,
    CloseNewTable,
    SetTableDate(TableKey, String),
    DeleteTable(TableKey),
    TableDeleted(TableKey, Result<(), String>),

    AddRow(TableKey),
    /// Row position in the stored table (not in the filtered view).
    DeleteRow(TableKey, usize),
    RowDeleted(TableKey, i64, Result<(), String>),
    EditRow(TableKey, usize, RowEdit),
    SetBuyer(TableKey, usize, String),

    SetFilter(TableKey, FilterField, String),
    ToggleSort(TableKey, SortField),

    Export(TableKey),
    Exported(Result<(), String>),

    SaveDue,
    Saved(Result<SaveReport, SaveFailed>),
}
