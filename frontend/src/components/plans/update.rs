//! Update function for the plan editor.
//!
//! Edits go through the [`PlanStore`](common::store::PlanStore) and then
//! [`schedule_save`], so a burst of keystrokes becomes a single batch save of
//! the latest snapshot. Deleting a saved table or row is sent to the server
//! first and applied locally only once it succeeded.

use std::time::Duration;

use gloo_console as console;
use gloo_timers::callback::Timeout;
use yew::platform::spawn_local;
use yew::prelude::*;

use common::date;
use common::model::row::Row;
use common::model::table::TableKey;
use common::requests::{export_file_name, ExportRequest};
use common::responses::SavedTable;

use crate::tops_sheet::yw_material_top_sheet::{close_top_sheet, open_top_sheet};

use crate::api;
use super::helpers::{alert, confirm, download_workbook, now};
use super::messages::{FilterField, Msg};
use super::state::{LoadState, PlanEditor};

pub fn update(editor: &mut PlanEditor, ctx: &Context<PlanEditor>, msg: Msg) -> bool {
    match msg {
        Msg::Load => {
            editor.load = LoadState::Loading;
            let link = ctx.link().clone();
            spawn_local(async move {
                link.send_message(Msg::Loaded(api::load_workspace().await));
            });
            true
        }
        Msg::Loaded(Ok(workspace)) => {
            editor.store.replace(workspace.tables);
            editor.references = workspace.references;
            editor.ui.clear();
            editor.load = LoadState::Ready;
            console::log!(format!("Loaded {} plan tables", editor.store.tables().len()));
            true
        }
        Msg::Loaded(Err(error)) => {
            console::error!(error.message());
            editor.load = LoadState::Failed(error);
            true
        }
        Msg::ReloadReferences => {
            let link = ctx.link().clone();
            spawn_local(async move {
                link.send_message(Msg::ReferencesLoaded(api::load_references().await));
            });
            false
        }
        Msg::ReferencesLoaded(Ok(references)) => {
            editor.references = references;
            true
        }
        Msg::ReferencesLoaded(Err(error)) => {
            alert(&format!("Could not reload the reference lists: {}", error));
            false
        }

        Msg::OpenNewTable => {
            editor.new_table_date.clear();
            open_top_sheet(editor.new_table_ref.clone());
            true
        }
        Msg::SetNewTableDate(date) => {
            editor.new_table_date = date;
            true
        }
        Msg::CloseNewTable => {
            close_top_sheet(editor.new_table_ref.clone());
            false
        }
        Msg::CreateTable => match editor.store.add_pending_table(&editor.new_table_date) {
            Ok((key, _)) => {
                console::log!(format!("Created {}", key));
                close_top_sheet(editor.new_table_ref.clone());
                editor.queue.schedule_now(now());
                arm_save_timer(editor, ctx, Duration::ZERO);
                true
            }
            Err(error) => {
                alert(&error.to_string());
                false
            }
        },
        Msg::SetTableDate(key, date) => {
            match editor.store.set_date(&key, &date) {
                Ok(_) => schedule_save(editor, ctx),
                Err(error) => alert(&error.to_string()),
            }
            true
        }
        Msg::DeleteTable(key) => {
            let Some(table) = editor.store.table(&key) else {
                return false;
            };
            let question = format!(
                "Delete the plan for {} and all of its rows?",
                date::display(&table.date)
            );
            if !confirm(&question) {
                return false;
            }
            match key.persisted_id() {
                Some(id) => {
                    let link = ctx.link().clone();
                    spawn_local(async move {
                        let result = api::delete_table(id).await;
                        link.send_message(Msg::TableDeleted(key, result));
                    });
                    false
                }
                None => {
                    forget_table(editor, &key);
                    true
                }
            }
        }
        Msg::TableDeleted(key, Ok(())) => {
            forget_table(editor, &key);
            true
        }
        Msg::TableDeleted(_, Err(error)) => {
            alert(&format!("The table could not be deleted: {}", error));
            false
        }

        Msg::AddRow(key) => {
            match editor.store.push_row(&key, Row::blank()) {
                Ok(_) => schedule_save(editor, ctx),
                Err(error) => alert(&error.to_string()),
            }
            true
        }
        Msg::DeleteRow(key, index) => {
            let row_id = editor
                .store
                .table(&key)
                .and_then(|table| table.rows.get(index))
                .and_then(|row| row.id);
            let (Some(table_id), Some(row_id)) = (key.persisted_id(), row_id) else {
                alert("This row is still being saved. Try again in a moment.");
                return false;
            };
            if !confirm("Delete this row?") {
                return false;
            }
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = api::delete_table_row(table_id, row_id).await;
                link.send_message(Msg::RowDeleted(key, row_id, result));
            });
            false
        }
        Msg::RowDeleted(key, row_id, Ok(())) => {
            let position = editor
                .store
                .table(&key)
                .and_then(|table| table.rows.iter().position(|row| row.id == Some(row_id)));
            if let Some(index) = position {
                if let Err(error) = editor.store.remove_row(&key, index) {
                    console::warn!(error.to_string());
                }
            }
            true
        }
        Msg::RowDeleted(_, _, Err(error)) => {
            alert(&format!("The row could not be deleted: {}", error));
            false
        }
        Msg::EditRow(key, index, edit) => {
            match editor.store.edit_row(&key, index, edit) {
                Ok(_) => schedule_save(editor, ctx),
                Err(error) => console::warn!(error.to_string()),
            }
            true
        }
        Msg::SetBuyer(key, index, buyer) => {
            let result = editor
                .store
                .set_buyer(&key, index, &buyer, &editor.references.purchases);
            match result {
                Ok(_) => schedule_save(editor, ctx),
                Err(error) => console::warn!(error.to_string()),
            }
            true
        }

        Msg::SetFilter(key, field, value) => {
            let filter = &mut editor.ui.entry(key).or_default().filter;
            match field {
                FilterField::Forest => filter.forest = value,
                FilterField::Buyer => filter.buyer = value,
                FilterField::Species => filter.species = value,
            }
            true
        }
        Msg::ToggleSort(key, field) => {
            editor.ui.entry(key).or_default().sort.toggle(field);
            true
        }

        Msg::Export(key) => {
            let Some(table) = editor.store.table(&key).cloned() else {
                return false;
            };
            let view = editor.view_of(&table);
            let file_name = export_file_name(&table.date);
            let request = ExportRequest {
                table_data: Some(table),
                filtered_and_sorted_rows: Some(view.rows),
                total_volume: Some(view.total_volume),
                total_amount: Some(view.total_amount),
            };
            editor.exporting = Some(key);
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = match api::export(&request).await {
                    Ok(bytes) => download_workbook(&bytes, &file_name),
                    Err(error) => Err(error),
                };
                link.send_message(Msg::Exported(result));
            });
            true
        }
        Msg::Exported(result) => {
            editor.exporting = None;
            if let Err(error) = result {
                alert(&format!("The export failed: {}", error));
            }
            true
        }

        Msg::SaveDue => {
            flush(editor, ctx);
            false
        }
        Msg::Saved(result) => {
            match result {
                Ok(report) => adopt_saved(editor, &report.tables),
                Err(failure) => {
                    // Tables written before the failure still take their ids.
                    adopt_saved(editor, &failure.saved);
                    console::error!(format!("save failed: {}", failure.message));
                    alert(&format!("Your changes could not be saved: {}", failure.message));
                }
            }
            if let Some(delay) = editor.queue.finish(now()) {
                arm_save_timer(editor, ctx, delay);
            }
            true
        }
    }
}

/// Records an edit and (re)arms the quiet-period timer.
fn schedule_save(editor: &mut PlanEditor, ctx: &Context<PlanEditor>) {
    let delay = editor.queue.schedule(now());
    arm_save_timer(editor, ctx, delay);
}

fn arm_save_timer(editor: &mut PlanEditor, ctx: &Context<PlanEditor>, delay: Duration) {
    let link = ctx.link().clone();
    let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
    editor.save_timer = Some(Timeout::new(millis, move || link.send_message(Msg::SaveDue)));
}

/// Sends the current snapshot if the queue hands out the write permit. While a
/// save is outstanding nothing happens here; its completion re-arms the timer.
fn flush(editor: &mut PlanEditor, ctx: &Context<PlanEditor>) {
    let now = now();
    if editor.queue.take_ready(now) {
        let tables = editor.store.snapshot().to_vec();
        let link = ctx.link().clone();
        spawn_local(async move {
            link.send_message(Msg::Saved(api::save_tables(tables).await));
        });
    } else if !editor.queue.is_in_flight() {
        if let Some(delay) = editor.queue.delay_until_due(now) {
            arm_save_timer(editor, ctx, delay);
        }
    }
}

/// Moves per-table view settings to the persisted keys, then writes the new
/// ids into the store.
fn adopt_saved(editor: &mut PlanEditor, tables: &[SavedTable]) {
    for saved in tables {
        if let TableKey::Pending(_) = saved.key {
            if let Some(ui) = editor.ui.remove(&saved.key) {
                editor.ui.insert(TableKey::Persisted(saved.id), ui);
            }
        }
    }
    editor.store.apply_saved(tables);
}

fn forget_table(editor: &mut PlanEditor, key: &TableKey) {
    if let Err(error) = editor.store.remove_table(key) {
        console::warn!(error.to_string());
    }
    editor.ui.remove(key);
}
