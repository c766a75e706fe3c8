//! View rendering for the plan editor.
//!
//! Each table is a card with its date, filters, a sortable grid, totals over
//! the visible rows and a per-forest volume chart. Grid cells edit the stored
//! row at its position in the table, which `PlanView::positions` maps from
//! the filtered and sorted order.

use web_sys::HtmlInputElement;
use yew::html::Scope;
use yew::prelude::*;

use common::date;
use common::model::row::{Row, RowEdit};
use common::model::table::{PlanTable, TableKey};
use common::template::buyers;
use common::view::{RowFilter, SortField, SortSpec};

use super::chart::forest_chart;
use super::dialogs::new_table::new_table_dialog;
use super::helpers::{format_quantity, input_value, number_value, select_value};
use super::messages::{FilterField, Msg};
use super::state::{LoadState, PlanEditor};
use crate::api::LoadError;
use crate::components::references::ReferencesPanel;

pub fn view(editor: &PlanEditor, ctx: &Context<PlanEditor>) -> Html {
    let link = ctx.link();
    html! {
        <div class="plans-root">
            <header class="plans-header">
                <h1>{ "Sales plans" }</h1>
                <button
                    class="btn primary"
                    disabled={editor.load != LoadState::Ready}
                    onclick={link.callback(|_| Msg::OpenNewTable)}
                >
                    { "New table" }
                </button>
                {
                    if editor.queue.is_in_flight() || editor.queue.is_pending() {
                        html! { <span class="save-state">{ "Saving…" }</span> }
                    } else {
                        html! { <span class="save-state saved">{ "All changes saved" }</span> }
                    }
                }
            </header>
            {
                match &editor.load {
                    LoadState::Loading => html! { <div class="plans-status">{ "Loading plans…" }</div> },
                    LoadState::Failed(error) => build_error_panel(error, link),
                    LoadState::Ready => build_workspace(editor, link),
                }
            }
            { new_table_dialog(editor, link) }
        </div>
    }
}

fn build_error_panel(error: &LoadError, link: &Scope<PlanEditor>) -> Html {
    let class = match error {
        LoadError::TimedOut => "error-panel timeout",
        LoadError::Failed(_) => "error-panel",
    };
    html! {
        <div class={class}>
            <p>{ error.message() }</p>
            <button class="btn" onclick={link.callback(|_| Msg::Load)}>{ "Retry" }</button>
        </div>
    }
}

fn build_workspace(editor: &PlanEditor, link: &Scope<PlanEditor>) -> Html {
    let tables = editor.store.tables();
    html! {
        <>
            <ReferencesPanel
                references={editor.references.clone()}
                on_changed={link.callback(|_| Msg::ReloadReferences)}
            />
            {
                if tables.is_empty() {
                    html! { <p class="plans-empty">{ "No plan tables yet. Create one to get started." }</p> }
                } else {
                    html! { for tables.iter().map(|table| build_table(editor, link, table)) }
                }
            }
        </>
    }
}

fn build_table(editor: &PlanEditor, link: &Scope<PlanEditor>, table: &PlanTable) -> Html {
    let key = table.id.clone();
    let ui = editor.ui_for(&key);
    let view = editor.view_of(table);
    let exporting = editor.exporting.as_ref() == Some(&key);
    let title = if table.date.is_empty() {
        "Undated plan".to_string()
    } else {
        format!("Plan for {}", date::display(&table.date))
    };

    let on_date = {
        let key = key.clone();
        link.callback(move |e: Event| Msg::SetTableDate(key.clone(), input_value(&e)))
    };
    let on_export = {
        let key = key.clone();
        link.callback(move |_| Msg::Export(key.clone()))
    };
    let on_delete = {
        let key = key.clone();
        link.callback(move |_| Msg::DeleteTable(key.clone()))
    };
    let on_add_row = {
        let key = key.clone();
        link.callback(move |_| Msg::AddRow(key.clone()))
    };

    html! {
        <section class="plan-table" key={key.to_string()}>
            <header class="plan-table-header">
                <h2>{ title }</h2>
                {
                    if key.persisted_id().is_none() {
                        html! { <span class="badge">{ "unsaved" }</span> }
                    } else {
                        html! {}
                    }
                }
                <input type="date" value={table.date.clone()} onchange={on_date} />
                <button class="btn" disabled={exporting} onclick={on_export}>
                    { if exporting { "Exporting…" } else { "Export to Excel" } }
                </button>
                <button class="btn danger" onclick={on_delete}>{ "Delete table" }</button>
            </header>
            { build_filters(link, &key, &ui.filter) }
            <table class="plan-grid">
                <thead>
                    <tr>
                        <th>{ "No." }</th>
                        { for SortField::ALL.iter().map(|field| build_header_cell(link, &key, &ui.sort, *field)) }
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    { for view.rows.iter().zip(&view.positions).enumerate().map(|(shown, (row, &index))| {
                        build_row(editor, link, &key, shown, index, row)
                    }) }
                </tbody>
                <tfoot>
                    <tr>
                        <td colspan="4"></td>
                        <td class="total-label">{ "Total:" }</td>
                        <td class="number">{ format_quantity(view.total_volume) }</td>
                        <td class="number">{ format_quantity(view.total_amount) }</td>
                        <td></td>
                    </tr>
                </tfoot>
            </table>
            <button class="btn" onclick={on_add_row}>{ "Add row" }</button>
            { forest_chart(&view) }
        </section>
    }
}

fn build_filters(link: &Scope<PlanEditor>, key: &TableKey, filter: &RowFilter) -> Html {
    let input = |field: FilterField, placeholder: &'static str, value: &str| {
        let key = key.clone();
        let oninput = link.callback(move |e: InputEvent| {
            let value = e.target_unchecked_into::<HtmlInputElement>().value();
            Msg::SetFilter(key.clone(), field, value)
        });
        html! { <input type="search" placeholder={placeholder} value={value.to_string()} {oninput} /> }
    };
    html! {
        <div class="plan-filters">
            { input(FilterField::Forest, "Filter by forest unit", &filter.forest) }
            { input(FilterField::Buyer, "Filter by buyer", &filter.buyer) }
            { input(FilterField::Species, "Filter by species", &filter.species) }
        </div>
    }
}

fn build_header_cell(
    link: &Scope<PlanEditor>,
    key: &TableKey,
    sort: &SortSpec,
    field: SortField,
) -> Html {
    let key = key.clone();
    let onclick = link.callback(move |_| Msg::ToggleSort(key.clone(), field));
    let arrow = if sort.field == Some(field) {
        sort.direction.arrow()
    } else {
        ""
    };
    html! {
        <th class="sortable" {onclick}>{ field.label() }{ " " }{ arrow }</th>
    }
}

fn build_row(
    editor: &PlanEditor,
    link: &Scope<PlanEditor>,
    key: &TableKey,
    shown: usize,
    index: usize,
    row: &Row,
) -> Html {
    let references = &editor.references;
    let edit = |make: fn(String) -> RowEdit| {
        let key = key.clone();
        link.callback(move |e: Event| Msg::EditRow(key.clone(), index, make(select_value(&e))))
    };
    let edit_number = |make: fn(f64) -> RowEdit| {
        let key = key.clone();
        link.callback(move |e: Event| Msg::EditRow(key.clone(), index, make(number_value(&e))))
    };
    let on_buyer = {
        let key = key.clone();
        link.callback(move |e: Event| Msg::SetBuyer(key.clone(), index, select_value(&e)))
    };
    let on_delete = {
        let key = key.clone();
        link.callback(move |_| Msg::DeleteRow(key.clone(), index))
    };
    let buyer_names = buyers(&references.purchases);

    html! {
        <tr key={row.id.map(|id| id.to_string()).unwrap_or_else(|| format!("new-{}", index))}>
            <td class="number">{ (shown + 1).to_string() }</td>
            <td>{ select_cell(&references.forests, &row.forest, edit(RowEdit::Forest)) }</td>
            <td>{ select_cell(&buyer_names, &row.buyer, on_buyer) }</td>
            <td>{ select_cell(&references.products, &row.product, edit(RowEdit::Product)) }</td>
            <td>{ select_cell(&references.species, &row.species, edit(RowEdit::Species)) }</td>
            <td>
                <input type="number" min="0" step="any" class="number"
                    value={row.volume.to_string()} onchange={edit_number(RowEdit::Volume)} />
            </td>
            <td>
                <input type="number" min="0" step="any" class="number"
                    value={row.amount.to_string()} onchange={edit_number(RowEdit::Amount)} />
            </td>
            <td>
                <button
                    class="icon-btn danger"
                    title={if row.is_persisted() { "Delete row" } else { "Saving…" }}
                    disabled={!row.is_persisted()}
                    onclick={on_delete}
                >
                    { "✕" }
                </button>
            </td>
        </tr>
    }
}

/// A picker over `options`; a current value missing from the list is kept
/// as an extra choice so existing rows still display it.
fn select_cell(options: &[String], current: &str, onchange: Callback<Event>) -> Html {
    let mut choices: Vec<&str> = options.iter().map(String::as_str).collect();
    if !current.is_empty() && !choices.contains(&current) {
        choices.push(current);
    }
    html! {
        <select {onchange}>
            <option value="" selected={current.is_empty()}>{ "" }</option>
            { for choices.into_iter().map(|choice| html! {
                <option value={choice.to_string()} selected={choice == current}>{ choice.to_string() }</option>
            }) }
        </select>
    }
}
