use web_sys::HtmlInputElement;
use yew::html::Scope;
use yew::prelude::*;

use crate::components::plans::{Msg, PlanEditor};
use crate::tops_sheet::yw_material_top_sheet::YwMaterialTopSheet;

/// Date picker shown before a new plan table is created.
pub fn new_table_dialog(editor: &PlanEditor, link: &Scope<PlanEditor>) -> Html {
    html! {
        <YwMaterialTopSheet node_ref={editor.new_table_ref.clone()}>
            <div class="dialog">
                <h3>{ "New plan table" }</h3>
                <label>
                    { "Plan date" }
                    <input
                        type="date"
                        value={editor.new_table_date.clone()}
                        oninput={link.callback(|e: InputEvent| {
                            Msg::SetNewTableDate(e.target_unchecked_into::<HtmlInputElement>().value())
                        })}
                    />
                </label>
                <div class="dialog-actions">
                    <button class="btn" onclick={link.callback(|_| Msg::CloseNewTable)}>{ "Cancel" }</button>
                    <button
                        class="btn primary"
                        disabled={editor.new_table_date.trim().is_empty()}
                        onclick={link.callback(|_| Msg::CreateTable)}
                    >
                        { "Create" }
                    </button>
                </div>
            </div>
        </YwMaterialTopSheet>
    }
}
