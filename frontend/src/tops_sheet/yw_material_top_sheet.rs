//! Slide-down sheet used for modal dialogs.
//!
//! The sheet is always mounted; it is shown by adding the `show` class, which
//! the stylesheet animates. Toggling waits one short tick so the transition
//! also plays when the sheet was rendered in the same frame.

use gloo_console as console;
use gloo_timers::callback::Timeout;
use uuid::Uuid;
use web_sys::HtmlElement;
use yew::{html, Component, Context, Html, NodeRef, Properties};

const SHOW_CLASS: &str = "show";
const TOGGLE_DELAY_MS: u32 = 50;

pub struct YwMaterialTopSheet {
    pub id: String,
}

#[derive(Properties, PartialEq)]
pub struct Props {
    #[prop_or_default]
    pub children: Html,
    pub node_ref: NodeRef,
}

impl Component for YwMaterialTopSheet {
    type Message = ();
    type Properties = Props;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            id: format!("sheet-{}", Uuid::new_v4()),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="top-sheet" id={self.id.clone()} ref={ctx.props().node_ref.clone()} role="dialog">
                { ctx.props().children.clone() }
            </div>
        }
    }
}

pub fn open_top_sheet(top_sheet_ref: NodeRef) {
    toggle(top_sheet_ref, true);
}

pub fn close_top_sheet(top_sheet_ref: NodeRef) {
    toggle(top_sheet_ref, false);
}

fn toggle(top_sheet_ref: NodeRef, show: bool) {
    Timeout::new(TOGGLE_DELAY_MS, move || {
        let Some(sheet) = top_sheet_ref.cast::<HtmlElement>() else {
            return;
        };
        let classes = sheet.class_list();
        let result = if show {
            classes.add_1(SHOW_CLASS)
        } else {
            classes.remove_1(SHOW_CLASS)
        };
        if let Err(error) = result {
            console::warn!("could not toggle the top sheet", error);
        }
    })
    .forget();
}
