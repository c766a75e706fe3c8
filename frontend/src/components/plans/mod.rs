//! Plan editor: root module wiring the Yew `Component` implementation with
//! submodules for state, update logic, view rendering, API calls and helpers.
//!
//! On first render the editor loads every table and reference list; after
//! that the server is only written to, through the debounced batch save and
//! the explicit delete and export actions.

use yew::prelude::*;

mod chart;
mod dialogs;
pub(crate) mod helpers;
mod messages;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use state::PlanEditor;

impl Component for PlanEditor {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        PlanEditor::new()
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render && !self.loaded {
            self.loaded = true;
            ctx.link().send_message(Msg::Load);
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.queue.cancel();
        self.save_timer = None;
    }
}
