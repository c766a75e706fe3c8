//! Editor for the reference lists: forest units, products, species and the
//! buyer purchase templates.
//!
//! The panel owns only its form drafts. The lists themselves belong to the
//! plan editor, which reloads them whenever `on_changed` fires.

use yew::prelude::*;

mod messages;
mod props;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use props::ReferencesProps;
pub use state::ReferencesPanel;

impl Component for ReferencesPanel {
    type Message = Msg;
    type Properties = ReferencesProps;

    fn create(_ctx: &Context<Self>) -> Self {
        ReferencesPanel::new()
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }
}
