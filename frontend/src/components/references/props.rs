use yew::prelude::*;

use crate::api::References;

#[derive(Properties, PartialEq, Clone)]
pub struct ReferencesProps {
    /// Current lists, owned by the plan editor.
    pub references: References,

    /// Fired after any successful add or delete so the owner can reload.
    pub on_changed: Callback<()>,
}
