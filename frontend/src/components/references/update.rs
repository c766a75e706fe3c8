use std::future::Future;

use gloo_console as console;
use yew::platform::spawn_local;
use yew::prelude::*;

use common::requests::NewPurchaseRequest;

use super::messages::Msg;
use super::state::{PurchaseForm, ReferencesPanel};
use crate::api;
use crate::components::plans::helpers::{alert, confirm};

pub fn update(panel: &mut ReferencesPanel, ctx: &Context<ReferencesPanel>, msg: Msg) -> bool {
    match msg {
        Msg::Toggle => {
            panel.open = !panel.open;
            true
        }

        Msg::SetDraft(kind, value) => {
            panel.drafts.insert(kind, value);
            true
        }

        Msg::AddName(kind) => {
            let name = panel.draft(kind).trim().to_string();
            if name.is_empty() || panel.busy {
                return false;
            }
            if ctx.props().references.names(kind).contains(&name) {
                alert(&format!("{} \"{}\" already exists.", kind.label(), name));
                return false;
            }
            run(panel, ctx, api::add_name(kind, name), move |result| {
                Msg::Done(result, Some(kind))
            });
            true
        }

        Msg::DeleteName(kind, name) => {
            if panel.busy || !confirm(&format!("Delete {} \"{}\"?", kind.label().to_lowercase(), name)) {
                return false;
            }
            run(panel, ctx, api::delete_name(kind, name), |result| Msg::Done(result, None));
            true
        }

        Msg::SetPurchaseField(field, value) => {
            *panel.purchase.field_mut(field) = value;
            true
        }

        Msg::AddPurchase => {
            if panel.busy {
                return false;
            }
            let form = &panel.purchase;
            let request = match NewPurchaseRequest::from_form(
                &form.buyer,
                &form.product,
                &form.species,
                &form.volume,
                &form.amount,
            ) {
                Ok(request) => request,
                Err(e) => {
                    alert(&format!("Cannot add purchase: {}.", e));
                    return false;
                }
            };
            run(panel, ctx, api::add_purchase(request), Msg::PurchaseAdded);
            true
        }

        Msg::DeletePurchase(key) => {
            let prompt = format!(
                "Delete the purchase of {} {} by {}?",
                key.species, key.product, key.buyer
            );
            if panel.busy || !confirm(&prompt) {
                return false;
            }
            run(panel, ctx, api::delete_purchase(key), |result| Msg::Done(result, None));
            true
        }

        Msg::Done(result, added) => {
            panel.busy = false;
            match result {
                Ok(()) => {
                    if let Some(kind) = added {
                        panel.drafts.remove(&kind);
                    }
                    ctx.props().on_changed.emit(());
                }
                Err(e) => report(&e),
            }
            true
        }

        Msg::PurchaseAdded(result) => {
            panel.busy = false;
            match result {
                Ok(()) => {
                    panel.purchase = PurchaseForm::default();
                    ctx.props().on_changed.emit(());
                }
                Err(e) => report(&e),
            }
            true
        }
    }
}

/// Marks the panel busy and sends the outcome of `request` back as a message.
fn run<F>(
    panel: &mut ReferencesPanel,
    ctx: &Context<ReferencesPanel>,
    request: F,
    into_msg: impl FnOnce(Result<(), String>) -> Msg + 'static,
) where
    F: Future<Output = Result<(), String>> + 'static,
{
    panel.busy = true;
    let link = ctx.link().clone();
    spawn_local(async move {
        link.send_message(into_msg(request.await));
    });
}

fn report(message: &str) {
    console::error!(format!("reference update failed: {}", message));
    alert(message);
}
