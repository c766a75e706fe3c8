use web_sys::HtmlInputElement;
use yew::prelude::*;

use common::model::reference::ReferenceKind;

use super::messages::{Msg, PurchaseField};
use super::state::ReferencesPanel;
use crate::components::plans::helpers::format_quantity;

pub fn view(panel: &ReferencesPanel, ctx: &Context<ReferencesPanel>) -> Html {
    let link = ctx.link();
    html! {
        <section class="references">
            <header class="references-header" onclick={link.callback(|_| Msg::Toggle)}>
                <h2>{ "Reference lists" }</h2>
                <span>{ if panel.open { "▾" } else { "▸" } }</span>
            </header>
            {
                if panel.open {
                    html! {
                        <div class="references-body">
                            { for ReferenceKind::ALL.iter().map(|kind| build_name_list(panel, ctx, *kind)) }
                            { build_purchases(panel, ctx) }
                        </div>
                    }
                } else {
                    html! {}
                }
            }
        </section>
    }
}

fn build_name_list(panel: &ReferencesPanel, ctx: &Context<ReferencesPanel>, kind: ReferenceKind) -> Html {
    let link = ctx.link();
    let names = ctx.props().references.names(kind);
    let oninput = link.callback(move |e: InputEvent| {
        Msg::SetDraft(kind, e.target_unchecked_into::<HtmlInputElement>().value())
    });
    let onkeydown = link.batch_callback(move |e: KeyboardEvent| {
        (e.key() == "Enter").then_some(Msg::AddName(kind))
    });
    html! {
        <div class="reference-list">
            <h3>{ kind.label() }</h3>
            <ul>
                { for names.iter().map(|name| {
                    let target = name.clone();
                    let ondelete = link.callback(move |_| Msg::DeleteName(kind, target.clone()));
                    html! {
                        <li key={name.clone()}>
                            <span>{ name.clone() }</span>
                            <button class="icon-btn danger" disabled={panel.busy} onclick={ondelete}>{ "✕" }</button>
                        </li>
                    }
                }) }
            </ul>
            <div class="reference-add">
                <input
                    type="text"
                    placeholder={format!("New {}", kind.label().to_lowercase())}
                    value={panel.draft(kind).to_string()}
                    {oninput}
                    {onkeydown}
                />
                <button class="btn" disabled={panel.busy} onclick={link.callback(move |_| Msg::AddName(kind))}>
                    { "Add" }
                </button>
            </div>
        </div>
    }
}

fn build_purchases(panel: &ReferencesPanel, ctx: &Context<ReferencesPanel>) -> Html {
    let link = ctx.link();
    let references = &ctx.props().references;
    let form = &panel.purchase;

    let text = |field: PurchaseField| {
        link.callback(move |e: InputEvent| {
            Msg::SetPurchaseField(field, e.target_unchecked_into::<HtmlInputElement>().value())
        })
    };
    let pick = |field: PurchaseField| {
        link.callback(move |e: Event| {
            Msg::SetPurchaseField(field, e.target_unchecked_into::<web_sys::HtmlSelectElement>().value())
        })
    };
    let options = |names: &[String], current: &str| -> Html {
        html! {
            <>
                <option value="" selected={current.is_empty()}>{ "" }</option>
                { for names.iter().map(|name| html! {
                    <option value={name.clone()} selected={name == current}>{ name.clone() }</option>
                }) }
            </>
        }
    };

    html! {
        <div class="reference-list purchases">
            <h3>{ "Purchases" }</h3>
            <table>
                <thead>
                    <tr>
                        <th>{ "Buyer" }</th>
                        <th>{ "Product" }</th>
                        <th>{ "Species" }</th>
                        <th>{ "Volume (m³)" }</th>
                        <th>{ "Amount (UAH)" }</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    { for references.purchases.iter().map(|purchase| {
                        let key = purchase.key();
                        let ondelete = link.callback(move |_| Msg::DeletePurchase(key.clone()));
                        html! {
                            <tr>
                                <td>{ purchase.buyer.clone() }</td>
                                <td>{ purchase.product.clone() }</td>
                                <td>{ purchase.species.clone() }</td>
                                <td class="number">{ format_quantity(purchase.volume) }</td>
                                <td class="number">{ format_quantity(purchase.amount) }</td>
                                <td>
                                    <button class="icon-btn danger" disabled={panel.busy} onclick={ondelete}>{ "✕" }</button>
                                </td>
                            </tr>
                        }
                    }) }
                </tbody>
                <tfoot>
                    <tr>
                        <td>
                            <input type="text" placeholder="Buyer" value={form.buyer.clone()}
                                oninput={text(PurchaseField::Buyer)} />
                        </td>
                        <td>
                            <select onchange={pick(PurchaseField::Product)}>
                                { options(&references.products, &form.product) }
                            </select>
                        </td>
                        <td>
                            <select onchange={pick(PurchaseField::Species)}>
                                { options(&references.species, &form.species) }
                            </select>
                        </td>
                        <td>
                            <input type="number" min="0" step="any" value={form.volume.clone()}
                                oninput={text(PurchaseField::Volume)} />
                        </td>
                        <td>
                            <input type="number" min="0" step="any" value={form.amount.clone()}
                                oninput={text(PurchaseField::Amount)} />
                        </td>
                        <td>
                            <button class="btn" disabled={panel.busy} onclick={link.callback(|_| Msg::AddPurchase)}>
                                { "Add" }
                            </button>
                        </td>
                    </tr>
                </tfoot>
            </table>
        </div>
    }
}
