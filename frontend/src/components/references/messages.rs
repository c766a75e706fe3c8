use common::model::purchase::PurchaseKey;
use common::model::reference::ReferenceKind;

/// One text box of the purchase form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PurchaseField {
    Buyer,
    Product,
    Species,
    Volume,
    Amount,
}

pub enum Msg {
    Toggle,
    SetDraft(ReferenceKind, String),
    AddName(ReferenceKind),
    DeleteName(ReferenceKind, String),
    SetPurchaseField(PurchaseField, String),
    AddPurchase,
    DeletePurchase(PurchaseKey),
    /// Outcome of a name write; the kind names the draft to clear on success.
    Done(Result<(), String>, Option<ReferenceKind>),
    PurchaseAdded(Result<(), String>),
}
