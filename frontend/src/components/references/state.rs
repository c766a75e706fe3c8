use std::collections::HashMap;

use common::model::reference::ReferenceKind;

use super::messages::PurchaseField;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PurchaseForm {
    pub buyer: String,
    pub product: String,
    pub species: String,
    pub volume: String,
    pub amount: String,
}

impl PurchaseForm {
    pub fn field_mut(&mut self, field: PurchaseField) -> &mut String {
        match field {
            PurchaseField::Buyer => &mut self.buyer,
            PurchaseField::Product => &mut self.product,
            PurchaseField::Species => &mut self.species,
            PurchaseField::Volume => &mut self.volume,
            PurchaseField::Amount => &mut self.amount,
        }
    }
}

/// Reference list editor shown above the plan tables.
pub struct ReferencesPanel {
    pub open: bool,
    /// New-name input per list.
    pub drafts: HashMap<ReferenceKind, String>,
    pub purchase: PurchaseForm,
    /// A write is outstanding; buttons are disabled until it settles.
    pub busy: bool,
}

impl ReferencesPanel {
    pub fn new() -> Self {
        Self {
            open: false,
            drafts: HashMap::new(),
            purchase: PurchaseForm::default(),
            busy: false,
        }
    }

    pub fn draft(&self, kind: ReferenceKind) -> &str {
        self.drafts.get(&kind).map(String::as_str).unwrap_or("")
    }
}
