pub mod purchase;
pub mod reference;
pub mod row;
pub mod table;

pub(crate) mod lenient;
