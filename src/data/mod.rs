pub mod history;
pub mod instruments;
