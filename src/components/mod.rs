pub mod ideas;
pub mod ui;
