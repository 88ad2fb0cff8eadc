pub mod history;
pub mod weather;
