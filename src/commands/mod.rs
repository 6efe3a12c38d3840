pub mod actions;
mod meetings;
pub mod numeral;
pub mod status;
pub mod topics;
