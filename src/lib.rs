//! Topic and bill-action extraction for Japanese Diet meeting minutes.

pub mod extract;
pub mod model;
pub mod util;
