pub use self::{filler::*, oil_prices::*, theme::*};

pub mod filler;
pub mod oil_prices;
pub mod theme;
