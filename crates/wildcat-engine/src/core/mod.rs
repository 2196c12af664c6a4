pub use self::{geometry::*, oil_field::*, site::*};

pub mod geometry;
pub mod oil_field;
pub mod site;
