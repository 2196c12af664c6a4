//! The four decisions a wildcatting player makes.
//!
//! | role        | inputs                                  | outputs                      |
//! |-------------|-----------------------------------------|------------------------------|
//! | `surveying` | `prob`, `cost` of each 10×3 tile cell   | utility of surveying a cell  |
//! | `report`    | `prob`, `cost`, `tax`, oil price        | utility of drilling / not    |
//! | `drilling`  | `cost`, depth, expected depth           | utility of drilling / not    |
//! | `sales`     | income, tax, age                        | utility of selling / not     |
//!
//! Only `surveying` is tiled. The other roles name the site features at the head of their
//! input vector; the remaining inputs are game state the caller supplies.

use wildcat_engine::Extent;
use wildcat_evaluator::role::{RoleConfig, RoleError};

pub const SURVEYING: &str = "surveying";
pub const REPORT: &str = "report";
pub const DRILLING: &str = "drilling";
pub const SALES: &str = "sales";

pub const SURVEY_TILE: Extent = Extent::new(10, 3);

pub fn surveying() -> Result<RoleConfig, RoleError> {
    RoleConfig::tiled(SURVEYING, SURVEY_TILE, ["prob", "cost"])
}

pub fn report() -> Result<RoleConfig, RoleError> {
    RoleConfig::direct(REPORT, 4, 2, ["prob", "cost", "tax"])
}

pub fn drilling() -> Result<RoleConfig, RoleError> {
    RoleConfig::direct(DRILLING, 3, 2, ["cost"])
}

pub fn sales() -> Result<RoleConfig, RoleError> {
    RoleConfig::direct(SALES, 3, 2, Vec::<String>::new())
}

pub fn standard_roles() -> Result<Vec<RoleConfig>, RoleError> {
    Ok(vec![surveying()?, report()?, drilling()?, sales()?])
}
