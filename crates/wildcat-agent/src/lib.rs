//! A wildcatting player built from the decision core.
//!
//! An [`Agent`] owns one [`Role`](wildcat_evaluator::role::Role) per decision (see
//! [`roles`]), each backed by a
//! [`FeedForwardNet`](wildcat_training::network::FeedForwardNet) persisted under the agent
//! directory (see [`storage`]).
//!
//! ```text
//! Agent::init(dir)  → fresh scorers, saved
//! Agent::load(dir)  → saved scorers
//!     ↓
//! choose / decide   → decision, remembered by the role
//! reward            → temporal-difference update of that decision
//! train             → supervised pre-fit from <role>/training/
//!     ↓
//! Agent::save()
//! ```

pub use self::{agent::Agent, error::AgentError};

mod agent;
mod error;
pub mod roles;
pub mod storage;
