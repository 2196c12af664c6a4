//! Scoring backend and offline training for the wildcatting decision core.
//!
//! The decision core in `wildcat-evaluator` only knows the
//! [`Scorer`](wildcat_evaluator::scorer::Scorer) trait. This crate provides the concrete
//! scorer and everything needed to fit it before play starts.
//!
//! # Modules
//!
//! - [`network`] - [`FeedForwardNet`](network::FeedForwardNet), a tanh feed-forward network
//!   with backpropagated gradients, serializable with serde
//! - [`weights`] - Parameter vector helpers (initialization, descent, error)
//! - [`corpus`] - Reads training rows written by the `field` command
//! - [`supervised`] - Stochastic gradient descent over a corpus
//!
//! # Training Process
//!
//! ```text
//! field command (generated fields → region rows)
//!     ↓ written to
//! <role>/training/*.dat
//!     ↓ read by
//! Corpus
//!     ↓ fitted by
//! Trainer (SGD, per-sample gradient steps)
//!     ↓ updates
//! FeedForwardNet
//! ```
//!
//! Once play starts, the same network keeps learning online through
//! [`RewardUpdate`](wildcat_evaluator::reward::RewardUpdate).
//!
//! # Current Limitations
//!
//! - **Fixed topology**: One hidden layer sized from the input and output counts.
//! - **Plain SGD**: No momentum, batching or adaptive learning rates.

pub mod corpus;
pub mod network;
pub mod supervised;
pub mod weights;
