//! Decision core for choosing sites in a large oil field with a small fixed-size scorer.
//!
//! The scorer only ever sees one *tile* of cells (10×3 for surveying), yet fields are much
//! larger. This crate bridges the gap with three layers:
//!
//! 1. **Features** ([`site_feature`]) - Scalar measurements of a single site, optionally
//!    normalized against the theme's ranges ([`normalize`]).
//!
//! 2. **Regions** ([`region`]) - Rectangular feature snapshots of the field. A region can be
//!    reduced with overlapping windows so a large area fits in one tile at a coarser scale.
//!
//! 3. **Search and learning** - [`zoom_search`] picks a site by scoring a reduced view of the
//!    whole field and recursively narrowing in on the chosen cell; [`reward`] nudges the
//!    scorer toward the observed outcome of its last decision.
//!
//! # Architecture
//!
//! ```text
//! Role (config + scorer + decision memory)
//!     ↓ choose
//! ZoomSearch (field → region → reduce → score → recenter → ...)
//!     ↓ uses
//! Region / OverlapWindows (feature grid at some scale)
//!     ↓ uses
//! SiteFeature (one site → one value)
//! ```
//!
//! A [`role::Role`] owns its scorer and remembers the inputs, outputs and chosen index of
//! its last decision, which is what [`reward::RewardUpdate`] consumes.
//!
//! # Scorers
//!
//! The core only depends on the [`scorer::Scorer`] trait (evaluate, gradient, apply
//! gradient). The concrete feed-forward network lives in `wildcat-training`.
//!
//! # Current Limitations
//!
//! - **Single-threaded**: Roles own their scorer exclusively; nothing here is shared.
//! - **Greedy commitment**: A search never revisits a coarse level, so a misleading reduced
//!   view cannot be corrected further down.

pub mod normalize;
pub mod region;
pub mod reward;
pub mod role;
pub mod scorer;
pub mod selection;
pub mod site_feature;
pub mod zoom_search;
