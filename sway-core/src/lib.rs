//! Core of a 2-D tree that grows procedurally and then sways in the wind.
//!
//! Main components:
//! - [`builder`] — growth passes that produce a finished [`tree::Tree`].
//! - [`tree`] — the branch/leaf arena and its per-frame update pipeline.
//! - [`branch`] — skeletal nodes and the branches that own them.
//! - [`segment`] — the constrained segment that drives a branch's sway.
//! - [`leaf`] — leaves hanging from skeletal nodes.
//! - [`particle`] — Verlet point masses.
//! - [`wind`] — horizontally sweeping wind bands.
//! - [`math`] — rotation helpers on top of `glam::Vec2`.
//! - [`config`] — growth parameters.
//! - [`error`] — error type for building trees.
//! - [`random`] — sampling helpers over an explicit random source.
//! - [`types`] — shared ids and node references.

pub mod branch;
pub mod builder;
pub mod config;
pub mod error;
pub mod leaf;
pub mod math;
pub mod particle;
pub mod random;
pub mod segment;
pub mod tree;
pub mod types;
pub mod wind;

pub use builder::build;
pub use config::GrowthConfig;
pub use error::{TreeError, TreeResult};
pub use tree::Tree;
pub use wind::Wind;
