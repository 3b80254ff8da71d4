// src/config/mod.rs

//! Run configuration and plan files.
//!
//! Responsibilities:
//! - Define the run settings and the TOML-backed plan model (`model.rs`).
//! - Load a plan file from disk (`loader.rs`).
//! - Validate it into runnable work items (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_plan_path, load_and_validate, load_from_path, parse_str};
pub use model::{
    BarSection, DEFAULT_MARKER, InlineSection, ItemSection, LogSection, PlanFile, RawPlanFile,
    RunConfig, ScriptSection,
};
pub use validate::{delay_from_secs, validate_bar};
