//! Chart descriptor builder and report assembler.
//!
//! Turns a [`Dataset`](dental_model::Dataset) into a target-independent
//! [`Report`](dental_model::Report): ordered sections holding metric
//! summaries, chart descriptors, and selector controls.

pub mod assembler;
pub mod catalog;
pub mod recipe;

pub use assembler::{affected_sections, assemble_report, rebuild_section, section_bindings};
pub use catalog::all_recipes;
pub use recipe::ChartRecipe;
