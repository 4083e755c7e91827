// src/extractor/mod.rs

pub mod batch;
pub mod rules;
pub mod structure;
pub mod units;

pub use batch::ExtractionOrchestrator;
pub use units::UnitExtractor;
