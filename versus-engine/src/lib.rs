//! versus-engine - Verse Analysis & Flow Modeling Engine
//!
//! Scores rap verses for rhyme, flow and creativity, compares two verses
//! head to head, lays verses onto a beat grid for speech synthesis, and
//! summarizes a competitor's historical style.
//!
//! Analyzers in [`analysis`] are pure and synchronous. The only shared
//! mutable state is the [`services::AnalysisCache`], which is constructed
//! explicitly and injected into [`VerseEngine`].

pub mod analysis;
pub mod engine;
pub mod services;
pub mod types;

pub use crate::engine::VerseEngine;
pub use crate::types::{
    AnalysisMode, BeatContext, ComparisonResult, CompositeScore, FlowModel, HistoricalVerse,
    StyleLabel, StyleProfile, Verse, Winner,
};
pub use versus_common::{Error, Result};
