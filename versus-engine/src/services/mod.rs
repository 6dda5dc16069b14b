//! Stateful and I/O-facing services built on the analyzers
//!
//! - `analysis_cache`: memoized scoring with in-flight dedup and optional augmentation
//! - `commentary_client`: LLM commentary provider used by the cache
//! - `verse_comparator`: head-to-head decisions
//! - `beat_mapper`: syllable timing for speech synthesis
//! - `style_profiler`: historical style summaries

pub mod analysis_cache;
pub mod beat_mapper;
pub mod commentary_client;
pub mod style_profiler;
pub mod verse_comparator;

pub use analysis_cache::{AnalysisCache, CacheOptions, CacheStats};
pub use beat_mapper::BeatMapper;
pub use commentary_client::{CommentaryError, CommentaryProvider, OpenAiCompatClient};
pub use style_profiler::{StyleMetrics, StyleProfiler};
pub use verse_comparator::{compare_scores, VerseComparator, TIE_THRESHOLD};
