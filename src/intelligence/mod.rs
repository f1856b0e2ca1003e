/// Intelligence module
///
/// Pattern mining and the scoring behind search relevance.

pub mod analyzer;
pub mod pattern_detector;
pub mod scorer;

pub use analyzer::{AnalysisReport, Analyzer};
pub use pattern_detector::{analyze_patterns, PatternDetector};
pub use scorer::{Scorer, SubScores};
