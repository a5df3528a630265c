pub mod embeddings;
pub mod factors;
pub mod handlers;
pub mod scorer;

pub use scorer::{LexicalMatchScorer, MatchReport, MatchScorer, MatchWeights, SemanticMatchScorer};
