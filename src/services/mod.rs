pub mod recommender;
pub mod resolver;
pub mod sequence_matcher;
pub mod suggestions;
