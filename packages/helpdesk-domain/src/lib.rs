pub mod analysis;
pub mod keywords;
pub mod relevance;
pub mod similarity;
pub mod source;
pub mod tally;
