pub mod candidate;
pub mod cutoffs;
pub mod group;
pub mod modes;
pub mod scores;
pub mod status;
pub mod verdict;
