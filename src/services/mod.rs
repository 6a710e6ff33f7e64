pub mod ai;
pub mod conversation;
pub mod interpreter;
pub mod recommender;
