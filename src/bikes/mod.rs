pub mod bikes;
pub mod search;
