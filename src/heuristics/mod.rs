pub mod greedy;
pub mod local_search;
pub mod utils;
