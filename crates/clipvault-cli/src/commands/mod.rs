pub mod interactive;
pub mod labels;
pub mod search;
