pub mod generate;
pub mod keywords;
pub mod summarize;
pub mod system;
pub mod variations;
