pub mod count;
pub mod descendants;
pub mod doctor;
pub mod output;
pub mod search;
pub mod stats;
