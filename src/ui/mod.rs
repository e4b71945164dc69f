pub mod downloads;
pub mod episodes;
pub mod queue;
pub mod search;
pub mod settings;
