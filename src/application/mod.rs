pub mod catalog;
pub mod metadata;
pub mod queue;
pub mod session;
pub mod settings;
pub mod worker;
