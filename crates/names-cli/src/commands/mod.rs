pub mod plan;
pub mod quiz;
pub mod reminder;
pub mod reset;
pub mod settings;
pub mod user;
