// Runtime configuration, database bootstrap and seed data

pub mod app;
pub mod database;
pub mod seeding;

pub use app::*;
pub use database::*;
pub use seeding::*;
