// HTTP routes and handlers

pub mod admin;
pub mod auth;
pub mod health;
pub mod plans;
pub mod routes;
pub mod subscriptions;
pub mod support;
pub mod trainer;
