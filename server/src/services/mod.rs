//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own business logic and persistence concerns so route
//! handlers can stay focused on protocol translation and auth plumbing.

pub mod account;
pub mod audit;
pub mod currency;
pub mod customer;
pub mod dashboard;
pub mod fee;
pub mod password;
pub mod report;
pub mod session;
pub mod statement;
pub mod transaction;
pub mod user;
pub mod validator;
