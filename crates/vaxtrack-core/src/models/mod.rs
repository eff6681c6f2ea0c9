//! Domain models for the vaxtrack system.

mod application;
mod appointment;
mod batch;
mod client;
mod employee;
mod vaccine;

pub use application::*;
pub use appointment::*;
pub use batch::*;
pub use client::*;
pub use employee::*;
pub use vaccine::*;
