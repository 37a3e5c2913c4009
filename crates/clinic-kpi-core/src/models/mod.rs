//! Domain models for the clinic KPI system.

mod appointment;
mod attendance;
mod doctor;
mod facility;
mod kpi;
mod lab;
mod patient;
mod payroll;
mod state;

pub use appointment::*;
pub use attendance::*;
pub use doctor::*;
pub use facility::*;
pub use kpi::*;
pub use lab::*;
pub use patient::*;
pub use payroll::*;
pub use state::*;
