//! A dining hall shared by students and cleaners.
//!
//! Students are admitted up to a fixed capacity; cleaners need the hall empty of
//! students. The two roles are never inside together.

mod config;
mod error;
mod guard;
mod hall;

pub use config::{HallConfig, MaintainerLimit};
pub use error::HallError;
pub use guard::{CleaningShift, StudentSeat};
pub use hall::{DiningHall, HallPhase, HallSnapshot};
