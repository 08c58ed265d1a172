//! Multi-step form engine
//!
//! A [`Wizard`] walks a [`FormSchema`] one step at a time, validating each
//! step's fields before moving on and handing the accumulated values to the
//! schema's `finalize` on the last step.

mod engine;
mod schema;

pub use engine::{Advance, Wizard};
pub use schema::{FieldErrors, FormSchema, FormValues, Step};
