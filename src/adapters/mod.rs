//! External-system adapters
//!
//! Everything that talks to the outside world lives here: the notification
//! source, the OCR and model collaborators, and the calendar API. Each
//! adapter sits behind a trait so the core pipeline stays testable.

pub mod calendar;
pub mod extract;
pub mod pushsource;
pub mod transform;
