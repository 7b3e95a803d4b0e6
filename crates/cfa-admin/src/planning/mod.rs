//! Training sessions and their generated calendars.

pub mod calendar;
pub mod domain;
pub mod router;
pub mod service;

pub use calendar::{generate_calendar, session_days, set_day_flags, WeekdaySet};
pub use domain::{DayFlags, DayId, SessionDraft, SessionId, TrainingDay, TrainingSession};
pub use router::planning_router;
pub use service::PlanningService;
