//! HTTP API for the day-summary engine.
//!
//! `POST /day-summary` summarizes one employee-day; `POST /period-summary`
//! summarizes a list of days and returns their totals.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{DaySummaryRequest, PeriodSummaryRequest, PunchEventRequest, ResolvedPunches};
pub use response::{ApiError, ApiErrorResponse, PeriodSummaryResponse};
pub use state::AppState;
