//! HTTP API module for the bulletin engine.
//!
//! This module provides the REST endpoints for ingesting daily reports and
//! pay profiles, generating and approving bulletins, and computing budget
//! variance.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    ApproveRequest, DailyReportRequest, GenerateBulletinRequest, InvoiceRequest,
    PayProfileRequest, VarianceRequest,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
