//! Shared types for the sales board server and its clients.

mod models;

// Explicit re-exports (avoids rust-analyzer issues with `pub use models::*`)
pub use models::{
    ReportSaleRequest, ReportSaleResponse, ServiceStatus, TokenRequest, TokenResponse,
    TOKEN_TYPE_BEARER,
};
