//! External collaborators, consumed at their interface only.
//!
//! The call orchestrator owns the telephony state machine and the payment
//! engine owns authorization/capture/refund; this crate only holds trait
//! seams for them plus `reqwest` clients for the server binary.

pub mod orchestrator;
pub mod payments;

pub use orchestrator::{
    CallOrchestrator, DialResult, HttpCallOrchestrator, OrchestratorClientConfig,
    OrchestratorFailure,
};
pub use payments::{HttpPaymentGateway, PaymentClientConfig, PaymentGateway};
