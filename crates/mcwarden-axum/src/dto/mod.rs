//! Data Transfer Objects (DTOs) for the HTTP API contract.
//!
//! Request bodies tolerate missing fields so that a bad passcode is
//! reported as 401 and a bad player name as 400, never as an extractor
//! rejection.

pub mod requests;
pub mod responses;

pub use requests::{BanRequest, CommandRequest, PasscodeQuery, PasscodeRequest, PlayerRequest};
pub use responses::{ActionResponse, BansResponse, OpsResponse, StatusResponse};
