//! Request middleware

pub mod auth;

pub use auth::{
    auth_middleware, decode_session_token, extract_token, gate, AuthPolicy, GateDecision,
    Operator, SessionClaims,
};
