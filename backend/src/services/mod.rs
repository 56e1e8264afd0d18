//! Business logic services for the Paddy Reception Platform

pub mod reception_draft;

pub use reception_draft::{DraftView, ReceiptView, ReceptionDraftService};
