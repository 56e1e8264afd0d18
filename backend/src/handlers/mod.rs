//! HTTP handlers for the Paddy Reception Platform

pub mod discount_percent;
pub mod draft;
pub mod health;
pub mod producer;
pub mod reception;
pub mod template;

pub use discount_percent::*;
pub use draft::*;
pub use health::*;
pub use producer::*;
pub use reception::*;
pub use template::*;
