//! Domain models for the Paddy Reception Platform

mod cluster;
mod discount;
mod producer;
mod reception;
mod template;

pub use cluster::*;
pub use discount::*;
pub use producer::*;
pub use reception::*;
pub use template::*;
