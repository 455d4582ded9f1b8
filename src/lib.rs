//! Intersection Signal Control Library
//!
//! A four-approach signalised intersection simulated in discrete time, exposed
//! as a control environment for green-split policies.

pub mod render;
pub mod simulation;
pub mod stats;
