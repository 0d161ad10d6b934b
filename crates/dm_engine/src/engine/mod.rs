// crates/dm_engine/src/engine/mod.rs

//! 引擎核心：内核契约与时间步进控制

pub mod kernel;
pub mod stepper;

pub use kernel::{IdleKernel, MorphologyKernel};
pub use stepper::{StepController, StepPhase};
