//! Vatio - Energy-aware code profiler
//!
//! This library runs a Python program to completion under a call/time
//! profiler in an isolated subprocess, aggregates the per-function
//! statistics deterministically, converts CPU time into an energy
//! estimate through a fixed linear power model, and derives a discrete
//! sustainability grade plus a session-to-session trend. A narrow
//! gateway can additionally ask a remote generative model for an
//! optimized rewrite of the program.

pub mod cli;
pub mod csv_output;
pub mod energy;
pub mod gateway;
pub mod json_output;
pub mod profiler;
pub mod report;
pub mod score;
pub mod stats;
