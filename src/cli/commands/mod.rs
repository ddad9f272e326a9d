//! Command implementations for the precog CLI

pub mod config;
pub mod install;
pub mod run;
pub mod uninstall;
