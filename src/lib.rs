// Main library entry point: call hierarchy to Graphviz DOT.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ports;
