// Core graph model: hierarchy input, node building, DOT serialization, lookup.

pub mod builder;
pub mod dot;
pub mod graph;
pub mod hierarchy;
pub mod lookup;
