pub mod capturer;
pub mod controller;
pub mod model;
