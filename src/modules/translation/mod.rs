pub mod controller;
pub mod model;
pub mod schema;
pub mod session;
pub mod view;
