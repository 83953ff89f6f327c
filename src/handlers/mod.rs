// handlers/mod.rs - Route handlers grouped by the authentication they require

pub mod elevated;
pub mod protected;
pub mod public;
