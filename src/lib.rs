#[allow(non_snake_case)]
pub mod RTplanner;
#[allow(non_snake_case)]
pub mod Utils;
pub mod cli;
pub mod settings;
