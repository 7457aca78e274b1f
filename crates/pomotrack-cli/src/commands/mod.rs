pub mod config;
pub mod run;

mod input;
mod output;
