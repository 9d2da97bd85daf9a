mod common;
mod engine;
mod registry;
