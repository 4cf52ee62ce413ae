mod common;
mod engine;
mod intake;
