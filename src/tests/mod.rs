pub mod common;
mod concurrency;
