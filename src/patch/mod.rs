pub mod engine;
pub mod locator;
pub mod markers;
