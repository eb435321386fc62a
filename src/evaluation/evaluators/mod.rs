//! Built-in evaluation strategies

pub mod app_prototype;

pub use app_prototype::AppPrototypeEvaluator;
