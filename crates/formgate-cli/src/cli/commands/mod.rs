pub mod build;
pub mod check;
pub mod serve;

mod dispatch;

pub use dispatch::dispatch;
