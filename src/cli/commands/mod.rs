mod serve;
mod trending;

pub use serve::cmd_serve;
pub use trending::cmd_trending;
