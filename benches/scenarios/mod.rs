//! Real-world scenario benchmarks.
//!
//! Single voices first, then whole pools the way a host drives them.

mod pool;
mod voices;

pub use pool::bench_pool;
pub use voices::bench_voices;
