//! SVG optimization.
//!
//! The inliner hands raw svg bytes plus the merged [`OptimizeConfig`] to an
//! [`SvgOptimizer`] and splices whatever markup comes back.
//!
//! - [`optimize`]: the default optimizer, backed by usvg
//! - `bounds`: stroke-inclusive viewBox expansion

mod bounds;
mod optimize;

pub use optimize::{UsvgOptimizer, UsvgOptions};

use crate::config::OptimizeConfig;

/// Turns raw svg into optimized svg markup.
///
/// Option keys are defined by the implementation; the inliner passes the
/// merged configuration through untouched.
pub trait SvgOptimizer: Sync {
    fn optimize(&self, svg: &[u8], config: &OptimizeConfig) -> anyhow::Result<String>;
}
