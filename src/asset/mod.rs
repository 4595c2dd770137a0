//! Build asset lookup.
//!
//! The inliner never reads the filesystem itself: it asks an
//! [`AssetResolver`] for the bytes emitted under an output path.

mod route;
mod store;

pub use route::AssetRef;
pub use store::AssetStore;

/// Read-only view of the assets emitted by a build, keyed by output path.
///
/// Keys are relative to the output root and use `/` separators
/// (`icons/logo.svg`). Shared across documents, hence `Sync`.
pub trait AssetResolver: Sync {
    fn resolve(&self, key: &str) -> Option<&[u8]>;
}

impl<R: AssetResolver + ?Sized> AssetResolver for &R {
    fn resolve(&self, key: &str) -> Option<&[u8]> {
        (**self).resolve(key)
    }
}
