//! Resource-path registry and URL resolution.
//!
//! # Design
//! A payload type declares its URL prefix by implementing `Resource`. The
//! association is recorded explicitly in a `ResourceRegistry` while the
//! client is being built, and only read afterwards. Registering `T` also
//! registers `Vec<T>`, so a collection call picks up the prefix of its
//! element type.

use std::any::TypeId;
use std::collections::HashMap;

use url::Url;

/// A payload type served under a fixed path prefix.
pub trait Resource {
    const PATH: &'static str;
}

#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    paths: HashMap<TypeId, &'static str>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: Resource + 'static>(&mut self) -> &mut Self {
        self.paths.insert(TypeId::of::<T>(), T::PATH);
        self.paths.insert(TypeId::of::<Vec<T>>(), T::PATH);
        self
    }

    pub fn path_for<T: ?Sized + 'static>(&self) -> Option<&'static str> {
        self.paths.get(&TypeId::of::<T>()).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("relative url {0:?} requires a base address")]
    MissingBase(String),

    #[error("cannot resolve {target:?}: {reason}")]
    Invalid { target: String, reason: String },
}

/// `true` when `target` is an absolute hierarchical URL (`scheme://...`).
///
/// Paths that merely contain a colon, such as `items:search` or
/// `localhost:3000/x`, are relative.
pub fn is_absolute(target: &str) -> bool {
    Url::parse(target).is_ok_and(|url| !url.cannot_be_a_base())
}

/// Prepend a resource prefix to a relative path.
///
/// The prefix is concatenated as written; absolute targets are returned
/// untouched.
pub fn prefixed_path(prefix: Option<&str>, path: &str) -> String {
    match prefix {
        Some(prefix) if !is_absolute(path) => format!("{prefix}{path}"),
        _ => path.to_string(),
    }
}

/// Normalize a base address so relative joins append to its path.
pub fn normalize_base(base: &str) -> Result<Url, ResolveError> {
    let mut url = Url::parse(base).map_err(|e| ResolveError::Invalid {
        target: base.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ResolveError::Invalid {
            target: base.to_string(),
            reason: "not a hierarchical url".to_string(),
        });
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Resolve `target` against `base`.
///
/// Absolute targets are used verbatim. Relative ones are joined onto the
/// base, so `http://h/api/` + `todos/1` is `http://h/api/todos/1`.
pub fn resolve_url(base: Option<&Url>, target: &str) -> Result<Url, ResolveError> {
    if is_absolute(target) {
        return Url::parse(target).map_err(|e| ResolveError::Invalid {
            target: target.to_string(),
            reason: e.to_string(),
        });
    }
    let base = base.ok_or_else(|| ResolveError::MissingBase(target.to_string()))?;
    // A leading colon-bearing segment would otherwise be read as a scheme.
    let relative = match target.chars().next() {
        None | Some('/' | '?' | '#') => target.to_string(),
        Some(_) => format!("./{target}"),
    };
    base.join(&relative).map_err(|e| ResolveError::Invalid {
        target: target.to_string(),
        reason: e.to_string(),
    })
}
