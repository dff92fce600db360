//! Route registration and lookup.
//!
//! # Responsibilities
//! - Store `(pattern, handler)` pairs in registration order
//! - Resolve a concrete path to exactly one handler, or none
//!
//! # Design Decisions
//! - Static patterns live in a HashMap for O(1) exact lookup
//! - Dynamic patterns are scanned in registration order (first match wins)
//! - Re-registering a pattern replaces its handler but keeps its position
//! - Explicit `None` rather than a silent default

use std::collections::HashMap;

use crate::link::Params;
use crate::routing::pattern::RoutePattern;

/// A resolved route.
#[derive(Debug)]
pub struct RouteMatch<'a, H> {
    /// The pattern that accepted the path.
    pub pattern: &'a RoutePattern,
    /// The handler bound to that pattern.
    pub handler: &'a H,
}

impl<H> RouteMatch<'_, H> {
    /// Named segment values of `path` under the matched pattern.
    pub fn path_params(&self, path: &str) -> Params {
        self.pattern.extract_params(path)
    }
}

/// Ordered pattern → handler table.
#[derive(Debug, Clone)]
pub struct RouteRegistry<H> {
    routes: Vec<(RoutePattern, H)>,
    exact: HashMap<String, usize>,
}

impl<H> Default for RouteRegistry<H> {
    fn default() -> Self {
        Self {
            routes: Vec::new(),
            exact: HashMap::new(),
        }
    }
}

impl<H> RouteRegistry<H> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a handler to a pattern.
    pub fn register(&mut self, pattern: &str, handler: H) -> &mut Self {
        if let Some(slot) = self.routes.iter_mut().find(|(p, _)| p.as_str() == pattern) {
            tracing::debug!(pattern = %pattern, "Replacing handler for existing route");
            slot.1 = handler;
            return self;
        }

        let compiled = RoutePattern::new(pattern);
        if !compiled.is_dynamic() {
            self.exact.insert(pattern.to_string(), self.routes.len());
        }
        self.routes.push((compiled, handler));
        self
    }

    /// Resolve a path to its handler.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch<'_, H>> {
        if let Some(&index) = self.exact.get(path) {
            let (pattern, handler) = &self.routes[index];
            return Some(RouteMatch { pattern, handler });
        }

        self.routes
            .iter()
            .filter(|(pattern, _)| pattern.is_dynamic())
            .find(|(pattern, _)| pattern.matches(path))
            .map(|(pattern, handler)| RouteMatch { pattern, handler })
    }

    /// Registered routes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&RoutePattern, &H)> {
        self.routes.iter().map(|(p, h)| (p, h))
    }

    /// Number of registered patterns.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// True if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
