//! Ordered first-match route table.

use fnv::FnvHashMap;
use http::Method;

use crate::{
    error::{DispatchError, PatternError, PlaceholderTypeError},
    pattern::{split_path, PathPattern},
    PathParams,
};

/// A registered route.
#[derive(Debug)]
pub struct RouteEntry<H> {
    method: Method,
    pattern: PathPattern,
    handler: H,
}

impl<H> RouteEntry<H> {
    /// Returns the HTTP method of this route.
    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the path pattern of this route.
    #[inline]
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    /// Returns the handler of this route.
    #[inline]
    pub fn handler(&self) -> &H {
        &self.handler
    }
}

/// The result of a successful [`RouteRegistry::dispatch`].
#[derive(Debug)]
pub struct Matched<'a, H> {
    /// The handler of the first matching route.
    pub handler: &'a H,
    /// The pattern of the first matching route.
    pub pattern: &'a PathPattern,
    /// The decoded placeholder values.
    pub params: PathParams,
}

/// Routes in registration order, dispatched by first match.
///
/// Routes are tried in the order they were registered and the first one
/// whose pattern matches the path structurally wins, even if converting
/// its placeholders then fails. Register literal routes before placeholder
/// routes that would capture the same segment.
///
/// # Example
///
/// ```
/// use http::Method;
/// use pathway::{DispatchError, RouteRegistry};
///
/// let mut registry = RouteRegistry::new();
/// registry.register(Method::GET, "/items/latest", "latest").unwrap();
/// registry.register(Method::GET, "/items/{id:int}", "item").unwrap();
///
/// let matched = registry.dispatch(&Method::GET, "/items/latest").unwrap();
/// assert_eq!(*matched.handler, "latest");
///
/// let matched = registry.dispatch(&Method::GET, "/items/42").unwrap();
/// assert_eq!(*matched.handler, "item");
/// assert_eq!(matched.params.get_int("id"), Some(42));
///
/// assert!(matches!(
///     registry.dispatch(&Method::GET, "/users"),
///     Err(DispatchError::RouteNotFound { .. })
/// ));
/// ```
#[derive(Debug)]
pub struct RouteRegistry<H> {
    routes: Vec<RouteEntry<H>>,
    by_method: FnvHashMap<Method, Vec<usize>>,
}

impl<H> Default for RouteRegistry<H> {
    fn default() -> Self {
        Self {
            routes: Vec::new(),
            by_method: FnvHashMap::default(),
        }
    }
}

impl<H> RouteRegistry<H> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Default::default()
    }

    /// Parse `pattern` and append a route for `method`.
    ///
    /// Duplicate routes are allowed; the one registered first always wins.
    /// If the pattern is invalid, the registry is left unchanged.
    pub fn register(
        &mut self,
        method: Method,
        pattern: &str,
        handler: H,
    ) -> Result<(), PatternError> {
        let pattern = PathPattern::parse(pattern)?;
        self.register_pattern(method, pattern, handler);
        Ok(())
    }

    /// Append a route with an already parsed pattern.
    pub fn register_pattern(&mut self, method: Method, pattern: PathPattern, handler: H) {
        tracing::debug!(method = %method, pattern = %pattern, "register route");
        let idx = self.routes.len();
        self.by_method.entry(method.clone()).or_default().push(idx);
        self.routes.push(RouteEntry {
            method,
            pattern,
            handler,
        });
    }

    /// Resolve `(method, path)` to the first matching route.
    ///
    /// `path` is the path component of the request URI, without the query
    /// string.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::RouteNotFound`] if no route of `method` matches
    ///   the path structurally.
    /// - [`DispatchError::PlaceholderType`] if the first structural match
    ///   has a placeholder whose captured text does not convert to the
    ///   declared type. Later routes are not tried.
    pub fn dispatch(&self, method: &Method, path: &str) -> Result<Matched<'_, H>, DispatchError> {
        let not_found = || DispatchError::RouteNotFound {
            method: method.clone(),
            path: path.to_string(),
        };

        let indices = self.by_method.get(method).ok_or_else(not_found)?;
        let segments = split_path(path).ok_or_else(not_found)?;

        let (route, captures) = indices
            .iter()
            .map(|idx| &self.routes[*idx])
            .find_map(|route| {
                route
                    .pattern
                    .match_segments(&segments)
                    .map(|captures| (route, captures))
            })
            .ok_or_else(not_found)?;

        let mut params = PathParams::default();
        for (placeholder, raw) in captures {
            let value = placeholder
                .ty()
                .parse(raw)
                .ok_or_else(|| PlaceholderTypeError {
                    name: placeholder.name().to_string(),
                    expected: placeholder.ty(),
                    value: raw.to_string(),
                })?;
            params.push(placeholder.name(), value);
        }

        Ok(Matched {
            handler: &route.handler,
            pattern: &route.pattern,
            params,
        })
    }

    /// Iterate over all routes in registration order.
    pub fn routes(&self) -> impl Iterator<Item = &RouteEntry<H>> {
        self.routes.iter()
    }

    /// Returns `true` if at least one route is registered for `method`.
    pub fn has_method(&self, method: &Method) -> bool {
        self.by_method.contains_key(method)
    }

    /// Returns the number of registered routes.
    #[inline]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if no route is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::{ParamType, ParamValue};

    fn registry(routes: &[(Method, &str, &'static str)]) -> RouteRegistry<&'static str> {
        let mut registry = RouteRegistry::new();
        for (method, pattern, handler) in routes {
            registry.register(method.clone(), pattern, *handler).unwrap();
        }
        registry
    }

    fn not_found(method: Method, path: &str) -> DispatchError {
        DispatchError::RouteNotFound {
            method,
            path: path.to_string(),
        }
    }

    #[test]
    fn placeholder_before_literal_intercepts() {
        let registry = registry(&[
            (Method::GET, "/items/{id:int}", "item"),
            (Method::GET, "/items/latest", "latest"),
        ]);

        let err = registry.dispatch(&Method::GET, "/items/latest").unwrap_err();
        assert_eq!(
            err,
            DispatchError::PlaceholderType(PlaceholderTypeError {
                name: "id".to_string(),
                expected: ParamType::Int,
                value: "latest".to_string(),
            })
        );
    }

    #[test]
    fn literal_before_placeholder() {
        let registry = registry(&[
            (Method::GET, "/items/latest", "latest"),
            (Method::GET, "/items/{id:int}", "item"),
        ]);

        let m = registry.dispatch(&Method::GET, "/items/latest").unwrap();
        assert_eq!(*m.handler, "latest");
        assert!(m.params.is_empty());

        let m = registry.dispatch(&Method::GET, "/items/42").unwrap();
        assert_eq!(*m.handler, "item");
        assert_eq!(m.pattern.as_str(), "/items/{id:int}");
        assert_eq!(m.params.get("id"), Some(&ParamValue::Int(42)));
    }

    #[test]
    fn earlier_registration_wins() {
        let registry = registry(&[
            (Method::GET, "/blog/{slug}", "first"),
            (Method::GET, "/blog/{name}", "second"),
            (Method::GET, "/blog/{slug}", "duplicate"),
        ]);
        assert_eq!(registry.len(), 3);

        let m = registry.dispatch(&Method::GET, "/blog/hello").unwrap();
        assert_eq!(*m.handler, "first");
        assert_eq!(m.params.get_str("slug"), Some("hello"));
    }

    #[test]
    fn type_error_does_not_fall_through() {
        let registry = registry(&[
            (Method::GET, "/blog/{id:int}", "by_id"),
            (Method::GET, "/blog/{slug}", "by_slug"),
        ]);

        assert!(matches!(
            registry.dispatch(&Method::GET, "/blog/hello"),
            Err(DispatchError::PlaceholderType(_))
        ));
        assert_eq!(
            *registry.dispatch(&Method::GET, "/blog/1").unwrap().handler,
            "by_id"
        );
    }

    #[test]
    fn no_structural_match() {
        let registry = registry(&[
            (Method::GET, "/blog/{id:int}", "show"),
            (Method::GET, "/blog/{id:int}/comments", "comments"),
        ]);

        assert_eq!(
            registry.dispatch(&Method::GET, "/blog").unwrap_err(),
            not_found(Method::GET, "/blog")
        );
        assert_eq!(
            registry
                .dispatch(&Method::GET, "/blog/1/likes")
                .unwrap_err(),
            not_found(Method::GET, "/blog/1/likes")
        );
        assert_eq!(
            registry.dispatch(&Method::GET, "blog/1").unwrap_err(),
            not_found(Method::GET, "blog/1")
        );
    }

    #[test]
    fn empty_registry() {
        let registry: RouteRegistry<()> = RouteRegistry::new();
        assert!(registry.is_empty());
        assert!(registry
            .dispatch(&Method::GET, "/")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn methods_are_isolated() {
        let registry = registry(&[
            (Method::GET, "/blog/{id:int}", "show"),
            (Method::DELETE, "/blog/{id:int}", "destroy"),
            (Method::POST, "/blog", "create"),
        ]);

        assert_eq!(
            *registry.dispatch(&Method::DELETE, "/blog/3").unwrap().handler,
            "destroy"
        );
        assert_eq!(
            registry.dispatch(&Method::GET, "/blog").unwrap_err(),
            not_found(Method::GET, "/blog")
        );
        assert_eq!(
            registry.dispatch(&Method::PUT, "/blog/3").unwrap_err(),
            not_found(Method::PUT, "/blog/3")
        );
        assert!(registry.has_method(&Method::POST));
        assert!(!registry.has_method(&Method::PATCH));
    }

    #[test]
    fn method_names_are_case_sensitive() {
        let registry = registry(&[(Method::GET, "/", "index")]);
        let lower = Method::from_bytes(b"get").unwrap();
        assert!(registry.dispatch(&lower, "/").unwrap_err().is_not_found());
    }

    #[test]
    fn literals_are_case_sensitive() {
        let registry = registry(&[(Method::GET, "/about", "about")]);
        assert!(registry
            .dispatch(&Method::GET, "/About")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn trailing_slash_is_significant() {
        let registry = registry(&[
            (Method::GET, "/blog", "list"),
            (Method::GET, "/user/", "users"),
        ]);

        assert_eq!(*registry.dispatch(&Method::GET, "/blog").unwrap().handler, "list");
        assert!(registry
            .dispatch(&Method::GET, "/blog/")
            .unwrap_err()
            .is_not_found());
        assert_eq!(*registry.dispatch(&Method::GET, "/user/").unwrap().handler, "users");
        assert!(registry
            .dispatch(&Method::GET, "/user")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn placeholder_needs_non_empty_segment() {
        let registry = registry(&[(Method::GET, "/blog/{slug}", "show")]);
        assert!(registry
            .dispatch(&Method::GET, "/blog/")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn root() {
        let registry = registry(&[(Method::GET, "/", "index")]);
        assert_eq!(*registry.dispatch(&Method::GET, "/").unwrap().handler, "index");
        assert!(registry
            .dispatch(&Method::GET, "")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn typed_captures() {
        let registry = registry(&[(
            Method::GET,
            "/t/{a:int}/{b:float}/{c:bool}/{d}",
            "typed",
        )]);

        let m = registry
            .dispatch(&Method::GET, "/t/-3/2.5/yes/hello%20world")
            .unwrap();
        let values: Vec<_> = m.params.iter().map(|(_, v)| v.clone()).collect();
        assert_eq!(
            values,
            vec![
                ParamValue::Int(-3),
                ParamValue::Float(2.5),
                ParamValue::Bool(true),
                ParamValue::Str("hello world".to_string()),
            ]
        );

        let err = registry
            .dispatch(&Method::GET, "/t/1/x/true/d")
            .unwrap_err();
        assert_eq!(
            err,
            DispatchError::PlaceholderType(PlaceholderTypeError {
                name: "b".to_string(),
                expected: ParamType::Float,
                value: "x".to_string(),
            })
        );
    }

    #[test]
    fn reports_first_failing_placeholder() {
        let registry = registry(&[(Method::GET, "/{a:int}/{b:int}", "pair")]);
        match registry.dispatch(&Method::GET, "/x/y") {
            Err(DispatchError::PlaceholderType(err)) => {
                assert_eq!(err.name, "a");
                assert_eq!(err.value, "x");
            }
            other => panic!("unexpected result: {:?}", other.map(|m| m.params)),
        }
    }

    #[test]
    fn encoded_slash_stays_in_segment() {
        let registry = registry(&[(Method::GET, "/files/{name}", "file")]);
        let m = registry.dispatch(&Method::GET, "/files/a%2Fb").unwrap();
        assert_eq!(m.params.get_str("name"), Some("a/b"));
    }

    #[test]
    fn encoded_literal_matches_either_spelling() {
        let registry = registry(&[(Method::GET, "/caf%C3%A9", "cafe")]);
        assert_eq!(
            *registry.dispatch(&Method::GET, "/caf%C3%A9").unwrap().handler,
            "cafe"
        );
        assert_eq!(*registry.dispatch(&Method::GET, "/café").unwrap().handler, "cafe");
    }

    #[test]
    fn invalid_pattern_leaves_registry_unchanged() {
        let mut registry = RouteRegistry::new();
        assert!(registry.register(Method::GET, "/x/{id:uuid}", ()).is_err());
        assert!(registry.is_empty());
        assert!(!registry.has_method(&Method::GET));
    }

    #[test]
    fn dispatch_is_idempotent() {
        let registry = registry(&[
            (Method::GET, "/items/{id:int}", "item"),
            (Method::GET, "/items/latest", "latest"),
        ]);

        for path in &["/items/7", "/items/latest", "/nothing"] {
            let first = registry
                .dispatch(&Method::GET, path)
                .map(|m| (*m.handler, m.params));
            for _ in 0..3 {
                let again = registry
                    .dispatch(&Method::GET, path)
                    .map(|m| (*m.handler, m.params));
                assert_eq!(first, again);
            }
        }
    }

    #[test]
    fn routes_in_registration_order() {
        let registry = registry(&[
            (Method::POST, "/blog", "create"),
            (Method::GET, "/blog", "list"),
            (Method::GET, "/blog/{id:int}", "show"),
        ]);
        let listed: Vec<_> = registry
            .routes()
            .map(|r| (r.method().clone(), r.pattern().as_str(), *r.handler()))
            .collect();
        assert_eq!(
            listed,
            vec![
                (Method::POST, "/blog", "create"),
                (Method::GET, "/blog", "list"),
                (Method::GET, "/blog/{id:int}", "show"),
            ]
        );
    }

    #[test]
    fn concurrent_dispatch() {
        use std::sync::Arc;

        let registry = Arc::new(registry(&[
            (Method::GET, "/items/latest", "latest"),
            (Method::GET, "/items/{id:int}", "item"),
        ]));

        let threads: Vec<_> = (0..4)
            .map(|n| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    for i in 0..100 {
                        let path = format!("/items/{}", n * 100 + i);
                        let m = registry.dispatch(&Method::GET, &path).unwrap();
                        assert_eq!(m.params.get_int("id"), Some(n * 100 + i));
                    }
                })
            })
            .collect();

        for t in threads {
            t.join().unwrap();
        }
    }
}
