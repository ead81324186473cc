// Access policy: which routes require an authenticated principal
// Decision: Keyed by (method, matched route template), not by raw request path
// Decision: Anything not listed requires authentication

use axum::http::Method;

/// Access requirement for one route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No credential needed
    Public,
    /// A valid, active credential is required
    Authenticated,
}

/// One entry of the policy table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyRule {
    pub method: Method,
    /// Route template as registered with the router (e.g. `/api/snippets/:id`)
    pub path: String,
    pub access: Access,
}

/// Explicit, inspectable table of route access requirements
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    rules: Vec<PolicyRule>,
}

impl AccessPolicy {
    /// Empty table: every route requires authentication
    pub fn new() -> Self {
        Self::default()
    }

    /// Policy for the Snippet Manager API: reads are public, writes are not
    pub fn snippet_manager() -> Self {
        Self::new()
            .public(Method::GET, "/")
            .public(Method::GET, "/health")
            .public(Method::GET, "/api/snippets")
            .public(Method::GET, "/api/snippets/:id")
            .public(Method::GET, "/api/languages")
            .public(Method::GET, "/api/tags")
            .authenticated(Method::POST, "/api/snippets")
            .authenticated(Method::PUT, "/api/snippets/:id")
            .authenticated(Method::DELETE, "/api/snippets/:id")
    }

    pub fn public(self, method: Method, path: &str) -> Self {
        self.with_rule(method, path, Access::Public)
    }

    pub fn authenticated(self, method: Method, path: &str) -> Self {
        self.with_rule(method, path, Access::Authenticated)
    }

    /// Add or replace the rule for (method, path)
    pub fn with_rule(mut self, method: Method, path: &str, access: Access) -> Self {
        self.rules
            .retain(|rule| !(rule.method == method && rule.path == path));
        self.rules.push(PolicyRule {
            method,
            path: path.to_string(),
            access,
        });
        self
    }

    /// Look up the requirement for a request. HEAD follows GET.
    pub fn access_for(&self, method: &Method, path: &str) -> Access {
        let method = if method == Method::HEAD {
            &Method::GET
        } else {
            method
        };

        self.rules
            .iter()
            .find(|rule| rule.method == *method && rule.path == path)
            .map(|rule| rule.access)
            .unwrap_or(Access::Authenticated)
    }

    pub fn rules(&self) -> &[PolicyRule] {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_are_public() {
        let policy = AccessPolicy::snippet_manager();
        assert_eq!(policy.access_for(&Method::GET, "/"), Access::Public);
        assert_eq!(policy.access_for(&Method::GET, "/health"), Access::Public);
        assert_eq!(
            policy.access_for(&Method::GET, "/api/snippets"),
            Access::Public
        );
        assert_eq!(
            policy.access_for(&Method::GET, "/api/snippets/:id"),
            Access::Public
        );
        assert_eq!(
            policy.access_for(&Method::GET, "/api/languages"),
            Access::Public
        );
        assert_eq!(policy.access_for(&Method::GET, "/api/tags"), Access::Public);
    }

    #[test]
    fn test_writes_require_authentication() {
        let policy = AccessPolicy::snippet_manager();
        assert_eq!(
            policy.access_for(&Method::POST, "/api/snippets"),
            Access::Authenticated
        );
        assert_eq!(
            policy.access_for(&Method::PUT, "/api/snippets/:id"),
            Access::Authenticated
        );
        assert_eq!(
            policy.access_for(&Method::DELETE, "/api/snippets/:id"),
            Access::Authenticated
        );
    }

    #[test]
    fn test_unlisted_routes_fail_closed() {
        let policy = AccessPolicy::snippet_manager();
        assert_eq!(
            policy.access_for(&Method::GET, "/api/admin"),
            Access::Authenticated
        );
        assert_eq!(
            policy.access_for(&Method::PATCH, "/api/snippets/:id"),
            Access::Authenticated
        );
        assert_eq!(
            AccessPolicy::new().access_for(&Method::GET, "/"),
            Access::Authenticated
        );
    }

    #[test]
    fn test_head_follows_get() {
        let policy = AccessPolicy::snippet_manager();
        assert_eq!(policy.access_for(&Method::HEAD, "/health"), Access::Public);
    }

    #[test]
    fn test_rules_are_replaced_not_duplicated() {
        let policy = AccessPolicy::new()
            .public(Method::GET, "/x")
            .authenticated(Method::GET, "/x");
        assert_eq!(policy.rules().len(), 1);
        assert_eq!(policy.access_for(&Method::GET, "/x"), Access::Authenticated);
    }
}
