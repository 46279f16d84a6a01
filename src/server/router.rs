use std::fmt;
use std::str::FromStr;

use actix_web::http::Method;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::authz::{PolicySet, GET_POLICY, POST_POLICY};

pub const API_PATH: &str = "/api";

pub const FOO_RESOURCE: &str = "foo";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GetBar,
    PostBar,
}

/// A `major.minor` API version. Parsed from `1`, `1.0`, `v1` or `v1.0`;
/// a missing minor means `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApiVersion {
    pub major: u32,
    pub minor: u32,
}

impl ApiVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self::new(1, 0)
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for ApiVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix('v').unwrap_or(s);
        let (major, minor) = match raw.split_once('.') {
            Some((major, minor)) => (major, Some(minor)),
            None => (raw, None),
        };

        let parse = |part: &str| -> Result<u32, String> {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(format!("invalid api version '{s}'"));
            }
            part.parse::<u32>()
                .map_err(|_| format!("invalid api version '{s}'"))
        };

        let major = parse(major)?;
        let minor = match minor {
            Some(minor) => parse(minor)?,
            None => 0,
        };
        Ok(Self { major, minor })
    }
}

impl TryFrom<String> for ApiVersion {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ApiVersion> for String {
    fn from(version: ApiVersion) -> Self {
        version.to_string()
    }
}

#[derive(Debug, Clone)]
pub struct Route {
    pub method: Method,
    pub resource: &'static str,
    pub operation: Operation,
    /// Policy the caller must satisfy before the operation runs.
    pub policy: &'static str,
}

impl Route {
    pub fn defaults() -> Vec<Route> {
        vec![
            Route {
                method: Method::GET,
                resource: FOO_RESOURCE,
                operation: Operation::GetBar,
                policy: GET_POLICY,
            },
            Route {
                method: Method::POST,
                resource: FOO_RESOURCE,
                operation: Operation::PostBar,
                policy: POST_POLICY,
            },
        ]
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("route {method} {resource} requires unknown policy '{policy}'")]
    UnknownPolicy {
        method: Method,
        resource: String,
        policy: String,
    },

    #[error("route {method} {resource} is defined more than once")]
    DuplicateRoute { method: Method, resource: String },

    #[error("at least one api version is required")]
    NoVersions,

    #[error("default api version {0} is not in the supported versions")]
    DefaultVersionUnsupported(ApiVersion),
}

/// Why a request path did not resolve to a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteMiss {
    BadVersion(String),
    UnsupportedVersion(ApiVersion),
    NotFound,
    MethodNotAllowed,
}

#[derive(Debug)]
pub struct Resolved<'a> {
    pub route: &'a Route,
    pub version: ApiVersion,
}

/// Maps `(method, resource, version)` to an operation and its policy.
/// Immutable once built.
pub struct RouteTable {
    routes: Vec<Route>,
    versions: Vec<ApiVersion>,
    default_version: ApiVersion,
}

impl RouteTable {
    pub fn new(
        routes: Vec<Route>,
        versions: Vec<ApiVersion>,
        default_version: ApiVersion,
        policies: &PolicySet,
    ) -> Result<Self, RouteError> {
        if versions.is_empty() {
            return Err(RouteError::NoVersions);
        }
        if !versions.contains(&default_version) {
            return Err(RouteError::DefaultVersionUnsupported(default_version));
        }

        for (idx, route) in routes.iter().enumerate() {
            if !policies.contains(route.policy) {
                return Err(RouteError::UnknownPolicy {
                    method: route.method.clone(),
                    resource: route.resource.to_string(),
                    policy: route.policy.to_string(),
                });
            }

            let duplicated = routes[..idx]
                .iter()
                .any(|r| r.method == route.method && r.resource == route.resource);
            if duplicated {
                return Err(RouteError::DuplicateRoute {
                    method: route.method.clone(),
                    resource: route.resource.to_string(),
                });
            }
        }

        Ok(Self {
            routes,
            versions,
            default_version,
        })
    }

    /// Resolves a path relative to [`API_PATH`], either `{resource}` or
    /// `v{version}/{resource}`.
    pub fn resolve(&self, method: &Method, path: &str) -> Result<Resolved<'_>, RouteMiss> {
        let path = path.trim_matches('/');
        let parts: Vec<&str> = path.split('/').collect();

        let (version, resource) = match parts.as_slice() {
            [resource] => (self.default_version, *resource),
            [version, resource] if version.starts_with('v') => {
                let version: ApiVersion = version.parse().map_err(RouteMiss::BadVersion)?;
                (version, *resource)
            }
            _ => return Err(RouteMiss::NotFound),
        };

        if !self.versions.contains(&version) {
            return Err(RouteMiss::UnsupportedVersion(version));
        }

        let mut found = false;
        for route in self.routes.iter() {
            if route.resource != resource {
                continue;
            }
            found = true;
            if &route.method == method {
                return Ok(Resolved { route, version });
            }
        }

        if found {
            Err(RouteMiss::MethodNotAllowed)
        } else {
            Err(RouteMiss::NotFound)
        }
    }
}

/// Canonical path of a resource under a given api version.
pub fn resource_path(version: ApiVersion, resource: &str) -> String {
    format!("{API_PATH}/v{version}/{resource}")
}
