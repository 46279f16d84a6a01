use actix_web::HttpRequest;
use log::{debug, error};

use crate::server::authn::chain::ChainAuthenticator;
use crate::server::authn::token::jwt::JwtTokenValidator;
use crate::server::authn::{Authenticator, AuthnResponse};
use crate::server::response::{self, Response};
use crate::server::router::{RouteMiss, RouteTable};

use super::foo::FooHandler;
use super::Handler;

pub struct ApiHandler {
    authn: ChainAuthenticator<JwtTokenValidator>,
    routes: RouteTable,
    foo: FooHandler,
}

impl ApiHandler {
    pub fn new(
        authn: ChainAuthenticator<JwtTokenValidator>,
        routes: RouteTable,
        foo: FooHandler,
    ) -> Self {
        Self { authn, routes, foo }
    }

    fn route_miss(miss: RouteMiss) -> Response {
        match miss {
            RouteMiss::BadVersion(msg) => Response::bad_request(msg),
            RouteMiss::UnsupportedVersion(version) => {
                Response::bad_request(format!("Unsupported API version {version}"))
            }
            RouteMiss::NotFound => Response::not_found(),
            RouteMiss::MethodNotAllowed => Response::method_not_allowed(),
        }
    }
}

impl Handler for ApiHandler {
    fn handle(&self, path: &str, req: HttpRequest, body: Option<Vec<u8>>) -> Response {
        let authn_resp = match self.authn.authenticate_request(&req, None) {
            Ok(resp) => resp,
            Err(e) => {
                error!("Authentication failed: {e:#}");
                return Response::error(response::AUTHN_ERROR);
            }
        };
        let principal = match authn_resp {
            AuthnResponse::Ok(principal) => principal,
            AuthnResponse::Continue => return Response::unauthenticated("Bearer token is required"),
            AuthnResponse::Unauthenticated => return Response::unauthenticated("Invalid token"),
        };

        let resolved = match self.routes.resolve(req.method(), path) {
            Ok(resolved) => resolved,
            Err(miss) => return Self::route_miss(miss),
        };
        debug!(
            "{} {path} from '{}' resolved to {:?} (api v{})",
            req.method(),
            principal.display_name(),
            resolved.route.operation,
            resolved.version
        );

        self.foo.handle(resolved, principal, &req, body)
    }
}
