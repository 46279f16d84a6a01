use std::sync::Arc;

use actix_web::{web, HttpRequest};
use log::{debug, error, info};
use serde::Deserialize;

use crate::server::authn::Principal;
use crate::server::authz::{Authorizer, AuthzRequest, AuthzResponse, PolicyAuthorizer};
use crate::server::db::{BarRecord, Database};
use crate::server::response::{self, Response};
use crate::server::router::{resource_path, ApiVersion, Operation, Resolved};
use crate::types::bar::Bar;

#[derive(Debug, Deserialize)]
struct BarQuery {
    #[serde(default)]
    id: i64,
}

/// Serves the `foo` resource. Every operation is checked against its route's
/// policy before the request is parsed or the database is touched.
pub struct FooHandler {
    authz: PolicyAuthorizer,
    db: Arc<Database>,
}

impl FooHandler {
    pub fn new(authz: PolicyAuthorizer, db: Arc<Database>) -> Self {
        Self { authz, db }
    }

    pub fn handle(
        &self,
        resolved: Resolved<'_>,
        principal: Principal,
        req: &HttpRequest,
        body: Option<Vec<u8>>,
    ) -> Response {
        let route = resolved.route;
        if let Err(resp) = self.authorize(route.policy, principal) {
            return resp;
        }

        match route.operation {
            Operation::GetBar => {
                let query = match web::Query::<BarQuery>::from_query(req.query_string()) {
                    Ok(query) => query.into_inner(),
                    Err(e) => {
                        debug!("Invalid bar query '{}': {e}", req.query_string());
                        return Response::bad_request("Invalid id");
                    }
                };
                self.get(query.id)
            }
            Operation::PostBar => {
                let body = match body {
                    Some(body) if !body.is_empty() => body,
                    _ => return Response::bad_request("Request body is empty"),
                };
                let bar: Bar = match serde_json::from_slice(&body) {
                    Ok(bar) => bar,
                    Err(e) => {
                        debug!("Invalid bar json: {e}");
                        return Response::bad_request("Invalid bar json");
                    }
                };
                if bar.id < 0 {
                    return Response::bad_request("Bar id must not be negative");
                }
                self.post(bar, resolved.version, route.resource)
            }
        }
    }

    fn authorize(&self, policy: &str, principal: Principal) -> Result<(), Response> {
        let name = principal.display_name().to_string();
        let req = AuthzRequest {
            policy: policy.to_string(),
            principal,
        };
        match self.authz.authorize_request(&req) {
            Ok(AuthzResponse::Ok) => Ok(()),
            Ok(AuthzResponse::Forbidden) => {
                info!("Denied request from '{name}': policy '{policy}' is not satisfied");
                Err(Response::forbidden(format!("policy '{policy}' is not satisfied")))
            }
            Err(e) => {
                error!("Authorization for '{name}' failed: {e}");
                Err(Response::error(response::AUTHZ_ERROR))
            }
        }
    }

    pub fn get(&self, id: i64) -> Response {
        let result = self.db.with_transaction(|tx| tx.find_bar(id));
        match result {
            Ok(Some(record)) => Response::json(Bar::new(record.id)),
            Ok(None) => Response::not_found(),
            Err(e) => {
                error!("Failed to find bar {id}: {e:#}");
                Response::error(response::DATABASE_ERROR)
            }
        }
    }

    pub fn post(&self, bar: Bar, version: ApiVersion, resource: &str) -> Response {
        let result = self.db.with_transaction(|tx| {
            if bar.id != 0 && tx.is_bar_exists(bar.id)? {
                return Ok(None);
            }
            let record = tx.add_bar(BarRecord { id: bar.id })?;
            Ok(Some(record))
        });

        match result {
            Ok(Some(record)) => {
                let location = format!("{}?id={}", resource_path(version, resource), record.id);
                debug!("Stored bar {}", record.id);
                Response::created(&location, Bar::new(record.id))
            }
            Ok(None) => Response::conflict(format!("bar {} already exists", bar.id)),
            Err(e) => {
                error!("Failed to add bar {}: {e:#}", bar.id);
                Response::error(response::DATABASE_ERROR)
            }
        }
    }
}
