use actix_web::HttpRequest;
use chrono::Local;

use crate::server::response::Response;
use crate::server::router::ApiVersion;
use crate::types::healthz::HealthzResponse;

use super::Handler;

pub struct HealthzHandler {
    api_versions: Vec<String>,
}

impl HealthzHandler {
    pub fn new(api_versions: &[ApiVersion]) -> Self {
        Self {
            api_versions: api_versions.iter().map(|v| v.to_string()).collect(),
        }
    }
}

impl Handler for HealthzHandler {
    fn handle(&self, _path: &str, req: HttpRequest, _body: Option<Vec<u8>>) -> Response {
        let local = Local::now();
        let response = HealthzResponse {
            now: local.timestamp() as u64,
            time_zone: format!("{}", local.offset()),
            client_ip: req.connection_info().peer_addr().map(|a| a.to_string()),
            version: Some(env!("FOOAPI_VERSION").to_string()),
            api_versions: self.api_versions.clone(),
        };
        Response::json(response)
    }
}
