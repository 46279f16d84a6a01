use actix_web::HttpRequest;

use super::response::Response;

pub mod api;
pub mod foo;
pub mod healthz;

pub trait Handler {
    fn handle(&self, path: &str, req: HttpRequest, body: Option<Vec<u8>>) -> Response;
}
