use std::sync::Arc;
use std::time::Duration;

use actix_web::error::PayloadError;
use actix_web::http::StatusCode;
use actix_web::web::{self, Bytes, Data, PayloadConfig};
use actix_web::{App, HttpRequest, HttpResponse, HttpServer};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use openssl::ssl::SslAcceptorBuilder;
use sd_notify::NotifyState;

use crate::types::response::CommonResponse;

use super::handlers::api::ApiHandler;
use super::handlers::healthz::HealthzHandler;
use super::handlers::Handler;
use super::response::Response;
use super::router::API_PATH;

pub struct RestfulServer {
    ssl: Option<SslAcceptorBuilder>,
    ctx: Arc<RestfulContext>,

    keep_alive_secs: Option<u64>,
    workers: Option<u64>,

    bind: String,

    payload_limit_mib: usize,
}

pub struct RestfulContext {
    pub api_handler: ApiHandler,
    pub healthz_handler: HealthzHandler,
}

impl RestfulServer {
    const HEALTHZ_PATH: &str = "/healthz";

    pub fn new(
        bind: String,
        ssl: Option<SslAcceptorBuilder>,
        ctx: Arc<RestfulContext>,
        payload_limit_mib: usize,
    ) -> Self {
        Self {
            ssl,
            ctx,
            keep_alive_secs: None,
            workers: None,
            bind,
            payload_limit_mib,
        }
    }

    pub fn set_keep_alive_secs(&mut self, keep_alive_secs: u64) {
        self.keep_alive_secs = Some(keep_alive_secs);
    }

    pub fn set_workers(&mut self, workers: u64) {
        self.workers = Some(workers);
    }

    pub async fn run(mut self) -> Result<()> {
        let ctx = self.ctx.clone();
        let payload_limit = self.payload_limit_mib * 1024 * 1024;
        let mut srv = HttpServer::new(move || {
            App::new()
                .app_data(Data::new(ctx.clone()))
                .app_data(PayloadConfig::new(payload_limit))
                .configure(Self::routes)
                .default_service(web::route().to(Self::default_handler))
        });

        if let Some(ssl) = self.ssl.take() {
            info!("Binding to https://{}", self.bind);
            srv = srv.bind_openssl(&self.bind, ssl).context("bind with ssl")?
        } else {
            warn!("Using HTTP (without SSL). THIS IS DANGEROUS, DO NOT USE IN PRODUCTION");
            info!("Binding to http://{}", self.bind);
            srv = srv.bind(&self.bind).context("bind without ssl")?
        };

        if let Some(keep_alive) = self.keep_alive_secs {
            srv = srv.keep_alive(Duration::from_secs(keep_alive));
        }
        if let Some(workers) = self.workers {
            srv = srv.workers(workers as usize);
        }

        sd_notify::notify(true, &[NotifyState::Ready]).context("notify systemd")?;
        info!("Starting restful server");
        srv.run().await.context("run server")?;

        info!("Server stopped by user");
        Ok(())
    }

    /// Every method is routed to the api handler so that unsupported ones
    /// get 405 rather than falling through to the 404 default service.
    fn routes(cfg: &mut web::ServiceConfig) {
        cfg.service(web::scope(API_PATH).route("/{path:.*}", web::route().to(Self::handle_api)))
            .service(web::resource(Self::HEALTHZ_PATH).route(web::get().to(Self::handle_healthz)));
    }

    async fn handle_api(
        req: HttpRequest,
        body: Result<Bytes, actix_web::Error>,
        ctx: Data<Arc<RestfulContext>>,
    ) -> HttpResponse {
        let path = match Self::parse_path(API_PATH, &req) {
            Some(path) => path,
            None => return Response::bad_request("Resource is required").into(),
        };
        // Body limit is enforced ahead of authentication
        let body = match body {
            Ok(body) => Some(body.to_vec()),
            Err(e) if Self::is_overflow(&e) => {
                debug!("Refused {} {}: {e}", req.method(), req.path());
                return Response::payload_too_large().into();
            }
            Err(e) => {
                debug!("Dropped unreadable body for {} {}: {e}", req.method(), req.path());
                None
            }
        };

        ctx.api_handler.handle(&path, req, body).into()
    }

    async fn handle_healthz(
        req: HttpRequest,
        body: Option<Bytes>,
        ctx: Data<Arc<RestfulContext>>,
    ) -> HttpResponse {
        let body = Self::parse_body(body);

        ctx.healthz_handler.handle("", req, body).into()
    }

    async fn default_handler(req: HttpRequest) -> HttpResponse {
        let path = req.uri().path().to_string();
        let method = req.method().as_str().to_string();
        let message = format!("No route to {method} {path}");
        let ret = CommonResponse {
            code: StatusCode::NOT_FOUND.into(),
            message: Some(message),
        };
        HttpResponse::NotFound().json(ret)
    }

    fn parse_path(route: &str, req: &HttpRequest) -> Option<String> {
        let path = req.uri().path().to_string();
        let path = path.strip_prefix(route)?;
        let path = path.trim_matches('/');
        if path.is_empty() {
            return None;
        }

        Some(String::from(path))
    }

    fn parse_body(body: Option<Bytes>) -> Option<Vec<u8>> {
        body.map(|b| b.to_vec())
    }

    fn is_overflow(err: &actix_web::Error) -> bool {
        matches!(err.as_error::<PayloadError>(), Some(PayloadError::Overflow))
    }
}
