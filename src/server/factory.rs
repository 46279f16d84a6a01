use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;
use openssl::ssl::{SslAcceptor, SslAcceptorBuilder, SslMethod};

use crate::server::authn::factory::AuthnFactory;
use crate::server::authn::token::factory::TokenFactory;
use crate::server::authn::token::TokenGenerator;
use crate::server::authz::factory::AuthzFactory;
use crate::server::db::factory::DbFactory;
use crate::server::handlers::api::ApiHandler;
use crate::server::handlers::foo::FooHandler;
use crate::server::handlers::healthz::HealthzHandler;
use crate::server::router::{Route, RouteTable};
use crate::types::claim::Claim;
use crate::types::token::TokenResponse;

use super::config::ServerConfig;
use super::db::Database;
use super::restful::{RestfulContext, RestfulServer};

pub struct ServerFactory {
    cfg: ServerConfig,
    db: Arc<Database>,
    token_factory: TokenFactory,
}

impl ServerFactory {
    pub fn new(cfg: ServerConfig) -> Result<Self> {
        let db_factory = DbFactory::new();
        let db = db_factory.build_db(&cfg.db).context("init database")?;
        let count = db
            .with_transaction(|tx| tx.count_bars())
            .context("count stored bars")?;
        info!("Database ready, {count} bar(s) stored");

        let token_factory = TokenFactory::new(&cfg.authn.token).context("init token")?;
        Ok(Self {
            cfg,
            db,
            token_factory,
        })
    }

    #[cfg(test)]
    pub fn new_test(cfg: ServerConfig) -> Self {
        let db = DbFactory::new().build_db(&cfg.db).unwrap();
        Self {
            cfg,
            db,
            token_factory: TokenFactory::new_test(),
        }
    }

    #[cfg(test)]
    pub fn db(&self) -> Arc<Database> {
        self.db.clone()
    }

    pub fn build_server(&self) -> Result<RestfulServer> {
        let ssl = self.build_ssl()?;
        let ctx = self.build_context()?;

        let mut srv =
            RestfulServer::new(self.cfg.bind.clone(), ssl, ctx, self.cfg.payload_limit_mib);
        if self.cfg.keep_alive_secs > 0 {
            srv.set_keep_alive_secs(self.cfg.keep_alive_secs);
        }
        if self.cfg.workers > 0 {
            srv.set_workers(self.cfg.workers);
        }

        Ok(srv)
    }

    pub fn build_ssl(&self) -> Result<Option<SslAcceptorBuilder>> {
        if !self.cfg.ssl {
            return Ok(None);
        }

        let mut builder =
            SslAcceptor::mozilla_intermediate(SslMethod::tls()).context("init ssl acceptor")?;

        builder
            .set_private_key_file(&self.cfg.key_path, openssl::ssl::SslFiletype::PEM)
            .context("load ssl key file")?;
        builder
            .set_certificate_chain_file(&self.cfg.cert_path)
            .context("load ssl cert file")?;

        Ok(Some(builder))
    }

    pub fn build_context(&self) -> Result<Arc<RestfulContext>> {
        let authn_factory = AuthnFactory::new();
        let authn = authn_factory
            .build_authenticator(&self.cfg.authn, &self.token_factory)
            .context("init authenticator")?;

        let authz_factory = AuthzFactory::new();
        let policies = authz_factory
            .build_policies(&self.cfg.authz)
            .context("init policies")?;

        let routes = RouteTable::new(
            Route::defaults(),
            self.cfg.api_versions.clone(),
            self.cfg.default_api_version,
            &policies,
        )
        .context("init route table")?;

        let authz = authz_factory.build_authorizer(policies);
        let foo_handler = FooHandler::new(authz, self.db.clone());

        let api_handler = ApiHandler::new(authn, routes, foo_handler);
        let healthz_handler = HealthzHandler::new(&self.cfg.api_versions);

        let ctx = RestfulContext {
            api_handler,
            healthz_handler,
        };
        Ok(Arc::new(ctx))
    }

    /// Mints a bearer token the server built from this factory will accept.
    #[cfg(test)]
    pub fn generate_token(&self, subject: String, claims: Vec<Claim>) -> Result<TokenResponse> {
        let generator = self
            .token_factory
            .build_token_generator()
            .context("init token generator")?;
        generator.generate_token(subject, claims)
    }
}

/// Mints a bearer token with the signing key configured in `cfg.authn.token`.
/// Storage is not opened.
pub fn issue_token(
    cfg: &ServerConfig,
    subject: String,
    claims: Vec<Claim>,
) -> Result<TokenResponse> {
    let token_factory = TokenFactory::new(&cfg.authn.token).context("init token")?;
    let generator = token_factory
        .build_token_generator()
        .context("init token generator")?;
    generator.generate_token(subject, claims)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::config::{CommonConfig, PathSet};
    use crate::server::authn::token::TokenValidator;
    use crate::server::authz::PolicyRule;

    use super::*;

    #[test]
    fn test_build_context() {
        let mut cfg = ServerConfig::default();
        cfg.db.sqlite.memory = true;
        let factory = ServerFactory::new_test(cfg.clone());
        assert!(factory.build_context().is_ok());

        // Routes refer to both policies, neither may go missing
        cfg.authz.policies = vec![PolicyRule::defaults().remove(0)];
        let factory = ServerFactory::new_test(cfg.clone());
        let err = factory.build_context().err().unwrap();
        assert!(format!("{err:#}").contains("PostPolicy"), "{err:#}");

        cfg.authz.policies = PolicyRule::defaults();
        cfg.api_versions = vec!["2.0".parse().unwrap()];
        let factory = ServerFactory::new_test(cfg);
        assert!(factory.build_context().is_err());
    }

    #[test]
    fn test_issue_token() {
        let ps = PathSet::new_test("issue_token");
        let mut cfg = ServerConfig::default();
        cfg.complete(&ps).unwrap();
        let db_path = cfg.db.sqlite.path.clone();

        let claims = vec![Claim::permission("Read"), Claim::permission("Write")];
        let resp = issue_token(&cfg, String::from("alice"), claims.clone()).unwrap();
        assert!(!Path::new(&db_path).exists(), "{db_path} was created");

        let validator = TokenFactory::new(&cfg.authn.token)
            .unwrap()
            .build_token_validator()
            .unwrap();
        let principal = validator.validate_token(&resp.token).unwrap();
        assert_eq!(principal.name, "alice");
        assert_eq!(principal.claims, claims);

        // An unusable database location does not matter for tokens
        let broken = ps.data_path.join("missing/dir/fooapi.db");
        cfg.db.sqlite.path = format!("{}", broken.display());
        assert!(issue_token(&cfg, String::from("bob"), vec![]).is_ok());
        assert!(!ps.data_path.join("missing").exists());
    }
}
