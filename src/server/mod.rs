mod authn;
mod authz;
mod db;
mod handlers;
mod response;
mod router;

pub mod config;
pub mod factory;
pub mod restful;
