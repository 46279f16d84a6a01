pub mod bar;
pub mod claim;
pub mod healthz;
pub mod response;
pub mod token;
