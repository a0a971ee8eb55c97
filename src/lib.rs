pub mod configuration;
pub mod document_store;
pub mod domain;
pub mod email_client;
pub mod routes;
pub mod startup;
pub mod telemetry;

extern crate tera;
