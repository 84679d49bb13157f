//! # restconf-client
//!
//! ```toml
//! restconf-client = "^0.1.0"
//! ```
//!
//! Pushes a configuration document into a RESTCONF datastore, following the
//! candidate / validate / commit lifecycle and discarding the candidate on failure.
//!
//! ## Example
//!
//! ```rust,no_run
//! use restconf_client::config::LoaderConfig;
//! use restconf_client::loader::{ConfigLoader, LoadOptions};
//!
//! let config = LoaderConfig::new("http://localhost:8080/restconf", "admin", "admin");
//! let mut loader = ConfigLoader::new(config).unwrap();
//! let ok = loader.load("config.xml", &LoadOptions::default());
//! std::process::exit(if ok { 0 } else { 1 });
//! ```
//!
pub mod config;
pub mod document;
pub mod error;
pub mod loader;
pub mod message;
pub mod outcome;
pub mod runlog;
pub mod transport;

pub const NETCONF_URN: &str = "urn:ietf:params:xml:ns:netconf:base:1.0";
pub const YANG_DATA_XML: &str = "application/yang-data+xml";
pub const YANG_DATA_JSON: &str = "application/yang-data+json";
