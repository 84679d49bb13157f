use crate::config::LoaderConfig;
use crate::document::{self, ConfigDocument, ConfigFormat};
use crate::error::RestconfResult;
use crate::message::{Datastore, RpcOperation};
use crate::outcome::{is_reachable, is_rpc_success, UploadOutcome};
use crate::runlog::{unix_timestamp, RunLog};
use crate::transport::http::HttpTransport;
use crate::transport::{Request, Response, Transport};
use crate::YANG_DATA_XML;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Liveness probe timeout, independent of the configured request timeout.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);
pub const PREVIEW_LINES: usize = 20;
const BODY_LIMIT: usize = 200;
const YANG_LIBRARY: &str = "yang-library:yang-library";
const DATA: &str = "data";

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub commit: bool,
    pub validate_only: bool,
    pub dry_run: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            commit: true,
            validate_only: false,
            dry_run: false,
        }
    }
}

pub struct ConfigLoader {
    config: LoaderConfig,
    transport: Box<dyn Transport>,
    log: RunLog,
}

impl ConfigLoader {
    pub fn new(config: LoaderConfig) -> RestconfResult<ConfigLoader> {
        let transport = HttpTransport::new(&config)?;
        ConfigLoader::with_transport(config, transport)
    }

    pub fn with_transport<T>(config: LoaderConfig, transport: T) -> RestconfResult<ConfigLoader>
    where
        T: Transport + 'static,
    {
        fs::create_dir_all(config.backup_dir())?;
        let log = RunLog::open(config.log_file())?;
        Ok(ConfigLoader {
            config,
            transport: Box::new(transport),
            log,
        })
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn run_log(&self) -> &RunLog {
        &self.log
    }

    pub fn run_log_mut(&mut self) -> &mut RunLog {
        &mut self.log
    }

    pub fn check_connectivity(&mut self) -> bool {
        self.log.info("Checking RESTCONF connectivity...");
        let request = Request::get(YANG_LIBRARY).with_timeout(PROBE_TIMEOUT);
        match self.transport.send(&request) {
            Ok(response) if is_reachable(response.status) => {
                self.log.ok(format!(
                    "RESTCONF is reachable (HTTP {})",
                    response.status
                ));
                true
            }
            Ok(response) => {
                self.log.error(format!(
                    "RESTCONF unreachable (HTTP {})",
                    response.status
                ));
                false
            }
            Err(err) => {
                self.log.error(format!("Connection failed: {}", err));
                false
            }
        }
    }

    pub fn validate_xml_structure(&mut self, path: &Path) -> bool {
        self.log.info("Validating XML structure...");
        match document::validate_xml_structure(path) {
            Ok(()) => {
                self.log.ok("XML structure is valid");
                true
            }
            Err(err) => {
                self.log.error(format!("XML validation failed: {}", err));
                false
            }
        }
    }

    /// Saves the current datastore contents before anything is changed. Never fatal.
    pub fn backup_running_config(&mut self) -> Option<PathBuf> {
        self.log.info("Backing up current running configuration...");
        let request = Request::get(DATA).with_accept(YANG_DATA_XML);
        let response = match self.transport.send(&request) {
            Ok(response) => response,
            Err(err) => {
                self.log.warn(format!("Backup failed: {}", err));
                return None;
            }
        };
        if response.status != 200 {
            self.log.warn(format!(
                "Could not backup current config (HTTP {})",
                response.status
            ));
            return None;
        }

        let backup_file = self
            .config
            .backup_dir()
            .join(format!("running_config_{}.xml", unix_timestamp()));
        match fs::write(&backup_file, response.body.as_bytes()) {
            Ok(()) => {
                self.log.ok(format!("Backup saved to: {}", backup_file.display()));
                Some(backup_file)
            }
            Err(err) => {
                self.log.warn(format!(
                    "Backup failed, could not write '{}': {}",
                    backup_file.display(),
                    err
                ));
                None
            }
        }
    }

    pub fn upload_config(&mut self, document: &ConfigDocument) -> RestconfResult<UploadOutcome> {
        self.log.info("Loading configuration via RESTCONF...");
        let content_type = document.format().content_type();
        let body = match document.read() {
            Ok(body) => body,
            Err(err) => {
                self.log.error(format!("Failed to load config: {}", err));
                return Err(err);
            }
        };
        self.log.info(format!(
            "Sending config to {}/{} ({} bytes)",
            self.config.base_url(),
            DATA,
            body.len()
        ));

        let request = Request::put(DATA, body, content_type).with_accept(content_type);
        let response = match self.transport.send(&request) {
            Ok(response) => response,
            Err(err) => {
                self.log.error(format!("Failed to load config: {}", err));
                return Err(err);
            }
        };
        self.log.info(format!("HTTP Response Code: {}", response.status));

        let outcome = UploadOutcome::from_status(response.status);
        match outcome {
            UploadOutcome::Success => {
                self.log.ok("Configuration loaded successfully");
            }
            UploadOutcome::ValidationError => {
                self.log.error("Bad request (400) - Check structure");
                self.log_response_body(&response);
            }
            UploadOutcome::AuthError(status) => {
                self.log.error(format!("Authentication failed (HTTP {})", status));
                self.log_response_body(&response);
            }
            UploadOutcome::ConflictError(status) => {
                self.log.error(format!("Validation error (HTTP {})", status));
                self.log_response_body(&response);
            }
            UploadOutcome::UnexpectedError(status) => {
                self.log.error(format!("Unexpected HTTP response: {}", status));
                self.log_response_body(&response);
            }
        }
        Ok(outcome)
    }

    /// Asks the datastore to validate the candidate. Always reports success since not
    /// every server implements the validate operation.
    pub fn remote_validate(&mut self) -> bool {
        self.log.info("Validating candidate configuration...");
        match self.rpc(RpcOperation::validate(Datastore::Candidate)) {
            Ok(response) if is_rpc_success(response.status) => {
                self.log.ok("Configuration validation passed");
            }
            Ok(response) => {
                self.log.warn(format!("Validation response: {}", response.status));
            }
            Err(err) => {
                self.log.warn(format!("Validation failed: {}", err));
            }
        }
        true
    }

    pub fn commit(&mut self) -> bool {
        self.log.info("Committing configuration...");
        match self.rpc(RpcOperation::Commit) {
            Ok(response) if is_rpc_success(response.status) => {
                self.log.ok("Configuration committed successfully");
                true
            }
            Ok(response) => {
                self.log.error(format!("Commit failed (HTTP {})", response.status));
                self.log_response_body(&response);
                false
            }
            Err(err) => {
                self.log.error(format!("Commit failed: {}", err));
                false
            }
        }
    }

    /// Best effort, failures are only warned about.
    pub fn discard_changes(&mut self) -> bool {
        self.log.warn("Discarding candidate configuration...");
        match self.rpc(RpcOperation::DiscardChanges) {
            Ok(response) if is_rpc_success(response.status) => {
                self.log.ok("Changes discarded");
                true
            }
            Ok(response) => {
                self.log.warn(format!(
                    "Could not discard changes (HTTP {})",
                    response.status
                ));
                false
            }
            Err(err) => {
                self.log.warn(format!("Discard failed: {}", err));
                false
            }
        }
    }

    /// Runs the whole workflow and reports overall success. Details end up in the run log.
    pub fn load<P: AsRef<Path>>(&mut self, path: P, options: &LoadOptions) -> bool {
        let path = path.as_ref();
        self.log.info("=== RESTCONF Config Loader Started ===");
        self.log.info(format!("Config file: {}", path.display()));
        self.log.info(format!("RESTCONF URL: {}", self.config.base_url()));
        self.log.info(format!("Commit after load: {}", options.commit));
        self.log.info(format!("Validate only: {}", options.validate_only));
        self.log.info(format!("Dry run: {}", options.dry_run));
        self.log.info(format!(
            "Log file: {}",
            self.config.log_file().display()
        ));
        self.log.blank_line();

        if !self.check_connectivity() {
            self.log.error("Cannot proceed - RESTCONF not available");
            return false;
        }

        let document = match ConfigDocument::open(path) {
            Ok(document) => document,
            Err(err) => {
                self.log.error(err.to_string());
                return false;
            }
        };
        self.log.info(format!("Detected format: {}", document.format()));

        if document.format() == ConfigFormat::Xml && !self.validate_xml_structure(path) {
            return false;
        }

        if let Err(err) = self.log_statistics(&document) {
            self.log.error(format!("Cannot read config file: {}", err));
            return false;
        }

        let backup_file = self.backup_running_config();

        if options.dry_run {
            return self.preview(&document);
        }

        let uploaded = matches!(self.upload_config(&document), Ok(outcome) if outcome.is_success());
        if !uploaded {
            self.log.error("Failed to load configuration");
            self.log_backup_location(&backup_file);
            return false;
        }

        if options.validate_only {
            self.log.info("Validate-only mode: skipping commit");
            self.remote_validate();
            self.discard_changes();
            return true;
        }

        if options.commit {
            self.remote_validate();
            if !self.commit() {
                self.log.error("Configuration commit failed");
                self.discard_changes();
                self.log_backup_location(&backup_file);
                return false;
            }
            self.log.ok("Configuration successfully applied and committed");
        } else {
            self.log.warn("Config loaded but not committed (--no-commit flag used)");
            self.log.info(format!(
                "To commit manually, POST to {}/{}",
                self.config.base_url(),
                RpcOperation::Commit.path()
            ));
            self.log.info("  or from the device CLI: commit, then end");
        }

        self.log.blank_line();
        self.log.ok("=== Config Loading Complete ===");
        self.log.info(format!(
            "Log file: {}",
            self.config.log_file().display()
        ));
        if let Some(backup_file) = &backup_file {
            self.log.info(format!("Backup: {}", backup_file.display()));
        }
        true
    }

    fn rpc(&mut self, operation: RpcOperation) -> RestconfResult<Response> {
        debug!("RPC {}:\n{}", operation.name(), operation);
        let request = Request::post(
            &operation.path(),
            operation.to_string().into_bytes(),
            YANG_DATA_XML,
        );
        self.transport.send(&request)
    }

    fn log_statistics(&mut self, document: &ConfigDocument) -> RestconfResult<()> {
        let lines = document.line_count()?;
        let size = document.size()?;
        self.log.info("Configuration Statistics:");
        self.log.info(format!("  Total lines: {}", lines));
        self.log.info(format!("  File size: {:.1} KB", size as f64 / 1024.0));
        Ok(())
    }

    fn preview(&mut self, document: &ConfigDocument) -> bool {
        self.log.warn("DRY RUN MODE - Not sending to RESTCONF");
        match document.preview(PREVIEW_LINES) {
            Ok(lines) => {
                self.log.info("Config that would be sent:");
                for line in lines {
                    self.log.info(format!("  {}", line));
                }
                true
            }
            Err(err) => {
                self.log.error(format!("Cannot read config file: {}", err));
                false
            }
        }
    }

    fn log_response_body(&mut self, response: &Response) {
        self.log.error(format!(
            "Response: {}",
            response.truncated_body(BODY_LIMIT)
        ));
    }

    fn log_backup_location(&mut self, backup_file: &Option<PathBuf>) {
        if let Some(backup_file) = backup_file {
            self.log.info(format!("Backup available at: {}", backup_file.display()));
        }
    }
}
