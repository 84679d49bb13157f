use clap::ArgMatches;
use restconf_client::config::LoaderConfig;
use restconf_client::loader::LoadOptions;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug)]
pub struct CliConfig {
    pub config_file: PathBuf,
    pub loader: LoaderConfig,
    pub options: LoadOptions,
    pub verbosity: u8,
    pub quiet: bool,
}

impl CliConfig {
    pub fn new(args: &ArgMatches) -> CliConfig {
        let mut loader = LoaderConfig::new(
            value_of::<String>("restconf-url", args),
            value_of::<String>("username", args),
            value_of::<String>("password", args),
        )
        .with_timeout(Duration::from_secs(*value_of::<u64>("timeout", args)))
        .with_verify_tls(!flag("skip-ssl", args));
        if let Some(log_file) = value_of_if_exists::<PathBuf>("log-file", args) {
            loader = loader.with_log_file(log_file);
        }
        if let Some(backup_dir) = value_of_if_exists::<PathBuf>("backup-dir", args) {
            loader = loader.with_backup_dir(backup_dir);
        }

        CliConfig {
            config_file: value_of::<PathBuf>("config-file", args).clone(),
            loader,
            options: LoadOptions {
                commit: !flag("no-commit", args),
                validate_only: flag("validate-only", args),
                dry_run: flag("dry-run", args),
            },
            verbosity: *value_of::<u8>("verbose", args),
            quiet: flag("quiet", args),
        }
    }
}

/// Only for arguments that are required or carry a default value.
pub(crate) fn value_of<'a, T: Clone + Send + Sync + 'static>(
    name: &str,
    args: &'a ArgMatches,
) -> &'a T {
    args.get_one::<T>(name)
        .unwrap_or_else(|| panic!("argument '{}' has no default value", name))
}

pub(crate) fn value_of_if_exists<'a, T: Clone + Send + Sync + 'static>(
    name: &str,
    args: &'a ArgMatches,
) -> Option<&'a T> {
    if args.contains_id(name) {
        args.get_one::<T>(name)
    } else {
        None
    }
}

fn flag(name: &str, args: &ArgMatches) -> bool {
    args.get_flag(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::cli;

    fn parse(argv: &[&str]) -> CliConfig {
        let args = cli()
            .try_get_matches_from(std::iter::once("restconf-loader").chain(argv.iter().copied()))
            .unwrap();
        CliConfig::new(&args)
    }

    #[test]
    fn test_defaults() {
        let cfg = parse(&["config.xml"]);
        assert_eq!(cfg.config_file, PathBuf::from("config.xml"));
        assert_eq!(cfg.loader.timeout(), Duration::from_secs(30));
        assert!(cfg.loader.verify_tls());
        assert!(cfg.options.commit);
        assert!(!cfg.options.validate_only);
        assert!(!cfg.options.dry_run);
        assert_eq!(cfg.verbosity, 0);
        assert!(!cfg.quiet);
    }

    #[test]
    fn test_overrides() {
        let cfg = parse(&[
            "--restconf-url",
            "https://router:8443/restconf/",
            "--username",
            "operator",
            "--password",
            "secret",
            "--timeout",
            "5",
            "--skip-ssl",
            "--no-commit",
            "--dry-run",
            "--log-file",
            "/var/tmp/load.log",
            "--backup-dir",
            "/var/tmp/backups",
            "-vv",
            "config.json",
        ]);
        assert_eq!(cfg.loader.base_url(), "https://router:8443/restconf");
        assert_eq!(cfg.loader.username(), "operator");
        assert_eq!(cfg.loader.password(), "secret");
        assert_eq!(cfg.loader.timeout(), Duration::from_secs(5));
        assert!(!cfg.loader.verify_tls());
        assert_eq!(cfg.loader.log_file(), PathBuf::from("/var/tmp/load.log"));
        assert_eq!(cfg.loader.backup_dir(), PathBuf::from("/var/tmp/backups"));
        assert!(!cfg.options.commit);
        assert!(cfg.options.dry_run);
        assert_eq!(cfg.verbosity, 2);
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let result = cli().try_get_matches_from(["restconf-loader", "--timeout", "0", "a.xml"]);
        assert!(result.is_err());
    }
}
