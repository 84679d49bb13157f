use clap::{
    arg, crate_authors, crate_description, crate_version, value_parser, Arg, ArgAction, Command,
    ValueHint,
};
use restconf_client::config::{DEFAULT_PASSWORD, DEFAULT_RESTCONF_URL, DEFAULT_USERNAME};
use std::path::PathBuf;

pub fn cli() -> Command {
    Command::new("restconf-loader")
        .author(crate_authors!("\n"))
        .about(crate_description!())
        .version(crate_version!())
        .long_version(crate_version!())
        .arg_required_else_help(true)
        .bin_name("restconf-loader")
        .display_name("restconf-loader")
        .help_template(color_print::cstr!(
            "\
{about-with-newline}
<green,bold>Author:</> {author}

<green,bold>Usage:</> {usage}

<green,bold>Arguments:</>
{positionals}

<green,bold>Options:</>
{options}

By default the configuration is uploaded to the candidate datastore, validated and committed.
Use <cyan,bold>--no-commit</> to stage it only, <cyan,bold>--validate-only</> to discard it after upload,
or <cyan,bold>--dry-run</> to preview it without touching the datastore.\n",
        ))
        .args([
            Arg::new("config-file")
                .help("Configuration file (XML or JSON)")
                .required(true)
                .value_hint(ValueHint::FilePath)
                .value_parser(value_parser!(PathBuf)),
            opt("restconf-url", "RESTCONF base URL")
                .default_value(DEFAULT_RESTCONF_URL)
                .value_hint(ValueHint::Url)
                .env("RESTCONF_URL"),
            opt("username", "RESTCONF username")
                .default_value(DEFAULT_USERNAME)
                .env("RESTCONF_USERNAME"),
            opt("password", "RESTCONF password")
                .default_value(DEFAULT_PASSWORD)
                .env("RESTCONF_PASSWORD")
                .hide_env(true)
                .hide_default_value(true),
            flag("no-commit", "Load config but don't commit"),
            flag(
                "validate-only",
                "Upload and validate, then discard the candidate without committing",
            ),
            flag("dry-run", "Dry run - don't send to RESTCONF"),
            opt("log-file", "Log file path")
                .value_hint(ValueHint::FilePath)
                .value_parser(value_parser!(PathBuf)),
            opt("backup-dir", "Directory for running configuration backups")
                .value_hint(ValueHint::DirPath)
                .value_parser(value_parser!(PathBuf))
                .env("RESTCONF_BACKUP_DIR"),
            opt("timeout", "RESTCONF request timeout in seconds")
                .default_value("30")
                .value_parser(value_parser!(u64).range(1..)),
            flag("skip-ssl", "Skip SSL verification (for HTTPS)"),
            arg!(-v --verbose ... "Use verbose output (-vv to log request and response bodies, -vvv to trace the HTTP stack)"),
            arg!(-q --quiet "Disable diagnostic logging, the run log is still written"),
        ])
}

fn opt(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).help(help).long(name)
}

fn flag(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .help(help)
        .long(name)
        .action(ArgAction::SetTrue)
}

#[test]
fn verify_cli() {
    cli().debug_assert();
}
