//! Command-line interface parsing for gocu
//!
//! This module handles parsing of CLI arguments using clap: the request form
//! (`gocu [-X METHOD] [-d DATA] [-H HEADER]... <URL>`) and the `vars`
//! subcommands that manage stored variables.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Header sent with every request unless overridden with `-H`
pub const DEFAULT_HEADERS: [(&str, &str); 1] = [("Content-Type", "application/json")];

/// gocu - curl reimagined
#[derive(Parser, Debug)]
#[command(name = "gocu")]
#[command(about = "curl reimagined")]
#[command(
    long_about = "Gocu is a curl copycat, a CLI http client focused on simplicity and ease of use.\n\n\
                  The URL, body and header values may contain {{name}} placeholders, which are \
                  replaced with variables saved through `gocu vars add`."
)]
#[command(version)]
#[command(subcommand_negates_reqs = true)]
pub struct Cli {
    #[command(flatten)]
    pub request: RequestArgs,

    /// Path of the variables cache file (defaults to gocu.cache in the user cache directory)
    #[arg(long, value_name = "PATH", env = "GOCU_CACHE_FILE", global = true)]
    pub cache_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Arguments describing the request to send
#[derive(Args, Debug, Clone, Default)]
pub struct RequestArgs {
    /// URL to send the request to
    #[arg(required = true)]
    pub url: Option<String>,

    /// HTTP method to use
    #[arg(short = 'X', long = "request", value_name = "METHOD", default_value = "GET")]
    pub method: String,

    /// Data to send in the body of the request
    #[arg(short, long, value_name = "DATA", default_value = "")]
    pub data: String,

    /// Header to add to the request, as "Name: value" (repeatable)
    #[arg(short = 'H', long = "header", value_name = "HEADER")]
    pub headers: Vec<String>,
}

/// Top-level subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Manage the variables used as placeholders
    #[command(subcommand)]
    Vars(VarsCommand),
}

/// Variable management subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum VarsCommand {
    /// Lists all saved variables
    #[command(visible_alias = "list")]
    Ls,
    /// Gets a variable value
    Get { name: String },
    /// Adds a new variable
    Add { name: String, value: String },
    /// Modifies a variable value
    #[command(visible_alias = "modify")]
    Mod { name: String, value: String },
    /// Removes a variable
    #[command(visible_alias = "remove")]
    Rm { name: String },
    /// Removes all saved variables
    Clear,
}

/// Splits a `-H` flag into header name and value.
///
/// The split happens at the first `:`, so values may themselves contain
/// colons (URLs, timestamps). A flag without any `:` becomes a header with an
/// empty value.
pub fn parse_header(flag: &str) -> (&str, &str) {
    match flag.split_once(':') {
        Some((name, value)) => (name.trim(), value.trim()),
        None => (flag.trim(), ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header_basic() {
        assert_eq!(parse_header("Accept: text/plain"), ("Accept", "text/plain"));
    }

    #[test]
    fn test_parse_header_value_with_colons() {
        assert_eq!(
            parse_header("Referer: https://example.com:8080/a"),
            ("Referer", "https://example.com:8080/a")
        );
    }

    #[test]
    fn test_parse_header_without_colon() {
        assert_eq!(parse_header("X-Empty"), ("X-Empty", ""));
    }

    #[test]
    fn test_cli_parse_url_only() {
        let cli = Cli::parse_from(["gocu", "https://api.test"]);
        assert_eq!(cli.request.url.as_deref(), Some("https://api.test"));
        assert_eq!(cli.request.method, "GET");
        assert_eq!(cli.request.data, "");
        assert!(cli.request.headers.is_empty());
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_request_flags() {
        let cli = Cli::parse_from([
            "gocu",
            "-X",
            "post",
            "-d",
            r#"{"a":1}"#,
            "-H",
            "Accept: */*",
            "-H",
            "Authorization: Bearer {{token}}",
            "https://api.test/{{path}}",
        ]);
        assert_eq!(cli.request.method, "post");
        assert_eq!(cli.request.data, r#"{"a":1}"#);
        assert_eq!(
            cli.request.headers,
            vec!["Accept: */*", "Authorization: Bearer {{token}}"]
        );
        assert_eq!(cli.request.url.as_deref(), Some("https://api.test/{{path}}"));
    }

    #[test]
    fn test_cli_requires_url_without_subcommand() {
        assert!(Cli::try_parse_from(["gocu"]).is_err());
    }

    #[test]
    fn test_cli_parse_vars_subcommands() {
        let cases: [(&[&str], VarsCommand); 6] = [
            (&["gocu", "vars", "ls"], VarsCommand::Ls),
            (
                &["gocu", "vars", "get", "host"],
                VarsCommand::Get {
                    name: "host".to_string(),
                },
            ),
            (
                &["gocu", "vars", "add", "host", "example.com"],
                VarsCommand::Add {
                    name: "host".to_string(),
                    value: "example.com".to_string(),
                },
            ),
            (
                &["gocu", "vars", "modify", "host", "other.com"],
                VarsCommand::Mod {
                    name: "host".to_string(),
                    value: "other.com".to_string(),
                },
            ),
            (
                &["gocu", "vars", "rm", "host"],
                VarsCommand::Rm {
                    name: "host".to_string(),
                },
            ),
            (&["gocu", "vars", "clear"], VarsCommand::Clear),
        ];

        for (args, expected) in cases {
            let cli = Cli::parse_from(args);
            assert_eq!(cli.command, Some(Command::Vars(expected)), "args: {:?}", args);
        }
    }

    #[test]
    fn test_cli_vars_requires_subcommand() {
        assert!(Cli::try_parse_from(["gocu", "vars"]).is_err());
    }

    #[test]
    fn test_cli_vars_add_requires_value() {
        assert!(Cli::try_parse_from(["gocu", "vars", "add", "host"]).is_err());
    }

    #[test]
    fn test_cli_cache_file_after_subcommand() {
        let cli = Cli::parse_from(["gocu", "vars", "ls", "--cache-file", "/tmp/x.cache"]);
        assert_eq!(cli.cache_file, Some(PathBuf::from("/tmp/x.cache")));
    }
}
