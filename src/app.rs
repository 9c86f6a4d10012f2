//! Command execution for gocu
//!
//! This module owns the variable store and HTTP client for one invocation,
//! and runs either the request command or one of the `vars` subcommands.

use std::collections::BTreeMap;
use std::io::{self, Write};

use thiserror::Error;

use crate::cache::{StoreError, VariableStore};
use crate::cli::{parse_header, Cli, Command, RequestArgs, VarsCommand, DEFAULT_HEADERS};
use crate::http::{HttpClient, Method, RequestError, RequestInfo};
use crate::resolver::{self, ResolveError};

/// Errors surfaced to the top-level entry point
#[derive(Debug, Error)]
pub enum AppError {
    /// Variable store failure (missing variable, duplicate, filesystem)
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Placeholder resolution failure
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Request construction or transport failure
    #[error(transparent)]
    Request(#[from] RequestError),

    /// No URL was given for the request command
    #[error("A URL is required")]
    MissingUrl,

    /// Writing output failed
    #[error("Couldn't write output: {0}")]
    Output(#[from] io::Error),
}

/// Main application struct for a single invocation
pub struct App {
    /// Persistent variables
    store: VariableStore,
    /// HTTP client for the request command
    client: HttpClient,
}

impl App {
    /// Creates an App from its parts
    pub fn new(store: VariableStore, client: HttpClient) -> Self {
        Self { store, client }
    }

    /// Creates an App using the cache file chosen on the command line, or the
    /// default location when none was given
    pub fn from_cli(cli: &Cli) -> Self {
        let store = match &cli.cache_file {
            Some(path) => VariableStore::with_path(path),
            None => VariableStore::open_default(),
        };
        Self::new(store, HttpClient::new())
    }

    /// Runs the parsed command, writing user-facing output to `out`
    pub async fn run<W: Write>(&mut self, cli: &Cli, out: &mut W) -> Result<(), AppError> {
        match &cli.command {
            Some(Command::Vars(command)) => self.run_vars(command, out),
            None => self.send_request(&cli.request, out).await,
        }
    }

    /// Runs a `vars` subcommand
    pub fn run_vars<W: Write>(
        &mut self,
        command: &VarsCommand,
        out: &mut W,
    ) -> Result<(), AppError> {
        match command {
            VarsCommand::Ls => {
                let vars: BTreeMap<String, String> = self.store.list()?.into_iter().collect();
                if vars.is_empty() {
                    writeln!(out, "No variables saved")?;
                }
                for (name, value) in vars {
                    writeln!(out, "{}={}", name, value)?;
                }
            }
            VarsCommand::Get { name } => {
                let value = self.store.get(name)?;
                writeln!(out, "{}", value)?;
            }
            VarsCommand::Add { name, value } => self.store.add(name, value)?,
            VarsCommand::Mod { name, value } => self.store.modify(name, value)?,
            VarsCommand::Rm { name } => self.store.remove(name)?,
            VarsCommand::Clear => self.store.remove_all()?,
        }
        Ok(())
    }

    /// Builds the request from CLI arguments, substituting placeholders in
    /// the URL, the body and every header value
    pub fn build_request(&mut self, args: &RequestArgs) -> Result<RequestInfo, AppError> {
        let url = args.url.as_deref().ok_or(AppError::MissingUrl)?;
        let method: Method = args.method.parse()?;

        let url = resolver::resolve(url, &mut self.store)?;
        let data = resolver::resolve(&args.data, &mut self.store)?;

        let mut headers: BTreeMap<String, String> = DEFAULT_HEADERS
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        for flag in &args.headers {
            let (name, value) = parse_header(flag);
            let value = resolver::resolve(value, &mut self.store)?;
            // Header names are case-insensitive, so a flag replaces any default
            headers.retain(|existing, _| !existing.eq_ignore_ascii_case(name));
            headers.insert(name.to_string(), value);
        }

        Ok(RequestInfo {
            method,
            url,
            data,
            headers,
        })
    }

    /// Prints the request, sends it and prints the response
    async fn send_request<W: Write>(
        &mut self,
        args: &RequestArgs,
        out: &mut W,
    ) -> Result<(), AppError> {
        let request = self.build_request(args)?;
        writeln!(out, "{}", request)?;
        out.flush()?;

        let response = self.client.send(&request).await?;

        writeln!(out)?;
        writeln!(out, "{}", response)?;
        Ok(())
    }
}
