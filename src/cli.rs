//! Command line surface.
//!
//! Most flags fall back to `ONTOD_*` environment variables; resolution
//! happens through the helpers below so defaults stay testable.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "ontod", version, about = "Index and serve OWL/RDF ontologies", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the ontology-serving daemon.
    Server(ServerArgs),
    /// Index ontologies into a database file, then exit.
    Index(IndexArgs),
}

#[derive(Args, Debug)]
pub struct ServerArgs {
    /// Path(s) to input file(s) or directories(s) to index or watch
    pub input: Vec<PathBuf>,

    /// Database file to index into (default: './ontod.index' when no
    /// paths are given, in-memory otherwise)
    #[arg(short = 'd', long)]
    pub database: Option<String>,

    /// Re-index the files and folders every time they change
    #[arg(short = 'w', long)]
    pub watch: bool,

    /// Host to listen on
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short = 'p', long)]
    pub port: Option<u16>,

    /// Public domain to assume for IRI redirects
    #[arg(short = 'D', long)]
    pub public_domain: Option<String>,

    /// Route to serve ontologies from. Must start with a slash
    #[arg(short = 'r', long)]
    pub ontology_route: Option<String>,

    /// Skip adding routes blocking dangerous paths
    #[arg(long)]
    pub insecure_skip_routes: bool,

    /// Preferred language(s) for literals on the documentation pages
    #[arg(short = 'L', long = "language")]
    pub languages: Vec<String>,

    /// Set logging level
    #[arg(short = 'l', long, default_value = "info")]
    pub log: String,
}

#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Path(s) to input file(s) or directories(s) to read
    #[arg(required = true)]
    pub input: Vec<PathBuf>,

    /// Database file to index into
    #[arg(short = 'd', long, default_value = "./ontod.index")]
    pub database: String,

    /// Remove all old indexed entities first
    #[arg(short = 'c', long)]
    pub clean: bool,

    /// Set logging level
    #[arg(short = 'l', long, default_value = "info")]
    pub log: String,
}

/// The given values, or the `;`-separated environment fallback.
pub fn list_or_environment(values: Vec<PathBuf>, env: &str) -> Vec<PathBuf> {
    if !values.is_empty() {
        return values;
    }
    match std::env::var(env) {
        Ok(joined) if !joined.is_empty() => joined.split(';').map(PathBuf::from).collect(),
        _ => Vec::new(),
    }
}

/// The given value, or the environment fallback, or the default.
pub fn value_or_environment(value: Option<String>, env: &str, default: &str) -> String {
    value
        .or_else(|| std::env::var(env).ok().filter(|v| !v.is_empty()))
        .unwrap_or_else(|| default.to_string())
}

/// Contents of the file named by an environment variable, if set.
pub fn file_from_environment(env: &str) -> anyhow::Result<Option<String>> {
    let Ok(path) = std::env::var(env) else {
        return Ok(None);
    };
    let content = std::fs::read_to_string(&path)
        .map_err(|err| anyhow::anyhow!("cannot read {env}={path}: {err}"))?;
    Ok(Some(content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_server_flags() {
        let cli = Cli::parse_from([
            "ontod", "server", "ontologies/", "-d", "test.db", "--watch", "-H", "0.0.0.0", "-p",
            "9090", "-r", "/onto",
        ]);
        let Command::Server(args) = cli.command else {
            panic!("expected the server subcommand");
        };
        assert_eq!(args.input, vec![PathBuf::from("ontologies/")]);
        assert_eq!(args.database.as_deref(), Some("test.db"));
        assert!(args.watch);
        assert_eq!(args.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(args.port, Some(9090));
        assert_eq!(args.ontology_route.as_deref(), Some("/onto"));
    }

    #[test]
    fn cli_parses_index_subcommand() {
        let cli = Cli::parse_from(["ontod", "index", "a.ttl", "b.ttl", "--clean"]);
        let Command::Index(args) = cli.command else {
            panic!("expected the index subcommand");
        };
        assert_eq!(args.input.len(), 2);
        assert!(args.clean);
        assert_eq!(args.database, "./ontod.index");
    }

    #[test]
    fn index_requires_input() {
        assert!(Cli::try_parse_from(["ontod", "index"]).is_err());
    }

    #[test]
    fn list_or_environment_prefers_values() {
        let values = vec![PathBuf::from("x")];
        assert_eq!(
            list_or_environment(values.clone(), "ONTOD_TEST_UNSET"),
            values
        );
        assert!(list_or_environment(Vec::new(), "ONTOD_TEST_UNSET").is_empty());
    }

    #[test]
    fn value_or_environment_falls_back_to_default() {
        assert_eq!(
            value_or_environment(None, "ONTOD_TEST_UNSET", "fallback"),
            "fallback"
        );
        assert_eq!(
            value_or_environment(Some("given".into()), "ONTOD_TEST_UNSET", "fallback"),
            "given"
        );
    }
}
