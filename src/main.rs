use anyhow::Context;
use clap::Parser;
use rusqlite::Connection;
use tracing_subscriber::EnvFilter;

use ontod::cli::{
    Cli, Command, IndexArgs, ServerArgs, file_from_environment, list_or_environment,
    value_or_environment,
};
use ontod::index::{IngestOptions, Ingester};
use ontod::server::ServerConfig;

fn setup_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Server(args) => {
            setup_logging(&args.log);
            let config = server_config(args)?;
            ontod::server::run(config).await
        }
        Command::Index(args) => {
            setup_logging(&args.log);
            run_index(args)
        }
    }
}

fn server_config(args: ServerArgs) -> anyhow::Result<ServerConfig> {
    let paths = list_or_environment(args.input, "ONTOD_PATHS");

    let database = match args.database {
        Some(database) => Some(database),
        None if paths.is_empty() => Some(value_or_environment(None, "ONTOD_DB", "./ontod.index")),
        None => None,
    };

    let port = match args.port {
        Some(port) => port,
        None => value_or_environment(None, "ONTOD_PORT", "8080")
            .parse()
            .context("parsing ONTOD_PORT")?,
    };

    Ok(ServerConfig {
        database,
        paths,
        host: value_or_environment(args.host, "ONTOD_HOST", "localhost"),
        port,
        public_domain: args.public_domain,
        ontology_route: value_or_environment(args.ontology_route, "ONTOD_ROUTE", "/"),
        insecure_skip_routes: args.insecure_skip_routes,
        watch: args.watch,
        languages: args.languages,
        debug: args.log.eq_ignore_ascii_case("debug"),
        index_html_header: file_from_environment("ONTOD_INDEX_HTML_HEADER")?,
        index_html_footer: file_from_environment("ONTOD_INDEX_HTML_FOOTER")?,
        index_txt_header: file_from_environment("ONTOD_INDEX_TXT_HEADER")?,
        index_txt_footer: file_from_environment("ONTOD_INDEX_TXT_FOOTER")?,
    })
}

fn run_index(args: IndexArgs) -> anyhow::Result<()> {
    tracing::info!(database = %args.database, "opening database");
    let mut conn =
        Connection::open(&args.database).with_context(|| format!("opening {}", args.database))?;

    let ingester = Ingester::new(Vec::new());
    let tx = conn.transaction()?;
    let report = ingester.ingest(
        &tx,
        &args.input,
        IngestOptions {
            initialize: true,
            truncate: args.clean,
            ..Default::default()
        },
    )?;
    tx.commit()?;

    tracing::info!(
        indexed = report.successful.len(),
        failed = report.failed.len(),
        "indexing finished"
    );
    if !report.failed.is_empty() {
        anyhow::bail!("failed to ingest {}", report.failed.join(", "));
    }
    Ok(())
}
