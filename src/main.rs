use anyhow::{Context, Result};
use arrow::util::pretty::pretty_format_batches;
use fred_connector::{ConnectorSettings, ExtraOptions, FredConnector, Pipe, PipeParameters};
use std::{env, path::Path, process::exit, time::Instant};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) args: <SERIES_ID> [PARAMS_YAML] ──────────────────────────
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <SERIES_ID> [PARAMS_YAML]", program_name(&args));
        exit(1);
    }
    let series_id = &args[1];

    let mut params = match args.get(2) {
        Some(path) => PipeParameters::load_yaml(Path::new(path))
            .with_context(|| format!("loading pipe parameters from {}", path))?,
        None => PipeParameters::default(),
    };
    params.merge_defaults(&PipeParameters::for_series(series_id.as_str()));

    // ─── 3) fetch ────────────────────────────────────────────────────
    let connector = FredConnector::new(ConnectorSettings::default());
    let pipe = Pipe::new(format!("fred_{}", series_id.to_lowercase()), params);

    let start = Instant::now();
    let batch = connector
        .fetch_series(&pipe, None, None, &ExtraOptions::new())
        .with_context(|| format!("fetching {}", series_id))?;
    info!(
        rows = batch.num_rows(),
        datetime = %pipe.parameters.columns.datetime,
        elapsed = ?start.elapsed(),
        "done"
    );

    // ─── 4) print ────────────────────────────────────────────────────
    println!("{}", pretty_format_batches(&[batch])?);
    Ok(())
}

/// argv[0], or the binary name when the OS hands us an empty argv.
fn program_name(args: &[String]) -> &str {
    args.first().map_or("fred-connector", String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_name_without_argv() {
        assert_eq!(program_name(&[]), "fred-connector");
        assert_eq!(program_name(&["/usr/bin/fred".to_string()]), "/usr/bin/fred");
    }
}
