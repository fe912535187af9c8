use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use histlens_common::Config;
use histlens_core::{
    export_csv, export_json, load_sample, print_summary, HistogramAttrs, HistogramNode,
    LinearScale, NodeState, Scale,
};
use std::path::{Path, PathBuf};

fn parse_bins(s: &str) -> Result<usize, String> { // reject 0 at CLI parse time
    let v: usize = s.parse().map_err(|_| format!("not an integer: {s}"))?;
    if v >= 1 { Ok(v) } else { Err("bins must be at least 1".into()) }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
    Csv,
}

#[derive(Parser)]
#[command(name = "histlens", version, about = "Histograms over shared, negotiated domains")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bin one sample file
    Hist {
        path: PathBuf,
        #[arg(long)] column: Option<String>,
        #[arg(long, value_parser = parse_bins)] bins: Option<usize>,
        #[arg(long)] normalized: bool,
        #[arg(long)] preserve_sample: bool,
        #[arg(long)] preserve_count: bool,
        /// pin the lower bound of the sample axis
        #[arg(long, allow_hyphen_values = true)] min: Option<f64>,
        /// pin the upper bound of the sample axis
        #[arg(long, allow_hyphen_values = true)] max: Option<f64>,
        #[arg(long, value_enum)] format: Option<Format>,
        #[arg(long)] output: Option<PathBuf>,
    },
    /// Bin several samples against one shared sample axis and one shared count axis
    Overlay {
        #[arg(required = true, num_args = 2..)]
        paths: Vec<PathBuf>,
        #[arg(long)] column: Option<String>,
        #[arg(long, value_parser = parse_bins)] bins: Option<usize>,
        #[arg(long)] normalized: bool,
        #[arg(long, value_enum)] format: Option<Format>,
        #[arg(long)] output_dir: Option<PathBuf>,
    },
    /// Print shell completions
    Completions { shell: Shell },
}

fn init_logging(config: &Config) {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .format_timestamp(None)
    .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load().unwrap_or_default();
    init_logging(&config);
    match cli.command {
        Commands::Hist { path, column, bins, normalized, preserve_sample, preserve_count, min, max, format, output } => {
            let mut attrs = HistogramAttrs::from(&config.histogram);
            if let Some(b) = bins { attrs.bins = b; }
            attrs.normalized |= normalized;
            attrs.preserve_domain.sample |= preserve_sample;
            attrs.preserve_domain.count |= preserve_count;
            let scale = LinearScale::new().with_bounds(min, max);
            run_hist(&path, column.as_deref(), attrs, scale, format, output, &config)?
        }
        Commands::Overlay { paths, column, bins, normalized, format, output_dir } => {
            let mut attrs = HistogramAttrs::from(&config.histogram);
            if let Some(b) = bins { attrs.bins = b; }
            attrs.normalized |= normalized;
            run_overlay(&paths, column.as_deref(), attrs, format, output_dir, &config)?
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "histlens", &mut std::io::stdout());
        }
    }
    Ok(())
}

fn resolve_format(format: Option<Format>, config: &Config) -> anyhow::Result<Format> {
    if let Some(f) = format { return Ok(f); }
    match config.export.format.as_str() {
        "text" => Ok(Format::Text),
        "json" => Ok(Format::Json),
        "csv" => Ok(Format::Csv),
        other => anyhow::bail!("unknown export format in config: {other}"),
    }
}

fn node_name(path: &Path) -> String {
    path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_else(|| "hist".into())
}

fn emit(state: &NodeState, format: Format, output: Option<&Path>) -> anyhow::Result<()> {
    match (format, output) {
        (Format::Text, _) => print_summary(state),
        (Format::Json, Some(p)) => export_json(p, state).map_err(|e| anyhow::anyhow!("{e}"))?,
        (Format::Csv, Some(p)) => export_csv(p, state).map_err(|e| anyhow::anyhow!("{e}"))?,
        (Format::Json, None) => println!("{}", serde_json::to_string_pretty(state)?),
        (Format::Csv, None) => {
            println!("index,bin_start,bin_end,midpoint,count");
            for d in state.bin_details() {
                println!("{},{},{},{},{}", d.index, d.bin_start, d.bin_end, d.midpoint, d.count);
            }
        }
    }
    if let (Some(p), true) = (output, format != Format::Text) {
        log::info!("{:<24}{}", "wrote", p.display());
    }
    Ok(())
}

fn run_hist(
    path: &Path,
    column: Option<&str>,
    mut attrs: HistogramAttrs,
    sample_scale: LinearScale,
    format: Option<Format>,
    output: Option<PathBuf>,
    config: &Config,
) -> anyhow::Result<()> {
    if !path.exists() { anyhow::bail!("not found: {}", path.display()); }
    attrs.sample = load_sample(path, column).map_err(|e| anyhow::anyhow!("{e}"))?;
    let node = HistogramNode::new(node_name(path), attrs, sample_scale.shared(), LinearScale::new().shared())
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    let format = resolve_format(format, config)?;
    emit(&node.snapshot(), format, output.as_deref())
}

fn run_overlay(
    paths: &[PathBuf],
    column: Option<&str>,
    attrs: HistogramAttrs,
    format: Option<Format>,
    output_dir: Option<PathBuf>,
    config: &Config,
) -> anyhow::Result<()> {
    let x = LinearScale::new().shared();
    let y = LinearScale::new().shared();
    let mut nodes = Vec::with_capacity(paths.len());
    for path in paths {
        if !path.exists() { anyhow::bail!("not found: {}", path.display()); }
        let sample = load_sample(path, column).map_err(|e| anyhow::anyhow!("{e}"))?;
        let node_attrs = HistogramAttrs { sample, ..attrs.clone() };
        let node = HistogramNode::new(node_name(path), node_attrs, x.clone(), y.clone())
            .map_err(|e| anyhow::anyhow!("{e}"))?;
        nodes.push(node);
    }
    // earlier nodes binned before later ones widened the shared axis
    for node in nodes.iter_mut() {
        node.refresh();
    }
    let shared = x.borrow().domain();
    log::info!("{:<24}[{}, {}] across {} samples", "shared domain", shared.min, shared.max, nodes.len());
    let format = resolve_format(format, config)?;
    let dir = output_dir.unwrap_or_else(|| PathBuf::from(&config.export.output_dir));
    for node in &nodes {
        let ext = match format { Format::Json => "json", Format::Csv => "csv", Format::Text => "" };
        let output = (format != Format::Text).then(|| dir.join(format!("{}.{ext}", node.id())));
        if let Some(parent) = output.as_deref().and_then(Path::parent) {
            std::fs::create_dir_all(parent)?;
        }
        emit(&node.snapshot(), format, output.as_deref())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bins_parser() {
        assert_eq!(parse_bins("12"), Ok(12));
        assert!(parse_bins("0").is_err());
        assert!(parse_bins("-3").is_err());
        assert!(parse_bins("x").is_err());
    }

    #[test]
    fn hist_flags() {
        let cli = Cli::try_parse_from([
            "histlens", "hist", "s.csv", "--bins", "4", "--normalized", "--min", "-2", "--format", "csv",
        ])
        .unwrap();
        match cli.command {
            Commands::Hist { bins, normalized, min, format, .. } => {
                assert_eq!(bins, Some(4));
                assert!(normalized);
                assert_eq!(min, Some(-2.0));
                assert_eq!(format, Some(Format::Csv));
            }
            _ => panic!("expected hist"),
        }
    }

    #[test]
    fn overlay_needs_two_paths() {
        assert!(Cli::try_parse_from(["histlens", "overlay", "a.csv"]).is_err());
        assert!(Cli::try_parse_from(["histlens", "overlay", "a.csv", "b.csv"]).is_ok());
    }

    #[test]
    fn format_falls_back_to_config() {
        let mut cfg = Config::default();
        assert_eq!(resolve_format(None, &cfg).unwrap(), Format::Json);
        cfg.export.format = "csv".into();
        assert_eq!(resolve_format(None, &cfg).unwrap(), Format::Csv);
        assert_eq!(resolve_format(Some(Format::Text), &cfg).unwrap(), Format::Text);
        cfg.export.format = "xml".into();
        assert!(resolve_format(None, &cfg).is_err());
    }
}
