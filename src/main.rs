use clustertree::layout::Dimensions;
use clustertree::metrics::ProductOrdering;
use clustertree::rows::{InputError, parse_metrics, parse_rows};
use clustertree::{TreeOptions, cluster_tree};
use std::env;
use std::fs;
use std::process;
use tracing_subscriber::EnvFilter;

fn read_input(path: &str) -> Result<String, InputError> {
    fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_string(),
        source,
    })
}

fn run(
    rows_path: &str,
    metrics_path: Option<&str>,
    options: &TreeOptions,
) -> Result<String, InputError> {
    let rows = parse_rows(&read_input(rows_path)?)?;
    let metrics = match metrics_path {
        Some(path) => Some(parse_metrics(&read_input(path)?)?),
        None => None,
    };
    let tree = cluster_tree(&rows, metrics.as_ref(), options);
    Ok(serde_json::to_string_pretty(&tree)?)
}

fn parse_number(flag: &str, value: &str) -> f64 {
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => {
            eprintln!("Invalid value for {}: {}", flag, value);
            process::exit(1);
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <rows.json> [options]", args[0]);
        eprintln!();
        eprintln!("Options:");
        eprintln!("  -m, --metrics <file>    Country metrics JSON");
        eprintln!("  -c, --cluster <name>    Focused cluster (default: best ranked)");
        eprintln!("  -W, --width <px>        Container width (default: 1280)");
        eprintln!("  -H, --height <px>       Container height (default: 900)");
        eprintln!("  -s, --sort <order>      Products: rca, export_value, complexity, label (default: rca)");
        eprintln!("      --min-rca <value>   Hide products below this RCA");
        eprintln!("      --mobile            Use the mobile presets");
        eprintln!("      --condensed         Widen the right margin for a collapsed sidebar");
        eprintln!("  -o, --output <file>     Output file (default: stdout)");
        process::exit(1);
    }

    let input_path = &args[1];
    let mut output_path: Option<String> = None;
    let mut metrics_path: Option<String> = None;
    let mut options = TreeOptions::default();
    let mut width = options.container.width;
    let mut height = options.container.height;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--output" => {
                i += 1;
                if i < args.len() {
                    output_path = Some(args[i].clone());
                }
            }
            "-m" | "--metrics" => {
                i += 1;
                if i < args.len() {
                    metrics_path = Some(args[i].clone());
                }
            }
            "-c" | "--cluster" => {
                i += 1;
                if i < args.len() {
                    options.focus = Some(args[i].clone());
                }
            }
            "-W" | "--width" => {
                i += 1;
                if i < args.len() {
                    width = parse_number("--width", &args[i]);
                }
            }
            "-H" | "--height" => {
                i += 1;
                if i < args.len() {
                    height = parse_number("--height", &args[i]);
                }
            }
            "-s" | "--sort" => {
                i += 1;
                if i < args.len() {
                    options.ordering = ProductOrdering::from_str(&args[i]).unwrap_or_else(|| {
                        eprintln!("Invalid sort order: {}", args[i]);
                        process::exit(1);
                    });
                }
            }
            "--min-rca" => {
                i += 1;
                if i < args.len() {
                    options.min_rca = parse_number("--min-rca", &args[i]);
                }
            }
            "--mobile" => options.mobile = true,
            "--condensed" => options.condensed = true,
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }
    options.container = Dimensions::new(width, height);

    let json = match run(input_path, metrics_path.as_deref(), &options) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(&path, &json) {
                eprintln!("Failed to write {}: {}", path, e);
                process::exit(1);
            }
        }
        None => println!("{}", json),
    }
}
