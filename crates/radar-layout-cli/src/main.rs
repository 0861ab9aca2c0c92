use radar_layout::{
    CategoryOrder, Diagnostic, ForceOptions, Geometry, Item, LayoutOptions, Relaxation,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::Read;
use std::str::FromStr;

type Payload = Map<String, Value>;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Layout(radar_layout::Error),
    Json(serde_json::Error),
    Input(&'static str),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Layout(err) => write!(f, "invalid layout configuration: {err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Input(msg) => write!(f, "invalid input: {msg}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<radar_layout::Error> for CliError {
    fn from(value: radar_layout::Error) -> Self {
        Self::Layout(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Layout,
    Validate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    Pairwise,
    Force,
}

impl FromStr for Strategy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pairwise" => Ok(Self::Pairwise),
            "force" => Ok(Self::Force),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Preset {
    TechRadar,
}

impl FromStr for Preset {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tech-radar" | "techradar" => Ok(Self::TechRadar),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    seed: Option<u64>,
    min_distance: Option<f64>,
    iterations: Option<usize>,
    strategy: Option<Strategy>,
    category_order: Option<CategoryOrder>,
    time_budget_ms: Option<u64>,
    preset: Option<Preset>,
}

/// Input document: geometry (unless a preset supplies it), items and optional layout options.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Document {
    #[serde(default)]
    geometry: Option<Geometry>,
    items: Vec<Item<Payload>>,
    #[serde(default)]
    options: LayoutOptions,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidateOut<'a> {
    placeable: usize,
    diagnostics: &'a [Diagnostic],
}

fn usage() -> &'static str {
    "radar-layout\n\
\n\
USAGE:\n\
  radar-layout [layout] [--pretty] [--seed <n>] [--min-distance <px>] [--iterations <n>] [--strategy pairwise|force] [--category-order lexicographic|insertion] [--time-budget-ms <ms>] [--preset tech-radar] [<path>|-]\n\
  radar-layout validate [--pretty] [--preset tech-radar] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - Input is a JSON object: {\"geometry\": {...}, \"items\": [...], \"options\": {...}}.\n\
  - --preset tech-radar supplies the standard 4x4 radar geometry; the input must then omit geometry.\n\
  - Flags override the input's options. Without --seed (or options.seed) output varies per run.\n\
  - Set RADAR_LAYOUT_LOG (e.g. debug) to log to stderr.\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a String, CliError> {
    it.next().ok_or(CliError::Usage(usage()))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "validate" => args.command = Command::Validate,
            "--pretty" => args.pretty = true,
            "--seed" => {
                let v = next_value(&mut it)?;
                args.seed = Some(v.parse::<u64>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--min-distance" => {
                let v = next_value(&mut it)?;
                let d = v.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
                if !(d.is_finite() && d > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
                args.min_distance = Some(d);
            }
            "--iterations" => {
                let v = next_value(&mut it)?;
                args.iterations = Some(v.parse::<usize>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--strategy" => {
                let v = next_value(&mut it)?;
                args.strategy = Some(
                    v.parse::<Strategy>()
                        .map_err(|_| CliError::Usage(usage()))?,
                );
            }
            "--category-order" => {
                let v = next_value(&mut it)?;
                args.category_order = Some(match v.as_str() {
                    "lexicographic" | "sorted" => CategoryOrder::Lexicographic,
                    "insertion" => CategoryOrder::Insertion,
                    _ => return Err(CliError::Usage(usage())),
                });
            }
            "--time-budget-ms" => {
                let v = next_value(&mut it)?;
                args.time_budget_ms =
                    Some(v.parse::<u64>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--preset" => {
                let v = next_value(&mut it)?;
                args.preset = Some(v.parse::<Preset>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let mut out = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    std::io::Write::write_all(&mut out, b"\n")?;
    Ok(())
}

fn resolve_geometry(doc: Option<Geometry>, preset: Option<Preset>) -> Result<Geometry, CliError> {
    match (doc, preset) {
        (Some(_), Some(_)) => Err(CliError::Input(
            "geometry given both in the input and via --preset",
        )),
        (Some(g), None) => Ok(g),
        (None, Some(Preset::TechRadar)) => Ok(Geometry::tech_radar()),
        (None, None) => Err(CliError::Input(
            "input has no geometry; add one or pass --preset tech-radar",
        )),
    }
}

/// Layers command-line flags over the document's options.
fn apply_overrides(mut options: LayoutOptions, args: &Args) -> LayoutOptions {
    if let Some(seed) = args.seed {
        options.seed = Some(seed);
    }
    if let Some(d) = args.min_distance {
        options.min_distance = d;
    }
    if let Some(n) = args.iterations {
        options.iterations = n;
    }
    if let Some(order) = args.category_order {
        options.category_order = order;
    }
    if let Some(ms) = args.time_budget_ms {
        options.time_budget_ms = Some(ms);
    }
    match args.strategy {
        Some(Strategy::Pairwise) => options.relaxation = Relaxation::Pairwise,
        // Keep strengths from the document when it already asked for the force strategy.
        Some(Strategy::Force) if !matches!(options.relaxation, Relaxation::Force(_)) => {
            options.relaxation = Relaxation::Force(ForceOptions::default());
        }
        _ => {}
    }
    options
}

/// Fields the positioned output writes next to the flattened payload.
const PLACEMENT_KEYS: [&str; 3] = ["x", "y", "segment"];

/// Moves a payload under a single `payload` key when one of its keys would shadow a placement
/// field in the output object.
fn nest_colliding_payload(payload: Payload) -> Payload {
    if !PLACEMENT_KEYS.iter().any(|k| payload.contains_key(*k)) {
        return payload;
    }
    let mut nested = Payload::new();
    nested.insert("payload".to_string(), Value::Object(payload));
    nested
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let doc: Document = serde_json::from_str(&text)?;
    let geometry = resolve_geometry(doc.geometry, args.preset)?;
    let options = apply_overrides(doc.options, &args);

    match args.command {
        Command::Layout => {
            let items: Vec<Item<Payload>> = doc
                .items
                .into_iter()
                .map(|item| Item {
                    payload: nest_colliding_payload(item.payload),
                    ..item
                })
                .collect();
            let out = radar_layout::layout(&items, &geometry, &options)?;
            write_json(&out, args.pretty)
        }
        Command::Validate => {
            // Seeding alone is enough to find unassignable items.
            let options = LayoutOptions {
                iterations: 0,
                seed: Some(0),
                ..options
            };
            let out = radar_layout::layout(&doc.items, &geometry, &options)?;
            write_json(
                &ValidateOut {
                    placeable: out.items.len(),
                    diagnostics: &out.diagnostics,
                },
                args.pretty,
            )
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("RADAR_LAYOUT_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_tracing();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
