use blockflow::io::{load_gray_image, save_color_image, save_gray_image};
use blockflow::{
    abs_diff, estimate_multiscale, render_flow, BlockMatchConfig, BlockMatcher,
    DisplacementEncoding, FlowField, FlowScaling, MultiscaleConfig,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Block matching optical flow")]
struct Cli {
    /// Reference image (overrides `image_a` from the config).
    image_a: Option<PathBuf>,
    /// Target image (overrides `image_b` from the config).
    image_b: Option<PathBuf>,
    /// Number of pyramid levels (overrides `flow.max_scale`).
    #[arg(long)]
    max_scale: Option<usize>,
    /// Run a single full-resolution pass instead of the pyramid.
    #[arg(long)]
    single_scale: bool,
    /// Optional JSON configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Directory for the rendered PNG files (overrides `output_dir`).
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum ModeConfig {
    Single,
    #[default]
    Multiscale,
}

#[derive(Debug, Deserialize, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
enum EncodingConfig {
    #[default]
    Signed,
    WrappingU8,
}

impl From<EncodingConfig> for DisplacementEncoding {
    fn from(value: EncodingConfig) -> Self {
        match value {
            EncodingConfig::Signed => DisplacementEncoding::Signed,
            EncodingConfig::WrappingU8 => DisplacementEncoding::WrappingU8,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
enum FlowScalingConfig {
    #[default]
    Raw,
    ByLevel,
}

impl From<FlowScalingConfig> for FlowScaling {
    fn from(value: FlowScalingConfig) -> Self {
        match value {
            FlowScalingConfig::Raw => FlowScaling::Raw,
            FlowScalingConfig::ByLevel => FlowScaling::ByLevel,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct FlowConfigJson {
    half_window: usize,
    search_x: usize,
    search_y: usize,
    encoding: EncodingConfig,
    parallel: bool,
    max_scale: usize,
    flow_scaling: FlowScalingConfig,
}

impl Default for FlowConfigJson {
    fn default() -> Self {
        let cfg = MultiscaleConfig::default();
        Self {
            half_window: cfg.block.half_window,
            search_x: cfg.block.search_x,
            search_y: cfg.block.search_y,
            encoding: EncodingConfig::Signed,
            parallel: cfg.block.parallel,
            max_scale: cfg.max_scale,
            flow_scaling: FlowScalingConfig::Raw,
        }
    }
}

impl FlowConfigJson {
    fn block(&self) -> BlockMatchConfig {
        BlockMatchConfig {
            half_window: self.half_window,
            search_x: self.search_x,
            search_y: self.search_y,
            encoding: self.encoding.into(),
            parallel: self.parallel,
        }
    }

    fn multiscale(&self) -> MultiscaleConfig {
        MultiscaleConfig {
            block: self.block(),
            max_scale: self.max_scale,
            flow_scaling: self.flow_scaling.into(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct Config {
    image_a: String,
    image_b: String,
    output_dir: Option<String>,
    mode: ModeConfig,
    flow: FlowConfigJson,
}

#[derive(Debug, Serialize)]
struct FieldStats {
    width: usize,
    height: usize,
    mean_magnitude: f32,
    max_magnitude: f32,
}

impl From<&FlowField> for FieldStats {
    fn from(field: &FlowField) -> Self {
        let mut sum = 0.0f64;
        let mut max = 0.0f32;
        for (&u, &v) in field.u().iter().zip(field.v()) {
            let mag = (u * u + v * v).sqrt();
            sum += f64::from(mag);
            max = max.max(mag);
        }
        let count = (field.width() * field.height()).max(1) as f64;
        Self {
            width: field.width(),
            height: field.height(),
            mean_magnitude: (sum / count) as f32,
            max_magnitude: max,
        }
    }
}

#[derive(Debug, Serialize)]
struct LevelRecord {
    level: usize,
    output: String,
    stats: FieldStats,
}

#[derive(Debug, Serialize)]
struct Output {
    abs_diff: String,
    accumulated: FieldStats,
    levels: Vec<LevelRecord>,
}

fn path_string(path: &Path) -> String {
    path.display().to_string()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("blockflow=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let mut config: Config = match &cli.config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => Config::default(),
    };
    if let Some(path) = &cli.image_a {
        config.image_a = path_string(path);
    }
    if let Some(path) = &cli.image_b {
        config.image_b = path_string(path);
    }
    if let Some(max_scale) = cli.max_scale {
        config.flow.max_scale = max_scale;
    }
    if cli.single_scale {
        config.mode = ModeConfig::Single;
    }
    if config.image_a.is_empty() || config.image_b.is_empty() {
        return Err("two input images are required (positional or image_a/image_b)".into());
    }
    if config.flow.max_scale == 0 {
        return Err("max_scale must be at least 1".into());
    }

    let output_dir = cli
        .output_dir
        .clone()
        .or_else(|| config.output_dir.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&output_dir)?;

    let reference = load_gray_image(&config.image_a)?;
    let target = load_gray_image(&config.image_b)?;

    let diff = abs_diff(reference.view(), target.view())?;
    let diff_path = output_dir.join("absdiff.png");
    save_gray_image(&diff, &diff_path)?;

    let output = match config.mode {
        ModeConfig::Single => {
            let matcher = BlockMatcher::new(config.flow.block());
            let field = matcher.estimate(reference.view(), target.view())?;
            let flow_path = output_dir.join("flow.png");
            save_color_image(&render_flow(&field), &flow_path)?;
            Output {
                abs_diff: path_string(&diff_path),
                accumulated: FieldStats::from(&field),
                levels: vec![LevelRecord {
                    level: 0,
                    output: path_string(&flow_path),
                    stats: FieldStats::from(&field),
                }],
            }
        }
        ModeConfig::Multiscale => {
            let result =
                estimate_multiscale(reference.view(), target.view(), &config.flow.multiscale())?;
            let mut levels = Vec::with_capacity(result.levels.len());
            for (idx, (level, image)) in result
                .levels
                .iter()
                .zip(&result.visualizations)
                .enumerate()
            {
                let path = output_dir.join(format!("flow_scale_{idx}.png"));
                save_color_image(image, &path)?;
                levels.push(LevelRecord {
                    level: level.level,
                    output: path_string(&path),
                    stats: FieldStats::from(&level.field),
                });
            }
            Output {
                abs_diff: path_string(&diff_path),
                accumulated: FieldStats::from(&result.accumulated),
                levels,
            }
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
