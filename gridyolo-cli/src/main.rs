use clap::Parser;
use gridyolo::{
    ClassAssignment, Detection, DetectorConfig, Interpreter, SuppressionPolicy,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Interpret raw region-grid detector output (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for the pipeline stages.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum SuppressionConfig {
    CrossClass,
    PerClass,
}

impl From<SuppressionConfig> for SuppressionPolicy {
    fn from(value: SuppressionConfig) -> Self {
        match value {
            SuppressionConfig::CrossClass => SuppressionPolicy::CrossClass,
            SuppressionConfig::PerClass => SuppressionPolicy::PerClass,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ClassAssignmentConfig {
    JointProbability,
    FirstPassing,
}

impl From<ClassAssignmentConfig> for ClassAssignment {
    fn from(value: ClassAssignmentConfig) -> Self {
        match value {
            ClassAssignmentConfig::JointProbability => ClassAssignment::JointProbability,
            ClassAssignmentConfig::FirstPassing => ClassAssignment::FirstPassing,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DetectorConfigJson {
    grid_side: usize,
    boxes_per_cell: usize,
    image_size: u32,
    probability_threshold: f32,
    iou_threshold: f32,
    class_names: Vec<String>,
    class_assignment: ClassAssignmentConfig,
    suppression: SuppressionConfig,
    parallel: bool,
}

impl Default for DetectorConfigJson {
    fn default() -> Self {
        let cfg = DetectorConfig::default();
        Self {
            grid_side: cfg.grid_side,
            boxes_per_cell: cfg.boxes_per_cell,
            image_size: cfg.image_size,
            probability_threshold: cfg.probability_threshold,
            iou_threshold: cfg.iou_threshold,
            class_names: cfg.class_names,
            class_assignment: ClassAssignmentConfig::JointProbability,
            suppression: SuppressionConfig::CrossClass,
            parallel: cfg.parallel,
        }
    }
}

impl From<DetectorConfigJson> for DetectorConfig {
    fn from(value: DetectorConfigJson) -> Self {
        DetectorConfig {
            grid_side: value.grid_side,
            boxes_per_cell: value.boxes_per_cell,
            num_classes: value.class_names.len(),
            image_size: value.image_size,
            probability_threshold: value.probability_threshold,
            iou_threshold: value.iou_threshold,
            class_names: value.class_names,
            class_assignment: value.class_assignment.into(),
            suppression: value.suppression.into(),
            parallel: value.parallel,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    raw_output_path: String,
    image_width: u32,
    image_height: u32,
    output_path: Option<String>,
    detector: DetectorConfigJson,
}

impl Default for Config {
    fn default() -> Self {
        let size = DetectorConfig::default().image_size;
        Self {
            raw_output_path: String::new(),
            image_width: size,
            image_height: size,
            output_path: None,
            detector: DetectorConfigJson::default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct DetectionRecord {
    class_id: usize,
    label: Option<String>,
    cx: f32,
    cy: f32,
    width: f32,
    height: f32,
    probability: f32,
}

impl DetectionRecord {
    fn new(det: &Detection, interpreter: &Interpreter) -> Self {
        Self {
            class_id: det.class_id,
            label: interpreter.label(det).map(str::to_owned),
            cx: det.bbox.cx,
            cy: det.bbox.cy,
            width: det.bbox.width,
            height: det.bbox.height,
            probability: det.probability,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    image_width: u32,
    image_height: u32,
    detections: Vec<DetectionRecord>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("gridyolo=info".parse()?))
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

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.raw_output_path.is_empty() {
        return Err("raw_output_path must be set in the config".into());
    }

    let interpreter = Interpreter::new(config.detector.into())?;

    let raw_text = fs::read_to_string(&config.raw_output_path)?;
    let raw: Vec<f32> = serde_json::from_str(&raw_text)?;

    let detections = interpreter.detect_raw(&raw, config.image_width, config.image_height)?;
    let output = Output {
        image_width: config.image_width,
        image_height: config.image_height,
        detections: detections
            .iter()
            .map(|det| DetectionRecord::new(det, &interpreter))
            .collect(),
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
