use clap::Parser;
use platecount::io::{load_rgb_image, view_from_rgb_image};
use platecount::lowlevel::{CannyParams, ClaheParams, HoughParams};
use platecount::{
    ChunkParams, CountReport, CropConfig, ExtractConfig, PeakParams, PipelineConfig,
    PlateCounter, RotationConfig, RowReduction, Smoothing, StrategyConfig, VoteConfig,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Plate stack counter (JSON config driven)")]
struct Cli {
    /// Image to analyze; overrides `image_path` from the config.
    #[arg(short, long, value_name = "FILE")]
    image: Option<PathBuf>,
    /// Path to the JSON configuration file; defaults are used when omitted.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for the pipeline stages.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RotationJson {
    enabled: bool,
    canny_low: f32,
    canny_high: f32,
    canny_aperture: usize,
    hough_rho_step: f32,
    hough_theta_step_deg: f32,
    hough_threshold: u32,
    max_tilt_deg: f32,
}

impl Default for RotationJson {
    fn default() -> Self {
        let cfg = RotationConfig::default();
        Self {
            enabled: cfg.enabled,
            canny_low: cfg.canny.low,
            canny_high: cfg.canny.high,
            canny_aperture: cfg.canny.aperture,
            hough_rho_step: cfg.hough.rho_step,
            hough_theta_step_deg: cfg.hough.theta_step_deg,
            hough_threshold: cfg.hough.threshold,
            max_tilt_deg: cfg.max_tilt_deg,
        }
    }
}

impl From<RotationJson> for RotationConfig {
    fn from(value: RotationJson) -> Self {
        Self {
            enabled: value.enabled,
            canny: CannyParams {
                low: value.canny_low,
                high: value.canny_high,
                aperture: value.canny_aperture,
            },
            hough: HoughParams {
                rho_step: value.hough_rho_step,
                theta_step_deg: value.hough_theta_step_deg,
                threshold: value.hough_threshold,
            },
            max_tilt_deg: value.max_tilt_deg,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ReductionJson {
    #[default]
    Sum,
    Mean,
    MinOfZones {
        zone_width_ratio: f32,
    },
}

impl From<ReductionJson> for RowReduction {
    fn from(value: ReductionJson) -> Self {
        match value {
            ReductionJson::Sum => RowReduction::Sum,
            ReductionJson::Mean => RowReduction::Mean,
            ReductionJson::MinOfZones { zone_width_ratio } => {
                RowReduction::MinOfZones { zone_width_ratio }
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum SmoothingJson {
    None,
    Box { width: usize },
    Gaussian { sigma: f32 },
}

impl Default for SmoothingJson {
    fn default() -> Self {
        match Smoothing::default() {
            Smoothing::None => SmoothingJson::None,
            Smoothing::Box { width } => SmoothingJson::Box { width },
            Smoothing::Gaussian { sigma } => SmoothingJson::Gaussian { sigma },
        }
    }
}

impl From<SmoothingJson> for Smoothing {
    fn from(value: SmoothingJson) -> Self {
        match value {
            SmoothingJson::None => Smoothing::None,
            SmoothingJson::Box { width } => Smoothing::Box { width },
            SmoothingJson::Gaussian { sigma } => Smoothing::Gaussian { sigma },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ExtractJson {
    clahe_clip_limit: f32,
    clahe_tiles: [usize; 2],
    blur_ksize: usize,
    sobel_ksize: usize,
    reduction: ReductionJson,
    smoothing: SmoothingJson,
}

impl Default for ExtractJson {
    fn default() -> Self {
        let cfg = ExtractConfig::default();
        Self {
            clahe_clip_limit: cfg.clahe.clip_limit,
            clahe_tiles: [cfg.clahe.tiles_x, cfg.clahe.tiles_y],
            blur_ksize: cfg.blur_ksize,
            sobel_ksize: cfg.sobel_ksize,
            reduction: ReductionJson::default(),
            smoothing: SmoothingJson::default(),
        }
    }
}

impl From<ExtractJson> for ExtractConfig {
    fn from(value: ExtractJson) -> Self {
        Self {
            clahe: ClaheParams {
                clip_limit: value.clahe_clip_limit,
                tiles_x: value.clahe_tiles[0],
                tiles_y: value.clahe_tiles[1],
            },
            blur_ksize: value.blur_ksize,
            sobel_ksize: value.sobel_ksize,
            reduction: value.reduction.into(),
            smoothing: value.smoothing.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct CropJson {
    enabled: bool,
    threshold_ratio: f32,
    padding: usize,
}

impl Default for CropJson {
    fn default() -> Self {
        let cfg = CropConfig::default();
        Self {
            enabled: cfg.enabled,
            threshold_ratio: cfg.threshold_ratio,
            padding: cfg.padding,
        }
    }
}

impl From<CropJson> for CropConfig {
    fn from(value: CropJson) -> Self {
        Self {
            enabled: value.enabled,
            threshold_ratio: value.threshold_ratio,
            padding: value.padding,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct PeaksJson {
    min_height: f32,
    min_prominence: f32,
    min_distance: usize,
    merge_separation: usize,
}

impl Default for PeaksJson {
    fn default() -> Self {
        let p = PeakParams::default();
        Self {
            min_height: p.min_height,
            min_prominence: p.min_prominence,
            min_distance: p.min_distance,
            merge_separation: p.merge_separation,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ChunksJson {
    dark_density: f32,
    min_height: usize,
}

impl Default for ChunksJson {
    fn default() -> Self {
        let p = ChunkParams::default();
        Self {
            dark_density: p.dark_density,
            min_height: p.min_height,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum StrategyJson {
    Peaks(PeaksJson),
    Chunks(ChunksJson),
}

impl Default for StrategyJson {
    fn default() -> Self {
        StrategyJson::Peaks(PeaksJson::default())
    }
}

impl From<StrategyJson> for StrategyConfig {
    fn from(value: StrategyJson) -> Self {
        match value {
            StrategyJson::Peaks(p) => StrategyConfig::Peaks(PeakParams {
                min_height: p.min_height,
                min_prominence: p.min_prominence,
                min_distance: p.min_distance,
                merge_separation: p.merge_separation,
            }),
            StrategyJson::Chunks(c) => StrategyConfig::Chunks(ChunkParams {
                dark_density: c.dark_density,
                min_height: c.min_height,
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct VotingJson {
    enabled: bool,
    strips: usize,
    strip_width_ratio: f32,
    quorum: usize,
    parallel: bool,
}

impl Default for VotingJson {
    fn default() -> Self {
        let cfg = VoteConfig::default();
        Self {
            enabled: cfg.enabled,
            strips: cfg.strips,
            strip_width_ratio: cfg.strip_width_ratio,
            quorum: cfg.quorum,
            parallel: cfg.parallel,
        }
    }
}

impl From<VotingJson> for VoteConfig {
    fn from(value: VotingJson) -> Self {
        Self {
            enabled: value.enabled,
            strips: value.strips,
            strip_width_ratio: value.strip_width_ratio,
            quorum: value.quorum,
            parallel: value.parallel,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    image_path: String,
    output_path: Option<String>,
    rotation: RotationJson,
    extract: ExtractJson,
    crop: CropJson,
    strategy: StrategyJson,
    voting: VotingJson,
}

impl Config {
    fn pipeline(self) -> PipelineConfig {
        PipelineConfig {
            rotation: self.rotation.into(),
            extract: self.extract.into(),
            crop: self.crop.into(),
            strategy: self.strategy.into(),
            voting: self.voting.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct BandRecord {
    top: usize,
    bottom: usize,
}

#[derive(Debug, Serialize)]
struct Output {
    /// `null` when the estimate is indeterminate.
    count: Option<usize>,
    angle_deg: f32,
    band: BandRecord,
    band_detected: bool,
    strip_counts: Vec<usize>,
}

impl From<CountReport> for Output {
    fn from(report: CountReport) -> Self {
        Self {
            count: report.count.value(),
            angle_deg: report.angle_deg,
            band: BandRecord {
                top: report.band.top(),
                bottom: report.band.bottom(),
            },
            band_detected: report.band_detected,
            strip_counts: report.strip_counts,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("platecount=info".parse()?),
            )
            .with_target(false)
            .init();
    }

    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let mut config: Config = match &cli.config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => Config::default(),
    };
    if let Some(image) = &cli.image {
        config.image_path = image.to_string_lossy().into_owned();
    }
    if config.image_path.is_empty() {
        return Err("an image must be given with --image or image_path in the config".into());
    }

    let image_path = std::mem::take(&mut config.image_path);
    let output_path = config.output_path.take();
    let counter = PlateCounter::new(config.pipeline())?;

    let rgb = load_rgb_image(&image_path)?;
    let report = counter.count(view_from_rgb_image(&rgb)?)?;
    let json = serde_json::to_string_pretty(&Output::from(report))?;

    match output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
