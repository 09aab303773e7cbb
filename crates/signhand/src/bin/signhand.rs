//! signhand CLI: recognize the hand sign shown in one image.

use clap::Parser;
use log::{info, LevelFilter};
use signhand::core::{init_logging, LogSettings, PixelClamp};
use signhand::{detect, Recognition, RecognizeConfig, RecognizeReport};
use std::path::PathBuf;
use std::process::ExitCode;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser, Debug)]
#[command(name = "signhand")]
#[command(about = "Recognize a hand sign (1-9, A-Z) from an image and its hand landmarks")]
#[command(version)]
struct Cli {
    /// JSON config; flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input image (jpg, jpeg or png).
    #[arg(long)]
    image: Option<PathBuf>,

    /// Hand landmarks JSON produced by an external tracker.
    #[arg(long)]
    landmarks: Option<PathBuf>,

    /// ONNX classifier model.
    #[arg(long)]
    model: Option<PathBuf>,

    /// Path to write the JSON report.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Also clamp negative landmark coordinates to zero.
    #[arg(long)]
    clamp_lower: bool,

    /// Maximum number of hands to classify.
    #[arg(long)]
    max_hands: Option<usize>,

    /// Log level; defaults to `SIGNHAND_LOG`, then `info`.
    #[arg(long)]
    log_level: Option<LevelFilter>,

    /// Emit JSON log lines (only with the `tracing` feature).
    #[arg(long)]
    json_log: bool,
}

impl Cli {
    fn resolve_config(&self) -> CliResult<RecognizeConfig> {
        let mut cfg = match &self.config {
            Some(path) => RecognizeConfig::load_json(path)?,
            None => RecognizeConfig {
                image_path: String::new(),
                landmarks_path: String::new(),
                model_path: String::new(),
                output_path: None,
                pixel_clamp: PixelClamp::default(),
                max_hands: Some(1),
            },
        };

        if let Some(image) = &self.image {
            cfg.image_path = image.to_string_lossy().into_owned();
        }
        if let Some(landmarks) = &self.landmarks {
            cfg.landmarks_path = landmarks.to_string_lossy().into_owned();
        }
        if let Some(model) = &self.model {
            cfg.model_path = model.to_string_lossy().into_owned();
        }
        if let Some(output) = &self.output {
            cfg.output_path = Some(output.to_string_lossy().into_owned());
        }
        if self.clamp_lower {
            cfg.pixel_clamp = PixelClamp::Both;
        }
        if self.max_hands.is_some() {
            cfg.max_hands = self.max_hands;
        }

        for (name, value) in [
            ("--image", &cfg.image_path),
            ("--landmarks", &cfg.landmarks_path),
            ("--model", &cfg.model_path),
        ] {
            if value.is_empty() {
                return Err(format!("missing {name} (or set it in --config)").into());
            }
        }
        Ok(cfg)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let log = LogSettings {
        level: cli.log_level,
        json: cli.json_log,
    };
    if let Err(err) = init_logging(&log) {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> CliResult<()> {
    let cfg = cli.resolve_config()?;

    // Both resources are loaded once, before any image is touched.
    let recognizer = cfg.build_recognizer()?;
    info!("loaded classifier from {}", cfg.model_path);

    let img = detect::load_rgb_image(&cfg.image_path)?;
    let mut report = RecognizeReport::new(&cfg, cli.config.as_deref(), img.width(), img.height());

    let outcome = detect::recognize_image(&img, &recognizer);
    match &outcome {
        Ok(recognition) => {
            print_recognition(recognition);
            report.set_recognition(recognition);
        }
        Err(err) => report.set_error(err),
    }

    let out_path = cfg.output_path();
    report.write_json(&out_path)?;
    info!("wrote report to {}", out_path.display());

    outcome?;
    Ok(())
}

fn print_recognition(recognition: &Recognition) {
    if recognition.is_no_hand() {
        println!("No hand detected");
        return;
    }
    for (i, outcome) in recognition.outcomes().iter().enumerate() {
        match outcome {
            Ok(hand) => println!(
                "Predicted: {} ({}%)",
                hand.prediction.label,
                hand.prediction.confidence_display()
            ),
            Err(err) => println!("hand {i}: {err}"),
        }
    }
}
