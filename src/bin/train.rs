// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! One-shot training driver.
//!
//! Delegates the actual training run to the external trainer CLI with the
//! fixed hyperparameter set the demo model was trained with. Runs to
//! completion in its own process; no progress reporting, no retry. Resuming
//! an interrupted run is the trainer's own business via its `last.pt`
//! checkpoint.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::process::Command;

#[derive(Debug, Parser)]
#[command(
    name = "train",
    about = "Train the waste detection model with the fixed demo configuration"
)]
struct TrainArgs {
    /// Trainer executable to invoke
    #[arg(long, env = "TRAINER_BIN", default_value = "yolo")]
    trainer: String,

    /// Base weights to start from
    #[arg(long, env = "BASE_WEIGHTS", default_value = "yolo11n.pt")]
    weights: String,

    /// Dataset description file
    #[arg(long, env = "DATASET", default_value = "dataset/waste/data.yaml")]
    data: String,

    #[arg(long, default_value_t = 30)]
    epochs: u32,

    /// Training image size; 512 keeps memory use inside an 8G card
    #[arg(long, default_value_t = 512)]
    imgsz: u32,

    #[arg(long, default_value_t = 8)]
    batch: u32,

    /// Dataloader worker count; 0 keeps loading single-process
    #[arg(long, default_value_t = 0)]
    workers: u32,

    /// Device selector passed through to the trainer
    #[arg(long, env = "TRAIN_DEVICE", default_value = "0")]
    device: String,

    #[arg(long, default_value_t = 10)]
    patience: u32,

    #[arg(long, default_value_t = 0.0008)]
    lr0: f64,

    #[arg(long, default_value_t = 2.0)]
    warmup_epochs: f64,

    /// Directory all training outputs are written under
    #[arg(long, env = "TRAIN_PROJECT", default_value = "runs/train")]
    project: String,

    /// Run name; reruns overwrite rather than version
    #[arg(long, default_value = "custom_model_gpu_final")]
    name: String,
}

impl TrainArgs {
    /// Full argument list handed to the trainer CLI.
    fn trainer_args(&self) -> Vec<String> {
        vec![
            "detect".to_string(),
            "train".to_string(),
            format!("model={}", self.weights),
            format!("data={}", self.data),
            format!("epochs={}", self.epochs),
            format!("imgsz={}", self.imgsz),
            format!("batch={}", self.batch),
            format!("workers={}", self.workers),
            format!("device={}", self.device),
            format!("patience={}", self.patience),
            format!("lr0={}", self.lr0),
            format!("warmup_epochs={}", self.warmup_epochs),
            format!("project={}", self.project),
            format!("name={}", self.name),
            // Fixed switches for the low-memory demo configuration.
            "save=True".to_string(),
            "val=True".to_string(),
            "cache=False".to_string(),
            "exist_ok=True".to_string(),
            "resume=False".to_string(),
            "half=True".to_string(),
            "mosaic=0.0".to_string(),
            "plots=False".to_string(),
            "save_crop=False".to_string(),
            "save_txt=False".to_string(),
        ]
    }
}

fn main() -> Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let args = TrainArgs::parse();
    let trainer_args = args.trainer_args();

    tracing::info!(
        trainer = %args.trainer,
        weights = %args.weights,
        data = %args.data,
        epochs = args.epochs,
        "launching training run"
    );

    let status = Command::new(&args.trainer)
        .args(&trainer_args)
        .status()
        .with_context(|| format!("Failed to launch trainer '{}'", args.trainer))?;

    if !status.success() {
        bail!("Trainer exited with {}", status);
    }

    tracing::info!(
        output = %format!("{}/{}", args.project, args.name),
        "training run finished"
    );
    Ok(())
}
