mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use machine_learning::{
    arch::{Model, Sequential, loss::CrossEntropy, spec::ModelSpec},
    dataset::{DataLoader, InMemoryDataset},
    device::{Device, DeviceProbe, HostRuntime},
    optimization::Adam,
    training::{self, StdoutProgress, TrainConfig},
};
use rand::{Rng, SeedableRng, rngs::StdRng};

use cli::Args;

const DUMMY_SAMPLES: usize = 1000;
const DUMMY_FEATURES: usize = 784;

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    run(args)
}

fn run(args: Args) -> Result<()> {
    let device = Device::select(&HostRuntime);
    println!("Using device: {device}");

    if device.is_accelerator() {
        let name = HostRuntime.name(device).unwrap_or_else(|| device.to_string());
        println!("GPU: {name}");
    }

    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = StdRng::seed_from_u64(seed);
    info!(seed = seed; "seeded run");

    let dataset = match &args.data {
        Some(path) => InMemoryDataset::from_csv(path, args.num_classes)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => InMemoryDataset::synthetic_classification(
            DUMMY_SAMPLES,
            DUMMY_FEATURES,
            args.num_classes,
            &mut rng,
        )
        .context("failed to generate dummy data")?,
    };

    let spec = ModelSpec::feed_forward(dataset.x_size(), args.hidden_size, args.num_classes);
    let model = Sequential::from_spec(&spec, device, &mut rng).context("failed to build model")?;
    let optimizer = Adam::with_defaults(model.size(), args.lr);

    let loader = DataLoader::shuffled(dataset, args.batch_size, rng.random());
    let config = TrainConfig::new(args.epochs);

    let data = args.evaluate.then(|| loader.clone());

    let trained = training::run_training(
        model,
        optimizer,
        loader,
        &CrossEntropy,
        &config,
        &mut StdoutProgress,
    )
    .context("training failed")?;

    info!(steps = trained.steps; "checkpoint at {}", trained.checkpoint.display());

    if let Some(data) = data {
        let mut model = trained.model;
        let eval = training::evaluate(&mut model, data, &CrossEntropy)
            .context("evaluation failed")?;

        info!(
            loss = eval.loss,
            accuracy = eval.accuracy.unwrap_or(f32::NAN),
            samples = eval.samples;
            "evaluated on the training data"
        );
    }

    Ok(())
}
