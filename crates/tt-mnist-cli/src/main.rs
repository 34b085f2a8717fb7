//! `tt-mnist`: conformance runner for the Tiny Tapeout MNIST accelerator.
//!
//! ```text
//! USAGE:
//!   tt-mnist verify [--start N] [--count N]   Verify a range of vectors
//!   tt-mnist run <index> [--trace]            Verify one vector
//!   tt-mnist inspect <index>                  Show a vector's pixels and metadata
//!   tt-mnist list                             List vectors in the store
//! ```
//!
//! Vectors come from `--vectors`, else `TT_MNIST_VECTORS`, else
//! `test/test_vectors/vectors`. Runs use the software device model.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tt_mnist_driver::{
    PinDevice, ProtocolDriver, RecordingDevice, SoftwareDevice, TemplateClassifier,
};
use tt_mnist_harness::{BatchVerifier, CaseVerifier, HarnessConfig, HarnessError, VECTORS_ENV};
use tt_mnist_vectors::VectorStore;

#[derive(Parser)]
#[command(name = "tt-mnist", about = "MNIST accelerator conformance harness", version)]
struct Cli {
    #[command(flatten)]
    setup: Setup,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Args)]
struct Setup {
    /// Directory holding test_NNN_{input,output,metadata}.txt
    #[arg(long, global = true, env = VECTORS_ENV)]
    vectors: Option<PathBuf>,

    /// Cycle budget from kickoff before a run times out.
    #[arg(long, global = true)]
    budget: Option<u64>,

    /// Compute latency of the software device, in edges.
    #[arg(long, global = true)]
    latency: Option<u32>,

    /// Fit the device's templates to the store's vectors before running.
    #[arg(long, global = true)]
    fit: bool,
}

#[derive(Subcommand)]
enum Cmd {
    /// Verify a range of vectors in order.
    Verify {
        /// First vector index.
        #[arg(long, default_value_t = 0)]
        start: usize,
        /// Number of vectors (default: every vector from `start` on).
        #[arg(long)]
        count: Option<usize>,
    },
    /// Verify one vector.
    Run {
        /// Vector index.
        index: usize,
        /// Print every clock edge of the run.
        #[arg(long)]
        trace: bool,
    },
    /// Show a vector's pixels, label and metadata.
    Inspect {
        /// Vector index.
        index: usize,
    },
    /// List vectors in the store.
    List,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let config = cli.setup.config();

    match cli.command {
        Cmd::Verify { start, count } => cmd_verify(&cli.setup, &config, start, count)?,
        Cmd::Run { index, trace } => cmd_run(&cli.setup, &config, index, trace)?,
        Cmd::Inspect { index } => cmd_inspect(&config, index)?,
        Cmd::List => cmd_list(&config)?,
    }

    Ok(())
}

impl Setup {
    fn config(&self) -> HarnessConfig {
        let mut config = HarnessConfig::from_env();
        if let Some(dir) = &self.vectors {
            config = config.with_vector_dir(dir);
        }
        if let Some(budget) = self.budget {
            config = config.with_cycle_budget(budget);
        }
        config
    }

    fn device(&self, store: &VectorStore) -> Result<SoftwareDevice> {
        let classifier = if self.fit {
            fit_templates(store)?
        } else {
            TemplateClassifier::glyphs()
        };
        let mut device = SoftwareDevice::with_classifier(classifier);
        if let Some(latency) = self.latency {
            device = device.with_compute_latency(latency);
        }
        Ok(device)
    }
}

fn fit_templates(store: &VectorStore) -> Result<TemplateClassifier> {
    let vectors = store
        .indices()?
        .into_iter()
        .map(|i| store.load(i))
        .collect::<tt_mnist_vectors::Result<Vec<_>>>()
        .context("loading vectors for template fit")?;
    info!("Fitting templates to {} vectors", vectors.len());
    Ok(TemplateClassifier::fit(
        vectors.iter().map(|v| (v.pixels(), v.expected_label())),
    ))
}

fn cmd_verify(
    setup: &Setup,
    config: &HarnessConfig,
    start: usize,
    count: Option<usize>,
) -> Result<()> {
    let store = VectorStore::new(&config.vector_dir);
    let indices: Vec<usize> = match count {
        Some(n) => (start..start.saturating_add(n)).collect(),
        None => store.indices()?.into_iter().filter(|&i| i >= start).collect(),
    };

    println!("{}", "=".repeat(80));
    println!("TT Wrapper - Multiple Inference Test ({} vectors)", indices.len());
    println!("{}", "=".repeat(80));

    let device = setup.device(&store)?;
    let mut batch = BatchVerifier::from_config(config, device);
    match batch.run_indices(indices) {
        Ok(summary) => {
            println!("{summary}");
            let ns = summary.simulated_ns(config.clock_period_ns);
            println!("Simulated time: {}.{:06} ms", ns / 1_000_000, ns % 1_000_000);
            println!("✓ ALL TESTS PASSED!");
            Ok(())
        }
        Err(HarnessError::BatchFailure {
            failed,
            total,
            summary,
        }) => {
            println!("{summary}");
            anyhow::bail!("{failed}/{total} tests failed")
        }
        Err(e) => Err(e.into()),
    }
}

fn cmd_run(setup: &Setup, config: &HarnessConfig, index: usize, trace: bool) -> Result<()> {
    let store = VectorStore::new(&config.vector_dir);
    let device = setup.device(&store)?;

    if trace {
        let mut case = verifier(store, RecordingDevice::new(device), config);
        let passed = report_case(&mut case, index)?;
        println!();
        println!(" edge  pins                                       output");
        for edge in case.driver().device().edges() {
            println!("{edge}");
        }
        check(passed)
    } else {
        let mut case = verifier(store, device, config);
        check(report_case(&mut case, index)?)
    }
}

fn verifier<D: PinDevice>(
    store: VectorStore,
    device: D,
    config: &HarnessConfig,
) -> CaseVerifier<D> {
    CaseVerifier::new(store, ProtocolDriver::with_timing(device, config.timing))
}

fn report_case<D: PinDevice>(case: &mut CaseVerifier<D>, index: usize) -> Result<bool> {
    let vector = case.store().load(index)?;
    println!("{}", "=".repeat(80));
    println!("TT Wrapper - Single Inference Test (Parallel Streaming)");
    println!("{}", "=".repeat(80));
    println!("Test Vector: {index}");
    println!("True Label: {}", vector.true_label().unwrap_or("?"));
    println!("Expected Prediction: {}", vector.expected_label());

    let result = case.verify(&vector)?;
    println!("Total Cycles: {}", result.cycles_used);
    println!("Expected:     {}", result.expected);
    println!("Got:          {}", result.observed);
    if let Some(status) = result.status {
        println!("Done signal:  {}", u8::from(status.done()));
        println!("Busy signal:  {}", u8::from(status.busy()));
    }
    if result.passed {
        println!("✓ PASS");
    } else {
        warn!("Case {index} failed: {:?}", result.failure());
        let reason = result.failure().map_or_else(String::new, |f| f.to_string());
        println!("✗ FAIL - {reason}");
    }
    Ok(result.passed)
}

fn check(passed: bool) -> Result<()> {
    if passed {
        Ok(())
    } else {
        anyhow::bail!("vector failed verification")
    }
}

fn cmd_inspect(config: &HarnessConfig, index: usize) -> Result<()> {
    let store = VectorStore::new(&config.vector_dir);
    let vector = store.load(index)?;

    println!("Vector   : {index:03}");
    println!("Expected : {}", vector.expected_label());
    println!("Pixels   :");
    println!("{}", vector.grid());

    let mut keys: Vec<_> = vector.metadata().iter().collect();
    keys.sort();
    if !keys.is_empty() {
        println!("Metadata :");
        for (k, v) in keys {
            println!("  {k}: {v}");
        }
    }
    Ok(())
}

fn cmd_list(config: &HarnessConfig) -> Result<()> {
    let store = VectorStore::new(&config.vector_dir);
    let indices = store
        .indices()
        .with_context(|| format!("scanning {}", store.dir().display()))?;

    println!("Vectors in {}: {}", store.dir().display(), indices.len());
    for index in indices {
        match store.load(index) {
            Ok(v) => println!(
                "  {index:03}  expected={}  true={}",
                v.expected_label(),
                v.true_label().unwrap_or("?")
            ),
            Err(e) => println!("  {index:03}  unreadable: {e}"),
        }
    }
    Ok(())
}
