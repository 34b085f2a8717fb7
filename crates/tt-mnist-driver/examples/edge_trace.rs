// SPDX-License-Identifier: AGPL-3.0-only

//! Print the pin-level trace of one classification
//!
//! Usage:
//!   cargo run -p tt-mnist-driver --example edge_trace [digit]
//!
//! Streams the built-in glyph for `digit` (default 3) through the software
//! device and prints every edge up to the start of polling, then the result.

use tt_mnist_driver::{
    Classification, ProtocolDriver, RecordingDevice, SoftwareDevice, TemplateClassifier,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let digit: u8 = std::env::args()
        .nth(1)
        .map(|s| s.parse::<u8>())
        .transpose()?
        .unwrap_or(3);

    let classifier = TemplateClassifier::glyphs();
    let frame = *classifier
        .template(digit)
        .ok_or_else(|| format!("no glyph for {digit}"))?;

    let device = RecordingDevice::new(SoftwareDevice::with_classifier(classifier));
    let mut driver = ProtocolDriver::new(device);
    let report = driver.run(&frame)?;

    let edges = driver.device().edges();
    let shown = (3 + report.protocol_edges + 2) as usize;
    println!(" edge  pins");
    for edge in edges.iter().take(shown) {
        println!("{edge}");
    }
    println!("  ...  ({} poll edges)", report.poll_edges);
    if let Some(last) = edges.last() {
        println!("{last}");
    }

    match report.classification {
        Classification::Completed {
            prediction, cycles, ..
        } => println!("\nPrediction {prediction} after {cycles} cycles"),
        Classification::TimedOut { cycles } => println!("\nTIMEOUT after {cycles} cycles"),
    }
    Ok(())
}
