use presence_cli::presence_metrics::{ClassifierBuilder, MedianPolicy, ThresholdStrategy};
use presence_cli::Point2D;
use presence_core::{CandidateSet, PointSet};
use std::time::Instant;

/// Reference corners on a ring, each candidate shifted by a fixed offset
fn shifted(reference: &PointSet, dx: f64, dy: f64) -> PointSet {
    reference
        .iter()
        .map(|p| Point2D::new(p.x + dx, p.y + dy))
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Classifier Builder Demo");
    println!("=======================\n");

    let reference: PointSet = (0..28)
        .map(|i| {
            let angle = i as f64 * std::f64::consts::TAU / 28.0;
            (100.0 + 40.0 * angle.cos(), 100.0 + 40.0 * angle.sin())
        })
        .collect();

    let candidates = CandidateSet::new()
        .with("B", shifted(&reference, 1.0, 0.5))?
        .with("C", shifted(&reference, 60.0, 45.0))?
        .with("D", shifted(&reference, -2.0, 1.0))?
        .with("E", shifted(&reference, 35.0, -70.0))?;

    let builders = vec![
        ("Default", ClassifierBuilder::new()),
        ("Legacy", ClassifierBuilder::new().preset_legacy()),
        ("Mean", ClassifierBuilder::new().threshold_strategy(ThresholdStrategy::Mean)),
        (
            "Sequential",
            ClassifierBuilder::new().median_policy(MedianPolicy::Midpoint).parallel(false),
        ),
    ];

    for (name, builder) in builders {
        println!("{}: {}", name, builder.summary());
        let classifier = builder.build()?;

        let start = Instant::now();
        let report = classifier.classify(&reference, &candidates)?;
        let elapsed = start.elapsed();

        let present: Vec<&str> = report.present_ids().map(|id| id.as_str()).collect();
        println!(
            "   threshold {:.3}, present {:?}, flags {:?} ({:.2?})\n",
            report.threshold,
            present,
            report.presence().flags(),
            elapsed
        );
    }

    Ok(())
}
