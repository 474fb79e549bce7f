use presence_cli::presence_metrics::{ClassifierConfig, ThresholdStrategy};
use presence_cli::PipelineConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Pipeline Configuration Serialization Demo");
    println!("=========================================\n");

    let mut pipeline = PipelineConfig::default();
    pipeline.classifier = ClassifierConfig::legacy_preset().with_name("Historical");
    pipeline.collector.max_corners = 40;
    println!("{}\n", pipeline.summary());

    let json = pipeline.to_json()?;
    println!("JSON:\n{}\n", json);

    let toml_str = pipeline.to_toml()?;
    println!("TOML:\n{}", toml_str);

    let dir = std::env::temp_dir().join("presence-config-demo");
    std::fs::create_dir_all(&dir)?;
    for name in ["pipeline.json", "pipeline.toml"] {
        let path = dir.join(name);
        pipeline.save(&path)?;
        let loaded = PipelineConfig::load(&path)?;
        assert_eq!(loaded, pipeline);
        println!("Round-trip through {} is consistent", path.display());
    }

    println!("\nPresets:");
    let presets = vec![
        ("default", ClassifierConfig::default()),
        ("legacy", ClassifierConfig::legacy_preset()),
        ("any count", ClassifierConfig::any_count_preset()),
    ];
    println!("   {:<12} {:<10} {:<16}", "Name", "Median", "Threshold");
    println!("   {}", "-".repeat(40));
    for (name, config) in &presets {
        println!(
            "   {:<12} {:<10} {:<16}",
            name,
            config.median_policy.to_string(),
            config.threshold_strategy.to_string()
        );
    }

    let partial = PipelineConfig::from_toml("[classifier]\nthreshold_strategy = \"mean\"\n")?;
    assert_eq!(partial.classifier.threshold_strategy, ThresholdStrategy::Mean);
    println!("\nPartial TOML keeps defaults: {}", partial.collector.summary());

    Ok(())
}
