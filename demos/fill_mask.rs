use anyhow::Result;
use transformers_compare::pipelines::fill_mask_pipeline::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("Building fill-mask pipeline...");
    let pipeline = FillMaskPipelineBuilder::modernbert(ModernBertSize::Base).build()?;
    println!("Pipeline built successfully.");

    let prompt = "The capital of France is [MASK].";
    println!("\nTop predictions for: '{prompt}'");
    for p in pipeline.predict_top_k(prompt, 5)? {
        println!("  {:<12} {:.4}", p.token, p.score);
    }

    let prompt = "I love my [MASK] car, it is the [MASK] thing I own.";
    println!("\nFilling every mask in: '{prompt}'");
    let resolved = pipeline.resolve(prompt)?;
    for (i, p) in resolved.predictions.iter().enumerate() {
        println!("  mask {i}: {} ({:.4})", p.token, p.score);
    }
    println!("\n{}", resolved.text);

    Ok(())
}
