use anyhow::Result;
use transformers_compare::pipelines::summarization_pipeline::*;

const ARTICLE: &str = "The tower is 324 metres (1,063 ft) tall, about the same height as an \
81-storey building, and the tallest structure in Paris. Its base is square, measuring 125 metres \
(410 ft) on each side. During its construction, the Eiffel Tower surpassed the Washington \
Monument to become the tallest man-made structure in the world, a title it held for 41 years \
until the Chrysler Building in New York City was finished in 1930.";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("Building summarization pipeline...");
    let pipeline = SummarizationPipelineBuilder::t5(T5Size::Small)
        .max_length(150)
        .num_beams(4)
        .early_stopping(true)
        .build()?;
    println!("Pipeline built successfully.");
    println!("Settings: {:?}", pipeline.config());

    let summary = pipeline.summarize(ARTICLE)?;

    println!("\n--- Summary ---");
    println!("{summary}");
    println!("--- End ---\n");

    Ok(())
}
