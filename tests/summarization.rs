//! Integration tests for the summarization pipeline.
//! Run with: cargo test --features integration

#![cfg(feature = "integration")]

use transformers_compare::pipelines::summarization_pipeline::*;

const ARTICLE: &str = "The tower is 324 metres tall, about the same height as an 81-storey \
    building, and the tallest structure in Paris. Its base is square, measuring 125 metres on \
    each side. During its construction, the Eiffel Tower surpassed the Washington Monument to \
    become the tallest man-made structure in the world.";

#[test]
fn t5_small_summarizes() -> anyhow::Result<()> {
    let pipeline = SummarizationPipelineBuilder::t5(T5Size::Small)
        .cpu()
        .max_length(60)
        .num_beams(4)
        .early_stopping(true)
        .build()?;
    let summary = pipeline.summarize(ARTICLE)?;
    assert!(!summary.is_empty());
    assert!(summary.len() < ARTICLE.len());
    Ok(())
}

#[test]
fn t5_reads_task_prefix_from_checkpoint() -> anyhow::Result<()> {
    let pipeline = SummarizationPipelineBuilder::t5(T5Size::Small).cpu().build()?;
    assert_eq!(pipeline.config().prefix, "summarize: ");
    Ok(())
}

#[test]
fn greedy_and_beam_both_terminate() -> anyhow::Result<()> {
    let greedy = SummarizationPipelineBuilder::t5(T5Size::Small)
        .cpu()
        .num_beams(1)
        .max_length(30)
        .build()?;
    let ids = greedy.generate_ids(ARTICLE)?;
    assert!(!ids.is_empty() && ids.len() < 30);
    Ok(())
}
