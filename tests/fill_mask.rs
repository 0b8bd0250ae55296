//! Integration tests for the fill mask pipeline.
//! Run with: cargo test --features integration

#![cfg(feature = "integration")]

use transformers_compare::pipelines::fill_mask_pipeline::*;

const PROVERB: &str = "Nearly all men can [MASK] adversity, but if you want to test a man's \
                       character, give him [MASK].";

#[test]
fn bert_fills_every_mask() -> anyhow::Result<()> {
    let pipeline = FillMaskPipelineBuilder::bert(BertSize::BaseUncased).cpu().build()?;
    let resolved = pipeline.resolve(PROVERB)?;
    assert_eq!(resolved.predictions.len(), 2);
    assert!(!resolved.text.contains("[MASK]"));
    assert!(resolved.predictions.iter().all(|p| p.score > 0.0 && p.score <= 1.0));
    Ok(())
}

#[test]
fn bert_predicts_capital() -> anyhow::Result<()> {
    let pipeline = FillMaskPipelineBuilder::bert(BertSize::BaseUncased).cpu().build()?;
    let top = pipeline.predict_top_k("The capital of France is [MASK].", 5)?;
    assert_eq!(top.len(), 5);
    assert!(top.iter().any(|p| p.token == "paris"));
    Ok(())
}

#[test]
fn modernbert_predict() -> anyhow::Result<()> {
    let pipeline = FillMaskPipelineBuilder::modernbert(ModernBertSize::Base)
        .cpu()
        .build()?;
    let res = pipeline.predict("The capital of France is [MASK].")?;
    assert!(!res.token.trim().is_empty());
    assert!(res.score >= 0.0 && res.score <= 1.0);
    Ok(())
}

#[test]
fn predict_without_mask_errors() -> anyhow::Result<()> {
    let pipeline = FillMaskPipelineBuilder::bert(BertSize::BaseUncased).cpu().build()?;
    assert!(pipeline.predict("").is_err());
    assert_eq!(pipeline.fill_mask("no masks here")?, "no masks here");
    Ok(())
}
