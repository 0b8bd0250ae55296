//! Fill-mask pipeline tests against a scripted model; no downloads.

use candle_core::{Device, Tensor};
use std::str::FromStr;
use tokenizers::{Encoding, Tokenizer};
use transformers_compare::core::ModelOptions;
use transformers_compare::pipelines::fill_mask_pipeline::*;
use transformers_compare::{PipelineError, Result};

const VOCAB: &str = r#"{
    "[UNK]": 0, "[MASK]": 1, "nearly": 2, "all": 3, "men": 4, "can": 5,
    "fight": 6, "but": 7, "few": 8, "strength": 9, ",": 10, ".": 11, "[SEP]": 12
}"#;

const VOCAB_SIZE: usize = 13;

const FIGHT: u32 = 6;
const STRENGTH: u32 = 9;
const SEP: u32 = 12;

fn tokenizer_json() -> String {
    format!(
        r#"{{
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [
                {{ "id": 1, "content": "[MASK]", "single_word": false, "lstrip": false,
                   "rstrip": false, "normalized": false, "special": true }},
                {{ "id": 12, "content": "[SEP]", "single_word": false, "lstrip": false,
                   "rstrip": false, "normalized": false, "special": true }}
            ],
            "normalizer": null,
            "pre_tokenizer": {{ "type": "Whitespace" }},
            "post_processor": null,
            "decoder": null,
            "model": {{ "type": "WordLevel", "vocab": {VOCAB}, "unk_token": "[UNK]" }}
        }}"#
    )
}

#[derive(Debug, Clone)]
struct ScriptedOptions;

impl ModelOptions for ScriptedOptions {
    fn cache_key(&self) -> String {
        "scripted-fill-mask".into()
    }
}

/// Predicts "fight" for the first mask in the input and "strength" for any later one.
struct ScriptedModel {
    device: Device,
}

impl FillMaskModel for ScriptedModel {
    type Options = ScriptedOptions;

    fn new(_options: Self::Options, device: Device) -> Result<Self> {
        Ok(Self { device })
    }

    fn get_tokenizer(_options: Self::Options) -> Result<Tokenizer> {
        Tokenizer::from_str(&tokenizer_json())
            .map_err(|e| PipelineError::Tokenization(e.to_string()))
    }

    fn logits(&self, encoding: &Encoding) -> Result<Tensor> {
        let vocab = VOCAB_SIZE;
        let ids = encoding.get_ids();
        let mut data = vec![0f32; ids.len() * vocab];
        let mut seen = 0;
        for (pos, &id) in ids.iter().enumerate() {
            if id == 1 {
                let answer = if seen == 0 { FIGHT } else { STRENGTH };
                data[pos * vocab + answer as usize] = 10.0;
                seen += 1;
            }
        }
        Ok(Tensor::from_vec(data, (ids.len(), vocab), &self.device)?)
    }

    fn device(&self) -> &Device {
        &self.device
    }
}

fn pipeline() -> anyhow::Result<FillMaskPipeline<ScriptedModel>> {
    Ok(FillMaskPipelineBuilder::<ScriptedModel>::new(ScriptedOptions)
        .cpu()
        .build()?)
}

const SENTENCE: &str = "nearly all men can [MASK] , but few can [MASK] .";

#[test]
fn fills_every_mask_in_order() -> anyhow::Result<()> {
    let pipeline = pipeline()?;
    let out = pipeline.fill_mask(SENTENCE)?;
    assert_eq!(out, "nearly all men can fight , but few can strength .");
    assert!(!out.contains("[MASK]"));
    Ok(())
}

#[test]
fn resolve_reports_one_prediction_per_mask() -> anyhow::Result<()> {
    let resolved = pipeline()?.resolve(SENTENCE)?;
    let tokens: Vec<_> = resolved.predictions.iter().map(|p| p.token.as_str()).collect();
    assert_eq!(tokens, ["fight", "strength"]);
    assert!(resolved.predictions.iter().all(|p| p.score > 0.99));
    Ok(())
}

#[test]
fn text_without_masks_is_unchanged() -> anyhow::Result<()> {
    let pipeline = pipeline()?;
    assert_eq!(pipeline.fill_mask("nearly all men can")?, "nearly all men can");
    assert_eq!(pipeline.fill_mask("")?, "");
    Ok(())
}

#[test]
fn predict_top_k_orders_by_score() -> anyhow::Result<()> {
    let top = pipeline()?.predict_top_k(SENTENCE, 3)?;
    assert_eq!(top.len(), 3);
    assert_eq!(top[0].token, "fight");
    assert_eq!(top[0].token_id, FIGHT);
    assert!(top.windows(2).all(|w| w[0].score >= w[1].score));
    Ok(())
}

#[test]
fn predict_without_mask_errors() -> anyhow::Result<()> {
    let err = pipeline()?.predict("nearly all men").unwrap_err();
    assert!(matches!(err, PipelineError::MaskNotFound { found: 0, .. }));
    Ok(())
}

#[test]
fn predict_each_scores_masks_independently() -> anyhow::Result<()> {
    let all = pipeline()?.predict_each(SENTENCE, 1)?;
    assert_eq!(all.len(), 2);
    assert_eq!(all[0][0].token, "fight");
    assert_eq!(all[1][0].token, "strength");
    Ok(())
}

#[test]
fn tokenize_shows_mask_token() -> anyhow::Result<()> {
    let pipeline = pipeline()?;
    assert_eq!(pipeline.mask_token(), "[MASK]");
    let tokenized = pipeline.tokenize("all men can [MASK]")?;
    assert_eq!(tokenized.tokens, ["all", "men", "can", "[MASK]"]);
    assert_eq!(tokenized.ids, [3, 4, 5, 1]);
    assert_eq!(tokenized.decoded, "all men can");
    Ok(())
}

#[test]
fn device_is_cpu() -> anyhow::Result<()> {
    assert!(pipeline()?.device().is_cpu());
    Ok(())
}

#[derive(Debug, Clone)]
struct SepOptions;

impl ModelOptions for SepOptions {
    fn cache_key(&self) -> String {
        "sep-fill-mask".into()
    }
}

/// Puts all its mass on the `[SEP]` special token at every position.
struct SepModel {
    device: Device,
}

impl FillMaskModel for SepModel {
    type Options = SepOptions;

    fn new(_options: Self::Options, device: Device) -> Result<Self> {
        Ok(Self { device })
    }

    fn get_tokenizer(_options: Self::Options) -> Result<Tokenizer> {
        ScriptedModel::get_tokenizer(ScriptedOptions)
    }

    fn logits(&self, encoding: &Encoding) -> Result<Tensor> {
        let len = encoding.get_ids().len();
        let mut data = vec![0f32; len * VOCAB_SIZE];
        for pos in 0..len {
            data[pos * VOCAB_SIZE + SEP as usize] = 10.0;
        }
        Ok(Tensor::from_vec(data, (len, VOCAB_SIZE), &self.device)?)
    }

    fn device(&self) -> &Device {
        &self.device
    }
}

#[test]
fn special_token_predictions_keep_their_text() -> anyhow::Result<()> {
    let pipeline = FillMaskPipelineBuilder::<SepModel>::new(SepOptions).cpu().build()?;

    let resolved = pipeline.resolve("all men can [MASK] .")?;
    assert_eq!(resolved.predictions[0].token_id, SEP);
    assert_eq!(resolved.predictions[0].token, "[SEP]");
    assert_eq!(resolved.text, "all men can [SEP] .");

    let top = pipeline.predict_top_k("all men can [MASK] .", 1)?;
    assert_eq!(top[0].token, "[SEP]");
    Ok(())
}
