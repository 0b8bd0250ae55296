//! Walks through the two model families side by side: how their tokenizers
//! split a sentence, BERT filling several masks, and T5 summarizing a passage.

use anyhow::Result;
use transformers_compare::pipelines::fill_mask_pipeline::*;
use transformers_compare::pipelines::summarization_pipeline::{
    SummarizationPipelineBuilder, T5Size,
};
use transformers_compare::pipelines::tokenization::TokenizedText;

const SENTENCE: &str = "Transformers tokenize text into subword units.";

const PROVERB: &str = "Nearly all men can [MASK] adversity, but if you want to test a man's \
                       character, give him [MASK].";

const PASSAGE: &str = "Abraham Lincoln was the 16th president of the United States, serving \
from 1861 until his assassination in 1865. He led the nation through the American Civil War, \
preserved the Union, abolished slavery, bolstered the federal government, and modernized the \
economy. Lincoln was born in a log cabin in Kentucky and was largely self-educated.";

fn show(label: &str, tokenized: &TokenizedText) {
    println!("[{label}] {} tokens", tokenized.len());
    println!("  tokens:  {:?}", tokenized.tokens);
    println!("  ids:     {:?}", tokenized.ids);
    println!("  decoded: {}", tokenized.decoded);
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let bert = FillMaskPipelineBuilder::bert(BertSize::BaseUncased).build()?;
    let t5 = SummarizationPipelineBuilder::t5(T5Size::Small)
        .max_length(150)
        .num_beams(4)
        .early_stopping(true)
        .build()?;

    println!("== Tokenization ==");
    show("bert-base-uncased", &bert.tokenize(SENTENCE)?);
    show("t5-small", &t5.tokenize(SENTENCE)?);

    println!("\n== Fill mask (BERT) ==");
    println!("input:  {PROVERB}");
    let resolved = bert.resolve(PROVERB)?;
    for (i, p) in resolved.predictions.iter().enumerate() {
        println!("  mask {i}: {} ({:.4})", p.token, p.score);
    }
    println!("output: {}", resolved.text);

    println!("\n== Summarization (T5) ==");
    println!("input:  {PASSAGE}");
    println!("output: {}", t5.summarize(PASSAGE)?);

    Ok(())
}
