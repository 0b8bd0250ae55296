pub mod fill_mask_pipeline;
pub mod summarization_pipeline;
pub mod tokenization;
pub mod utils;
