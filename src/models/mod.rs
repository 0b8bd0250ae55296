pub mod bert;
pub mod generation;
pub mod modernbert;
pub mod t5;

pub use bert::{BertSize, FillMaskBertModel};
pub use modernbert::{FillMaskModernBertModel, ModernBertSize};
pub use t5::{T5Model, T5Size};
