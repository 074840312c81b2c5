pub mod completion;
pub mod folding;
pub mod semantic_tokens;
