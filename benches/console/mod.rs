pub mod dtb;
pub mod format;
pub mod tokenizer;
