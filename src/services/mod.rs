pub mod dictionary;
pub mod scheduling;
pub mod vocab_sets;
pub mod word_pool;
