pub mod extractous_extractor;
