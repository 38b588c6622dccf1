pub mod price_pipeline;
