// Resume parsing: heuristic field extraction, confidence scoring, and the
// AI-first parse pipeline with local fallback.

pub mod extractor;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod scoring;
