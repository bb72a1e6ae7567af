pub mod ai_summary;
pub mod confidence;
pub mod depth;
pub mod engine;
pub mod enrichment;
pub mod notifier;
pub mod refresh;
pub mod status_log;
pub mod sync;

#[cfg(test)]
mod ai_summary_tests;
#[cfg(test)]
mod confidence_tests;
#[cfg(test)]
mod enrichment_tests;
