// Resume analysis: prompt → single LLM call → response parsing.
// All LLM calls go through llm_client — no direct HTTP calls here.

pub mod feedback;
pub mod handlers;
pub mod parser;
pub mod prompts;
pub mod schema;
pub mod service;
