// Interview preparation: prompt building, the fallback template engine and
// the guide pipeline that ties them to the LLM client.
// All model calls go through llm_client.

pub mod guide;
pub mod handlers;
pub mod patterns;
pub mod prompt_builder;
pub mod templates;
