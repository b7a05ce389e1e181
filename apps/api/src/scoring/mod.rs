// AI scoring side of the candidate review pipeline:
// materials aggregation, prompt building, suggestion client, orchestration.
// All inference calls go through llm_client.

pub mod handlers;
pub mod materials;
pub mod pipeline;
pub mod prompts;
pub mod suggestion;
