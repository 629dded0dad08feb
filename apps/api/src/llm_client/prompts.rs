// Cross-cutting prompt fragments shared by every LLM caller.
// Each feature that needs LLM calls defines its own prompts.rs alongside it.

/// Appended to system prompts whose output is parsed as a single JSON object.
pub const JSON_OBJECT_INSTRUCTION: &str = "\
Respond with a single JSON object only. \
Do NOT wrap it in markdown code fences. \
Do NOT include explanations before or after the object.";
