//! System prompts for the discussion partner.

const INCIDENT_PLACEHOLDER: &str = "{{INCIDENT}}";

const TEMPLATES: &[(&str, &str)] = &[
    ("host1", include_str!("./prompts/host1.md")),
    ("host2", include_str!("./prompts/host2.md")),
    ("host3", include_str!("./prompts/host3.md")),
    ("host4", include_str!("./prompts/host4.md")),
];

/// The prompt used when the partner identifier matches no template.
pub const DEFAULT_TEMPLATE: &str = include_str!("./prompts/default.md");

/// Returns the raw template registered for `partner_id`, if any.
#[inline]
pub fn registered_template(partner_id: &str) -> Option<&'static str> {
    TEMPLATES
        .iter()
        .find(|(id, _)| *id == partner_id)
        .map(|(_, template)| *template)
}

/// Builds the system prompt for a session.
///
/// Unknown identifiers are not an error: they get [`DEFAULT_TEMPLATE`].
pub fn build_system_prompt(partner_id: &str, initial_incident: &str) -> String {
    let template = registered_template(partner_id).unwrap_or_else(|| {
        warn!("unknown partner id {partner_id:?}, using the default prompt");
        DEFAULT_TEMPLATE
    });
    template.replace(INCIDENT_PLACEHOLDER, initial_incident)
}

/// Builds the user message for every exchange after the opening one.
///
/// The whole transcript is sent each time, so the model has to be told it
/// is continuing an existing conversation.
pub fn context_prompt(flattened_transcript: &str) -> String {
    format!(
        "Here's the context of the conversation: {flattened_transcript}. \
         Note: this is the history of the conversation you are hosting with \
         the participant. It starts with the participant's recalled anger \
         incident, and as the conversation builds up it gives you the \
         context of what was said. Analyze it and continue the \
         conversation; don't start over."
    )
}
