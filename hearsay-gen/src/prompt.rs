//! Prompt templates and the deterministic template renderer.
//!
//! The HTTP backend fills the `{placeholder}` templates below; the template
//! backend skips the network entirely and assembles gossip text locally.
//! The template renderer is a pure function of the request, which is what
//! makes the narration cache safe to memoize.

use crate::types::NarrationRequest;

/// System prompt for the HTTP narration backend.
pub const NARRATION_SYSTEM: &str = r"You are narrating a rumor as it is told inside a game world.
The register is {theme}; the teller speaks in a {personality} manner.

RULES:
- Stay in-world. Never mention games, players, or systems.
- One or two sentences, spoken aloud, not written prose.
- Distortion {distortion_level}: at 0.0 repeat the facts plainly; near 1.0 garble names, places, and scale.
- The story has been retold {retelling_count} times already; let that show.";

/// User prompt for the HTTP narration backend.
pub const NARRATION_USER: &str = r"What actually happened: {event_summary}
Time since the event: {time_since_event_secs} seconds.

Tell it the way this teller would. Reply with the spoken line only, no quotes, no commentary.";

fn fill(template: &str, request: &NarrationRequest) -> String {
    template
        .replace("{theme}", &request.params.theme)
        .replace("{personality}", &request.params.npc_personality)
        .replace(
            "{distortion_level}",
            &format!("{:.2}", request.params.distortion_level),
        )
        .replace(
            "{retelling_count}",
            &request.params.retelling_count.to_string(),
        )
        .replace("{event_summary}", &request.event_summary)
        .replace(
            "{time_since_event_secs}",
            &request.params.time_since_event_secs.to_string(),
        )
}

/// Render the system prompt for a request.
#[must_use]
pub fn render_system(request: &NarrationRequest) -> String {
    fill(NARRATION_SYSTEM, request)
}

/// Render the user prompt for a request.
#[must_use]
pub fn render_user(request: &NarrationRequest) -> String {
    fill(NARRATION_USER, request)
}

const ATTRIBUTIONS: [&str; 4] = [
    "I saw it with my own eyes:",
    "I heard that",
    "word is that",
    "someone swears that",
];

const STALENESS: [(u64, &str); 4] = [
    (300, "just now"),
    (3600, "earlier today"),
    (86_400, "not long ago"),
    (u64::MAX, "a while back"),
];

/// Deterministic offline narration.
///
/// Picks the attribution from the distortion level and the staleness phrase
/// from the event age. Same request in, same text out.
#[must_use]
pub fn render_template(request: &NarrationRequest) -> String {
    let d = request.params.distortion_level;
    let attribution = if d < 0.2 {
        ATTRIBUTIONS[0]
    } else if d < 0.4 {
        ATTRIBUTIONS[1]
    } else if d < 0.7 {
        ATTRIBUTIONS[2]
    } else {
        ATTRIBUTIONS[3]
    };

    let when = STALENESS
        .iter()
        .find(|(limit, _)| request.params.time_since_event_secs < *limit)
        .map_or("a while back", |(_, phrase)| phrase);

    let mut text = format!("{attribution} {}, {when}", request.event_summary.trim());
    if request.params.retelling_count >= 3 {
        text.push_str(", or so the story goes by now");
    }
    text.push('.');
    text
}
