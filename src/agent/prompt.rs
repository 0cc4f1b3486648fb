//! Outbound prompt construction.

use crate::provider::ProviderRequest;
use crate::types::{GenerationSettings, PromptMessage};

use super::conversation::Conversation;

/// Fixed instruction sent as the first message of every prompt.
pub const SYSTEM_PROMPT: &str = "You are an expert web developer who builds clean, modern websites \
with HTML, CSS, and vanilla JavaScript. Build complete, professional pages from the user's requests.

Rules:
1. Produce a single HTML file with CSS embedded in <style> and JavaScript embedded in <script>.
2. Use semantic HTML5 elements, CSS Grid or Flexbox, and CSS custom properties.
3. Make the layout responsive for mobile, tablet, and desktop.
4. Prefer modern CSS (oklch colors, :has(), container queries) where it helps.
5. Make the page accessible: ARIA labels, semantic structure, keyboard navigation.
6. Keep JavaScript minimal and limited to the interactivity the page needs.
7. Do not use external libraries or frameworks.
8. Include a DOCTYPE, a viewport meta tag, and a character encoding declaration.
9. Use https://via.placeholder.com for placeholder images.

Respond with a single complete HTML document inside one ```html code block, optionally \
preceded by a short explanation.";

/// First line of the message that frames a request as an edit of the current document.
pub const EDIT_CONTEXT_HEADER: &str = "MODIFICATION REQUEST";

fn edit_context(document: &str) -> String {
    format!(
        "{EDIT_CONTEXT_HEADER}: the user's next message asks for changes to the website below. \
Apply the requested changes to this document and return the entire updated HTML document, \
not a fragment or a diff.\n\nCurrent document:\n```html\n{document}\n```"
    )
}

/// Build the provider request for the conversation's latest user turn.
///
/// Layout: system instruction, earlier turns, the edit context (only when a document
/// exists), then the latest turn. `history_window` bounds how many turns are sent.
pub fn build_request(
    conversation: &Conversation,
    settings: &GenerationSettings,
    history_window: Option<usize>,
) -> ProviderRequest {
    let turns = match history_window {
        Some(n) => conversation.last_n(n.max(1)),
        None => conversation.turns(),
    };

    let mut messages = Vec::with_capacity(turns.len() + 2);
    messages.push(PromptMessage::system(SYSTEM_PROMPT));

    if let Some((latest, earlier)) = turns.split_last() {
        messages.extend(earlier.iter().map(PromptMessage::from));
        if let Some(document) = conversation.current_document() {
            messages.push(PromptMessage::system(edit_context(document)));
        }
        messages.push(PromptMessage::from(latest));
    }

    ProviderRequest {
        messages,
        settings: settings.clone(),
    }
}
