//! Degraded-mode payloads returned when real inference is unavailable.
//!
//! Both payloads are fixed text. The code placeholder echoes the request,
//! inside comments only.

use super::generation::GenerationMode;

const CHAT_FALLBACK: &str = "\u{26a0}\u{fe0f} **AI Model Temporarily Unavailable**

I'm sorry, I couldn't reach the language model just now. Common causes:

\u{2022} Rate limits or a temporary service issue
\u{2022} The model is still starting up
\u{2022} Network connectivity problems

**What you can do:**
\u{2022} Ask again in a moment
\u{2022} Try the Code Generator for code examples
\u{2022} Check the server logs for technical details

Please try again shortly.";

/// Fixed chat message explaining the outage.
#[must_use]
pub fn chat_fallback() -> String {
    CHAT_FALLBACK.to_string()
}

/// Commented placeholder artifact that records `request` and suggests a retry.
#[must_use]
pub fn code_fallback(request: &str) -> String {
    let request_lines = request
        .trim()
        .lines()
        .map(|line| format!("//   {line}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "// \u{26a0}\u{fe0f} AI Code Generation Temporarily Unavailable
// Request:
{request_lines}

/*
 * The language model could not be reached for code generation.
 * Common causes:
 *
 * - Rate limits or a temporary service issue
 * - The model is still starting up
 * - Network connectivity problems
 *
 * Please try again in a few moments.
 */

function placeholderSolution() {{
    return {{
        status: 'pending',
        message: 'Code generation will be available shortly',
    }};
}}

module.exports = placeholderSolution;"
    )
}

/// Fallback payload for `mode`.
#[must_use]
pub fn compose(mode: GenerationMode, request: &str) -> String {
    match mode {
        GenerationMode::Chat => chat_fallback(),
        GenerationMode::Code => code_fallback(request),
    }
}
