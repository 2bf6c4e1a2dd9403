//! Offline demo responses. Never contacts the provider.

/// Canned reply for the `/generate` demo endpoint.
///
/// `kind == Some("code")` selects the code template; anything else gets prose.
#[must_use]
pub fn canned_response(prompt: &str, kind: Option<&str>) -> String {
    if kind == Some("code") {
        format!(
            "// Generated code for: {prompt}
function example() {{
  console.log(\"This is generated code based on your prompt:\");
  console.log({prompt:?});

  // Add your implementation here
  return \"Generated code result\";
}}

// Usage example
example();"
        )
    } else {
        format!(
            "Based on your prompt \"{prompt}\", here's a comprehensive response:

This is a simulated response standing in for a hosted model. A live reply \
would be tailored to your request.

Key points:
\u{2022} Addresses your specific query
\u{2022} Provides actionable insights
\u{2022} Maintains context from the conversation
\u{2022} Offers helpful suggestions when appropriate

Would you like me to elaborate on any particular aspect of this response?"
        )
    }
}
