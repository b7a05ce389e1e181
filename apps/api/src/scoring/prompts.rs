// Prompt Builder for AI candidate suggestions.
// Pure and deterministic: same bundle and hints always give the same prompt.

use crate::scoring::materials::MaterialsBundle;

/// Stated explicitly so the model knows the resume text is absent rather than empty.
pub const NO_DOCUMENT_TEXT: &str = "No extracted text available.";

const ROLE_FRAMING: &str = "You are an experienced recruiter screening a job application. \
Judge how well the candidate fits the role using only the materials below. \
Do not invent experience that is not stated.";

const OUTPUT_CONTRACT: &str = r#"OUTPUT:
Return a strict JSON object with exactly two keys and nothing else:
{"rating": <integer from 1 to 5>, "summary": "<2-3 sentence plain-text summary of fit>"}
1 means a poor fit and 5 means an excellent fit. The summary must be plain text, no markdown."#;

/// Builds the suggestion prompt from a materials bundle and optional reviewer hints.
pub fn build_suggestion_prompt(bundle: &MaterialsBundle, hints: &[String]) -> String {
    let mut prompt = String::new();
    prompt.push_str(ROLE_FRAMING);
    prompt.push_str("\n\n");

    prompt.push_str(&format!("JOB TITLE:\n{}\n\n", bundle.job_title.trim()));
    prompt.push_str(&format!(
        "JOB DESCRIPTION:\n{}\n\n",
        bundle.job_description.trim()
    ));
    if let Some(requirements) = &bundle.job_requirements {
        prompt.push_str(&format!("JOB REQUIREMENTS:\n{}\n\n", requirements.trim()));
    }

    if let Some(cover_letter) = &bundle.cover_letter {
        prompt.push_str(&format!("COVER LETTER:\n{}\n\n", cover_letter.trim()));
    }

    prompt.push_str("RESUME / DOCUMENT TEXT:\n");
    prompt.push_str(bundle.document_text.as_deref().unwrap_or(NO_DOCUMENT_TEXT));
    prompt.push_str("\n\n");

    let hints: Vec<&str> = hints
        .iter()
        .map(|h| h.trim())
        .filter(|h| !h.is_empty())
        .collect();
    if !hints.is_empty() {
        prompt.push_str("ADDITIONAL GUIDANCE FROM THE REVIEWER:\n");
        for hint in hints {
            prompt.push_str(&format!("- {hint}\n"));
        }
        prompt.push('\n');
    }

    prompt.push_str(OUTPUT_CONTRACT);
    prompt
}
