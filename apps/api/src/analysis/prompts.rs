// LLM prompt for the ATS comparison.
// The model receives a single user message; there is no system prompt.

/// First line of every analysis prompt.
pub const ANALYSIS_PROMPT_HEADER: &str =
    "You are an ATS Scanner. Compare the Resume to the Job Description.";

/// Fixed instructions between the header and the embedded documents.
const ANALYSIS_PROMPT_FORMAT: &str = r#"Return a valid JSON object. Do not use Markdown.

Format:
{
  "score": number (0-100),
  "missingKeywords": ["keyword1", "keyword2", "keyword3"],
  "suggestions": ["specific actionable tip 1", "specific actionable tip 2", "specific actionable tip 3"] (keep suggestions short and to the point, do not use special characters, you may use **bold** for emphasis)
}"#;

/// Builds the analysis prompt. Both inputs are embedded verbatim, whatever
/// their size or content.
pub fn build_prompt(job_description: &str, resume_text: &str) -> String {
    format!(
        "{ANALYSIS_PROMPT_HEADER}\n{ANALYSIS_PROMPT_FORMAT}\n\n\
         JOB DESCRIPTION:\n{job_description}\n\n\
         RESUME TEXT:\n{resume_text}"
    )
}
