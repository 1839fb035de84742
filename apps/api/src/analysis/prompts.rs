// Resume analysis LLM prompt templates.
// Placeholders: {persona}, {context}, {fence_instruction}, {score_keys},
// {feedback_sections}, {job_description}, {resume_text}.

use crate::analysis::schema::SchemaVariant;
use crate::llm_client::prompts::{
    FEEDBACK_SECTIONS_INSTRUCTION, FENCED_JSON_INSTRUCTION, NO_JOB_DESCRIPTION,
    REVIEWER_PERSONA,
};

const CONTEXT_BLOCK: &str = "\
**Context:**
- The candidate's resume is provided below.
- The target job description is also provided (if available). Your primary goal is to assess the resume's suitability for this specific role. If no job description is provided, perform a general analysis for a professional role.";

const SCORE_KEYS: &str = "\
- \"Clarity_and_Formatting\": How readable, clean, and professional the resume is.
- \"Impact_and_Achievements\": How well the resume uses quantifiable results and action verbs to show impact.
- \"ATS_Friendliness\": How well the resume is optimized for Applicant Tracking Systems (e.g., standard format, keywords).
- \"Job_Fit\": How well the resume content (skills, experience) aligns with the provided job description. Score 5 if no job description is provided.";

pub const SCORECARD_PROMPT_TEMPLATE: &str = r#"{persona}

{context}

**Instructions for your output:**
Your response MUST be structured in two parts:

PART 1: A JSON object containing your quantitative scores. {fence_instruction}
The JSON object must have the following keys with integer values from 1 to 10:
{score_keys}

{feedback_sections}

---
**Job Description:**
{job_description}
---
**Resume Content:**
{resume_text}
---"#;

pub const SECTION_ANALYSIS_PROMPT_TEMPLATE: &str = r#"{persona}

{context}

**Instructions for your output:**
Your response MUST be structured in two parts:

PART 1: A JSON object with exactly two keys, "scores" and "section_analysis". {fence_instruction}
"scores" must be an object with the following keys with integer values from 1 to 10:
{score_keys}
"section_analysis" must be an object mapping each resume section you identify (for example "Experience", "Skills", "Education", "Projects", "Summary") to the percentage of the resume's content it occupies. The percentages must be numbers that sum to 100.

Example shape:
```json
{"scores": {"Clarity_and_Formatting": 7, "Impact_and_Achievements": 6, "ATS_Friendliness": 8, "Job_Fit": 5}, "section_analysis": {"Experience": 50, "Skills": 20, "Education": 15, "Projects": 15}}
```

{feedback_sections}

---
**Job Description:**
{job_description}
---
**Resume Content:**
{resume_text}
---"#;

/// Renders the analysis prompt for `schema`. A blank job description is
/// replaced with an explicit "not provided" note.
pub fn build_analysis_prompt(
    schema: SchemaVariant,
    resume_text: &str,
    job_description: Option<&str>,
) -> String {
    let template = match schema {
        SchemaVariant::Simple => SCORECARD_PROMPT_TEMPLATE,
        SchemaVariant::WithSectionAnalysis => SECTION_ANALYSIS_PROMPT_TEMPLATE,
    };
    let job_description = job_description
        .map(str::trim)
        .filter(|jd| !jd.is_empty())
        .unwrap_or(NO_JOB_DESCRIPTION);

    // User text goes in last, resume before JD: the JD placeholder precedes the
    // resume placeholder, so neither input can be mistaken for a placeholder.
    template
        .replace("{persona}", REVIEWER_PERSONA)
        .replace("{context}", CONTEXT_BLOCK)
        .replace("{fence_instruction}", FENCED_JSON_INSTRUCTION)
        .replace("{score_keys}", SCORE_KEYS)
        .replace("{feedback_sections}", FEEDBACK_SECTIONS_INSTRUCTION)
        .replacen("{resume_text}", resume_text, 1)
        .replacen("{job_description}", job_description, 1)
}
