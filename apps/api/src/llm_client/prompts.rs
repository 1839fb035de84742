// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains the cross-cutting pieces.

/// Reviewer persona that opens every analysis prompt.
pub const REVIEWER_PERSONA: &str = "\
You are an expert career coach and professional resume reviewer for a top tech company.
Your task is to provide a comprehensive evaluation of a resume.";

/// Placeholder inserted when the user did not paste a job description.
pub const NO_JOB_DESCRIPTION: &str = "Not provided. Please perform a general analysis.";

/// Instruction describing the fenced JSON block the response parser expects.
/// The parser's fence pattern (analysis::parser) must change together with this text.
pub const FENCED_JSON_INSTRUCTION: &str = "\
This JSON object must be enclosed in triple backticks tagged as json, with the opening \
```json marker on its own line and the closing ``` marker on its own line. \
Do not include any text before this JSON block.";

/// The qualitative part of every analysis reply. Titles double as lookup keys
/// for the feedback panels (report::views).
pub const FEEDBACK_SECTIONS_INSTRUCTION: &str = "\
PART 2: A detailed qualitative analysis in Markdown format. This part should come AFTER the JSON block. Use the following exact headings:
### ✅ Key Strengths
(List 2-3 specific things the resume does well.)

### 💡 Areas for Improvement
(Provide a detailed, actionable list of the most important changes. Focus on rephrasing bullet points, adding metrics, and tailoring content.)

### 🤖 ATS & Keyword Optimization
(Give advice on how to improve the resume for Applicant Tracking Systems. Suggest specific keywords from the job description that are missing from the resume.)";
