// Matching LLM prompt templates.
// Both response shapes below are parsed by `matching::parser`; keep them in sync.

pub const EXTRACTION_SYSTEM: &str = "\
Extract the academic major and key skills or research interests from this document. \
The document is either a resume or a transcript for a university student who is \
looking for research lab opportunities. Read through it to understand the student's \
skills, interests, background, and experience. \
Respond in exactly this format and nothing else:\n\
Major: <major>\n\
Keywords: <comma-separated keywords>";

pub const EXTRACTION_PROMPT: &str = "\
Analyze this document and extract the most relevant academic major along with \
keywords that represent the student's skills or research interests.";

pub const EXTRACTION_MAX_TOKENS: u32 = 300;

pub const SCORING_SYSTEM_TEMPLATE: &str = r#"Analyze the following details about a student and compare them with the lab descriptions provided. For EVERY lab in the list, provide:
- A similarity score (an integer between 1 and 5).
- A concise match reason (no more than about 20 words) explaining why the lab is or is not a good match for the student.
Strongly consider the applicant's major ("{major}") and keywords ("{keywords}") when performing your analysis.
Respond in the following exact format for each lab:
Lab ID: <id>
Similarity Score: <score>
Match Reason: <reason>
---"#;

pub const SCORING_PROMPT_TEMPLATE: &str = r#"Details:
Major: {major}
Keywords: {keywords}

Lab Descriptions:
{catalog_json}"#;

pub const SCORING_MAX_TOKENS: u32 = 4096;
