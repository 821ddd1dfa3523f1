// Prompt constants for portfolio generation. Two fixed variants: the full
// brief for the providers with roomy context handling, and a compact brief
// for the fast-inference backends.

/// Full generation brief. Replace `{resume_text}` before sending.
pub const PORTFOLIO_PROMPT_FULL: &str = r#"You are a professional web designer. Generate a beautiful, responsive HTML5 portfolio website from this resume.
Include: header, about, skills, experience, education, and footer.
Use modern CSS, responsive design, and professional colors.
Return ONLY the HTML with embedded CSS starting with <!DOCTYPE html> and nothing else.

Resume: {resume_text}"#;

/// Compact generation brief used by Groq, Together, and Qwen.
pub const PORTFOLIO_PROMPT_COMPACT: &str = r#"You are a professional web designer. Generate beautiful HTML5 portfolio from this resume.
Return ONLY HTML with embedded CSS starting with <!DOCTYPE html> and nothing else.

Resume: {resume_text}"#;

/// Embeds the resume text verbatim into a prompt template.
pub fn render_prompt(template: &str, resume_text: &str) -> String {
    template.replace("{resume_text}", resume_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_prompt_embeds_resume_verbatim() {
        let resume = "Jane Doe\njane@x.com\nSkills: Rust";
        let prompt = render_prompt(PORTFOLIO_PROMPT_FULL, resume);
        assert!(prompt.contains(resume));
        assert!(!prompt.contains("{resume_text}"));
    }

    #[test]
    fn test_both_briefs_demand_doctype_only_output() {
        for template in [PORTFOLIO_PROMPT_FULL, PORTFOLIO_PROMPT_COMPACT] {
            assert!(template.contains("<!DOCTYPE html>"));
            assert!(template.contains("{resume_text}"));
        }
    }
}
