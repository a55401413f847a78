//! Prompt for the compatibility matcher.

pub const MATCH_PROMPT_TEMPLATE: &str = r#"You are an expert in matching students with tutors/study buddies. Analyze the compatibility between these two profiles and provide a match score (0-100) and reasoning.

Student Profile:
{student_profile}

Tutor/Buddy Profile:
{tutor_profile}

Respond in JSON format:
{
  "score": <number 0-100>,
  "reasoning": "<brief explanation>"
}"#;

pub fn build_match_prompt(student_profile: &str, tutor_profile: &str) -> String {
    MATCH_PROMPT_TEMPLATE
        .replace("{student_profile}", student_profile)
        .replace("{tutor_profile}", tutor_profile)
}
