//! Prompt for study-plan drafting.

pub const STUDY_PLAN_PROMPT_TEMPLATE: &str = r#"Create a detailed study plan for the following:
- Topic: {topic}
- Level: {level}
- Duration: {duration}

Provide a structured, actionable study plan with daily milestones."#;

pub fn build_study_plan_prompt(topic: &str, level: &str, duration: &str) -> String {
    STUDY_PLAN_PROMPT_TEMPLATE
        .replace("{topic}", topic)
        .replace("{level}", level)
        .replace("{duration}", duration)
}
