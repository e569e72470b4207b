//! Conservative triage prompt construction.
//!
//! The provider contract: return ONLY a JSON object with `urgency`,
//! `severity`, `explanation`, and `red_flags`. Absent vitals are rendered
//! as "unknown" rather than omitted so the model cannot misread silence.

use crate::models::SymptomInput;

/// Build the triage prompt for one symptom submission.
pub fn build_triage_prompt(input: &SymptomInput) -> String {
    let temp = render_opt(input.vitals.temperature_c);
    let pain = render_opt(input.vitals.pain_score);
    let pregnant = render_opt(input.vitals.pregnant);
    let trauma = render_opt(input.vitals.recent_trauma);

    format!(
        r#"You are a conservative medical triage assistant.

The user is describing their symptoms. You must assign an urgency level and briefly explain why.
ALWAYS choose a higher urgency level if there is any uncertainty.

Input:
- Symptoms (free text): {symptoms}
- Temperature (C): {temp}
- Pain score (0-10): {pain}
- Pregnant: {pregnant}
- Recent trauma: {trauma}

Output:
Return ONLY a JSON object with exactly:
- "urgency": "LOW", "MODERATE", "URGENT", or "ER"
- "severity": number 0-10
- "explanation": short explanation (1-3 sentences)
- "red_flags": list of triggered red flags (or [])
"#,
        symptoms = input.text,
    )
}

fn render_opt<T: ToString>(value: Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "unknown".to_string(),
    }
}
