//! Mission Prompts
//!
//! Prompt text for the generative service. The JSON shapes described here
//! must stay in step with `parser` and with the camelCase field names of
//! the mission model.

/// System prompt for the pre-mortem analysis of a brief.
pub fn analysis_system_prompt() -> String {
    r#"You are a veteran project strategist running a pre-mortem. Assume the project described by the user has already failed, work out why, and turn that into a plan.

Produce:
1. "projectName": a short, punchy name for the project (max 6 words).
2. "risks": 3 to 6 of the most likely reasons the project fails. Each risk has:
   - "id": unique identifier ("r1", "r2", ...)
   - "threat": one sentence describing what goes wrong
   - "probability": integer percentage from 0 to 100
   - "mitigation": one concrete preventive action
   - "severity": one of "critical", "high", "medium", "low"
3. "tasks": 6 to 12 atomic, completable steps that take the project from zero to launch, in execution order. Each task has:
   - "id": unique identifier ("t1", "t2", ...)
   - "description": one imperative sentence

Respond with ONLY a valid JSON object. No markdown fences, no explanatory text.

Example output:
{
  "projectName": "Global Company Rebrand",
  "risks": [
    {
      "id": "r1",
      "threat": "Stakeholder misalignment on new visual identity",
      "probability": 85,
      "mitigation": "Conduct preliminary mood-board workshops with key execs before design phase.",
      "severity": "high"
    }
  ],
  "tasks": [
    {"id": "t1", "description": "Audit current brand assets and digital touchpoints"}
  ]
}"#
    .to_string()
}

/// User message carrying the brief.
pub fn analysis_user_message(brief: &str) -> String {
    format!("Run a pre-mortem on the following mission brief:\n\n{}", brief)
}

/// Ask the model to fix a response that failed to parse or validate.
pub fn repair_prompt(original_response: &str, parse_error: &str) -> String {
    format!(
        "Your previous response could not be used.\n\n\
         Error: {}\n\n\
         Your previous response was:\n{}\n\n\
         Please respond with ONLY a valid JSON object with \"projectName\", \"risks\" and \"tasks\". \
         Every risk needs an \"id\" and a \"threat\"; every task needs an \"id\" and a \"description\". \
         No markdown fences, no explanatory text.",
        parse_error, original_response
    )
}

/// System prompt for manifesto-only generation.
pub fn manifesto_system_prompt() -> String {
    r####"You are a chief of staff writing an internal strategy manifesto. Write in confident, direct prose for the whole team.

Format rules (the manifesto is rendered by a minimal markdown renderer):
- Use "# ", "## " and "### " headings only.
- Use "- " for bullet points.
- Use **double asterisks** for emphasis; no other markdown.
- No tables, no links, no code blocks.
- Keep it under 400 words."####
        .to_string()
}

/// User message for manifesto generation.
pub fn manifesto_user_message(project_name: &str, mitigations: &[String]) -> String {
    format!(
        "Project: {}\n\nThe team has committed to these mitigations:\n{}\n\n\
         Write the project manifesto: a rallying opening, the guiding principles that follow from \
         the mitigations, and how success will be measured.",
        project_name,
        bullet_list(mitigations)
    )
}

/// System prompt for the combined manifesto + task list update.
pub fn strategy_system_prompt() -> String {
    r####"You are a chief of staff updating a project's business plan after a pre-mortem.

Produce:
1. "manifesto": the strategy manifesto as a single string. Use only "# ", "## ", "### " headings, "- " bullets and **double asterisk** emphasis. Under 400 words.
2. "tasks": 6 to 12 atomic, completable steps that build the committed mitigations into the plan, in execution order. Each task has:
   - "id": unique identifier ("t1", "t2", ...)
   - "description": one imperative sentence

Respond with ONLY a valid JSON object. No markdown fences, no explanatory text.

Example output:
{
  "manifesto": "# Rebrand With Intent\n\n**We ship nothing the executives have not seen.**",
  "tasks": [
    {"id": "t1", "description": "Schedule mood-board workshop with the executive team"}
  ]
}"####
    .to_string()
}

/// User message for the combined strategy update.
pub fn strategy_user_message(project_name: &str, mitigations: &[String]) -> String {
    format!(
        "Project: {}\n\nCommitted mitigations:\n{}\n\n\
         Update the business plan: write the manifesto and rebuild the task list around these mitigations.",
        project_name,
        bullet_list(mitigations)
    )
}

/// Image prompt for the mission patch.
pub fn mission_patch_prompt(project_name: &str) -> String {
    format!(
        "A circular embroidered mission patch for a project called \"{}\". \
         Bold vector emblem, space-program aesthetic, dark navy background with emerald accents, \
         the project name stitched around the border, clean edges, no photographic detail.",
        project_name
    )
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}
