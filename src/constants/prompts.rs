pub const QUIZ_SYSTEM_PROMPT: &str =
    "You are an expert educator writing exam-style quiz questions for students. You reply with a JSON array and nothing else.";

/// Placeholders: {subject} {unit} {topics} {count} {difficulty} {item_types}
pub const QUIZ_GENERATION_PROMPT: &str = "Subject: {subject}
Unit: {unit}
Topics: {topics}

Generate {count} quiz questions that test understanding of these topics.

## REQUIREMENTS
- Difficulty level: {difficulty}
- Allowed question types: {item_types}
- Choice questions (mcq, true_false, code_output) have between 2 and 6 options
- The correct_answer must be copied exactly from one of the options
- fill_blank questions have an empty options array
- Every question names the concept it tests
- Use real topic names, never placeholders such as {topic}
- Questions test understanding, not memorisation of wording

## OUTPUT FORMAT
Return a single JSON array. No prose, no markdown fences, no extra keys.

[
  {
    \"question\": \"Question text?\",
    \"options\": [\"Option A\", \"Option B\", \"Option C\", \"Option D\"],
    \"correct_answer\": \"Option A\",
    \"concept\": \"Concept being tested\",
    \"question_type\": \"mcq\",
    \"explanation\": \"Why the correct answer is correct\"
  }
]";

pub const MATERIAL_SYSTEM_PROMPT: &str =
    "You are a study assistant that recommends high quality, publicly reachable learning resources. You reply with a JSON array and nothing else.";

/// Placeholders: {subject} {unit} {topics} {count}
pub const MATERIAL_SEARCH_PROMPT: &str = "Subject: {subject}
Unit: {unit}
Topics: {topics}

Recommend {count} study resources for these topics: tutorials, lecture notes, reference articles or practice sets.

## REQUIREMENTS
- Each resource has a direct https URL to a well known educational site
- Prefer free resources
- material_type is one of article, video, notes, practice
- Do not repeat a URL

## OUTPUT FORMAT
Return a single JSON array. No prose, no markdown fences, no extra keys.

[
  {
    \"title\": \"Resource title\",
    \"url\": \"https://...\",
    \"description\": \"One sentence on what the resource covers\",
    \"source\": \"Site name\",
    \"material_type\": \"article\"
  }
]";

pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    values.iter().fold(template.to_string(), |acc, (name, value)| {
        acc.replace(&format!("{{{}}}", name), value)
    })
}
