use crate::{prompt::models::Settings, quiz::models::QuestionKind};

fn type_description(kind: QuestionKind) -> &'static str {
    match kind {
        QuestionKind::Qcm => "multiple choice (3 options labelled A/B/C)",
        QuestionKind::Vf => "true/false (correct is \"Verdadero\" or \"Falso\")",
        QuestionKind::Open => "open question (free answer, no correct field)",
    }
}

fn type_example(kind: QuestionKind, id: usize) -> String {
    match kind {
        QuestionKind::Qcm => format!(
            r#"    {{
      "id": {id},
      "type": "qcm",
      "question": "...",
      "options": ["A. ...", "B. ...", "C. ..."],
      "correct": "A",
      "explanation": "...",
      "hint": "..."
    }}"#
        ),
        QuestionKind::Vf => format!(
            r#"    {{
      "id": {id},
      "type": "vf",
      "question": "...",
      "correct": "Verdadero",
      "explanation": "...",
      "hint": "..."
    }}"#
        ),
        QuestionKind::Open => format!(
            r#"    {{
      "id": {id},
      "type": "open",
      "question": "...",
      "explanation": "...",
      "hint": "..."
    }}"#
        ),
    }
}

fn language_clause(settings: &Settings) -> String {
    match settings.monolingue {
        true => format!(
            "- Language: single language, write all questions in {}\n",
            settings.source_lang
        ),
        false => format!(
            "- Language: bilingual {} -> {}\n- Format every question as \"{} text ({} translation)\"\n",
            settings.source_lang,
            settings.target_lang,
            settings.source_lang.code(),
            settings.target_lang.code()
        ),
    }
}

/// Builds the generation instruction. Pure and deterministic.
pub fn build_prompt(text: &str, settings: &Settings) -> String {
    let kinds = settings.types.enabled();

    let types = kinds
        .iter()
        .map(|kind| type_description(*kind))
        .collect::<Vec<&str>>()
        .join(", ");

    let examples = kinds
        .iter()
        .enumerate()
        .map(|(idx, kind)| type_example(*kind, idx + 1))
        .collect::<Vec<String>>()
        .join(",\n");

    let title = match settings.monolingue {
        true => "Quiz",
        false => "Bilingual Quiz",
    };

    let mut prompt = String::with_capacity(text.len() + 1024);
    prompt.push_str("You are an expert at writing educational quizzes.\n\n");
    prompt.push_str("CONTENT TO ANALYSE:\n");
    prompt.push_str(text);
    prompt.push_str("\n\nINSTRUCTIONS:\n");
    prompt.push_str(&format!(
        "- Generate {} questions based EXCLUSIVELY on the content\n",
        settings.num_questions
    ));
    prompt.push_str(&language_clause(settings));
    prompt.push_str(&format!("- Difficulty: {}\n", settings.difficulty));
    prompt.push_str(&format!("- Question types: {}\n\n", types));
    prompt.push_str("JSON FORMAT:\n{\n");
    prompt.push_str(&format!("  \"title\": \"{}\",\n", title));
    prompt.push_str("  \"questions\": [\n");
    prompt.push_str(&examples);
    prompt.push_str("\n  ]\n}\n\nAnswer ONLY with the JSON.");

    prompt
}
