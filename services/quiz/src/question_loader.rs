use anyhow::{Context, Result, bail};
use quiz_core::authoring::QuestionDraft;
use quiz_core::question::{OPTION_COUNT, Question, QuestionStore};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// One question as written in a question file.
///
/// `answer` is the 1-based option number, the same way an author enters it
/// on the authoring form.
#[derive(Debug, Deserialize)]
struct QuestionRecord {
    question: String,
    options: Vec<String>,
    answer: u32,
}

impl QuestionRecord {
    fn into_question(self) -> Result<Question> {
        let options: [String; OPTION_COUNT] = self.options.try_into().map_err(|o: Vec<String>| {
            anyhow::anyhow!("expected {} options, found {}", OPTION_COUNT, o.len())
        })?;
        let draft = QuestionDraft {
            text: self.question,
            options,
            correct_answer: self.answer.to_string(),
        };
        Ok(draft.validate()?)
    }
}

/// Loads questions from a JSON file holding an array of records, or from
/// every `.json` file in a directory, taken in file name order.
pub fn load_questions(path: &Path) -> Result<QuestionStore> {
    let files = if path.is_dir() {
        json_files(path)?
    } else {
        vec![path.to_path_buf()]
    };

    let mut store = QuestionStore::new();
    for file in files {
        for question in load_file(&file)? {
            store.push(question);
        }
    }
    Ok(store)
}

fn json_files(dir_path: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir_path)
        .with_context(|| format!("Failed to read questions directory: {}", dir_path.display()))?
    {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn load_file(path: &Path) -> Result<Vec<Question>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read question file: {}", path.display()))?;
    let records: Vec<QuestionRecord> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse question file: {}", path.display()))?;
    if records.is_empty() {
        bail!("Question file contains no questions: {}", path.display());
    }

    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            record
                .into_question()
                .with_context(|| format!("Invalid question #{} in {}", i + 1, path.display()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::question::AnswerIndex;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const CAPITALS: &str = r#"[
        {"question": "Capital of France?", "options": ["Berlin", "Paris", "Rome", "Madrid"], "answer": 2},
        {"question": "Capital of Italy?", "options": ["Rome", "Oslo", "Bern", "Lima"], "answer": 1}
    ]"#;

    #[test]
    fn test_load_questions_from_file() -> Result<()> {
        // 1. Arrange: A single question file.
        let dir = tempdir()?;
        let path = dir.path().join("capitals.json");
        fs::write(&path, CAPITALS)?;

        // 2. Act
        let store = load_questions(&path)?;

        // 3. Assert: Order is kept and answers become 0-based.
        assert_eq!(store.len(), 2);
        let first = store.get(0).unwrap();
        assert_eq!(first.text(), "Capital of France?");
        assert_eq!(first.correct(), AnswerIndex::new(1)?);
        assert_eq!(store.get(1).unwrap().correct(), AnswerIndex::new(0)?);

        Ok(())
    }

    #[test]
    fn test_load_questions_from_dir_in_name_order() -> Result<()> {
        // 1. Arrange: Two question files plus files that should be ignored.
        let dir = tempdir()?;
        let dir_path = dir.path();

        let mut second = File::create(dir_path.join("b_second.json"))?;
        writeln!(
            second,
            r#"[{{"question": "Second?", "options": ["a", "b", "c", "d"], "answer": 4}}]"#
        )?;
        let mut first = File::create(dir_path.join("a_first.json"))?;
        writeln!(
            first,
            r#"[{{"question": "First?", "options": ["a", "b", "c", "d"], "answer": 3}}]"#
        )?;
        let mut ignored = File::create(dir_path.join("notes.txt"))?;
        writeln!(ignored, "not a question file")?;
        fs::create_dir(dir_path.join("subdir.json"))?;

        // 2. Act
        let store = load_questions(dir_path)?;

        // 3. Assert
        let texts: Vec<&str> = store.iter().map(|q| q.text()).collect();
        assert_eq!(texts, ["First?", "Second?"]);

        Ok(())
    }

    #[test]
    fn test_invalid_records_are_rejected() -> Result<()> {
        let dir = tempdir()?;

        let three_options = dir.path().join("three.json");
        fs::write(
            &three_options,
            r#"[{"question": "Q?", "options": ["a", "b", "c"], "answer": 1}]"#,
        )?;
        assert!(load_questions(&three_options).is_err());

        let bad_answer = dir.path().join("answer.json");
        fs::write(
            &bad_answer,
            r#"[{"question": "Q?", "options": ["a", "b", "c", "d"], "answer": 5}]"#,
        )?;
        let err = load_questions(&bad_answer).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid question #1"));

        let blank_option = dir.path().join("blank.json");
        fs::write(
            &blank_option,
            r#"[{"question": "Q?", "options": ["a", " ", "c", "d"], "answer": 1}]"#,
        )?;
        assert!(load_questions(&blank_option).is_err());

        let empty = dir.path().join("empty.json");
        fs::write(&empty, "[]")?;
        assert!(load_questions(&empty).is_err());

        Ok(())
    }

    #[test]
    fn test_load_questions_from_nonexistent_path() {
        let result = load_questions(Path::new("nonexistent_questions_for_testing.json"));
        assert!(result.is_err());
    }
}
