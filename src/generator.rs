//! Natural-language to scene conversion through an external text generator
//!
//! The generator itself is opaque: it receives a system prompt and the user
//! text and returns free-form text. Everything after that (finding the JSON,
//! parsing, normalizing) is local and deterministic, and any failure along
//! the way means "no scene".

use crate::models::Scene;
use crate::normalizer::normalize_str;
use std::io::Write;
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::{debug, warn};

/// Few-shot system prompt asking for a primitives-only JSON scene.
pub const SCENE_SYSTEM_PROMPT: &str = r#"You strictly convert user requests into a JSON scene using ONLY primitives: circle, square, triangle, line. NO labels like person/bird/car/heart. Decompose complex ideas into multiple primitives on a 0..1 normalized canvas.

Allowed colors: black, white, red, green, blue, yellow, orange, purple, pink, brown, gray, lightblue, lightgreen, peachpuff, gold, navy, teal, maroon, olive. If unsure, use black.

Schema:
{
  "canvas": {"width": <int>, "height": <int>, "bg": "<string>"},
  "shapes": [
    {"shape":"circle|square|triangle", "color":"<string>", "x":0..1, "y":0..1, "size":0..1},
    {"shape":"line", "color":"<string>", "x1":0..1, "y1":0..1, "x2":0..1, "y2":0..1}
  ]
}

Hard rules:
- JSON ONLY. No prose, markdown, or comments.
- Use <= 12 shapes total.
- Prefer symmetry and non-overlapping placement.
- Avoid tiny primitives (size < 0.08). Keep important shapes within 0.15..0.85 on both axes.

Examples:
INPUT: draw a house with the sun
OUTPUT: {"canvas":{"width":640,"height":640,"bg":"lightblue"},"shapes":[{"shape":"square","color":"brown","x":0.28,"y":0.70,"size":0.40},{"shape":"triangle","color":"black","x":0.28,"y":0.48,"size":0.40},{"shape":"circle","color":"yellow","x":0.80,"y":0.18,"size":0.18}]}

INPUT: two figures holding hands and a path
OUTPUT: {"canvas":{"width":640,"height":640,"bg":"lightblue"},"shapes":[{"shape":"circle","color":"peachpuff","x":0.42,"y":0.32,"size":0.10},{"shape":"square","color":"blue","x":0.42,"y":0.48,"size":0.16},{"shape":"circle","color":"peachpuff","x":0.58,"y":0.32,"size":0.10},{"shape":"square","color":"red","x":0.58,"y":0.48,"size":0.16},{"shape":"line","color":"black","x1":0.20,"y1":0.85,"x2":0.80,"y2":0.85}]}

INPUT: a tree and the sun
OUTPUT: {"canvas":{"width":640,"height":640,"bg":"lightblue"},"shapes":[{"shape":"triangle","color":"green","x":0.30,"y":0.50,"size":0.35},{"shape":"square","color":"brown","x":0.30,"y":0.70,"size":0.12},{"shape":"circle","color":"yellow","x":0.82,"y":0.16,"size":0.16}]}"#;

/// Sent instead of the user text when the first answer held no usable shapes.
pub const RETRY_PROMPT: &str =
    "Previous output invalid. Return JSON ONLY per schema with <= 12 primitives and allowed colors.";

/// Error type for text generation failures.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The generator process could not be started or talked to
    #[error("failed to run generator '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// The prompt could not be written to the generator's stdin
    #[error("failed to send prompt to generator '{program}': {source}")]
    Stdin {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// The generator exited unsuccessfully
    #[error("generator exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
    /// The generator wrote something that is not UTF-8
    #[error("generator output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// An opaque text-in, text-out service.
pub trait TextGenerator {
    fn generate(&self, system: &str, user: &str) -> Result<String, GenerateError>;
}

/// Runs an external command as the generator.
///
/// The system prompt and user text are written to the command's stdin,
/// separated by a blank line; its stdout is the answer.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandGenerator {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandGenerator {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self { program: program.into(), args }
    }

    fn spawn_error(&self, source: std::io::Error) -> GenerateError {
        GenerateError::Spawn { program: self.program.clone(), source }
    }
}

impl TextGenerator for CommandGenerator {
    fn generate(&self, system: &str, user: &str) -> Result<String, GenerateError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        if let Some(mut stdin) = child.stdin.take() {
            let prompt = format!("{}\n\nINPUT: {}\nOUTPUT:", system, user);
            if let Err(source) = stdin.write_all(prompt.as_bytes()) {
                drop(stdin);
                // Reap the child before reporting; it may already have exited
                let _ = child.kill();
                let _ = child.wait();
                return Err(GenerateError::Stdin { program: self.program.clone(), source });
            }
        }

        let output = child.wait_with_output().map_err(|e| self.spawn_error(e))?;
        if !output.status.success() {
            return Err(GenerateError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8(output.stdout)?)
    }
}

/// Ask the generator for a scene and normalize the answer.
///
/// Retries once with [`RETRY_PROMPT`] when the first answer yields no shapes.
/// Returns `None` when no usable scene comes back; generator errors are
/// logged and treated the same way.
pub fn text_to_scene(
    generator: &dyn TextGenerator,
    text: &str,
    max_shapes: usize,
) -> Option<Scene> {
    let scene = ask(generator, text, max_shapes);
    if !scene.is_empty() {
        return Some(scene);
    }

    debug!("first answer had no usable shapes, retrying");
    let retry = ask(generator, RETRY_PROMPT, max_shapes);
    if retry.is_empty() {
        None
    } else {
        Some(retry)
    }
}

fn ask(generator: &dyn TextGenerator, user: &str, max_shapes: usize) -> Scene {
    match generator.generate(SCENE_SYSTEM_PROMPT, user) {
        Ok(text) => normalize_str(&text, max_shapes),
        Err(e) => {
            warn!(error = %e, "scene generation failed");
            Scene::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SceneShape;
    use std::cell::RefCell;

    /// Replays canned answers and records the user messages it was sent.
    struct Scripted {
        answers: RefCell<Vec<Result<String, GenerateError>>>,
        seen: RefCell<Vec<String>>,
    }

    impl Scripted {
        fn new(answers: Vec<Result<String, GenerateError>>) -> Self {
            Self { answers: RefCell::new(answers), seen: RefCell::new(Vec::new()) }
        }
    }

    impl TextGenerator for Scripted {
        fn generate(&self, system: &str, user: &str) -> Result<String, GenerateError> {
            assert_eq!(system, SCENE_SYSTEM_PROMPT);
            self.seen.borrow_mut().push(user.to_string());
            let mut answers = self.answers.borrow_mut();
            if answers.is_empty() {
                Ok(String::new())
            } else {
                answers.remove(0)
            }
        }
    }

    const GOOD: &str = r#"{"canvas":{"width":320,"height":240,"bg":"lightblue"},"shapes":[{"shape":"circle","color":"yellow","x":0.8,"y":0.2,"size":0.2}]}"#;

    #[test]
    fn test_first_answer_used() {
        let generator = Scripted::new(vec![Ok(format!("Here: {}", GOOD))]);
        let scene = text_to_scene(&generator, "a sun", 12).unwrap();
        assert_eq!(scene.canvas.width, 320);
        assert!(matches!(scene.shapes[0], SceneShape::Circle(_)));
        assert_eq!(generator.seen.borrow().as_slice(), ["a sun"]);
    }

    #[test]
    fn test_retry_after_empty_answer() {
        let generator = Scripted::new(vec![Ok("I cannot draw that.".to_string()), Ok(GOOD.to_string())]);
        let scene = text_to_scene(&generator, "a sun", 12).unwrap();
        assert_eq!(scene.shapes.len(), 1);
        assert_eq!(generator.seen.borrow().as_slice(), ["a sun", RETRY_PROMPT]);
    }

    #[test]
    fn test_retry_after_error() {
        let failure = GenerateError::Failed { status: "exit status: 1".to_string(), stderr: String::new() };
        let generator = Scripted::new(vec![Err(failure), Ok(GOOD.to_string())]);
        assert!(text_to_scene(&generator, "a sun", 12).is_some());
    }

    #[test]
    fn test_no_scene_after_two_failures() {
        let generator = Scripted::new(vec![
            Ok(r#"{"shapes": [{"shape": "heart", "x": 0.5}]}"#.to_string()),
            Ok("{not json".to_string()),
        ]);
        assert!(text_to_scene(&generator, "a heart", 12).is_none());
        assert_eq!(generator.seen.borrow().len(), 2);
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let generator = CommandGenerator::new("definitely-not-a-real-generator-binary", vec![]);
        assert!(matches!(generator.generate("sys", "user"), Err(GenerateError::Spawn { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_command_generator_reads_stdout() {
        let generator = CommandGenerator::new("sh", vec!["-c".to_string(), format!("cat >/dev/null; echo '{}'", GOOD)]);
        let answer = generator.generate(SCENE_SYSTEM_PROMPT, "a sun").unwrap();
        assert!(answer.contains("\"shapes\""));
        let scene = text_to_scene(&generator, "a sun", 12).unwrap();
        assert_eq!(scene.canvas.height, 240);
    }

    #[cfg(unix)]
    #[test]
    fn test_generator_that_ignores_stdin_is_stdin_error() {
        // Larger than a pipe buffer, so the write cannot complete after `true` exits
        let user = "a".repeat(1 << 20);
        let generator = CommandGenerator::new("true", vec![]);
        match generator.generate("sys", &user) {
            Err(GenerateError::Stdin { program, .. }) => assert_eq!(program, "true"),
            other => panic!("Expected stdin error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_command_generator_failure_status() {
        let generator = CommandGenerator::new(
            "sh",
            vec!["-c".to_string(), "cat >/dev/null; echo boom >&2; exit 3".to_string()],
        );
        match generator.generate("sys", "user") {
            Err(GenerateError::Failed { stderr, .. }) => assert_eq!(stderr, "boom"),
            other => panic!("Expected failure, got {:?}", other),
        }
    }
}
