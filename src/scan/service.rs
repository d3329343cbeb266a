use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::scan::ScanError;
use crate::state::AppState;

const PROMPT_TEMPLATE: &str = "\
You are a senior engineer reviewing a candidate's public repository.

Repository file structure (files map to their paths, folders nest):
{structure}

README contents:
{readme}

Evaluate the repository and answer with a single fenced ```json block of the
form {\"summary\": string, \"technologies\": [string], \"score\": number from 1 to 10}.
Do not add any prose outside the fenced block.";

fn render_prompt(structure: &Value, readme: &str) -> String {
    PROMPT_TEMPLATE
        .replace("{structure}", &structure.to_string())
        .replace("{readme}", readme)
}

/// Pull the first fenced ```json block out of the reply; when the model did
/// not fence its answer, the whole reply is treated as JSON.
fn extract_json(reply: &str) -> Result<Value, ScanError> {
    lazy_static! {
        static ref JSON_BLOCK: Regex = Regex::new(r"(?s)```json\s*(.*?)```").unwrap();
    }
    let raw = JSON_BLOCK
        .captures(reply)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(reply);
    serde_json::from_str(raw.trim())
        .map_err(|e| ScanError::MalformedResponse(format!("reply is not valid JSON: {e}")))
}

/// Linear pipeline: repo tree -> README -> prompt -> completion -> JSON.
#[instrument(skip(state, access_token))]
pub async fn run_scan(
    state: &AppState,
    access_token: &str,
    repo_name: &str,
) -> Result<Value, ScanError> {
    let structure = state
        .github
        .repo_structure(access_token, repo_name)
        .await
        .map_err(|e| ScanError::Github(format!("{e:#}")))?;

    let readme = state
        .github
        .readme(access_token, repo_name)
        .await
        .map_err(|e| ScanError::Github(format!("{e:#}")))?;

    let prompt = render_prompt(&structure, &readme);
    debug!(repo = %repo_name, prompt_len = prompt.len(), "prompt rendered");

    let reply = state
        .genai
        .generate(&prompt)
        .await
        .map_err(|e| ScanError::Ai(format!("{e:#}")))?
        .ok_or_else(|| {
            ScanError::MalformedResponse("response carried no candidates or content".into())
        })?;

    extract_json(&reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_fenced_json_block() {
        let reply = "Here is my assessment:\n```json\n{\"score\": 5}\n```\nGood luck!";
        assert_eq!(extract_json(reply).unwrap(), json!({"score": 5}));
    }

    #[test]
    fn takes_first_of_multiple_blocks() {
        let reply = "```json\n{\"score\": 1}\n```\n```json\n{\"score\": 2}\n```";
        assert_eq!(extract_json(reply).unwrap(), json!({"score": 1}));
    }

    #[test]
    fn falls_back_to_whole_reply() {
        let reply = "  {\"summary\": \"fine\", \"score\": 7}  ";
        assert_eq!(
            extract_json(reply).unwrap(),
            json!({"summary": "fine", "score": 7})
        );
    }

    #[test]
    fn rejects_garbage_reply() {
        let err = extract_json("I could not inspect the repository, sorry.").unwrap_err();
        assert!(matches!(err, ScanError::MalformedResponse(_)));
    }

    #[test]
    fn prompt_embeds_structure_and_readme() {
        let structure = json!({"src": {"main.rs": "src/main.rs"}});
        let prompt = render_prompt(&structure, "A typing game.");
        assert!(prompt.contains("src/main.rs"));
        assert!(prompt.contains("A typing game."));
        assert!(!prompt.contains("{structure}"));
        assert!(!prompt.contains("{readme}"));
    }

    #[tokio::test]
    async fn scan_pipeline_returns_parsed_data() {
        let state = AppState::fake();
        let data = run_scan(&state, "gho_token_for_tests", "octocat/hello")
            .await
            .expect("scan should succeed against fakes");
        assert_eq!(data, json!({"score": 5}));
    }
}
