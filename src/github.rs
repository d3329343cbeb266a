use std::collections::HashMap;

use anyhow::{bail, Context};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

const OAUTH_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const API_BASE: &str = "https://api.github.com";

/// Profile fields reported by `GET /user`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubUser {
    pub login: String,
    pub id: i64,
    pub email: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub html_url: Option<String>,
    pub bio: Option<String>,
}

#[async_trait]
pub trait GithubApi: Send + Sync {
    /// Exchange an OAuth authorization code for an access token.
    async fn exchange_code(&self, code: &str) -> anyhow::Result<String>;

    /// Fetch the profile of the user owning `access_token`.
    async fn fetch_user(&self, access_token: &str) -> anyhow::Result<GithubUser>;

    /// Walk the repository tree and return a nested name -> path map,
    /// directories mapping to nested objects.
    async fn repo_structure(&self, token: &str, repo: &str) -> anyhow::Result<Value>;

    /// README.md content, or an empty string when the repo has none.
    async fn readme(&self, token: &str, repo: &str) -> anyhow::Result<String>;
}

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentEntry {
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct FileContent {
    content: Option<String>,
}

#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
}

impl GithubClient {
    pub fn new(client_id: &str, client_secret: &str) -> anyhow::Result<Self> {
        // GitHub rejects requests without a User-Agent.
        let http = reqwest::Client::builder()
            .user_agent("talentmatch-backend")
            .build()
            .context("build github http client")?;
        Ok(Self {
            http,
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        })
    }

    async fn list_dir(
        &self,
        token: &str,
        repo: &str,
        path: &str,
    ) -> anyhow::Result<Vec<ContentEntry>> {
        let url = if path.is_empty() {
            format!("{API_BASE}/repos/{repo}/contents")
        } else {
            format!("{API_BASE}/repos/{repo}/contents/{path}")
        };
        let resp = self
            .http
            .get(&url)
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/vnd.github.v3+json")
            .send()
            .await
            .with_context(|| format!("list contents of {repo}/{path}"))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("github contents request for {repo}/{path} failed: {status}: {body}");
        }

        resp.json::<Vec<ContentEntry>>()
            .await
            .with_context(|| format!("decode contents listing of {repo}/{path}"))
    }
}

/// Turn per-directory listings into the nested structure the scan prompt embeds.
fn assemble_tree(dir: &str, listings: &HashMap<String, Vec<ContentEntry>>) -> Value {
    let mut map = serde_json::Map::new();
    if let Some(entries) = listings.get(dir) {
        for entry in entries {
            if entry.kind == "dir" {
                map.insert(entry.name.clone(), assemble_tree(&entry.path, listings));
            } else {
                map.insert(entry.name.clone(), Value::String(entry.path.clone()));
            }
        }
    }
    Value::Object(map)
}

#[async_trait]
impl GithubApi for GithubClient {
    async fn exchange_code(&self, code: &str) -> anyhow::Result<String> {
        let resp = self
            .http
            .post(OAUTH_TOKEN_URL)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
            ])
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .context("github token exchange request")?;

        if !resp.status().is_success() {
            let status = resp.status();
            bail!("Failed to exchange GitHub code: {status}");
        }

        let token: AccessTokenResponse = resp
            .json()
            .await
            .context("decode github token exchange response")?;
        token
            .access_token
            .ok_or_else(|| anyhow::anyhow!("Access token not found in response"))
    }

    async fn fetch_user(&self, access_token: &str) -> anyhow::Result<GithubUser> {
        let resp = self
            .http
            .get(format!("{API_BASE}/user"))
            .bearer_auth(access_token)
            .header(reqwest::header::ACCEPT, "application/vnd.github.v3+json")
            .send()
            .await
            .context("github user request")?;

        if !resp.status().is_success() {
            let status = resp.status();
            bail!("Failed to fetch user info from GitHub: {status}");
        }

        resp.json::<GithubUser>()
            .await
            .context("decode github user response")
    }

    async fn repo_structure(&self, token: &str, repo: &str) -> anyhow::Result<Value> {
        // Depth-first traversal, one contents request per directory.
        let mut pending = vec![String::new()];
        let mut listings: HashMap<String, Vec<ContentEntry>> = HashMap::new();

        while let Some(dir) = pending.pop() {
            let entries = self.list_dir(token, repo, &dir).await?;
            for entry in &entries {
                if entry.kind == "dir" {
                    pending.push(entry.path.clone());
                }
            }
            listings.insert(dir, entries);
        }

        debug!(repo = %repo, directories = listings.len(), "repository tree fetched");
        Ok(assemble_tree("", &listings))
    }

    async fn readme(&self, token: &str, repo: &str) -> anyhow::Result<String> {
        let resp = self
            .http
            .get(format!("{API_BASE}/repos/{repo}/contents/README.md"))
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/vnd.github.v3+json")
            .send()
            .await
            .with_context(|| format!("readme request for {repo}"))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(String::new());
        }
        if !resp.status().is_success() {
            let status = resp.status();
            bail!("github readme request for {repo} failed: {status}");
        }

        let file: FileContent = resp.json().await.context("decode readme response")?;
        let encoded: String = file
            .content
            .unwrap_or_default()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let bytes = BASE64
            .decode(encoded.as_bytes())
            .context("decode readme content")?;
        String::from_utf8(bytes).context("readme is not valid utf-8")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assemble_tree_nests_directories() {
        let mut listings = HashMap::new();
        listings.insert(
            String::new(),
            vec![
                ContentEntry {
                    name: "README.md".into(),
                    path: "README.md".into(),
                    kind: "file".into(),
                },
                ContentEntry {
                    name: "src".into(),
                    path: "src".into(),
                    kind: "dir".into(),
                },
            ],
        );
        listings.insert(
            "src".into(),
            vec![ContentEntry {
                name: "main.rs".into(),
                path: "src/main.rs".into(),
                kind: "file".into(),
            }],
        );

        let tree = assemble_tree("", &listings);
        assert_eq!(tree["README.md"], "README.md");
        assert_eq!(tree["src"]["main.rs"], "src/main.rs");
    }

    #[test]
    fn github_user_tolerates_missing_optional_fields() {
        let user: GithubUser = serde_json::from_str(
            r#"{"login": "octocat", "id": 1, "email": null, "name": null,
                "avatar_url": null, "html_url": null, "bio": null}"#,
        )
        .unwrap();
        assert_eq!(user.login, "octocat");
        assert!(user.email.is_none());
    }

    #[test]
    fn access_token_response_without_token() {
        let resp: AccessTokenResponse =
            serde_json::from_str(r#"{"error": "bad_verification_code"}"#).unwrap();
        assert!(resp.access_token.is_none());
    }
}
