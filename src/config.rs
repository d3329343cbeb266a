use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubConfig {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenAiConfig {
    pub api_key: String,
    pub model: String,
    pub max_output_tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub github: GithubConfig,
    pub genai: GenAiConfig,
    pub app_message: String,
    pub server_status: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        // A full DATABASE_URL wins; otherwise the DSN is assembled from parts.
        let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| {
            format!(
                "postgresql://{}:{}@{}:{}/{}",
                std::env::var("DB_USER").unwrap_or_else(|_| "postgres".into()),
                std::env::var("DB_PASSWORD").unwrap_or_default(),
                std::env::var("DB_HOST").unwrap_or_else(|_| "localhost".into()),
                std::env::var("DB_PORT").unwrap_or_else(|_| "5432".into()),
                std::env::var("DB_NAME").unwrap_or_else(|_| "talentmatch".into()),
            )
        });

        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "talentmatch".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "talentmatch-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
        };

        let github = GithubConfig {
            client_id: std::env::var("AUTH_GITHUB_ID").unwrap_or_default(),
            client_secret: std::env::var("AUTH_GITHUB_SECRET").unwrap_or_default(),
        };

        let genai = GenAiConfig {
            api_key: std::env::var("GOOGLE_GENAI_API_KEY")
                .context("GOOGLE_GENAI_API_KEY must be set")?,
            model: std::env::var("GENAI_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".into()),
            max_output_tokens: std::env::var("GENAI_MAX_OUTPUT_TOKENS")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(8192),
        };

        Ok(Self {
            database_url,
            jwt,
            github,
            genai,
            app_message: std::env::var("APP_MESSAGE").unwrap_or_else(|_| "TalentMatch API".into()),
            server_status: std::env::var("SERVER_STATUS").unwrap_or_else(|_| "ok".into()),
        })
    }
}
