use anyhow::anyhow;
use std::env;

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub openai_api_key: String,
    pub openai_api_base: Option<String>,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| anyhow!("DATABASE_URL not found"))?;

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| anyhow!("JWT_SECRET not found"))?;

        let openai_api_key =
            env::var("OPENAI_API_KEY").map_err(|_| anyhow!("OPENAI_API_KEY not found"))?;

        // Lets the suggestion client point at any OpenAI-compatible endpoint
        let openai_api_base = env::var("OPENAI_API_BASE").ok();

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|e| anyhow!("invalid PORT: {e}"))?;

        Ok(AppConfig {
            database_url,
            jwt_secret,
            openai_api_key,
            openai_api_base,
            port,
        })
    }
}
