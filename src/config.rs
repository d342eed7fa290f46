use std::env;

const TOSS_API_BASE_DEFAULT: &str = "https://api.tosspayments.com";
const NAVER_API_BASE_DEFAULT: &str = "https://dev-pay.paygate.naver.com/naverpay-partner";

/// Environment variable that was absent (or empty) at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingVar(pub &'static str);

#[derive(Debug, Clone)]
pub struct TossConfig {
    pub secret_key: String,
    pub api_base: String,
}

impl TossConfig {
    pub fn from_env() -> Result<Self, MissingVar> {
        Ok(Self {
            secret_key: require_env("TOSS_SECRET_KEY")?,
            api_base: env_or("TOSS_API_BASE", TOSS_API_BASE_DEFAULT),
        })
    }
}

#[derive(Debug, Clone)]
pub struct NaverConfig {
    pub client_id: String,
    pub client_secret: String,
    pub chain_id: String,
    pub partner_id: String,
    pub api_base: String,
}

impl NaverConfig {
    pub fn from_env() -> Result<Self, MissingVar> {
        Ok(Self {
            client_id: require_env("NAVER_CLIENT_ID")?,
            client_secret: require_env("NAVER_CLIENT_SECRET")?,
            chain_id: require_env("NAVER_CHAIN_ID")?,
            partner_id: require_env("NAVER_PARTNER_ID")?,
            api_base: env_or("NAVER_API_BASE", NAVER_API_BASE_DEFAULT),
        })
    }
}

fn require_env(name: &'static str) -> Result<String, MissingVar> {
    env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(MissingVar(name))
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
