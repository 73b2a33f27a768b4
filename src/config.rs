use std::env;

use crate::models::EmailContext;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub store_backend: StoreBackend,
    pub redis_url: String,
    pub resend_api_key: Option<String>,
    pub mail_from: String,
    pub mail_dry_run: bool,
    pub donation_page_url: String,
    pub access_password: Option<String>,
    pub resend_delay_seconds: u64,
    pub seed_currencies: bool,
    pub log_format: LogFormat,
    pub templates: TemplateSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Redis,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Subject and body template used for one outreach context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePair {
    pub subject: String,
    pub body: String,
}

/// Templates for every outreach context, resolved once at startup
#[derive(Debug, Clone)]
pub struct TemplateSet {
    pub default: TemplatePair,
    pub targeted: Option<TemplatePair>,
    pub trump_donation: Option<TemplatePair>,
}

impl TemplateSet {
    /// Pick the template pair for a context. Contexts without a dedicated
    /// pair (single, mass, unknown) use the default one.
    pub fn for_context(&self, context: EmailContext) -> &TemplatePair {
        let dedicated = match context {
            EmailContext::Targeted => self.targeted.as_ref(),
            EmailContext::TrumpDonation => self.trump_donation.as_ref(),
            EmailContext::Single | EmailContext::Mass | EmailContext::Other => None,
        };

        dedicated.unwrap_or(&self.default)
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let store_backend = match get("STORE_BACKEND").as_deref() {
            None | Some("redis") => StoreBackend::Redis,
            Some("memory") => StoreBackend::Memory,
            Some(other) => return Err(ConfigError::InvalidStoreBackend(other.to_string())),
        };

        let log_format = match get("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let default = template_pair(&get, "EMAIL_SUBJECT", "EMAIL_TEMPLATE")?
            .ok_or(ConfigError::MissingVariable("EMAIL_TEMPLATE"))?;

        Ok(Config {
            server_host: get("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            server_port: get("SERVER_PORT")
                .unwrap_or_else(|| "4000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidPort)?,
            store_backend,
            redis_url: get("REDIS_URL").unwrap_or_else(|| "redis://localhost:6379".to_string()),
            resend_api_key: get("RESEND_API_KEY"),
            mail_from: get("MAIL_FROM")
                .unwrap_or_else(|| "Outreach <onboarding@resend.dev>".to_string()),
            mail_dry_run: parse_bool(get("MAIL_DRY_RUN"), false),
            donation_page_url: get("DONATION_PAGE_URL")
                .unwrap_or_else(|| "http://localhost:3000/donate".to_string()),
            access_password: get("ACCESS_PASSWORD"),
            resend_delay_seconds: get("RESEND_DELAY_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            seed_currencies: parse_bool(get("SEED_CURRENCIES"), true),
            log_format,
            templates: TemplateSet {
                default,
                targeted: template_pair(
                    &get,
                    "TARGETED_EMAIL_SUBJECT",
                    "TARGETED_EMAIL_TEMPLATE",
                )?,
                trump_donation: template_pair(
                    &get,
                    "TRUMP_DONATION_EMAIL_SUBJECT",
                    "TRUMP_DONATION_EMAIL_TEMPLATE",
                )?,
            },
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn template_pair<G>(
    get: &G,
    subject_key: &'static str,
    body_key: &'static str,
) -> Result<Option<TemplatePair>, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match (get(subject_key), get(body_key)) {
        (Some(subject), Some(body)) => Ok(Some(TemplatePair { subject, body })),
        (None, None) => Ok(None),
        (Some(_), None) => Err(ConfigError::MissingVariable(body_key)),
        (None, Some(_)) => Err(ConfigError::MissingVariable(subject_key)),
    }
}

fn parse_bool(value: Option<String>, default: bool) -> bool {
    match value.as_deref().map(str::to_ascii_lowercase).as_deref() {
        Some("1" | "true" | "yes" | "on") => true,
        Some("0" | "false" | "no" | "off") => false,
        _ => default,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid server port")]
    InvalidPort,
    #[error("Unknown STORE_BACKEND '{0}' (expected 'redis' or 'memory')")]
    InvalidStoreBackend(String),
    #[error("{0} environment variable is required")]
    MissingVariable(&'static str),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const BASE: &[(&str, &str)] = &[
        ("EMAIL_SUBJECT", "Support {{candidateName}}"),
        ("EMAIL_TEMPLATE", "<p>Hi {{recipientName}}</p>"),
    ];

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(BASE)).expect("Should load config");

        assert_eq!(config.server_port, 4000);
        assert_eq!(config.store_backend, StoreBackend::Redis);
        assert_eq!(config.resend_delay_seconds, 60);
        assert!(config.seed_currencies);
        assert!(config.access_password.is_none());
        assert_eq!(config.server_addr(), "0.0.0.0:4000");
    }

    #[test]
    fn test_missing_default_template() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVariable("EMAIL_TEMPLATE")));
    }

    #[test]
    fn test_half_configured_pair_is_rejected() {
        let mut vars = BASE.to_vec();
        vars.push(("TARGETED_EMAIL_SUBJECT", "Targeted"));

        let err = Config::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingVariable("TARGETED_EMAIL_TEMPLATE")
        ));
    }

    #[test]
    fn test_invalid_port() {
        let mut vars = BASE.to_vec();
        vars.push(("SERVER_PORT", "not-a-port"));

        assert!(matches!(
            Config::from_lookup(lookup(&vars)),
            Err(ConfigError::InvalidPort)
        ));
    }

    #[test]
    fn test_template_selection_falls_back_to_default() {
        let mut vars = BASE.to_vec();
        vars.push(("TARGETED_EMAIL_SUBJECT", "Targeted subject"));
        vars.push(("TARGETED_EMAIL_TEMPLATE", "Targeted body"));
        let config = Config::from_lookup(lookup(&vars)).expect("Should load config");

        let templates = &config.templates;
        assert_eq!(templates.for_context(EmailContext::Targeted).subject, "Targeted subject");
        assert_eq!(templates.for_context(EmailContext::Single), &templates.default);
        assert_eq!(templates.for_context(EmailContext::Mass), &templates.default);
        assert_eq!(templates.for_context(EmailContext::Other), &templates.default);
        // No dedicated pair configured for trumpDonation.
        assert_eq!(templates.for_context(EmailContext::TrumpDonation), &templates.default);
    }

    #[test]
    fn test_memory_backend_and_flags() {
        let mut vars = BASE.to_vec();
        vars.push(("STORE_BACKEND", "memory"));
        vars.push(("SEED_CURRENCIES", "false"));
        vars.push(("MAIL_DRY_RUN", "TRUE"));
        vars.push(("LOG_FORMAT", "json"));
        let config = Config::from_lookup(lookup(&vars)).expect("Should load config");

        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert!(!config.seed_currencies);
        assert!(config.mail_dry_run);
        assert_eq!(config.log_format, LogFormat::Json);
    }
}
