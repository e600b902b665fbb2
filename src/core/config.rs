use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub reporting: ReportingConfig,
    pub rate_limit: RateLimitConfig,
    pub mailer: MailerConfig,
    pub ticketing: TicketingConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    /// Public base URL used for permalinks embedded in notifications.
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct ReportingConfig {
    /// Master feature flag. When off the report route answers 404.
    pub enabled: bool,
    /// Developer/testing mode: skips account-age and confirmed-email gates
    /// and echoes the composed notification back in the response.
    pub developer_mode: bool,
    /// Minimum reporter account age in days. Zero disables the check.
    pub min_account_age_days: u32,
    /// Whether dialog telemetry events are recorded at all.
    pub instrumentation_enabled: bool,
    /// Which notifier handles immediate-threat reports.
    pub notifier: NotifierKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifierKind {
    Email,
    Ticket,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Reports allowed per reporter per window.
    pub max_reports: u32,
    /// Window length in seconds.
    pub window_secs: u64,
}

#[derive(Debug, Clone)]
pub struct MailerConfig {
    pub smtp_host: String,
    pub smtp_username: String,
    pub smtp_password: String,
    /// Sender address. Missing means the mailer fails locally without a
    /// network call.
    pub from_address: Option<String>,
    /// Safety-team recipient list. Missing means the mailer fails locally.
    pub recipients: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct TicketingConfig {
    /// Ticket-system endpoint the client POSTs to.
    pub endpoint: String,
    /// Optional outbound proxy URL.
    pub proxy: Option<String>,
    /// Requester identity stamped on created tickets.
    pub requester_name: String,
    pub requester_email: String,
    /// Fixed subject line used for routing inside the ticket system.
    pub subject: String,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            reporting: ReportingConfig::from_env()?,
            rate_limit: RateLimitConfig::from_env()?,
            mailer: MailerConfig::from_env()?,
            ticketing: TicketingConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base_url = env::var("BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            base_url,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl ReportingConfig {
    pub fn from_env() -> Result<Self, String> {
        let enabled = parse_bool("REPORTING_ENABLED", true)?;
        let developer_mode = parse_bool("REPORTING_DEVELOPER_MODE", false)?;
        let instrumentation_enabled = parse_bool("REPORTING_INSTRUMENTATION", false)?;

        let min_account_age_days = env::var("REPORTING_MIN_ACCOUNT_AGE_DAYS")
            .unwrap_or_else(|_| "0".to_string())
            .parse::<u32>()
            .map_err(|_| "REPORTING_MIN_ACCOUNT_AGE_DAYS must be a valid number".to_string())?;

        let notifier = match env::var("REPORTING_NOTIFIER")
            .unwrap_or_else(|_| "email".to_string())
            .as_str()
        {
            "email" => NotifierKind::Email,
            "ticket" => NotifierKind::Ticket,
            other => return Err(format!("Unknown REPORTING_NOTIFIER: {}", other)),
        };

        Ok(Self {
            enabled,
            developer_mode,
            min_account_age_days,
            instrumentation_enabled,
            notifier,
        })
    }
}

impl RateLimitConfig {
    const DEFAULT_MAX_REPORTS: u32 = 5;
    const DEFAULT_WINDOW_SECS: u64 = 86400; // one day

    pub fn from_env() -> Result<Self, String> {
        let max_reports = env::var("RATE_LIMIT_MAX_REPORTS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REPORTS.to_string())
            .parse::<u32>()
            .map_err(|_| "RATE_LIMIT_MAX_REPORTS must be a valid number".to_string())?;

        let window_secs = env::var("RATE_LIMIT_WINDOW_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_WINDOW_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "RATE_LIMIT_WINDOW_SECS must be a valid number".to_string())?;

        Ok(Self {
            max_reports,
            window_secs,
        })
    }
}

impl MailerConfig {
    pub fn from_env() -> Result<Self, String> {
        let smtp_host = env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string());
        let smtp_username = env::var("SMTP_USERNAME").unwrap_or_default();
        let smtp_password = env::var("SMTP_PASSWORD").unwrap_or_default();

        let from_address = env::var("MAILER_FROM").ok().filter(|s| !s.is_empty());

        let recipients: Vec<String> = env::var("MAILER_RECIPIENTS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            smtp_host,
            smtp_username,
            smtp_password,
            from_address,
            recipients,
        })
    }
}

impl TicketingConfig {
    const DEFAULT_SUBJECT: &'static str = "Incident report: immediate threat";

    pub fn from_env() -> Result<Self, String> {
        let endpoint = env::var("TICKETING_ENDPOINT").unwrap_or_default();
        let proxy = env::var("TICKETING_PROXY").ok().filter(|s| !s.is_empty());
        let requester_name =
            env::var("TICKETING_REQUESTER_NAME").unwrap_or_else(|_| "Incident intake".to_string());
        let requester_email = env::var("TICKETING_REQUESTER_EMAIL")
            .unwrap_or_else(|_| "noreply@localhost".to_string());
        let subject =
            env::var("TICKETING_SUBJECT").unwrap_or_else(|_| Self::DEFAULT_SUBJECT.to_string());

        Ok(Self {
            endpoint,
            proxy,
            requester_name,
            requester_email,
            subject,
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Incident Intake API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Incident reporting intake service".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

fn parse_bool(var: &str, default: bool) -> Result<bool, String> {
    match env::var(var) {
        Ok(v) => match v.as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            other => Err(format!("{} must be a boolean, got: {}", var, other)),
        },
        Err(_) => Ok(default),
    }
}
