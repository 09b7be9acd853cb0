use clap::Parser;
use fin::{FinConfig, FinError};
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(
    name = "fin-mcpd",
    version,
    about = "Financial intelligence MCP server (SEC EDGAR, FRED, Yahoo Finance)."
)]
pub(crate) struct CliArgs {
    /// Identification sent to SEC EDGAR, e.g. "MyApp/1.0 (me@example.com)".
    #[arg(long, env = "FIN_EDGAR_USER_AGENT")]
    edgar_user_agent: Option<String>,

    #[arg(long = "edgar-user-agent-compat", env = "EDGAR_USER_AGENT", hide = true)]
    edgar_user_agent_compat: Option<String>,

    /// FRED API key. FRED tools fail until one is supplied.
    #[arg(long, env = "FRED_API_KEY", hide_env_values = true)]
    fred_api_key: Option<String>,

    /// SEC EDGAR requests per second.
    #[arg(long, env = "FIN_EDGAR_RATE")]
    edgar_rate: Option<f64>,

    /// FRED requests per second.
    #[arg(long, env = "FIN_FRED_RATE")]
    fred_rate: Option<f64>,

    /// Yahoo Finance requests per second.
    #[arg(long, env = "FIN_YAHOO_RATE")]
    yahoo_rate: Option<f64>,
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("missing required setting: {0}")]
    MissingSetting(&'static str),
    #[error(transparent)]
    Invalid(#[from] FinError),
}

pub(crate) fn from_args() -> Result<FinConfig, ConfigError> {
    FinConfig::try_from(CliArgs::parse())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<CliArgs> for FinConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let user_agent = non_blank(args.edgar_user_agent)
            .or_else(|| non_blank(args.edgar_user_agent_compat))
            .ok_or(ConfigError::MissingSetting("FIN_EDGAR_USER_AGENT"))?;

        let mut config = Self::new(user_agent).with_fred_api_key(args.fred_api_key);
        if let Some(rate) = args.edgar_rate {
            config = config.with_edgar_rate(rate);
        }
        if let Some(rate) = args.fred_rate {
            config = config.with_fred_rate(rate);
        }
        if let Some(rate) = args.yahoo_rate {
            config = config.with_yahoo_rate(rate);
        }

        config.validate()?;
        Ok(config)
    }
}
