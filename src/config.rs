use clap::{Parser, ValueEnum};
use std::net::IpAddr;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;

use crate::rate_limit::MAX_WINDOW_SECS;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

// CLI argument structure, every flag can also come from the environment (or .env)
#[derive(Parser, Debug, Clone)]
#[command(name = "no-as-a-service")]
#[command(about = "Hands out a random, localized reason to say no")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    // Rate limit max requests per window
    #[arg(long, env = "RATE_LIMIT_MAX", default_value = "120")]
    pub rate_limit_max: NonZeroU32,

    // Rate limit window in seconds, at most one year
    #[arg(
        long,
        env = "RATE_LIMIT_WINDOW_SECONDS",
        default_value_t = 60,
        value_parser = clap::value_parser!(u64).range(1..=MAX_WINDOW_SECS)
    )]
    pub rate_limit_window_seconds: u64,

    // Language used when the request has no ?lang=
    #[arg(long, env = "DEFAULT_LANGUAGE", default_value = "en")]
    pub default_language: String,

    // Directory holding reasons.<lang>.json files
    #[arg(long, env = "DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    // Peers allowed to set X-Forwarded-For / X-Real-IP (comma-separated)
    #[arg(long, env = "TRUSTED_PROXIES", value_delimiter = ',', default_value = "::1")]
    pub trusted_proxies: Vec<IpAddr>,

    // How often expired rate limit windows are dropped, 0 disables
    #[arg(long, env = "SWEEP_INTERVAL_SECONDS", default_value_t = 60)]
    pub sweep_interval_seconds: u64,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Args {
    pub fn rate_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_seconds)
    }

    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval_seconds > 0).then(|| Duration::from_secs(self.sweep_interval_seconds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_explicit_flags() {
        let args = Args::try_parse_from([
            "no-as-a-service",
            "--port",
            "9000",
            "--rate-limit-max",
            "3",
            "--rate-limit-window-seconds",
            "30",
            "--trusted-proxies",
            "::1,10.0.0.1",
            "--sweep-interval-seconds",
            "0",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(args.port, 9000);
        assert_eq!(args.rate_limit_max.get(), 3);
        assert_eq!(args.rate_window(), Duration::from_secs(30));
        assert_eq!(
            args.trusted_proxies,
            vec!["::1".parse::<IpAddr>().unwrap(), "10.0.0.1".parse().unwrap()]
        );
        assert_eq!(args.sweep_interval(), None);
        assert_eq!(args.log_format, LogFormat::Json);
    }

    #[test]
    fn rejects_zero_limit_and_window() {
        assert!(Args::try_parse_from(["no-as-a-service", "--rate-limit-max", "0"]).is_err());
        assert!(
            Args::try_parse_from(["no-as-a-service", "--rate-limit-window-seconds", "0"]).is_err()
        );
    }

    #[test]
    fn rejects_window_longer_than_a_year() {
        let too_long = (MAX_WINDOW_SECS + 1).to_string();
        assert!(
            Args::try_parse_from(["no-as-a-service", "--rate-limit-window-seconds", &too_long]).is_err()
        );

        let longest = MAX_WINDOW_SECS.to_string();
        let args = Args::try_parse_from(["no-as-a-service", "--rate-limit-window-seconds", &longest])
            .unwrap();
        assert_eq!(args.rate_limit_window_seconds, MAX_WINDOW_SECS);
    }

    #[test]
    fn environment_beats_dotenv_and_flags_beat_both() {
        let dotenv = std::env::temp_dir().join(format!("noaas-env-{}", uuid::Uuid::new_v4()));
        std::fs::write(&dotenv, "RATE_LIMIT_MAX=99\nSWEEP_INTERVAL_SECONDS=5\n").unwrap();

        // SAFETY: environment access in these tests all goes through std,
        // which serialises it; 7 is also a valid value for every other test.
        unsafe { std::env::set_var("RATE_LIMIT_MAX", "7") };
        dotenvy::from_path(&dotenv).unwrap();
        let _ = std::fs::remove_file(&dotenv);

        let args = Args::try_parse_from(["no-as-a-service"]).unwrap();
        assert_eq!(args.rate_limit_max.get(), 7);
        assert_eq!(args.sweep_interval(), Some(Duration::from_secs(5)));

        let args = Args::try_parse_from(["no-as-a-service", "--rate-limit-max", "3"]).unwrap();
        assert_eq!(args.rate_limit_max.get(), 3);
    }

    #[test]
    fn rejects_bad_proxy_address() {
        assert!(Args::try_parse_from(["no-as-a-service", "--trusted-proxies", "not-an-ip"]).is_err());
    }
}
