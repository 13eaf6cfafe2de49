#[derive(clap::ValueEnum, Clone, Debug, Copy)]
pub enum CargoEnv {
    Development,
    Production,
}

/// how channel pages get visited once the directory is scraped
#[derive(clap::ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum ExtractionMode {
    /// one page at a time with `page_delay_ms` in between, nicest to the source site
    Sequential,
    /// up to `max_concurrency` pages in flight, output keeps directory order
    Concurrent,
    /// don't visit channel pages at all, just return the directory
    Skip,
}

#[derive(clap::Parser, Clone, Debug)]
pub struct AppConfig {
    // production or development
    #[clap(long, env, value_enum)]
    pub cargo_env: CargoEnv,

    // port that the app will bind to
    #[clap(long, env, default_value = "5000")]
    pub port: u16,

    // this should be either * for allowing everything, or a comma seperated list of domains like
    // example.com,something.com
    #[clap(long, env, default_value = "*")]
    pub cors_origin: String,

    // optional sentry integration
    #[clap(long, env)]
    pub sentry_dsn: Option<String>,

    // the directory site, everything relative gets resolved against this
    #[clap(long, env, default_value = "https://profamouslife.com")]
    pub source_base_url: String,

    // timeout for the directory and every channel page
    #[clap(long, env, default_value = "15")]
    pub request_timeout_secs: u64,

    // connect and read timeout for relayed requests, a stream can run as long as it keeps sending
    #[clap(long, env, default_value = "10")]
    pub proxy_timeout_secs: u64,

    // overall budget for a /api/matches call
    #[clap(long, env, default_value = "120")]
    pub handler_timeout_secs: u64,

    // delay between channel page requests in sequential mode
    #[clap(long, env, default_value = "1500")]
    pub page_delay_ms: u64,

    // only this many directory entries get processed
    #[clap(long, env, default_value = "30")]
    pub max_channels: usize,

    // pages in flight for concurrent mode
    #[clap(long, env, default_value = "4")]
    pub max_concurrency: usize,

    #[clap(long, env, value_enum, default_value = "sequential")]
    pub extraction_mode: ExtractionMode,

    // guess stream urls from the channel id when nothing else matched. these are never checked
    // so they're off unless asked for
    #[clap(long, env, default_value = "false")]
    pub guess_stream_urls: bool,

    // drop repeated titles from the directory
    #[clap(long, env, default_value = "true", action = clap::ArgAction::Set)]
    pub dedupe_channels: bool,

    #[clap(
        long,
        env,
        default_value = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
    )]
    pub user_agent: String,
}

impl AppConfig {
    /// base url without the trailing slash, used for origin spoofing
    pub fn source_origin(&self) -> &str {
        self.source_base_url.trim_end_matches('/')
    }
}

impl Default for AppConfig {
    // mostly here for tests, the real values come from clap
    fn default() -> Self {
        Self {
            cargo_env: CargoEnv::Development,
            port: 5000,
            cors_origin: "*".to_string(),
            sentry_dsn: None,
            source_base_url: "https://profamouslife.com".to_string(),
            request_timeout_secs: 15,
            proxy_timeout_secs: 10,
            handler_timeout_secs: 120,
            page_delay_ms: 1500,
            max_channels: 30,
            max_concurrency: 4,
            extraction_mode: ExtractionMode::Sequential,
            guess_stream_urls: false,
            dedupe_channels: true,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
        }
    }
}
