pub const DEFAULT_OEMBED_URL: &str = "https://www.youtube.com/oembed";
pub const DEFAULT_RELAY_URL: &str = "https://api.allorigins.win/get";
pub const DEFAULT_CAPTIONS_URL: &str = "https://www.youtube.com/api/timedtext";

const USER_AGENT: &str = concat!("konspekt/", env!("CARGO_PKG_VERSION"));

/// Addresses of the external lookup services
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub oembed_url: String,
    pub relay_url: String,
    pub captions_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            oembed_url: DEFAULT_OEMBED_URL.to_string(),
            relay_url: DEFAULT_RELAY_URL.to_string(),
            captions_url: DEFAULT_CAPTIONS_URL.to_string(),
        }
    }
}

impl Endpoints {
    pub fn with_oembed_url(mut self, url: impl Into<String>) -> Self {
        self.oembed_url = url.into();
        self
    }

    pub fn with_relay_url(mut self, url: impl Into<String>) -> Self {
        self.relay_url = url.into();
        self
    }

    pub fn with_captions_url(mut self, url: impl Into<String>) -> Self {
        self.captions_url = url.into();
        self
    }
}

/// Shared HTTP client. Timeouts are left to the transport defaults.
pub fn http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().user_agent(USER_AGENT).build()
}
