use crate::error::{
    ApiBaseNotABaseSnafu, BadEnvVarSnafu, InvalidApiBaseSnafu, ParseEnvVarSnafu, RollcallResult,
    ZeroPageSizeSnafu,
};
use dotenvy::var;
use snafu::{OptionExt, ResultExt};
use std::{
    env::VarError,
    num::{NonZeroUsize, ParseIntError},
    str::FromStr,
    sync::Arc,
    time::Duration,
};
use url::Url;

/// Base of the read-only student API, fixed at build time.
pub const API_BASE: &str = match option_env!("ROLLCALL_API_BASE") {
    Some(base) => base,
    None => "https://dvonb.xyz/api/2025-fall/itis-3135/students/",
};

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    api_config: Arc<ApiConfig>,
    server_ip: Arc<str>,
    page_size: NonZeroUsize,
    view_ttl: Duration,
}

impl RuntimeConfiguration {
    pub fn new() -> RollcallResult<Self> {
        let page_size: usize = optional_number("ROLLCALL_PAGE_SIZE", 15)?;

        Ok(Self {
            api_config: Arc::new(ApiConfig::new(
                API_BASE,
                Duration::from_secs(optional_number("ROLLCALL_REQUEST_TIMEOUT_SECS", 10)?),
            )?),
            server_ip: optional_var("ROLLCALL_SERVER_IP")?
                .unwrap_or_else(|| "127.0.0.1:8080".to_string())
                .into(),
            page_size: NonZeroUsize::new(page_size).context(ZeroPageSizeSnafu)?,
            view_ttl: Duration::from_secs(optional_number("ROLLCALL_VIEW_TTL_SECS", 30 * 60)?),
        })
    }

    #[cfg(test)]
    pub fn for_api(api_config: ApiConfig, page_size: NonZeroUsize) -> Self {
        Self {
            api_config: Arc::new(api_config),
            server_ip: "127.0.0.1:0".into(),
            page_size,
            view_ttl: Duration::from_secs(60),
        }
    }

    pub fn api_config(&self) -> Arc<ApiConfig> {
        self.api_config.clone()
    }

    pub fn server_ip(&self) -> &str {
        &self.server_ip
    }

    pub const fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    pub const fn view_ttl(&self) -> Duration {
        self.view_ttl
    }
}

#[derive(Debug)]
pub struct ApiConfig {
    base: Url,
    request_timeout: Duration,
}

impl ApiConfig {
    pub fn new(base: &str, request_timeout: Duration) -> RollcallResult<Self> {
        let mut base = Url::parse(base).context(InvalidApiBaseSnafu { original: base })?;
        if base.cannot_be_a_base() {
            return ApiBaseNotABaseSnafu {
                original: base.to_string(),
            }
            .fail();
        }
        // student URLs are built by pushing one segment onto the base path
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            base,
            request_timeout,
        })
    }

    pub const fn base(&self) -> &Url {
        &self.base
    }

    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Scheme, host and port of the API, against which relative image paths resolve.
    pub fn origin(&self) -> Url {
        let mut origin = self.base.clone();
        origin.set_path("/");
        origin.set_query(None);
        origin.set_fragment(None);
        origin
    }
}

fn optional_var(name: &'static str) -> RollcallResult<Option<String>> {
    match var(name) {
        Ok(value) => Ok(Some(value)),
        Err(dotenvy::Error::EnvVar(VarError::NotPresent)) => Ok(None),
        Err(source) => Err(source).context(BadEnvVarSnafu { name }),
    }
}

fn optional_number<T: FromStr<Err = ParseIntError>>(
    name: &'static str,
    default: T,
) -> RollcallResult<T> {
    optional_var(name)?.map_or(Ok(default), |value| {
        value.trim().parse().context(ParseEnvVarSnafu { name })
    })
}
