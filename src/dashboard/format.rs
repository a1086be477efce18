//! Display-only proxy string derivation.
//!
//! Nothing here talks to the network. Every function is a pure function of
//! fetched plan data and the chosen options, except [`session_token`], which
//! draws from the supplied RNG.

use std::fmt;
use std::str::FromStr;

use rand::Rng;

/// Characters session tokens are drawn from.
pub const TOKEN_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Length of generated session tokens.
pub const DEFAULT_TOKEN_LEN: usize = 8;

/// Unit a sticky-session duration is entered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionUnit {
    Sec,
    Min,
    Hour,
}

impl SessionUnit {
    fn seconds(&self) -> u64 {
        match self {
            SessionUnit::Sec => 1,
            SessionUnit::Min => 60,
            SessionUnit::Hour => 3600,
        }
    }
}

impl FromStr for SessionUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sec" => Ok(SessionUnit::Sec),
            "min" => Ok(SessionUnit::Min),
            "hour" => Ok(SessionUnit::Hour),
            other => Err(format!("unknown session unit '{}' (expected sec, min or hour)", other)),
        }
    }
}

/// Convert a duration entered as text into total seconds.
///
/// Non-numeric, negative or overflowing input yields `None`.
pub fn session_seconds(unit: SessionUnit, value: &str) -> Option<u64> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .and_then(|v| v.checked_mul(unit.seconds()))
}

/// Random token over [`TOKEN_ALPHABET`]. Not a secret; it only scopes a session.
pub fn session_token<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
        .collect()
}

/// Layout of a credentialed connection string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProxyFormat {
    /// `host:port:user:pass`
    #[default]
    HostPortUserPass,
    /// `user:pass@host:port`
    UserPassAtHostPort,
}

impl FromStr for ProxyFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "host:port:user:pass" | "hpup" => Ok(ProxyFormat::HostPortUserPass),
            "user:pass@host:port" | "upahp" => Ok(ProxyFormat::UserPassAtHostPort),
            other => Err(format!("unknown proxy format '{}'", other)),
        }
    }
}

impl fmt::Display for ProxyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyFormat::HostPortUserPass => write!(f, "host:port:user:pass"),
            ProxyFormat::UserPassAtHostPort => write!(f, "user:pass@host:port"),
        }
    }
}

/// Rotating keeps the username as issued; sticky pins a session token and lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionMode {
    #[default]
    Rotating,
    Sticky { token: String, seconds: u64 },
}

impl SessionMode {
    /// Sticky session with a fresh random token.
    pub fn sticky(seconds: u64) -> Self {
        SessionMode::Sticky {
            token: session_token(&mut rand::thread_rng(), DEFAULT_TOKEN_LEN),
            seconds,
        }
    }
}

/// Options chosen in the proxy list view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyOptions {
    pub format: ProxyFormat,
    /// Scheme prefix such as `http` or `socks5://`. `None` prints no prefix.
    pub scheme: Option<String>,
    pub session: SessionMode,
}

/// Username carrying the session parameters.
pub fn session_username(username: &str, session: &SessionMode) -> String {
    match session {
        SessionMode::Rotating => username.to_string(),
        SessionMode::Sticky { token, seconds } => {
            format!("{}-session-{}-sesstime-{}", username, token, seconds)
        }
    }
}

fn scheme_prefix(scheme: Option<&str>) -> String {
    match scheme.map(str::trim).filter(|s| !s.is_empty()) {
        None => String::new(),
        Some(s) if s.ends_with("://") => s.to_string(),
        Some(s) => format!("{}://", s),
    }
}

/// Credentialed connection string for one `host:port` endpoint.
pub fn format_proxy(host_port: &str, username: &str, password: &str, options: &ProxyOptions) -> String {
    let user = session_username(username, &options.session);
    let prefix = scheme_prefix(options.scheme.as_deref());
    match options.format {
        ProxyFormat::HostPortUserPass => format!("{}{}:{}:{}", prefix, host_port, user, password),
        ProxyFormat::UserPassAtHostPort => format!("{}{}:{}@{}", prefix, user, password, host_port),
    }
}

/// IP-authenticated connection string: the endpoint with an optional scheme.
pub fn format_whitelisted(host_port: &str, scheme: Option<&str>) -> String {
    format!("{}{}", scheme_prefix(scheme), host_port)
}
