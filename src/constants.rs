//! Names shared by the entry points and the record schema.

/// Name under which the format entry point is exposed to policies.
pub const FORMAT_FUNCTION: &str = "uri.format";

/// Name under which the parse entry point is exposed to policies.
pub const PARSE_FUNCTION: &str = "uri.parse";

/// Record key for the scheme.
pub const SCHEME_KEY: &str = "scheme";

/// Record key for the path or opaque part.
pub const PATH_KEY: &str = "path";

/// Record key for the userinfo user name.
pub const USERNAME_KEY: &str = "username";

/// Record key for the userinfo password.
pub const PASSWORD_KEY: &str = "password";

/// Record key for the host; its presence selects hierarchical mode.
pub const HOSTNAME_KEY: &str = "hostname";

/// Record key for the port.
pub const PORT_KEY: &str = "port";

/// Record key for the decoded, multi-valued query mapping.
pub const QUERY_KEY: &str = "query";

/// Record key for the percent-encoded query string.
pub const ENCODED_QUERY_KEY: &str = "encoded_query";

/// Record key for the fragment.
pub const FRAGMENT_KEY: &str = "fragment";
