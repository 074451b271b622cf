//! Identity protocol constants shared by the SDK and the CLI
//!
//! These are pre-compiled into the binary to avoid the need for external
//! configuration files.

/// Query parameter carrying the session token on the redirect URL
pub const TOKEN_QUERY_PARAM: &str = "token";

/// Query parameter used to prefill the login form with an email address
pub const EMAIL_QUERY_PARAM: &str = "email";

/// Query parameter telling the login page where to redirect on completion
pub const REDIRECT_QUERY_PARAM: &str = "redirect";

/// Path of the login page, relative to the website URL
pub const LOGIN_PAGE_PATH: &str = "login";

/// Path of the account endpoint, relative to the webservice URL
pub const ACCOUNT_ENDPOINT_PATH: &str = "v2/session/account";

/// Default credential-store service name when no access group is configured
pub const DEFAULT_ACCESS_GROUP: &str = "tessera";
