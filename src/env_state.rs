//! # HORIZONS environment state
//!
//! This module defines [`crate::env_state::HorizonsEnv`], the **shared environment object**
//! used across the crate. It owns a persistent **HTTP client** through which every
//! HORIZONS query is issued.
//!
//! This object is designed to be **cheaply cloneable** and passed to any function
//! that needs to reach the remote service, so that connection reuse and the
//! timeout policy live in one place.
//!
//! ## Structure
//!
//! ```text
//! HorizonsEnv
//! └── http_client  (ureq::Agent)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use horizons_ephem::env_state::HorizonsEnv;
//!
//! let env = HorizonsEnv::new();
//! // All HORIZONS traffic goes through the agent held by `env`.
//! ```
//!
//! ## Notes
//!
//! - The agent carries a 10 second global timeout; a slow or unreachable
//!   service surfaces as [`crate::horizons_errors::HorizonsError::UreqHttpError`].
//! - Reuse a single `HorizonsEnv` between calls to avoid re-creating HTTP
//!   sessions.
use std::time::Duration;

use ureq::Agent;

use crate::horizons_errors::HorizonsError;

/// Shared environment passed to every function that queries HORIZONS.
///
/// # Fields
///
/// * `http_client` - A ureq agent used to make HTTP requests
#[derive(Debug, Clone)]
pub struct HorizonsEnv {
    pub http_client: Agent,
}

impl Default for HorizonsEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl HorizonsEnv {
    /// Create a new environment.
    ///
    /// Return
    /// ------
    /// * A new `HorizonsEnv` with an HTTP client configured with a 10 second
    ///   global timeout.
    pub fn new() -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(10)))
            .build();
        let agent: Agent = config.into();

        HorizonsEnv { http_client: agent }
    }

    /// Issue a form-encoded POST request and return the response body as text.
    ///
    /// Argument
    /// --------
    /// * `url`: the endpoint to post to
    /// * `form`: the form key/value pairs
    ///
    /// Return
    /// ------
    /// * The raw response body, or the transport error
    pub(crate) fn post_form<'a, I>(&self, url: &str, form: I) -> Result<String, HorizonsError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        tracing::debug!("POST {url}");
        let mut response = self.http_client.post(url).send_form(form)?;
        let body = response.body_mut().read_to_string()?;
        Ok(body)
    }
}
