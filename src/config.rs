use http::{HeaderName, Method};

use crate::{bag::ValueBag, error::ConfigError, mode::ParamsMode};

/// Default upload endpoint.
pub const DEFAULT_ENDPOINT: &str = "/server/upload";

/// Default multipart part name carrying the file.
pub const DEFAULT_INPUT_NAME: &str = "qqfile";

/// Request options shared by every upload from one uploader.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestConfig {
    /// Upload endpoint; may be relative.
    pub endpoint: String,
    /// HTTP method, POST or PUT.
    pub method: Method,
    /// Where parameters are delivered.
    pub params_mode: ParamsMode,
    /// Always send a multipart body, even for URL delivery.
    pub force_multipart: bool,
    /// Initial uploader-wide parameters.
    pub params: ValueBag,
    /// Initial uploader-wide custom headers.
    pub custom_headers: ValueBag,
    /// Prefix for parameters delivered as headers.
    pub header_param_prefix: String,
    /// Multipart part name carrying the file.
    pub input_name: String,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            method: Method::POST,
            params_mode: ParamsMode::default(),
            force_multipart: true,
            params: ValueBag::new(),
            custom_headers: ValueBag::new(),
            header_param_prefix: String::new(),
            input_name: DEFAULT_INPUT_NAME.to_owned(),
        }
    }
}

impl RequestConfig {
    /// Creates a default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::EmptyEndpoint);
        }

        if self.input_name.trim().is_empty() {
            return Err(ConfigError::EmptyInputName);
        }

        if self.method != Method::POST && self.method != Method::PUT {
            return Err(ConfigError::UnsupportedMethod {
                method: self.method.to_string(),
            });
        }

        if !self.header_param_prefix.is_empty() {
            // A prefix is valid when it forms a valid header name on its own.
            HeaderName::from_bytes(self.header_param_prefix.as_bytes()).map_err(|_| {
                ConfigError::InvalidHeaderPrefix {
                    prefix: self.header_param_prefix.clone(),
                }
            })?;
        }

        Ok(())
    }
}
