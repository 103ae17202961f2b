use http::Method;

use crate::{
    bag::ValueBag,
    config::RequestConfig,
    error::ConfigError,
    issuer::NoopIssuer,
    mode::ParamsMode,
    uploader::Uploader,
};

/// Builder for configuring an [`Uploader`].
#[derive(Debug, Clone, Default)]
pub struct UploaderBuilder<I = NoopIssuer> {
    config: RequestConfig,
    issuer: I,
}

impl UploaderBuilder<NoopIssuer> {
    /// Creates a builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<I> UploaderBuilder<I> {
    /// Returns the current builder configuration snapshot.
    pub fn config(&self) -> &RequestConfig {
        &self.config
    }

    /// Replaces the full builder configuration.
    pub fn with_config(mut self, config: RequestConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the request issuer.
    pub fn issuer<J>(self, issuer: J) -> UploaderBuilder<J> {
        UploaderBuilder {
            config: self.config,
            issuer,
        }
    }

    /// Sets the upload endpoint.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    /// Sets the HTTP method.
    pub fn method(mut self, method: Method) -> Self {
        self.config.method = method;
        self
    }

    /// Sets where parameters are delivered.
    pub fn params_mode(mut self, mode: ParamsMode) -> Self {
        self.config.params_mode = mode;
        self
    }

    /// Sets whether the body is always multipart.
    pub fn force_multipart(mut self, force: bool) -> Self {
        self.config.force_multipart = force;
        self
    }

    /// Sets the initial uploader-wide params.
    pub fn params(mut self, params: impl Into<ValueBag>) -> Self {
        self.config.params = params.into();
        self
    }

    /// Sets the initial uploader-wide custom headers.
    pub fn custom_headers(mut self, headers: impl Into<ValueBag>) -> Self {
        self.config.custom_headers = headers.into();
        self
    }

    /// Sets the prefix for parameters delivered as headers.
    pub fn header_param_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.header_param_prefix = prefix.into();
        self
    }

    /// Sets the multipart part name carrying the file.
    pub fn input_name(mut self, input_name: impl Into<String>) -> Self {
        self.config.input_name = input_name.into();
        self
    }

    /// Validates builder configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.config.validate()
    }

    /// Finalizes and returns validated configuration.
    pub fn build_config(self) -> Result<RequestConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }

    /// Finalizes the uploader.
    pub fn build(self) -> Result<Uploader<I>, ConfigError> {
        Uploader::with_config(self.issuer, self.config)
    }
}
