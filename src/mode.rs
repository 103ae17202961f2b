use std::{convert::Infallible, fmt, str::FromStr};

/// Configured location for request parameters.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParamsMode {
    /// Parameters are appended to the endpoint's query string.
    Url,
    /// Parameters are sent as request body fields.
    #[default]
    Body,
    /// Parameters are sent as request headers.
    Header,
}

impl ParamsMode {
    /// Configuration name of this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Url => "paramsInUrl",
            Self::Body => "paramsInBody",
            Self::Header => "paramsInHeader",
        }
    }

    /// Parses a configuration name, falling back to [`ParamsMode::Url`].
    pub fn parse(value: &str) -> Self {
        match value {
            "paramsInBody" => Self::Body,
            "paramsInHeader" => Self::Header,
            _ => Self::Url,
        }
    }
}

impl FromStr for ParamsMode {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(value))
    }
}

impl From<String> for ParamsMode {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<ParamsMode> for String {
    fn from(mode: ParamsMode) -> Self {
        mode.as_str().to_owned()
    }
}

impl fmt::Display for ParamsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The one location parameters are rendered into for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryTarget {
    /// Endpoint query string.
    Url,
    /// Request body fields.
    Body,
    /// Request headers.
    Header,
}

/// Shape of the request body carrying the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transport {
    /// `multipart/form-data` body with the file as one part.
    Multipart,
    /// The file bytes are the entire body.
    Raw,
}

impl Transport {
    /// Returns `true` for multipart transport.
    pub fn is_multipart(self) -> bool {
        matches!(self, Self::Multipart)
    }
}

/// Maps the configured mode to a delivery target.
///
/// The mode is authoritative: body delivery is selected even when the
/// transport is not multipart.
pub fn select_target(mode: ParamsMode) -> DeliveryTarget {
    match mode {
        ParamsMode::Url => DeliveryTarget::Url,
        ParamsMode::Body => DeliveryTarget::Body,
        ParamsMode::Header => DeliveryTarget::Header,
    }
}

/// Picks the transport shape for a request.
///
/// Header mode always uses multipart so the file stays in the body.
pub fn select_transport(mode: ParamsMode, force_multipart: bool) -> Transport {
    if force_multipart || mode == ParamsMode::Header {
        Transport::Multipart
    } else {
        Transport::Raw
    }
}
