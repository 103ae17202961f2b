use http::Method;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use uuid::Uuid;

use crate::{
    bag::ValueBag,
    descriptor::{RenderedMap, RequestDescriptor},
    mode::{DeliveryTarget, Transport},
    scope::FileId,
};

/// Characters escaped in query-string keys and values.
///
/// Leaves the same characters unescaped as `encodeURIComponent`.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Renders effective params and headers onto a [`RequestDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestEncoder {
    endpoint: String,
    method: Method,
    transport: Transport,
    header_param_prefix: String,
    input_name: String,
}

impl RequestEncoder {
    /// Creates an encoder for `endpoint` with POST, multipart transport,
    /// no header prefix and the `qqfile` input name.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method: Method::POST,
            transport: Transport::Multipart,
            header_param_prefix: String::new(),
            input_name: crate::config::DEFAULT_INPUT_NAME.to_owned(),
        }
    }

    /// Sets the HTTP method.
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the body shape.
    pub fn transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    /// Sets the prefix applied to parameters delivered as headers.
    pub fn header_param_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.header_param_prefix = prefix.into();
        self
    }

    /// Sets the multipart part name carrying the file.
    pub fn input_name(mut self, input_name: impl Into<String>) -> Self {
        self.input_name = input_name.into();
        self
    }

    /// Builds the descriptor for one request.
    ///
    /// Custom headers are applied first under their bare names. Parameters
    /// routed to headers are applied after them, so a prefixed parameter
    /// wins when its name coincides with a custom header.
    pub fn encode(
        &self,
        file_id: FileId,
        uuid: Uuid,
        params: &ValueBag,
        headers: &ValueBag,
        target: DeliveryTarget,
    ) -> RequestDescriptor {
        let mut url = self.endpoint.clone();
        let mut fields = RenderedMap::new();
        let mut rendered_headers = headers.resolve_for(DeliveryTarget::Header);

        let rendered_params = params.resolve_for(target);
        match target {
            DeliveryTarget::Url => append_query(&mut url, &rendered_params),
            DeliveryTarget::Body => fields = rendered_params,
            DeliveryTarget::Header => {
                for (key, value) in rendered_params.iter() {
                    rendered_headers.insert(format!("{}{key}", self.header_param_prefix), value);
                }
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            file_id = file_id.index(),
            target = ?target,
            params = params.len(),
            headers = rendered_headers.len(),
            "encoder: built request descriptor"
        );

        RequestDescriptor {
            file_id,
            uuid,
            method: self.method.clone(),
            url,
            fields,
            headers: rendered_headers,
            transport: self.transport,
            input_name: self.input_name.clone(),
        }
    }
}

fn append_query(url: &mut String, params: &RenderedMap) {
    if params.is_empty() {
        return;
    }

    if !url.contains('?') {
        url.push('?');
    } else if !url.ends_with('?') && !url.ends_with('&') {
        url.push('&');
    }

    let pairs: Vec<String> = params
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(key, QUERY_COMPONENT),
                utf8_percent_encode(value, QUERY_COMPONENT)
            )
        })
        .collect();
    url.push_str(&pairs.join("&"));
}
