use std::{fmt, sync::Arc};

use crate::mode::DeliveryTarget;

/// A single parameter or header value.
///
/// Literal and numeric values render the same way everywhere. Deferred values
/// render differently depending on where they are delivered:
///
/// - [`DeliveryTarget::Url`] and [`DeliveryTarget::Body`] invoke the producer
///   and use its return value.
/// - [`DeliveryTarget::Header`] never invokes the producer. The header carries
///   the producer's string form (its label) instead.
///
/// The header behavior is kept for wire compatibility with existing servers
/// that expect it. It is most likely an accident of the original client and
/// should not be relied on for new integrations.
#[derive(Clone)]
pub enum ValueSource {
    /// Plain string value.
    Literal(String),
    /// Numeric value, rendered in base 10.
    Numeric(f64),
    /// Zero-argument producer evaluated when a request is encoded.
    Deferred {
        /// String form used when the value is delivered as a header.
        label: String,
        /// Producer invoked for URL and body delivery.
        producer: Arc<dyn Fn() -> String + Send + Sync>,
    },
}

impl ValueSource {
    /// Creates a deferred value whose string form is the producer's type name.
    pub fn deferred<F>(producer: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Self::Deferred {
            label: std::any::type_name::<F>().to_owned(),
            producer: Arc::new(producer),
        }
    }

    /// Creates a deferred value with an explicit string form.
    pub fn deferred_with_label<F>(label: impl Into<String>, producer: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Self::Deferred {
            label: label.into(),
            producer: Arc::new(producer),
        }
    }

    /// Returns `true` for deferred values.
    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred { .. })
    }

    /// Returns the value's string form without invoking any producer.
    pub fn string_form(&self) -> String {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Numeric(value) => format_number(*value),
            Self::Deferred { label, .. } => label.clone(),
        }
    }

    /// Evaluates the value to a string, invoking a deferred producer once.
    pub fn evaluate(&self) -> String {
        match self {
            Self::Deferred { producer, .. } => producer(),
            other => other.string_form(),
        }
    }

    /// Renders the value for a delivery target.
    pub fn render(&self, target: DeliveryTarget) -> String {
        match target {
            DeliveryTarget::Header => self.string_form(),
            DeliveryTarget::Url | DeliveryTarget::Body => self.evaluate(),
        }
    }
}

impl fmt::Debug for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Numeric(value) => f.debug_tuple("Numeric").field(value).finish(),
            Self::Deferred { label, .. } => f
                .debug_struct("Deferred")
                .field("label", label)
                .finish_non_exhaustive(),
        }
    }
}

// Deferred values compare by producer identity, never by their output.
impl PartialEq for ValueSource {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Literal(a), Self::Literal(b)) => a == b,
            (Self::Numeric(a), Self::Numeric(b)) => a == b,
            (Self::Deferred { producer: a, .. }, Self::Deferred { producer: b, .. }) => {
                Arc::ptr_eq(a, b)
            }
            _ => false,
        }
    }
}

impl From<&str> for ValueSource {
    fn from(value: &str) -> Self {
        Self::Literal(value.to_owned())
    }
}

impl From<String> for ValueSource {
    fn from(value: String) -> Self {
        Self::Literal(value)
    }
}

impl From<&String> for ValueSource {
    fn from(value: &String) -> Self {
        Self::Literal(value.clone())
    }
}

impl From<f64> for ValueSource {
    fn from(value: f64) -> Self {
        Self::Numeric(value)
    }
}

macro_rules! numeric_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ValueSource {
                fn from(value: $ty) -> Self {
                    Self::Numeric(f64::from(value))
                }
            }
        )*
    };
}

numeric_from!(i8, i16, i32, u8, u16, u32, f32);

// Wider integers follow the same rounding a JavaScript number would apply.
macro_rules! numeric_from_lossy {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ValueSource {
                fn from(value: $ty) -> Self {
                    Self::Numeric(value as f64)
                }
            }
        )*
    };
}

numeric_from_lossy!(i64, u64, isize, usize);

impl From<bool> for ValueSource {
    fn from(value: bool) -> Self {
        Self::Literal(value.to_string())
    }
}

fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        return if value.is_sign_positive() {
            "Infinity".to_owned()
        } else {
            "-Infinity".to_owned()
        };
    }
    if value == 0.0 {
        return "0".to_owned();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }

    // Outside that range numbers use exponent notation with a signed exponent.
    let formatted = format!("{value:e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => formatted,
    }
}
