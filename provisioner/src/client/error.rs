use std::error::Error;
use std::fmt::{Display, Formatter};

/// The result type returned by [`ResourceClient`](super::ResourceClient) implementations.
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// The error type returned by [`ResourceClient`](super::ResourceClient) implementations.
#[derive(Debug)]
pub enum ClientError {
    /// The provider answered, but a field that was expected in the response was absent.
    MissingData(Option<ErrorMessage>),

    /// The provider rejected the request or could not be reached.
    RequestFailed(Option<Box<dyn Error + Send + Sync + 'static>>),

    /// The request could not be built from the data that was given.
    Serialization(Option<Box<dyn Error + Send + Sync + 'static>>),
}

impl ClientError {
    pub fn request_failed<E>(e: E) -> Self
    where
        E: Into<Box<dyn Error + Send + Sync + 'static>>,
    {
        Self::RequestFailed(Some(e.into()))
    }

    pub fn missing_data<S: Into<String>>(message: S) -> Self {
        Self::MissingData(Some(ErrorMessage::from(message)))
    }

    fn variant_name(&self) -> &'static str {
        match self {
            ClientError::MissingData(_) => "Missing data",
            ClientError::RequestFailed(_) => "Request failed",
            ClientError::Serialization(_) => "Serialization error",
        }
    }

    fn inner(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        match self {
            ClientError::MissingData(s) => s
                .as_ref()
                .map(|some| some as &(dyn Error + Send + Sync + 'static)),
            ClientError::RequestFailed(e) => e.as_ref().map(|some| some.as_ref()),
            ClientError::Serialization(e) => e.as_ref().map(|some| some.as_ref()),
        }
    }
}

impl Display for ClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.inner() {
            None => Display::fmt(self.variant_name(), f),
            Some(inner) => write!(f, "{}: {}", self.variant_name(), inner),
        }
    }
}

impl Error for ClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.inner().map(|some| some as &(dyn Error + 'static))
    }
}

/// This struct can serve as an `Error` type when you want to provide an error message, but have no
/// underlying error type. It is handy for mock implementations of [`ResourceClient`].
///
/// # Example
///
/// ```
/// # use cluster_provisioner::client::ErrorMessage;
/// let _error: ErrorMessage = "Something bad happened".into();
/// ```
///
/// [`ResourceClient`]: super::ResourceClient
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ErrorMessage {
    message: String,
}

impl Display for ErrorMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.message, f)
    }
}

impl<S: Into<String>> From<S> for ErrorMessage {
    fn from(s: S) -> Self {
        Self { message: s.into() }
    }
}

impl Error for ErrorMessage {}

#[test]
fn client_error_display_includes_source() {
    let error = ClientError::request_failed(ErrorMessage::from("AccessDenied"));
    assert_eq!(error.to_string(), "Request failed: AccessDenied");
    let error = ClientError::MissingData(None);
    assert_eq!(error.to_string(), "Missing data");
    let error = ClientError::Serialization(Some(Box::new(ErrorMessage::from("invalid UTF-8"))));
    assert_eq!(error.to_string(), "Serialization error: invalid UTF-8");
    assert!(error.source().is_some());
}
