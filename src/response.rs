//! Body returned by every redirector endpoint.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectResponse {
    /// `true` if the service applied the change.
    pub success: bool,
    /// Service-side error message, set only when `success` is `false`.
    #[serde(default, deserialize_with = "deserialize_error")]
    pub error: Option<String>,
}

impl RedirectResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }

    /// Turns a `success: false` response into [`Error::Rejected`].
    pub fn into_result(self) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            let message = self
                .error
                .unwrap_or_else(|| "no error message given".to_string());
            Err(Error::Rejected(message))
        }
    }
}

/// The deployed service nests its errors as `{"name": .., "message": ..}`,
/// with both members `null` on success.
#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorField {
    Message(String),
    Detailed {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        message: Option<String>,
    },
}

fn deserialize_error<'de, D: Deserializer<'de>>(des: D) -> Result<Option<String>, D::Error> {
    let field = Option::<ErrorField>::deserialize(des)?;
    Ok(match field {
        None => None,
        Some(ErrorField::Message(message)) => Some(message),
        Some(ErrorField::Detailed { name, message }) => message.or(name),
    })
}
