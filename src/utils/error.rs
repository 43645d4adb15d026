use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("k5_auth_facts not found, have you run k5_auth?")]
    MissingAuth,

    #[error("k5_auth_facts incomplete: {field} missing")]
    IncompleteAuth { field: String },

    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} timed out")]
    Timeout {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("RESP: HTTP Code:{status} {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Security Group {name} not found")]
    SecurityGroupNotFound { name: String },

    #[error("No '{state}' function in this module, use os_port module instead")]
    UnsupportedState { state: String },

    #[error("Invalid module arguments: {message}")]
    InvalidArgs { message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfig {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ProvisionError {
    /// Splits reqwest failures so an expired deadline is reported on its own.
    pub fn from_request(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProvisionError::Timeout {
                url: url.to_string(),
                source: err,
            }
        } else {
            ProvisionError::transport(err)
        }
    }

    /// reqwest's `Display` stops at the outer error, so the cause chain
    /// (refused connection, DNS, TLS) is folded into the message.
    pub fn transport(err: reqwest::Error) -> Self {
        let mut message = err.to_string();
        let mut cause = std::error::Error::source(&err);
        while let Some(inner) = cause {
            let text = inner.to_string();
            if !message.contains(&text) {
                message.push_str(": ");
                message.push_str(&text);
            }
            cause = std::error::Error::source(inner);
        }
        ProvisionError::Transport {
            message,
            source: err,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ProvisionError::MissingAuth | ProvisionError::IncompleteAuth { .. } => {
                "Run the k5_auth module first and pass its facts as k5_auth"
            }
            ProvisionError::Transport { .. } => {
                "Check the networking endpoint address and network connectivity"
            }
            ProvisionError::Timeout { .. } => {
                "Raise K5_TIMEOUT_SECONDS or check the health of the networking service"
            }
            ProvisionError::UnexpectedStatus { status: 401, .. } => {
                "The auth token was rejected, re-run k5_auth to refresh it"
            }
            ProvisionError::UnexpectedStatus { .. } => {
                "Inspect the response body returned by the networking service"
            }
            ProvisionError::SecurityGroupNotFound { .. } => {
                "Create the security group or correct its name"
            }
            ProvisionError::UnsupportedState { .. } => "Use the os_port module to remove ports",
            ProvisionError::InvalidArgs { .. } => "Check the module parameters in the task",
            ProvisionError::InvalidConfig { .. } => "Check the module settings and k5_auth endpoints",
            ProvisionError::Io(_) => "Check that the module arguments file is readable",
            ProvisionError::Serialization(_) => {
                "The networking service returned an unexpected payload"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ProvisionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_matches_module_format() {
        let err = ProvisionError::UnexpectedStatus {
            status: 409,
            body: "{\"NeutronError\": \"conflict\"}".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "RESP: HTTP Code:409 {\"NeutronError\": \"conflict\"}"
        );
    }

    #[test]
    fn test_unsupported_state_message() {
        let err = ProvisionError::UnsupportedState {
            state: "absent".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No 'absent' function in this module, use os_port module instead"
        );
        assert_eq!(
            err.recovery_suggestion(),
            "Use the os_port module to remove ports"
        );
    }

    #[test]
    fn test_unauthorized_gets_specific_suggestion() {
        let err = ProvisionError::UnexpectedStatus {
            status: 401,
            body: String::new(),
        };
        assert!(err.recovery_suggestion().contains("k5_auth"));
    }
}
