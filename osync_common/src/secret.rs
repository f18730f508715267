use std::fmt::{self, Debug, Display};

use serde::{Serialize, Serializer};

const REDACTED: &str = "****";

/// A credential that must never reach logs or wire payloads.
///
/// Failed order submissions are serialized wholesale into notification bodies, so a password or API key that
/// ends up inside a serializable struct must redact itself. `Debug`, `Display` and `Serialize` all produce
/// `****`; the only way at the value is an explicit [`reveal`](Secret::reveal) at the call site that puts it
/// on the request.
#[derive(Clone, Default)]
pub struct Secret<T> {
    value: T,
}

impl<T> Secret<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    pub fn reveal(&self) -> &T {
        &self.value
    }
}

impl From<&str> for Secret<String> {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl<T> Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> Serialize for Secret<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn formatting_never_leaks_the_value() {
        let password = Secret::from("hunter2");
        assert_eq!(format!("{password}"), "****");
        assert_eq!(format!("{password:?}"), "****");
        assert_eq!(password.reveal(), "hunter2");
    }

    #[test]
    fn serialization_is_redacted() {
        #[derive(Serialize)]
        struct Credentials {
            username: String,
            password: Secret<String>,
        }
        let creds = Credentials { username: "api_user".to_string(), password: Secret::from("hunter2") };
        let json = serde_json::to_string(&creds).unwrap();
        assert!(json.contains("api_user"));
        assert!(!json.contains("hunter2"));
        assert!(json.contains("****"));
    }
}
