use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Fail,
}

/// JSON wrapper shared by every endpoint: a `status` plus either a `message`
/// or a `data` payload.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl Envelope<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: Status::Fail,
            message: Some(message.into()),
            data: None,
        }
    }
}

impl<T: Serialize> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            status: Status::Success,
            message: None,
            data: Some(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_envelope_shape() {
        let value = serde_json::to_value(Envelope::message("pong")).unwrap();
        assert_eq!(value, json!({ "status": "success", "message": "pong" }));
    }

    #[test]
    fn test_fail_envelope_shape() {
        let value = serde_json::to_value(Envelope::fail("Invalid payload")).unwrap();
        assert_eq!(value, json!({ "status": "fail", "message": "Invalid payload" }));
    }

    #[test]
    fn test_data_envelope_omits_message() {
        let value = serde_json::to_value(Envelope::data(json!({ "users": [] }))).unwrap();
        assert_eq!(value, json!({ "status": "success", "data": { "users": [] } }));
    }
}
