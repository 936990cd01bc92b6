//! Turns an HTTP status plus decoded JSON body into success or a typed error.
//!
//! # Design
//! Classification is a pure function over `RawResponse`. The order of the
//! checks in [`classify`] is significant: specific `exceptionId` matches are
//! tried before the status-class fallbacks, and every combination of status
//! and body ends in exactly one outcome.

use serde_json::{Map, Value};

use crate::error::Error;
use crate::http::HttpResponse;

/// The secret (HTTP Basic password) was wrong.
pub const PASSWORD_NOT_CORRECT: &str =
    "PostcodeNl_Controller_Plugin_HttpBasicAuthentication_PasswordNotCorrectException";

/// The key (HTTP Basic username) is not known.
pub const NOT_AUTHORIZED: &str =
    "PostcodeNl_Controller_Plugin_HttpBasicAuthentication_NotAuthorizedException";

/// Input was valid but no address matched.
pub const ADDRESS_NOT_FOUND: &str = "PostcodeNl_Service_PostcodeAddress_AddressNotFoundException";

/// Status code and decoded body of one round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    /// `None` when the body was not valid JSON.
    pub data: Option<Value>,
}

impl RawResponse {
    pub fn new(status: u16, data: Option<Value>) -> Self {
        Self { status, data }
    }

    /// Decode the body of `response`; anything that is not JSON becomes `None`.
    pub fn from_http(response: &HttpResponse) -> Self {
        let data = serde_json::from_str(&response.body).ok();
        Self::new(response.status, data)
    }

    /// Status rounded down to the nearest hundred (404 -> 400).
    pub fn status_class(&self) -> u16 {
        self.status / 100 * 100
    }
}

/// Classify a response, returning the JSON object on success.
pub fn classify(response: &RawResponse) -> Result<&Map<String, Value>, Error> {
    let status = response.status;
    let object = response.data.as_ref().and_then(Value::as_object);

    if let Some(object) = object {
        if response.status_class() == 200 {
            return Ok(object);
        }
    }

    let Some((object, exception_id)) = object.and_then(|o| exception_id_of(o).map(|id| (o, id)))
    else {
        if status == 503 {
            return Err(Error::service(format!(
                "service returned no valid JSON data, HTTP status code `{status}`: service \
                 unavailable, you might be rate-limited if you are sending too many requests"
            )));
        }
        return Err(Error::service(format!(
            "service returned no valid JSON data, HTTP status code `{status}`"
        )));
    };

    let exception = exception_message(object, &exception_id);

    if status == 401 {
        if exception_id == PASSWORD_NOT_CORRECT {
            return Err(Error::authentication(format!(
                "`secret` specified as HTTP authentication password is incorrect (\"{exception}\")"
            ))
            .with_identifier(exception_id));
        }
        if exception_id == NOT_AUTHORIZED {
            return Err(Error::authentication(format!(
                "`key` specified in HTTP authentication is incorrect (\"{exception}\")"
            ))
            .with_identifier(exception_id));
        }
    }

    if status == 404 && exception_id == ADDRESS_NOT_FOUND {
        return Err(Error::address_not_found(exception).with_identifier(exception_id));
    }

    let err = if status == 401 || status == 403 {
        Error::authentication(exception)
    } else if response.status_class() == 400 {
        Error::input_invalid(exception)
    } else {
        Error::service(exception)
    };
    Err(err.with_identifier(exception_id))
}

/// `exceptionId` as a string; absent and `null` both count as missing.
fn exception_id_of(object: &Map<String, Value>) -> Option<String> {
    match object.get("exceptionId")? {
        Value::Null => None,
        Value::String(id) => Some(id.clone()),
        other => Some(other.to_string()),
    }
}

fn exception_message(object: &Map<String, Value>, exception_id: &str) -> String {
    match object.get("exception") {
        Some(Value::String(message)) if !message.is_empty() => message.clone(),
        _ => format!("service raised `{exception_id}`"),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::ErrorKind;

    fn error_body(id: &str) -> Option<Value> {
        Some(json!({"exception": "upstream says no", "exceptionId": id}))
    }

    fn classify_err(status: u16, data: Option<Value>) -> Error {
        classify(&RawResponse::new(status, data)).unwrap_err()
    }

    #[test]
    fn status_class_rounds_down() {
        assert_eq!(RawResponse::new(200, None).status_class(), 200);
        assert_eq!(RawResponse::new(204, None).status_class(), 200);
        assert_eq!(RawResponse::new(404, None).status_class(), 400);
        assert_eq!(RawResponse::new(599, None).status_class(), 500);
    }

    #[test]
    fn object_with_2xx_is_success() {
        let data = Some(json!({"postcode": "2012ES"}));
        let response = RawResponse::new(200, data);
        let object = classify(&response).unwrap();
        assert_eq!(object["postcode"], "2012ES");

        let response = RawResponse::new(201, Some(json!({})));
        assert!(classify(&response).is_ok());
    }

    #[test]
    fn non_object_2xx_is_service_error() {
        let err = classify_err(200, Some(json!([1, 2])));
        assert_eq!(err.kind(), ErrorKind::Service);
        assert!(err.message().contains("`200`"));

        let err = classify_err(200, None);
        assert_eq!(err.kind(), ErrorKind::Service);
    }

    #[test]
    fn missing_json_on_503_mentions_rate_limit() {
        let err = classify_err(503, None);
        assert_eq!(err.kind(), ErrorKind::Service);
        assert!(err.message().contains("`503`"));
        assert!(err.message().contains("rate-limited"));
        assert!(err.identifier().is_none());
    }

    #[test]
    fn object_without_exception_id_is_service_error() {
        let err = classify_err(401, Some(json!({"exception": "nope"})));
        assert_eq!(err.kind(), ErrorKind::Service);
        assert!(err.message().contains("`401`"));

        let err = classify_err(500, Some(json!({"exceptionId": null})));
        assert_eq!(err.kind(), ErrorKind::Service);
        assert!(!err.message().contains("rate-limited"));
    }

    #[test]
    fn wrong_secret_is_authentication_error() {
        let err = classify_err(401, error_body(PASSWORD_NOT_CORRECT));
        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert!(err.message().contains("`secret`"));
        assert!(err.message().contains("upstream says no"));
        assert_eq!(err.identifier(), Some(PASSWORD_NOT_CORRECT));
    }

    #[test]
    fn wrong_key_is_authentication_error() {
        let err = classify_err(401, error_body(NOT_AUTHORIZED));
        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert!(err.message().contains("`key`"));
        assert_eq!(err.identifier(), Some(NOT_AUTHORIZED));
    }

    #[test]
    fn address_not_found_on_404() {
        let err = classify_err(404, error_body(ADDRESS_NOT_FOUND));
        assert_eq!(err.kind(), ErrorKind::AddressNotFound);
        assert_eq!(err.message(), "upstream says no");
    }

    #[test]
    fn address_not_found_id_on_other_status_falls_through() {
        let err = classify_err(400, error_body(ADDRESS_NOT_FOUND));
        assert_eq!(err.kind(), ErrorKind::InputInvalid);
    }

    #[test]
    fn auth_statuses_without_known_id() {
        let err = classify_err(401, error_body("Other_Exception"));
        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert_eq!(err.message(), "upstream says no");

        let err = classify_err(403, error_body(PASSWORD_NOT_CORRECT));
        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert_eq!(err.message(), "upstream says no");
    }

    #[test]
    fn other_4xx_is_input_invalid() {
        let err = classify_err(400, error_body("PostcodeNl_Controller_Address_InvalidPostcodeException"));
        assert_eq!(err.kind(), ErrorKind::InputInvalid);
        assert_eq!(
            err.identifier(),
            Some("PostcodeNl_Controller_Address_InvalidPostcodeException")
        );

        let err = classify_err(404, error_body("Other_Exception"));
        assert_eq!(err.kind(), ErrorKind::InputInvalid);
    }

    #[test]
    fn everything_else_is_service_error() {
        let err = classify_err(500, error_body("Internal_Exception"));
        assert_eq!(err.kind(), ErrorKind::Service);
        assert_eq!(err.message(), "upstream says no");
        assert_eq!(err.identifier(), Some("Internal_Exception"));

        let err = classify_err(302, error_body("Moved_Exception"));
        assert_eq!(err.kind(), ErrorKind::Service);
    }

    #[test]
    fn missing_exception_text_falls_back_to_identifier() {
        let err = classify_err(500, Some(json!({"exceptionId": "Bare_Exception"})));
        assert_eq!(err.message(), "service raised `Bare_Exception`");
    }

    #[test]
    fn from_http_tolerates_non_json() {
        let response = HttpResponse {
            status: 503,
            headers: Vec::new(),
            body: "Service Unavailable".to_string(),
        };
        let raw = RawResponse::from_http(&response);
        assert_eq!(raw.status, 503);
        assert!(raw.data.is_none());
    }
}
