use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

pub const API_KEY: &str = "test-key";
pub const API_SECRET: &str = "test-secret";

/// Postcode that always answers 503 with a plain-text body.
pub const RATE_LIMITED_POSTCODE: &str = "9999ZZ";

pub const PASSWORD_NOT_CORRECT: &str =
    "PostcodeNl_Controller_Plugin_HttpBasicAuthentication_PasswordNotCorrectException";
pub const NOT_AUTHORIZED: &str =
    "PostcodeNl_Controller_Plugin_HttpBasicAuthentication_NotAuthorizedException";
pub const ADDRESS_NOT_FOUND: &str = "PostcodeNl_Service_PostcodeAddress_AddressNotFoundException";
pub const INVALID_POSTCODE: &str = "PostcodeNl_Controller_Address_InvalidPostcodeException";
pub const INVALID_HOUSE_NUMBER: &str = "PostcodeNl_Controller_Address_InvalidHouseNumberException";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub house_number: u32,
    pub house_number_addition: Option<String>,
    pub postcode: String,
    pub city: String,
    pub municipality: String,
    pub province: String,
    pub rd_x: f64,
    pub rd_y: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub bag_number_designation_id: String,
    pub bag_addressable_object_id: String,
    pub address_type: String,
    pub purposes: Vec<String>,
    pub surface_area: u64,
    pub house_number_additions: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceError {
    pub exception: String,
    #[serde(rename = "exceptionId")]
    pub exception_id: String,
}

pub type Db = Arc<HashMap<(String, u32), Address>>;

pub fn fixtures() -> HashMap<(String, u32), Address> {
    let addresses = [
        Address {
            street: "Julianastraat".to_string(),
            house_number: 30,
            house_number_addition: None,
            postcode: "2012ES".to_string(),
            city: "Haarlem".to_string(),
            municipality: "Haarlem".to_string(),
            province: "Noord-Holland".to_string(),
            rd_x: 103242.0,
            rd_y: 487716.0,
            latitude: 52.37487801,
            longitude: 4.62714526,
            bag_number_designation_id: "0392200000029398".to_string(),
            bag_addressable_object_id: "0392010000029398".to_string(),
            address_type: "building".to_string(),
            purposes: vec!["office".to_string()],
            surface_area: 643,
            house_number_additions: vec![String::new()],
        },
        Address {
            street: "Nieuwe Gracht".to_string(),
            house_number: 9,
            house_number_addition: None,
            postcode: "2011DW".to_string(),
            city: "Haarlem".to_string(),
            municipality: "Haarlem".to_string(),
            province: "Noord-Holland".to_string(),
            rd_x: 104235.0,
            rd_y: 489043.0,
            latitude: 52.38703455,
            longitude: 4.64142181,
            bag_number_designation_id: "0392200000013755".to_string(),
            bag_addressable_object_id: "0392010000013755".to_string(),
            address_type: "building".to_string(),
            purposes: vec!["residency".to_string()],
            surface_area: 118,
            house_number_additions: vec![String::new(), "A".to_string(), "B".to_string()],
        },
    ];
    addresses
        .into_iter()
        .map(|a| ((a.postcode.clone(), a.house_number), a))
        .collect()
}

pub fn app() -> Router {
    let db: Db = Arc::new(fixtures());
    Router::new()
        .route(
            "/addresses/postcode/{postcode}/{house_number}/",
            get(lookup_without_addition),
        )
        .route(
            "/addresses/postcode/{postcode}/{house_number}/{addition}",
            get(lookup_with_addition),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn lookup_without_addition(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((postcode, house_number)): Path<(String, String)>,
) -> Response {
    lookup(&db, &headers, &postcode, &house_number, "")
}

async fn lookup_with_addition(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((postcode, house_number, addition)): Path<(String, String, String)>,
) -> Response {
    lookup(&db, &headers, &postcode, &house_number, &addition)
}

fn lookup(db: &Db, headers: &HeaderMap, postcode: &str, house_number: &str, addition: &str) -> Response {
    if let Err(response) = authenticate(headers) {
        return response;
    }

    let postcode = postcode.to_ascii_uppercase();
    if postcode == RATE_LIMITED_POSTCODE {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            [(header::CONTENT_TYPE, "text/plain")],
            "Service Unavailable",
        )
            .into_response();
    }
    if !valid_postcode(&postcode) {
        return error(
            StatusCode::BAD_REQUEST,
            &format!("Postcode `{postcode}` is not a valid postcode."),
            INVALID_POSTCODE,
        );
    }
    let Ok(number) = house_number.parse::<u32>() else {
        return error(
            StatusCode::BAD_REQUEST,
            &format!("House number `{house_number}` is not a valid house number."),
            INVALID_HOUSE_NUMBER,
        );
    };

    let Some(address) = db.get(&(postcode, number)) else {
        return error(
            StatusCode::NOT_FOUND,
            "Combination does not exist.",
            ADDRESS_NOT_FOUND,
        );
    };

    let mut address = address.clone();
    address.house_number_addition = address
        .house_number_additions
        .iter()
        .find(|known| known.eq_ignore_ascii_case(addition))
        .cloned();
    Json(address).into_response()
}

fn authenticate(headers: &HeaderMap) -> Result<(), Response> {
    let credentials = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Basic "))
        .and_then(|token| STANDARD.decode(token).ok())
        .and_then(|bytes| String::from_utf8(bytes).ok());

    let Some((key, secret)) = credentials.as_deref().and_then(|c| c.split_once(':')) else {
        return Err(error(StatusCode::UNAUTHORIZED, "Please authenticate.", NOT_AUTHORIZED));
    };
    if key != API_KEY {
        return Err(error(
            StatusCode::UNAUTHORIZED,
            "Key is not authorized.",
            NOT_AUTHORIZED,
        ));
    }
    if secret != API_SECRET {
        return Err(error(
            StatusCode::UNAUTHORIZED,
            "Password is not correct.",
            PASSWORD_NOT_CORRECT,
        ));
    }
    Ok(())
}

fn valid_postcode(postcode: &str) -> bool {
    let bytes = postcode.as_bytes();
    bytes.len() == 6
        && (b'1'..=b'9').contains(&bytes[0])
        && bytes[1..4].iter().all(u8::is_ascii_digit)
        && bytes[4..].iter().all(u8::is_ascii_alphabetic)
}

fn error(status: StatusCode, exception: &str, exception_id: &str) -> Response {
    let body = ServiceError {
        exception: exception.to_string(),
        exception_id: exception_id.to_string(),
    };
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn address_serializes_camel_case() {
        let address = fixtures()[&("2012ES".to_string(), 30)].clone();
        let json = serde_json::to_value(&address).unwrap();
        assert_eq!(json["houseNumber"], 30);
        assert_eq!(json["postcode"], "2012ES");
        assert!(json["houseNumberAddition"].is_null());
        assert_eq!(json["houseNumberAdditions"], json!([""]));
    }

    #[test]
    fn postcode_format() {
        assert!(valid_postcode("2012ES"));
        assert!(!valid_postcode("0012ES"));
        assert!(!valid_postcode("2012E"));
    }

    #[test]
    fn service_error_uses_wire_names() {
        let err: ServiceError =
            serde_json::from_str(r#"{"exception":"x","exceptionId":"Some_Exception"}"#).unwrap();
        assert_eq!(err.exception_id, "Some_Exception");
    }
}
