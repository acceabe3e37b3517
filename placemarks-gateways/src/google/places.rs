use serde::Deserialize;

use placemarks_core::gateways::geocode::{self, PlaceDetails, PlaceDetailsGateway, PlaceField};
use placemarks_entities::id::Id;

use super::{status_error, GoogleMaps, Status};

#[derive(Debug, Deserialize)]
struct PlaceDetailsResponse {
    status: Status,
    result: Option<RawPlace>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPlace {
    name: Option<String>,
}

const fn field_mask(field: PlaceField) -> &'static str {
    match field {
        PlaceField::Name => "name",
    }
}

fn into_place_details(response: PlaceDetailsResponse) -> geocode::Result<Option<PlaceDetails>> {
    let PlaceDetailsResponse {
        status,
        result,
        error_message,
    } = response;
    match status {
        Status::Ok => Ok(result.map(|place| PlaceDetails {
            name: place.name.filter(|name| !name.is_empty()),
        })),
        Status::ZeroResults | Status::NotFound => Ok(None),
        status => Err(status_error(status, error_message)),
    }
}

impl PlaceDetailsGateway for GoogleMaps {
    async fn place_details(
        &self,
        place_id: &Id,
        fields: &[PlaceField],
    ) -> geocode::Result<Option<PlaceDetails>> {
        let fields = fields
            .iter()
            .copied()
            .map(field_mask)
            .collect::<Vec<_>>()
            .join(",");
        let response = self
            .get_json(
                "place/details/json",
                &[("place_id", place_id.as_str()), ("fields", fields.as_str())],
            )
            .await?;
        into_place_details(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> geocode::Result<Option<PlaceDetails>> {
        into_place_details(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn parse_place_name() {
        let details = parse(
            r#"{
              "html_attributions": [],
              "result": { "name": "Rijksmuseum" },
              "status": "OK"
            }"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(Some("Rijksmuseum"), details.name.as_deref());
    }

    #[test]
    fn ignore_empty_names() {
        let details = parse(r#"{ "result": { "name": "" }, "status": "OK" }"#)
            .unwrap()
            .unwrap();
        assert!(details.name.is_none());
    }

    #[test]
    fn unknown_place() {
        assert!(parse(r#"{ "status": "NOT_FOUND" }"#).unwrap().is_none());
    }

    #[test]
    fn invalid_request() {
        let err = parse(r#"{ "status": "INVALID_REQUEST", "error_message": "Missing place_id" }"#)
            .unwrap_err();
        assert!(matches!(err, geocode::Error::InvalidRequest(msg) if msg == "Missing place_id"));
    }

    #[test]
    fn request_field_masks() {
        assert_eq!("name", field_mask(PlaceField::Name));
    }
}
