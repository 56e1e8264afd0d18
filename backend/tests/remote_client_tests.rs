//! Remote client tests
//!
//! Every call against the paddy backend resolves to a record or to a
//! structured `{error: true, message}` failure:
//! - Backend messages are passed through verbatim
//! - Missing messages fall back to the per-operation Spanish default
//! - Transport and decoding failures collapse to the generic network message

use std::time::Duration;

use httpmock::prelude::*;
use paddy_backend::external::{PaddyApiClient, RemoteError};
use rust_decimal::Decimal;
use serde_json::json;
use shared::{
    CreateDiscountPercentDto, CreateProducerDto, ErrorPayload, UpdateDiscountPercentDto,
    NETWORK_ERROR_MESSAGE,
};

fn client(server: &MockServer) -> PaddyApiClient {
    PaddyApiClient::new(&server.base_url(), Duration::from_secs(5)).unwrap()
}

fn producer_dto() -> CreateProducerDto {
    CreateProducerDto {
        name: "Juan Pérez".to_string(),
        business_name: "Agrícola Pérez Ltda.".to_string(),
        rut: "12.345.678-5".to_string(),
        address: "Camino a Parral km 4".to_string(),
        phone: "+56912345678".to_string(),
    }
}

fn range_dto() -> CreateDiscountPercentDto {
    CreateDiscountPercentDto {
        discount_code: 1,
        start: Decimal::new(150, 1),
        end: Decimal::new(170, 1),
        percent: Decimal::new(25, 1),
    }
}

// ============================================================================
// Success paths
// ============================================================================

mod success {
    use super::*;

    #[tokio::test]
    async fn test_create_producer_returns_record() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/producers")
                .json_body_partial(r#"{"rut": "12.345.678-5"}"#);
            then.status(201).json_body(json!({
                "id": 7,
                "name": "Juan Pérez",
                "businessName": "Agrícola Pérez Ltda.",
                "rut": "12.345.678-5",
                "address": "Camino a Parral km 4",
                "phone": "+56912345678"
            }));
        });

        let producer = client(&server)
            .producers()
            .create(&producer_dto())
            .await
            .unwrap();

        mock.assert();
        assert_eq!(producer.id, 7);
        assert_eq!(producer.business_name, "Agrícola Pérez Ltda.");
    }

    #[tokio::test]
    async fn test_list_ranges_by_code() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/discounts-percent/code/1");
            then.status(200).json_body(json!([
                {"id": 1, "discountCode": 1, "start": 0, "end": 15, "percent": 0},
                {"id": 2, "discountCode": 1, "start": 15.01, "end": 17, "percent": 2.5}
            ]));
        });

        let ranges = client(&server).discount_percents_by_code(1).await.unwrap();

        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[1].percent, Decimal::new(25, 1));
    }

    #[tokio::test]
    async fn test_delete_ignores_success_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(DELETE).path("/discounts-percent/3");
            then.status(204);
        });

        let result = client(&server).discount_percents().delete(3).await;

        mock.assert();
        assert_eq!(result, Ok(()));
    }
}

// ============================================================================
// Backend rejections
// ============================================================================

mod rejections {
    use super::*;

    #[tokio::test]
    async fn test_create_surfaces_backend_message() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/producers");
            then.status(400).json_body(json!({"message": "RUT duplicado"}));
        });

        let err = client(&server)
            .producers()
            .create(&producer_dto())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            RemoteError::Rejected {
                status: 400,
                message: "RUT duplicado".to_string()
            }
        );
        assert_eq!(
            ErrorPayload::from(err),
            ErrorPayload {
                error: true,
                message: "RUT duplicado".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_create_without_message_uses_default() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/discounts-percent");
            then.status(400).json_body(json!({}));
        });

        let err = client(&server)
            .discount_percents()
            .create(&range_dto())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Error al crear rango");
    }

    #[tokio::test]
    async fn test_update_without_message_uses_default() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(PUT).path("/discounts-percent/4");
            then.status(422).json_body(json!({"statusCode": 422}));
        });

        let err = client(&server)
            .discount_percents()
            .update(4, &UpdateDiscountPercentDto::default())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(422));
        assert_eq!(err.to_string(), "Error al actualizar rango");
    }

    #[tokio::test]
    async fn test_validation_message_list_is_joined() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/producers");
            then.status(400).json_body(json!({
                "message": ["rut must be a string", "phone should not be empty"]
            }));
        });

        let err = client(&server)
            .producers()
            .create(&producer_dto())
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "rut must be a string, phone should not be empty"
        );
    }

    #[tokio::test]
    async fn test_delete_failure_is_structured() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(DELETE).path("/discounts-percent/9");
            then.status(500).json_body(json!({"message": "Rango en uso"}));
        });

        let err = client(&server)
            .discount_percents()
            .delete(9)
            .await
            .unwrap_err();

        assert_eq!(
            ErrorPayload::from(err),
            ErrorPayload::new("Rango en uso")
        );
    }

    #[tokio::test]
    async fn test_delete_failure_without_message_uses_default() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(DELETE).path("/discounts-percent/9");
            then.status(500).json_body(json!({}));
        });

        let err = client(&server)
            .discount_percents()
            .delete(9)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Error al eliminar rango");
    }

    #[tokio::test]
    async fn test_missing_default_template_is_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/templates/default");
            then.status(404).json_body(json!({"statusCode": 404}));
        });

        let err = client(&server).default_template().await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "No se encontró la plantilla por defecto");
    }
}

// ============================================================================
// Network failures
// ============================================================================

mod network {
    use super::*;

    #[tokio::test]
    async fn test_connection_refused_uses_generic_message() {
        let api = PaddyApiClient::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();

        let err = api.producers().create(&producer_dto()).await.unwrap_err();

        assert!(matches!(err, RemoteError::Network(_)));
        assert_eq!(ErrorPayload::from(err).message, NETWORK_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_non_json_error_body_is_network_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/producers");
            then.status(502).body("<html>Bad Gateway</html>");
        });

        let err = client(&server)
            .producers()
            .create(&producer_dto())
            .await
            .unwrap_err();

        assert_eq!(ErrorPayload::from(err), ErrorPayload::network());
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_network_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/producers");
            then.status(200).body("not json");
        });

        let err = client(&server).producers().list_all().await.unwrap_err();

        assert!(matches!(err, RemoteError::Network(_)));
    }

    #[tokio::test]
    async fn test_slow_backend_times_out() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/templates");
            then.status(200)
                .json_body(json!([]))
                .delay(Duration::from_secs(3));
        });

        let api = PaddyApiClient::new(&server.base_url(), Duration::from_millis(200)).unwrap();
        let err = api.templates().list_all().await.unwrap_err();

        assert_eq!(err.to_string(), NETWORK_ERROR_MESSAGE);
    }
}
