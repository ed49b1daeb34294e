use mockito::Matcher;
use serde_json::json;

use agenda_shared::conflict::ConflictLevel;
use agenda_shared::models::InvitationStatus;
use agenda_shared::test_utils::{init_test_logging, sample_person, scheduled};

use crate::api::ApiClient;
use crate::error::AppError;
use crate::models::{
    AssignRequest, AttachmentUpload, ConflictCheckRequest, InvitationForm, PersonPayload,
};
use crate::view::InvitationFilter;

fn client_for(server: &mockito::ServerGuard) -> ApiClient {
    ApiClient::new(server.url()).unwrap()
}

#[tokio::test]
async fn test_invitations_sends_filter_and_cache_busting() {
    init_test_logging();
    let mut server = mockito::Server::new_async().await;

    let rows = vec![scheduled(
        7,
        Some(3),
        "2024-05-01",
        "10:00",
        InvitationStatus::Confirmed,
    )];
    let mock = server
        .mock("GET", "/api/invitations")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("status".into(), "Confirmado".into()),
            Matcher::UrlEncoded("date_from".into(), "2024-05-01".into()),
            Matcher::UrlEncoded("date_to".into(), "2024-05-31".into()),
            Matcher::Regex("_ts=\\d+".into()),
        ]))
        .match_header("cache-control", "no-store")
        .match_header("pragma", "no-cache")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(serde_json::to_string(&rows).unwrap())
        .create_async()
        .await;

    let filter = InvitationFilter {
        status: Some(InvitationStatus::Confirmed),
        from: chrono::NaiveDate::from_ymd_opt(2024, 5, 1),
        to: chrono::NaiveDate::from_ymd_opt(2024, 5, 31),
    };
    let fetched = client_for(&server).invitations(&filter).await.unwrap();

    mock.assert_async().await;
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].id, 7);
    assert_eq!(fetched[0].status, InvitationStatus::Confirmed);
}

#[tokio::test]
async fn test_assign_conflict_maps_to_conflict_error() {
    init_test_logging();
    let mut server = mockito::Server::new_async().await;

    server
        .mock("POST", "/api/assign")
        .with_status(409)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "ok": false,
                "conflict": true,
                "level": "hard",
                "conflicts": [{
                    "ID": 12,
                    "Evento": "Sesión solemne",
                    "FechaFmt": "01/05/24",
                    "HoraFmt": "10:00",
                    "Estatus": "Confirmado",
                    "Lugar": "Congreso"
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let request = AssignRequest {
        id: 7,
        person_id: 3,
        role: String::new(),
        comment: String::new(),
        force: false,
    };
    let err = client_for(&server).assign(&request).await.unwrap_err();

    match err {
        AppError::Conflict(report) => {
            assert_eq!(report.level, ConflictLevel::Hard);
            assert_eq!(report.conflicts.len(), 1);
            assert_eq!(report.conflicts[0].id, 12);
        }
        other => panic!("expected conflict error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_structured_error_body_is_surfaced() {
    init_test_logging();
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/api/invitation/99")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(json!({"ok": false, "error": "Invitación no encontrada"}).to_string())
        .create_async()
        .await;

    let err = client_for(&server).invitation(99).await.unwrap_err();
    match err {
        AppError::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Invitación no encontrada");
        }
        other => panic!("expected api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unstructured_error_falls_back_to_status_reason() {
    init_test_logging();
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/api/counters")
        .match_query(Matcher::Any)
        .with_status(502)
        .with_body("<html>bad gateway</html>")
        .create_async()
        .await;

    let err = client_for(&server).counters().await.unwrap_err();
    match err {
        AppError::Api { status, .. } => assert_eq!(status, 502),
        other => panic!("expected api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_catalog_falls_back_when_primary_fails() {
    init_test_logging();
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/api/catalog")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body(json!({"ok": false, "error": "boom"}).to_string())
        .create_async()
        .await;
    let fallback = server
        .mock("GET", "/api/persons")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(serde_json::to_string(&vec![sample_person(3, "A. García")]).unwrap())
        .create_async()
        .await;

    let people = client_for(&server).catalog().await.unwrap();

    fallback.assert_async().await;
    assert_eq!(people.len(), 1);
    assert_eq!(people[0].id, 3);
}

#[tokio::test]
async fn test_catalog_falls_back_when_primary_is_empty() {
    init_test_logging();
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/api/catalog")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;
    server
        .mock("GET", "/api/persons")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(serde_json::to_string(&vec![sample_person(4, "B. Ruiz")]).unwrap())
        .create_async()
        .await;

    let people = client_for(&server).catalog().await.unwrap();
    assert_eq!(people.len(), 1);
    assert_eq!(people[0].name, "B. Ruiz");
}

#[tokio::test]
async fn test_create_invitation_posts_multipart_fields() {
    init_test_logging();
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/api/invitation/create")
        .match_header(
            "content-type",
            Matcher::Regex("multipart/form-data".into()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("name=\"evento\"".into()),
            Matcher::Regex("Informe anual".into()),
            Matcher::Regex("name=\"archivo\"".into()),
            Matcher::Regex("convocatoria.pdf".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"ok": true, "id": 41}).to_string())
        .create_async()
        .await;

    let form = InvitationForm {
        date: "2024-05-01".to_string(),
        time: "10:00".to_string(),
        event: "Informe anual".to_string(),
        convener_title: "Diputado(a)".to_string(),
        convener: "J. López".to_string(),
        party: "MC".to_string(),
        municipality: "Centro".to_string(),
        venue: "Auditorio".to_string(),
        notes: String::new(),
    };
    let attachment = AttachmentUpload {
        file_name: "convocatoria.pdf".to_string(),
        mime: "application/pdf".to_string(),
        bytes: b"%PDF-1.4".to_vec(),
    };

    let id = client_for(&server)
        .create_invitation(&form, Some(attachment))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(id, 41);
}

#[tokio::test]
async fn test_create_invitation_json_variant() {
    init_test_logging();
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/api/create")
        .match_body(Matcher::PartialJson(json!({
            "fecha": "2024-05-01",
            "hora": "10:00",
            "evento": "Informe anual",
            "municipio": "Centro"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"ok": true, "id": 42}).to_string())
        .create_async()
        .await;

    let form = InvitationForm {
        date: "2024-05-01".to_string(),
        time: "10:00".to_string(),
        event: "Informe anual".to_string(),
        convener_title: "Diputado(a)".to_string(),
        convener: "J. López".to_string(),
        party: String::new(),
        municipality: "Centro".to_string(),
        venue: "Auditorio".to_string(),
        notes: String::new(),
    };
    let id = client_for(&server)
        .create_invitation_json(&form)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(id, 42);
}

#[tokio::test]
async fn test_update_invitation_carries_id_and_removal_flag() {
    init_test_logging();
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/api/invitation/update")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("name=\"id\"".into()),
            Matcher::Regex("name=\"eliminar_archivo\"".into()),
            Matcher::Regex("name=\"lugar\"".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"ok": true}).to_string())
        .create_async()
        .await;

    let form = InvitationForm {
        date: "2024-05-01".to_string(),
        time: "10:00".to_string(),
        event: "Informe anual".to_string(),
        convener_title: "Diputado(a)".to_string(),
        convener: "J. López".to_string(),
        party: String::new(),
        municipality: "Centro".to_string(),
        venue: "Auditorio".to_string(),
        notes: String::new(),
    };

    client_for(&server)
        .update_invitation(41, &form, None, true)
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_person_update_includes_id() {
    init_test_logging();
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/api/person/update")
        .match_body(Matcher::PartialJson(json!({
            "ID": 8,
            "Nombre": "A. García Vda."
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"ok": true, "persona": {"ID": 8, "Nombre": "A. García Vda."}}).to_string())
        .create_async()
        .await;

    let payload = PersonPayload {
        id: Some(8),
        name: "A. García Vda.".to_string(),
        title: "Representante".to_string(),
        phone: String::new(),
        email: String::new(),
        unit: String::new(),
    };
    client_for(&server).update_person(&payload).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_person_create_sends_wire_field_names() {
    init_test_logging();
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/api/person/create")
        .match_body(Matcher::PartialJson(json!({
            "Nombre": "A. García",
            "Cargo": "Representante",
            "Teléfono": "5512345678"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"ok": true, "id": 8}).to_string())
        .create_async()
        .await;

    let payload = PersonPayload {
        id: None,
        name: "A. García".to_string(),
        title: "Representante".to_string(),
        phone: "5512345678".to_string(),
        email: String::new(),
        unit: String::new(),
    };
    let id = client_for(&server).create_person(&payload).await.unwrap();

    mock.assert_async().await;
    assert_eq!(id, 8);
}

#[tokio::test]
async fn test_check_conflict_round_trip() {
    init_test_logging();
    let mut server = mockito::Server::new_async().await;

    server
        .mock("POST", "/api/check-conflict")
        .match_body(Matcher::PartialJson(json!({
            "persona_id": 3,
            "fecha": "2024-05-01",
            "hora": "10:00",
            "exclude_id": 7
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "ok": true,
                "level": "tight2h",
                "conflicts": [{
                    "ID": 2,
                    "Evento": "Gira",
                    "FechaFmt": "01/05/24",
                    "HoraFmt": "11:30",
                    "Estatus": "Confirmado",
                    "Lugar": "Plaza"
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let report = client_for(&server)
        .check_conflict(&ConflictCheckRequest {
            person_id: 3,
            date: chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            time: chrono::NaiveTime::from_hms_opt(10, 0, 0),
            exclude_id: Some(7),
        })
        .await
        .unwrap();

    assert_eq!(report.level, ConflictLevel::Tight2h);
    assert_eq!(report.conflicts[0].id, 2);
}

#[tokio::test]
async fn test_report_download_returns_raw_bytes() {
    init_test_logging();
    let mut server = mockito::Server::new_async().await;

    let payload = vec![0x50, 0x4b, 0x03, 0x04, 0xff];
    server
        .mock("GET", "/api/report/confirmados.xlsx")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header(
            "content-type",
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        )
        .with_body(payload.clone())
        .create_async()
        .await;

    let bytes = client_for(&server)
        .download_confirmed_report()
        .await
        .unwrap();
    assert_eq!(bytes, payload);
}

#[tokio::test]
async fn test_counters_and_health() {
    init_test_logging();
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/api/counters")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"Pendiente": 4, "Confirmado": 2, "Sustituido": 1, "Cancelado": 0, "Total": 7})
                .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", "/api/health")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"ok": true, "time": "2024-05-01T10:00:00"}).to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    let counts = client.counters().await.unwrap();
    assert_eq!(counts.pending, 4);
    assert_eq!(counts.confirmed, 2);
    assert_eq!(counts.total, Some(7));

    assert!(client.health().await.unwrap());
}
