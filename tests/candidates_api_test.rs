mod common;

use axum::http::StatusCode;
use candidate_services::database::{AttachmentRepository, CandidateRepository};
use serde_json::json;

use common::{
    attachments_service, candidate_json, co_located_candidates, dead_url, remote_candidates,
    reserve, send, serve,
};

#[tokio::test]
async fn duplicate_email_is_rejected_with_conflict() {
    let (app, repositories) = co_located_candidates();

    let first = send(&app, "POST", "/api/v1/candidatos", Some(candidate_json("a@test.com"))).await;
    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(first.body["id"], 1);
    assert_eq!(first.body["email"], "a@test.com");
    assert!(first.body.get("adjuntos").is_none());

    let second = send(&app, "POST", "/api/v1/candidatos", Some(candidate_json("b@test.com"))).await;
    assert_eq!(second.status, StatusCode::CREATED);

    let dup = send(&app, "POST", "/api/v1/candidatos", Some(candidate_json("a@test.com"))).await;
    assert_eq!(dup.status, StatusCode::CONFLICT);
    assert_eq!(dup.body["code"], 409);
    assert_eq!(dup.body["message"], "Email existente");
    assert_eq!(dup.body["path"], "/api/v1/candidatos");
    assert!(dup.body["timestamp"].is_string());

    let list = send(&app, "GET", "/api/v1/candidatos", None).await;
    assert_eq!(list.status, StatusCode::OK);
    let emails: Vec<&str> = list.body.as_array().unwrap().iter().map(|c| c["email"].as_str().unwrap()).collect();
    assert_eq!(emails, vec!["a@test.com", "b@test.com"]);
    assert_eq!(repositories.candidates.count().await.unwrap(), 2);
}

#[tokio::test]
async fn invalid_payload_reports_every_field() {
    let (app, _) = co_located_candidates();

    let resp = send(
        &app,
        "POST",
        "/api/v1/candidatos",
        Some(json!({ "nombre": "  ", "email": "no-es-un-correo", "fechaNacimiento": "2999-01-01" })),
    )
    .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["code"], 400);
    assert_eq!(resp.body["message"], "Validation failed");
    let errors = &resp.body["validationErrors"];
    assert_eq!(errors["nombre"], "El nombre es obligatorio");
    assert_eq!(errors["email"], "El correo electrónico debe ser válido");
    assert_eq!(errors["fechaNacimiento"], "La fecha de nacimiento no puede ser en el futuro");
    assert_eq!(errors["disponibilidadDesde"], "La fecha de inicio de disponibilidad es obligatoria");
    assert_eq!(errors["pais"], "El país es obligatorio");
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let (app, _) = co_located_candidates();

    let resp = send(&app, "POST", "/api/v1/candidatos", Some(json!("not an object"))).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["code"], 400);
    assert_eq!(resp.body["path"], "/api/v1/candidatos");
}

#[tokio::test]
async fn empty_store_and_unknown_ids_are_not_found() {
    let (app, _) = co_located_candidates();

    let list = send(&app, "GET", "/api/v1/candidatos", None).await;
    assert_eq!(list.status, StatusCode::NOT_FOUND);
    assert_eq!(list.body["message"], "No se encontraron candidatos");

    let one = send(&app, "GET", "/api/v1/candidatos/77", None).await;
    assert_eq!(one.status, StatusCode::NOT_FOUND);
    assert_eq!(one.body["message"], "No se encontró un candidato con el ID dado 77");
    assert_eq!(one.body["path"], "/api/v1/candidatos/77");

    let gone = send(&app, "DELETE", "/api/v1/candidatos/77", None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.body["message"], "No existe un candidato con el ID 77");

    let aggregated = send(&app, "GET", "/api/v1/candidatos/adjuntos", None).await;
    assert_eq!(aggregated.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_numeric_id_gets_the_json_error_body() {
    let (app, _) = co_located_candidates();

    for (method, uri) in [
        ("GET", "/api/v1/candidatos/abc"),
        ("DELETE", "/api/v1/candidatos/abc"),
        ("GET", "/api/v1/candidatos/abc/adjuntos"),
    ] {
        let resp = send(&app, method, uri, None).await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST, "{method} {uri}");
        assert_eq!(resp.body["code"], 400);
        assert_eq!(resp.body["path"], uri);
        assert!(resp.body["message"].is_string());
        assert!(resp.body["timestamp"].is_string());
    }
}

#[tokio::test]
async fn co_located_create_aggregate_and_cascade_delete() {
    let (app, repositories) = co_located_candidates();

    let mut payload = candidate_json("a@test.com");
    payload["adjuntos"] = json!([
        { "extension": "pdf", "nombreArchivo": "cv_completo.pdf" },
        { "extension": "png", "nombreArchivo": "foto.png" }
    ]);
    let created = send(&app, "POST", "/api/v1/candidatos", Some(payload)).await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["adjuntos"].as_array().unwrap().len(), 2);
    assert_eq!(created.body["adjuntos"][0]["candidatoId"], 1);

    send(&app, "POST", "/api/v1/candidatos", Some(candidate_json("b@test.com"))).await;

    let view = send(&app, "GET", "/api/v1/candidatos/1/adjuntos", None).await;
    assert_eq!(view.status, StatusCode::OK);
    assert_eq!(view.body["nombre"], "Juan");
    assert_eq!(view.body["adjuntos"][0]["nombreArchivo"], "cv_completo.pdf");

    let all = send(&app, "GET", "/api/v1/candidatos/adjuntos", None).await;
    assert_eq!(all.status, StatusCode::OK);
    let counts: Vec<usize> = all
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["adjuntos"].as_array().unwrap().len())
        .collect();
    assert_eq!(counts, vec![2, 0]);

    let deleted = send(&app, "DELETE", "/api/v1/candidatos/1", None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    let after = send(&app, "GET", "/api/v1/candidatos/1", None).await;
    assert_eq!(after.status, StatusCode::NOT_FOUND);
    assert!(repositories.attachments.find_by_candidate(1).await.unwrap().is_empty());
}

#[tokio::test]
async fn nested_attachment_errors_are_indexed() {
    let (app, repositories) = co_located_candidates();

    let mut payload = candidate_json("a@test.com");
    payload["adjuntos"] = json!([{ "extension": "markdown", "nombreArchivo": "notas.md" }]);
    let resp = send(&app, "POST", "/api/v1/candidatos", Some(payload)).await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.body["validationErrors"]["adjuntos[0].extension"],
        "La extensión debe tener como máximo 5 caracteres"
    );
    assert_eq!(repositories.candidates.count().await.unwrap(), 0);
}

#[tokio::test]
async fn candidate_five_sees_its_remote_attachment() {
    let (candidates_listener, candidates_url) = reserve().await;
    let (attachments_listener, attachments_url) = reserve().await;

    let (candidates, _) = remote_candidates(attachments_url.clone());
    let (attachments, _) = attachments_service(candidates_url.clone());
    serve(candidates_listener, candidates.clone());
    serve(attachments_listener, attachments.clone());

    for i in 1..=5 {
        let resp = send(
            &candidates,
            "POST",
            "/api/v1/candidatos",
            Some(candidate_json(&format!("c{}@test.com", i))),
        )
        .await;
        assert_eq!(resp.status, StatusCode::CREATED);
    }

    let stored = send(
        &attachments,
        "POST",
        "/api/v1/adjuntos",
        Some(json!([{ "candidatoId": 5, "extension": "pdf", "nombreArchivo": "cv_completo.pdf" }])),
    )
    .await;
    assert_eq!(stored.status, StatusCode::CREATED);

    let view = send(&candidates, "GET", "/api/v1/candidatos/5/adjuntos", None).await;
    assert_eq!(view.status, StatusCode::OK);
    assert_eq!(view.body["id"], 5);
    let adjuntos = view.body["adjuntos"].as_array().unwrap();
    assert_eq!(adjuntos.len(), 1);
    assert_eq!(adjuntos[0]["extension"], "pdf");
    assert_eq!(adjuntos[0]["nombreArchivo"], "cv_completo.pdf");

    // The attachment service answers 404 for candidate 4, which is just "none".
    let empty = send(&candidates, "GET", "/api/v1/candidatos/4/adjuntos", None).await;
    assert_eq!(empty.status, StatusCode::OK);
    assert_eq!(empty.body["adjuntos"], json!([]));

    let all = send(&candidates, "GET", "/api/v1/candidatos/adjuntos", None).await;
    assert_eq!(all.status, StatusCode::OK);
    let counts: Vec<usize> = all
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["adjuntos"].as_array().unwrap().len())
        .collect();
    assert_eq!(counts, vec![0, 0, 0, 0, 1]);
}

#[tokio::test]
async fn nested_attachments_are_posted_to_the_attachment_service() {
    let (candidates_listener, candidates_url) = reserve().await;
    let (attachments_listener, attachments_url) = reserve().await;

    let (candidates, candidate_repositories) = remote_candidates(attachments_url);
    let (attachments, attachment_repositories) = attachments_service(candidates_url);
    serve(candidates_listener, candidates.clone());
    serve(attachments_listener, attachments);

    let mut payload = candidate_json("a@test.com");
    payload["adjuntos"] = json!([{ "extension": "pdf", "nombreArchivo": "cv.pdf" }]);
    let created = send(&candidates, "POST", "/api/v1/candidatos", Some(payload)).await;

    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["adjuntos"][0]["candidatoId"], 1);
    assert_eq!(
        attachment_repositories
            .attachments
            .find_by_candidate(1)
            .await
            .unwrap()
            .len(),
        1
    );
    assert!(candidate_repositories.attachments.find_all().await.unwrap().is_empty());

    // Remote attachments outlive the candidate.
    let deleted = send(&candidates, "DELETE", "/api/v1/candidatos/1", None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert_eq!(
        attachment_repositories
            .attachments
            .find_by_candidate(1)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn unreachable_attachment_service_is_unavailable_not_absent() {
    let (candidates, repositories) = remote_candidates(dead_url().await);

    let created = send(&candidates, "POST", "/api/v1/candidatos", Some(candidate_json("a@test.com"))).await;
    assert_eq!(created.status, StatusCode::CREATED);

    let view = send(&candidates, "GET", "/api/v1/candidatos/1/adjuntos", None).await;
    assert_eq!(view.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(view.body["code"], 503);

    let all = send(&candidates, "GET", "/api/v1/candidatos/adjuntos", None).await;
    assert_eq!(all.status, StatusCode::SERVICE_UNAVAILABLE);

    // Nested attachments cannot be stored, so the candidate is not kept either.
    let mut payload = candidate_json("b@test.com");
    payload["adjuntos"] = json!([{ "extension": "pdf", "nombreArchivo": "cv.pdf" }]);
    let rejected = send(&candidates, "POST", "/api/v1/candidatos", Some(payload)).await;
    assert_eq!(rejected.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(repositories.candidates.count().await.unwrap(), 1);
}

#[tokio::test]
async fn health_and_openapi_are_served() {
    let (app, _) = co_located_candidates();

    let health = send(&app, "GET", "/health", None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body, json!({ "status": "ok", "service": "candidates" }));

    let docs = send(&app, "GET", "/api-docs/openapi.json", None).await;
    assert_eq!(docs.status, StatusCode::OK);
    assert!(docs.body["paths"]["/api/v1/candidatos/{id}/adjuntos"].is_object());

    let missing = send(&app, "GET", "/nope", None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body["path"], "/nope");
}
