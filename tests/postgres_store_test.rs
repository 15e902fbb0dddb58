//! Runs against a real Postgres when `DATABASE_URL` is set; otherwise each
//! test returns early.

mod common;

use std::env;
use std::sync::Arc;

use candidate_services::{
    config::ServiceRole,
    database::{self, AttachmentRepository, CandidateRepository, Repositories},
    error::{Error, DUPLICATE_EMAIL},
    models::{attachment::AttachmentFile, candidate::NewCandidate},
    services::{attachment_client::LocalAttachments, candidate_service::CandidateService},
};
use chrono::{NaiveDate, Utc};

use common::test_config;

async fn setup() -> Option<Repositories> {
    dotenvy::dotenv().ok();
    let url = env::var("DATABASE_URL").ok()?;
    let mut config = test_config(ServiceRole::Candidates, None, None);
    config.database_url = Some(url);
    Some(database::open(&config).await.expect("open database"))
}

fn unique_email(tag: &str) -> String {
    let stamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{tag}-{stamp}@test.com")
}

fn new_candidate(email: &str) -> NewCandidate {
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
    NewCandidate {
        name: "Ana".into(),
        surname: "García".into(),
        email: email.into(),
        phone: "600000000".into(),
        document_type: "DNI".into(),
        document_number: "12345678A".into(),
        gender: "F".into(),
        birthplace: "Madrid".into(),
        birth_date: date(1990, 5, 17),
        address: "Calle Mayor 1".into(),
        postal_code: "28001".into(),
        country: "España".into(),
        locale: "es-ES".into(),
        available_from: date(2024, 1, 1),
        available_until: date(2024, 12, 31),
    }
}

fn file(extension: &str, file_name: &str) -> AttachmentFile {
    AttachmentFile {
        extension: extension.into(),
        file_name: file_name.into(),
    }
}

#[tokio::test]
async fn unique_constraint_maps_to_conflict() {
    let Some(repositories) = setup().await else {
        return;
    };
    let email = unique_email("dup");

    let (created, _) = repositories
        .candidates
        .insert(new_candidate(&email), vec![])
        .await
        .expect("first insert");
    let err = repositories
        .candidates
        .insert(new_candidate(&email), vec![file("pdf", "cv.pdf")])
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Conflict(ref msg) if msg == DUPLICATE_EMAIL));
    assert!(repositories.candidates.email_exists(&email).await.unwrap());

    repositories.candidates.delete_cascade(created.id).await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_with_one_email_store_one_candidate() {
    let Some(repositories) = setup().await else {
        return;
    };
    let service = Arc::new(CandidateService::new(
        repositories.candidates.clone(),
        Arc::new(LocalAttachments::new(repositories.attachments.clone())),
    ));
    let email = unique_email("race");

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let service = service.clone();
            let email = email.clone();
            tokio::spawn(async move {
                service
                    .create(new_candidate(&email), vec![file("pdf", "cv.pdf")])
                    .await
            })
        })
        .collect();

    let mut created = Vec::new();
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok((candidate, attachments)) => {
                assert_eq!(attachments.len(), 1);
                created.push(candidate);
            }
            Err(Error::Conflict(msg)) if msg == DUPLICATE_EMAIL => conflicts += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(created.len(), 1);
    assert_eq!(conflicts, 5);
    let id = created[0].id;
    assert_eq!(repositories.attachments.find_by_candidate(id).await.unwrap().len(), 1);

    repositories.candidates.delete_cascade(id).await.unwrap();
}

#[tokio::test]
async fn cascade_delete_removes_attachments() {
    let Some(repositories) = setup().await else {
        return;
    };
    let email = unique_email("cascade");

    let (created, stored) = repositories
        .candidates
        .insert(
            new_candidate(&email),
            vec![file("pdf", "cv.pdf"), file("png", "foto.png")],
        )
        .await
        .expect("insert");
    assert_eq!(stored.len(), 2);
    assert!(stored.iter().all(|a| a.candidate_id == created.id));

    assert!(repositories.candidates.delete_cascade(created.id).await.unwrap());
    assert!(repositories.candidates.find_by_id(created.id).await.unwrap().is_none());
    assert!(repositories
        .attachments
        .find_by_candidate(created.id)
        .await
        .unwrap()
        .is_empty());
    assert!(!repositories.candidates.delete_cascade(created.id).await.unwrap());
}
