use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::store::{AttachmentRepository, CandidateRepository};
use crate::error::Result;
use crate::models::attachment::{Attachment, AttachmentFile, NewAttachment};
use crate::models::candidate::{Candidate, NewCandidate};

const CANDIDATE_COLUMNS: &str = "id, name, surname, email, phone, document_type, document_number, \
     gender, birthplace, birth_date, address, postal_code, country, locale, available_from, \
     available_until";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CandidateRepository for PgStore {
    async fn email_exists(&self, email: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM candidates WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn insert(
        &self,
        candidate: NewCandidate,
        attachments: Vec<AttachmentFile>,
    ) -> Result<(Candidate, Vec<Attachment>)> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r#"
            INSERT INTO candidates (name, surname, email, phone, document_type, document_number,
                gender, birthplace, birth_date, address, postal_code, country, locale,
                available_from, available_until)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {}
            "#,
            CANDIDATE_COLUMNS
        );
        let created = sqlx::query_as::<_, Candidate>(&sql)
            .bind(&candidate.name)
            .bind(&candidate.surname)
            .bind(&candidate.email)
            .bind(&candidate.phone)
            .bind(&candidate.document_type)
            .bind(&candidate.document_number)
            .bind(&candidate.gender)
            .bind(&candidate.birthplace)
            .bind(candidate.birth_date)
            .bind(&candidate.address)
            .bind(&candidate.postal_code)
            .bind(&candidate.country)
            .bind(&candidate.locale)
            .bind(candidate.available_from)
            .bind(candidate.available_until)
            .fetch_one(&mut *tx)
            .await?;

        let mut stored = Vec::with_capacity(attachments.len());
        for file in attachments {
            let attachment = sqlx::query_as::<_, Attachment>(
                r#"
                INSERT INTO attachments (candidate_id, extension, file_name)
                VALUES ($1, $2, $3)
                RETURNING id, candidate_id, extension, file_name
                "#,
            )
            .bind(created.id)
            .bind(&file.extension)
            .bind(&file.file_name)
            .fetch_one(&mut *tx)
            .await?;
            stored.push(attachment);
        }

        tx.commit().await?;
        Ok((created, stored))
    }

    async fn find_all(&self) -> Result<Vec<Candidate>> {
        let sql = format!("SELECT {} FROM candidates ORDER BY id", CANDIDATE_COLUMNS);
        let candidates = sqlx::query_as::<_, Candidate>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(candidates)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Candidate>> {
        let sql = format!("SELECT {} FROM candidates WHERE id = $1", CANDIDATE_COLUMNS);
        let candidate = sqlx::query_as::<_, Candidate>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(candidate)
    }

    async fn delete_cascade(&self, id: i32) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM attachments WHERE candidate_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let res = sqlx::query("DELETE FROM candidates WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if res.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }
        tx.commit().await?;
        Ok(true)
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM candidates")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl AttachmentRepository for PgStore {
    async fn insert_many(&self, attachments: Vec<NewAttachment>) -> Result<Vec<Attachment>> {
        let mut tx = self.pool.begin().await?;
        let mut stored = Vec::with_capacity(attachments.len());
        for item in attachments {
            let attachment = sqlx::query_as::<_, Attachment>(
                r#"
                INSERT INTO attachments (candidate_id, extension, file_name)
                VALUES ($1, $2, $3)
                RETURNING id, candidate_id, extension, file_name
                "#,
            )
            .bind(item.candidate_id)
            .bind(&item.extension)
            .bind(&item.file_name)
            .fetch_one(&mut *tx)
            .await?;
            stored.push(attachment);
        }
        tx.commit().await?;
        Ok(stored)
    }

    async fn find_all(&self) -> Result<Vec<Attachment>> {
        let attachments = sqlx::query_as::<_, Attachment>(
            "SELECT id, candidate_id, extension, file_name FROM attachments ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(attachments)
    }

    async fn find_by_candidate(&self, candidate_id: i32) -> Result<Vec<Attachment>> {
        let attachments = sqlx::query_as::<_, Attachment>(
            r#"
            SELECT id, candidate_id, extension, file_name
            FROM attachments
            WHERE candidate_id = $1
            ORDER BY id
            "#,
        )
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(attachments)
    }

    async fn delete_by_candidate(&self, candidate_id: i32) -> Result<u64> {
        let res = sqlx::query("DELETE FROM attachments WHERE candidate_id = $1")
            .bind(candidate_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }
}
