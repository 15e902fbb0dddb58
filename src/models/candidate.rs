use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Candidate {
    pub id: i32,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: String,
    pub document_type: String,
    pub document_number: String,
    pub gender: String,
    pub birthplace: String,
    pub birth_date: NaiveDate,
    pub address: String,
    pub postal_code: String,
    pub country: String,
    pub locale: String,
    pub available_from: NaiveDate,
    pub available_until: NaiveDate,
}

/// Candidate fields before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCandidate {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: String,
    pub document_type: String,
    pub document_number: String,
    pub gender: String,
    pub birthplace: String,
    pub birth_date: NaiveDate,
    pub address: String,
    pub postal_code: String,
    pub country: String,
    pub locale: String,
    pub available_from: NaiveDate,
    pub available_until: NaiveDate,
}

impl NewCandidate {
    pub fn into_candidate(self, id: i32) -> Candidate {
        Candidate {
            id,
            name: self.name,
            surname: self.surname,
            email: self.email,
            phone: self.phone,
            document_type: self.document_type,
            document_number: self.document_number,
            gender: self.gender,
            birthplace: self.birthplace,
            birth_date: self.birth_date,
            address: self.address,
            postal_code: self.postal_code,
            country: self.country,
            locale: self.locale,
            available_from: self.available_from,
            available_until: self.available_until,
        }
    }
}
