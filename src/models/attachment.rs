use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Attachment {
    pub id: i32,
    pub candidate_id: i32,
    pub extension: String,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttachment {
    pub candidate_id: i32,
    pub extension: String,
    pub file_name: String,
}

/// An attachment sent together with its candidate, before either has an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentFile {
    pub extension: String,
    pub file_name: String,
}

impl AttachmentFile {
    pub fn for_candidate(self, candidate_id: i32) -> NewAttachment {
        NewAttachment {
            candidate_id,
            extension: self.extension,
            file_name: self.file_name,
        }
    }
}

impl NewAttachment {
    pub fn into_attachment(self, id: i32) -> Attachment {
        Attachment {
            id,
            candidate_id: self.candidate_id,
            extension: self.extension,
            file_name: self.file_name,
        }
    }
}
