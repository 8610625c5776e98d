use fsupload_protocol::PartData;

/// Bookkeeping for one in-progress multipart upload.
///
/// Owned by a single upload run. Part numbers start at 1 and each recorded
/// part takes the next number, so the part list is always `1..=k` in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSession {
    upload_id: String,
    upload_key: String,
    next_part: u32,
    parts: Vec<PartData>,
}

impl UploadSession {
    pub fn new(upload_id: impl Into<String>, upload_key: impl Into<String>) -> Self {
        Self {
            upload_id: upload_id.into(),
            upload_key: upload_key.into(),
            next_part: 1,
            parts: Vec::new(),
        }
    }

    pub fn upload_id(&self) -> &str {
        &self.upload_id
    }

    pub fn upload_key(&self) -> &str {
        &self.upload_key
    }

    /// Number the next uploaded chunk will carry.
    pub fn next_part_number(&self) -> u32 {
        self.next_part
    }

    /// Records the ETag for the current part and advances the counter.
    ///
    /// Returns the part number that was recorded.
    pub fn record_part(&mut self, etag: impl Into<String>) -> u32 {
        let part_number = self.next_part;
        self.parts.push(PartData {
            etag: etag.into(),
            part_number,
        });
        self.next_part += 1;
        part_number
    }

    pub fn parts(&self) -> &[PartData] {
        &self.parts
    }

    /// Consumes the session, yielding the ordered part list.
    pub fn into_parts(self) -> Vec<PartData> {
        self.parts
    }
}
