//! Decile progress tracking for streaming transfers.

/// Progress of one streaming transfer.
///
/// Reports a percentage only when the completed share crosses a new multiple
/// of ten, so a transfer produces at most ten reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamProgress {
    total_bytes_read: u64,
    content_length: Option<u64>,
    last_logged_decile: u64,
}

impl StreamProgress {
    pub fn new(content_length: Option<u64>) -> Self {
        Self {
            total_bytes_read: 0,
            content_length,
            last_logged_decile: 0,
        }
    }

    /// Account for `bytes` more bytes.
    ///
    /// Returns the completed percentage when it reached a new decile.
    /// Nothing is reported without a positive declared length.
    pub fn advance(&mut self, bytes: usize) -> Option<u64> {
        self.total_bytes_read += bytes as u64;

        let length = self.content_length.filter(|&len| len > 0)?;
        let percent = (self.total_bytes_read.saturating_mul(100) / length).min(100);
        let decile = percent / 10;

        if decile > self.last_logged_decile {
            self.last_logged_decile = decile;
            Some(percent)
        } else {
            None
        }
    }

    pub fn total_bytes_read(&self) -> u64 {
        self.total_bytes_read
    }

    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    /// Returns true if fewer bytes arrived than were declared.
    pub fn is_short(&self) -> bool {
        matches!(self.content_length, Some(len) if self.total_bytes_read < len)
    }
}
