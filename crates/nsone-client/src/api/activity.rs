//! Account activity API endpoints.

use crate::Ns1Client;
use nsone_core::{ActivityRecord, ExportArtifact, ExportFormat, Result, TimeWindow};
use tracing::debug;

const ACTIVITY_PATH: &str = "/account/activity";

/// Account activity API endpoints
pub struct ActivityApi<'a> {
    client: &'a Ns1Client,
}

impl<'a> ActivityApi<'a> {
    pub(crate) fn new(client: &'a Ns1Client) -> Self {
        Self { client }
    }

    /// Start building an activity query
    #[must_use]
    pub fn list(&self) -> ActivityRequestBuilder<'a> {
        ActivityRequestBuilder::new(self.client)
    }

    /// Fetch up to `limit` records inside `window`
    pub async fn in_window(&self, window: &TimeWindow, limit: u32) -> Result<Vec<ActivityRecord>> {
        self.list().window(window).limit(limit).send().await
    }

    /// Fetch the records inside `window` as a server-rendered export
    pub async fn export_window(
        &self,
        window: &TimeWindow,
        limit: u32,
        format: ExportFormat,
    ) -> Result<ExportArtifact> {
        self.list()
            .window(window)
            .limit(limit)
            .export(format)
            .send_export()
            .await
    }
}

/// Builder for activity requests
pub struct ActivityRequestBuilder<'a> {
    client: &'a Ns1Client,
    start: Option<i64>,
    end: Option<i64>,
    limit: Option<u32>,
    export: Option<ExportFormat>,
}

impl<'a> ActivityRequestBuilder<'a> {
    fn new(client: &'a Ns1Client) -> Self {
        Self {
            client,
            start: None,
            end: None,
            limit: None,
            export: None,
        }
    }

    /// Only return activity at or after this Unix timestamp
    #[must_use]
    pub const fn start(mut self, timestamp: i64) -> Self {
        self.start = Some(timestamp);
        self
    }

    /// Only return activity at or before this Unix timestamp
    #[must_use]
    pub const fn end(mut self, timestamp: i64) -> Self {
        self.end = Some(timestamp);
        self
    }

    /// Restrict to a time window.
    ///
    /// The API takes whole seconds. When both bounds fall inside the same
    /// second only `start` is sent, so the API reads up to the present.
    #[must_use]
    pub fn window(self, window: &TimeWindow) -> Self {
        let (start, end) = (window.start_timestamp(), window.end_timestamp());
        let builder = self.start(start);
        if end > start {
            builder.end(end)
        } else {
            builder
        }
    }

    /// Maximum number of records to return
    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Ask the API to render the result as a file
    #[must_use]
    pub const fn export(mut self, format: ExportFormat) -> Self {
        self.export = Some(format);
        self
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if let Some(start) = self.start {
            params.push(("start", start.to_string()));
        }

        if let Some(end) = self.end {
            params.push(("end", end.to_string()));
        }

        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }

        if let Some(format) = self.export {
            params.push(("export", format.as_str().to_string()));
        }

        params
    }

    /// Execute the request and decode the records
    pub async fn send(self) -> Result<Vec<ActivityRecord>> {
        let records: Vec<ActivityRecord> = self
            .client
            .get_with_query(ACTIVITY_PATH, &self.params())
            .await?;
        debug!(count = records.len(), "activity records received");
        Ok(records)
    }

    /// Execute the request and return the raw export.
    ///
    /// Falls back to JSON when no export format was set.
    pub async fn send_export(self) -> Result<ExportArtifact> {
        let format = self.export.unwrap_or(ExportFormat::Json);
        let this = self.export(format);
        let bytes = this
            .client
            .get_bytes_with_query(ACTIVITY_PATH, &this.params())
            .await?;
        debug!(format = %format, bytes = bytes.len(), "activity export received");
        Ok(ExportArtifact::new(format, bytes))
    }
}
