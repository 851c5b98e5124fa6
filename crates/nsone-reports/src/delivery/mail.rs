//! Report emails over SMTP.

use chrono::{DateTime, Utc};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use maud::html;
use nsone_core::{ExportArtifact, TimeWindow};
use tracing::info;

use crate::config::{MailSettings, SmtpSecurity, SmtpSettings};
use crate::error::{ReportError, Result};
use crate::output::{html_document, OutputFormat};

/// Mail carrying a rendered report in its body.
///
/// The HTML alternative is the report itself for HTML reports, otherwise the
/// text wrapped in `<pre>`.
pub fn report_message(settings: &MailSettings, report: &str, format: OutputFormat) -> Result<Message> {
    let plain = with_header_footer(settings, report);

    let html = if format == OutputFormat::Html {
        report.to_string()
    } else {
        let body = html! {
            @if let Some(header) = &settings.header {
                p { (header) }
            }
            pre { (report) }
            @if let Some(footer) = &settings.footer {
                p { (footer) }
            }
        };
        html_document(&settings.subject, &body).into_string()
    };

    Ok(message_builder(settings).multipart(MultiPart::alternative_plain_html(plain, html))?)
}

/// Mail carrying an export as an attachment.
pub fn export_message(
    settings: &MailSettings,
    artifact: &ExportArtifact,
    window: &TimeWindow,
    at: DateTime<Utc>,
) -> Result<Message> {
    let file_name = artifact.file_name(at);
    let summary = format!(
        "NS1 account activity for {window}.\nAttached: {file_name} ({} bytes).",
        artifact.len()
    );

    let content_type = ContentType::parse(artifact.format.mime_type())
        .map_err(|e| ReportError::Delivery(format!("bad content type: {e}")))?;
    let attachment = Attachment::new(file_name).body(artifact.bytes.clone(), content_type);

    Ok(message_builder(settings).multipart(
        MultiPart::mixed()
            .singlepart(SinglePart::plain(with_header_footer(settings, &summary)))
            .singlepart(attachment),
    )?)
}

/// SMTP transport for the configured server.
pub fn smtp_transport(smtp: &SmtpSettings) -> Result<SmtpTransport> {
    let builder = match smtp.security {
        SmtpSecurity::Tls => SmtpTransport::relay(&smtp.server),
        SmtpSecurity::Starttls => SmtpTransport::starttls_relay(&smtp.server),
        SmtpSecurity::None => Ok(SmtpTransport::builder_dangerous(&smtp.server)),
    }
    .map_err(|e| ReportError::Delivery(format!("SMTP setup for {} failed: {e}", smtp.server)))?;

    let mut builder = builder.port(smtp.port);
    if let Some((user, password)) = &smtp.credentials {
        builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
    }

    Ok(builder.build())
}

/// Hand a message to a transport.
pub fn send<T>(transport: &T, message: &Message) -> Result<()>
where
    T: Transport,
    T::Error: std::fmt::Display,
{
    transport
        .send(message)
        .map_err(|e| ReportError::Delivery(format!("sending mail failed: {e}")))?;

    let recipients: Vec<String> = message
        .envelope()
        .to()
        .iter()
        .map(ToString::to_string)
        .collect();
    info!(recipients = %recipients.join(","), "report mailed");
    Ok(())
}

/// Mail settings together with the transport that carries the messages.
pub struct Mailer<T> {
    settings: MailSettings,
    transport: T,
}

impl Mailer<SmtpTransport> {
    /// Mailer for the configured SMTP server.
    pub fn smtp(settings: MailSettings) -> Result<Self> {
        let transport = smtp_transport(&settings.smtp)?;
        Ok(Self::new(settings, transport))
    }
}

impl<T> Mailer<T>
where
    T: Transport,
    T::Error: std::fmt::Display,
{
    pub const fn new(settings: MailSettings, transport: T) -> Self {
        Self { settings, transport }
    }

    pub const fn settings(&self) -> &MailSettings {
        &self.settings
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Mail a rendered report in the message body.
    pub fn send_report(&self, report: &str, format: OutputFormat) -> Result<()> {
        send(&self.transport, &report_message(&self.settings, report, format)?)
    }

    /// Mail an export as an attachment.
    pub fn send_export(
        &self,
        artifact: &ExportArtifact,
        window: &TimeWindow,
        at: DateTime<Utc>,
    ) -> Result<()> {
        send(&self.transport, &export_message(&self.settings, artifact, window, at)?)
    }
}

#[cfg(test)]
pub(crate) fn settings_for_tests() -> MailSettings {
    MailSettings {
        from: "reports@example.com".parse().unwrap(),
        to: crate::config::parse_recipients("ops@example.com,dns@example.com").unwrap(),
        subject: "NS1 Activity Report".to_string(),
        header: Some("Greetings".to_string()),
        footer: None,
        smtp: SmtpSettings {
            server: "localhost".to_string(),
            port: 465,
            security: SmtpSecurity::Tls,
            credentials: None,
        },
    }
}

fn message_builder(settings: &MailSettings) -> lettre::message::MessageBuilder {
    settings.to.iter().fold(
        Message::builder()
            .from(settings.from.clone())
            .subject(settings.subject.clone()),
        |builder, to| builder.to(to.clone()),
    )
}

fn with_header_footer(settings: &MailSettings, text: &str) -> String {
    [settings.header.as_deref(), Some(text), settings.footer.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use lettre::transport::stub::StubTransport;
    use nsone_core::{ExportFormat, TimeUnit};

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 17, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_report_message_has_both_parts() {
        let settings = settings_for_tests();
        let message = report_message(&settings, "id: a1 <tag>", OutputFormat::Yaml).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("Subject: NS1 Activity Report"));
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("text/plain"));
        assert!(raw.contains("text/html"));
        assert!(raw.contains("&lt;tag&gt;"));
        assert!(raw.contains("Greetings"));
        assert_eq!(message.envelope().to().len(), 2);
    }

    #[test]
    fn test_export_message_attaches_file() {
        let settings = settings_for_tests();
        let window = TimeWindow::ending_at(at(), TimeUnit::Hours, 1).unwrap();
        let artifact = ExportArtifact::new(ExportFormat::Csv, b"id,action\na1,update\n".to_vec());

        let message = export_message(&settings, &artifact, &window, at()).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("multipart/mixed"));
        assert!(raw.contains("text/csv"));
        assert!(raw.contains("nsone-activity-20240517T123000Z.csv"));
        assert!(raw.contains("Content-Disposition: attachment"));
    }

    #[test]
    fn test_send_through_stub() {
        let settings = settings_for_tests();
        let message = report_message(&settings, "report", OutputFormat::Json).unwrap();

        let transport = StubTransport::new_ok();
        send(&transport, &message).unwrap();
        assert_eq!(transport.messages().len(), 1);
    }

    #[test]
    fn test_send_failure_is_delivery_error() {
        let settings = settings_for_tests();
        let message = report_message(&settings, "report", OutputFormat::Json).unwrap();

        let err = send(&StubTransport::new_error(), &message).unwrap_err();
        assert!(matches!(err, ReportError::Delivery(_)));
    }

    #[test]
    fn test_mailer_sends_report_and_export() {
        let mailer = Mailer::new(settings_for_tests(), StubTransport::new_ok());
        let window = TimeWindow::ending_at(at(), TimeUnit::Hours, 1).unwrap();
        let artifact = ExportArtifact::new(ExportFormat::Pdf, b"%PDF-1.4".to_vec());

        mailer.send_report("report", OutputFormat::Table).unwrap();
        mailer.send_export(&artifact, &window, at()).unwrap();

        let sent = mailer.transport().messages();
        assert_eq!(sent.len(), 2);
        assert!(sent[1].1.contains("application/pdf"));
        assert_eq!(mailer.settings().to.len(), 2);
    }

    #[test]
    fn test_smtp_transport_for_each_security_mode() {
        for security in [SmtpSecurity::Tls, SmtpSecurity::Starttls, SmtpSecurity::None] {
            let smtp = SmtpSettings {
                server: "smtp.example.com".to_string(),
                port: 2525,
                security,
                credentials: Some(("user".to_string(), "pass".to_string())),
            };
            assert!(smtp_transport(&smtp).is_ok(), "{security:?}");
        }
    }
}
