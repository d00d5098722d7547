use anyhow::Context;
use chrono::{NaiveDate, NaiveTime};
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use uuid::Uuid;

use crate::config::Config;

pub struct EmailService {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl EmailService {
    /// Returns None if SMTP is not fully configured.
    pub fn new(config: &Config) -> Option<Self> {
        let host = config.smtp_host.as_deref()?;
        let username = config.smtp_username.clone()?;
        let password = config.smtp_password.clone()?;
        let from_addr = config.smtp_from.as_deref()?;

        let port = config.smtp_port.unwrap_or(587);
        let creds = Credentials::new(username, password);

        let transport = if port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
                .ok()?
                .credentials(creds)
                .build()
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .ok()?
                .credentials(creds)
                .build()
        };

        let from: Mailbox = from_addr.parse().ok()?;

        Some(Self { transport, from })
    }

    fn new_message_id(&self) -> String {
        format!("<{}@{}>", Uuid::new_v4(), self.from.email.domain())
    }

    /// Wraps inner HTML content in a consistent branded email layout.
    fn wrap_html(studio_name: &str, content: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width,initial-scale=1">
  <title>{studio_name}</title>
</head>
<body style="margin:0;padding:0;background-color:#141414;font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,Helvetica,Arial,sans-serif">
  <table role="presentation" width="100%" cellpadding="0" cellspacing="0" style="background-color:#141414;padding:40px 16px">
    <tr>
      <td align="center">
        <table role="presentation" width="100%" cellpadding="0" cellspacing="0" style="max-width:520px">
          <tr>
            <td align="center" style="padding-bottom:28px">
              <p style="margin:0;font-size:20px;font-weight:700;color:#e50914;text-align:center">{studio_name}</p>
            </td>
          </tr>
          <tr>
            <td style="background:#1f1f1f;border-radius:12px;padding:40px;color:#f5f5f5">
              {content}
            </td>
          </tr>
          <tr>
            <td align="center" style="padding-top:20px">
              <p style="margin:0;font-size:12px;color:#808080">{studio_name}</p>
            </td>
          </tr>
        </table>
      </td>
    </tr>
  </table>
</body>
</html>"#
        )
    }

    async fn send_email(
        &self,
        from: Mailbox,
        to: Mailbox,
        subject: &str,
        text: &str,
        html: &str,
    ) -> anyhow::Result<()> {
        let email = Message::builder()
            .message_id(Some(self.new_message_id()))
            .from(from)
            .to(to)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html.to_string()),
                    ),
            )
            .context("Failed to build email message")?;

        self.transport
            .send(email)
            .await
            .context("Failed to send email")?;

        Ok(())
    }

    /// Booking confirmation, sent best-effort after the status transition
    /// has committed.
    pub async fn send_booking_confirmation(
        &self,
        to_email: &str,
        to_name: &str,
        studio_name: &str,
        slot_date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> anyhow::Result<()> {
        let from = Mailbox::new(Some(studio_name.to_string()), self.from.email.clone());
        let to: Mailbox = format!("{to_name} <{to_email}>")
            .parse()
            .or_else(|_| to_email.parse())
            .context("Invalid recipient address")?;

        let subject = format!("Booking confirmed — {studio_name}");

        let text = format!(
            "Hi {to_name},\n\n\
            Your booking at {studio_name} is confirmed.\n\n\
            Date: {slot_date}\n\
            Time: {start}–{end}\n\n\
            See you there!\n\
            {studio_name}"
        );

        let content = format!(
            r#"<h1 style="margin:0 0 8px 0;font-size:22px;font-weight:700;color:#f5f5f5">Booking confirmed</h1>
<p style="margin:0 0 28px 0;font-size:15px;color:#b3b3b3;line-height:1.6">Hi <strong style="color:#f5f5f5">{to_name}</strong>,<br><br>Your session at <strong style="color:#f5f5f5">{studio_name}</strong> is booked.</p>
<table role="presentation" width="100%" cellpadding="0" cellspacing="0" style="background:#141414;border-radius:8px">
  <tr><td style="padding:12px 16px;font-size:14px;color:#808080;width:80px">Date</td><td style="padding:12px 16px;font-size:14px;color:#f5f5f5;font-weight:600">{slot_date}</td></tr>
  <tr><td style="padding:12px 16px;font-size:14px;color:#808080">Time</td><td style="padding:12px 16px;font-size:14px;color:#f5f5f5;font-weight:600">{start}–{end}</td></tr>
</table>"#
        );

        let html = Self::wrap_html(studio_name, &content);
        self.send_email(from, to, &subject, &text, &html).await
    }

    /// Sent when an owner edits a slot that has live bookings on it.
    pub async fn send_schedule_change(
        &self,
        to_email: &str,
        to_name: &str,
        studio_name: &str,
        slot_date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> anyhow::Result<()> {
        let from = Mailbox::new(Some(studio_name.to_string()), self.from.email.clone());
        let to: Mailbox = format!("{to_name} <{to_email}>")
            .parse()
            .or_else(|_| to_email.parse())
            .context("Invalid recipient address")?;

        let subject = format!("Schedule change — {studio_name}");

        let text = format!(
            "Hi {to_name},\n\n\
            The schedule for your booking at {studio_name} has changed.\n\n\
            New date: {slot_date}\n\
            New time: {start}–{end}\n\n\
            {studio_name}"
        );

        let content = format!(
            r#"<h1 style="margin:0 0 8px 0;font-size:22px;font-weight:700;color:#f5f5f5">Schedule change</h1>
<p style="margin:0 0 28px 0;font-size:15px;color:#b3b3b3;line-height:1.6">Hi <strong style="color:#f5f5f5">{to_name}</strong>,<br><br>Your session at <strong style="color:#f5f5f5">{studio_name}</strong> was moved.</p>
<table role="presentation" width="100%" cellpadding="0" cellspacing="0" style="background:#141414;border-radius:8px">
  <tr><td style="padding:12px 16px;font-size:14px;color:#808080;width:100px">New date</td><td style="padding:12px 16px;font-size:14px;color:#f5f5f5;font-weight:600">{slot_date}</td></tr>
  <tr><td style="padding:12px 16px;font-size:14px;color:#808080">New time</td><td style="padding:12px 16px;font-size:14px;color:#f5f5f5;font-weight:600">{start}–{end}</td></tr>
</table>"#
        );

        let html = Self::wrap_html(studio_name, &content);
        self.send_email(from, to, &subject, &text, &html).await
    }
}
