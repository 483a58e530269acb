use lettre::{
    message::{header::ContentType, Mailbox, Mailboxes},
    Address, Message,
};

use crate::DispatchError;

/// Everything needed to compose one email. Built fresh for each send.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageRequest {
    /// Sender address
    pub from: String,

    /// Display name shown alongside the sender address
    pub from_name: Option<String>,

    /// Comma separated recipients, each either `addr`, `Name <addr>` or `"Last, First" <addr>`
    pub to: String,

    pub subject: String,

    /// Plain text body, ignored when `body_html` is set
    pub body: Option<String>,

    pub body_html: Option<String>,
}

/// The body that will actually be sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Content<'a> {
    Html(&'a str),
    Plain(&'a str),
}

impl Content<'_> {
    pub fn content_type(&self) -> ContentType {
        match self {
            Content::Html(_) => ContentType::TEXT_HTML,
            Content::Plain(_) => ContentType::TEXT_PLAIN,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Content::Html(text) | Content::Plain(text) => text,
        }
    }
}

impl MessageRequest {
    /// HTML takes precedence over plain text when both are set
    pub fn content(&self) -> Result<Content<'_>, DispatchError> {
        match (&self.body_html, &self.body) {
            (Some(html), _) => Ok(Content::Html(html)),
            (None, Some(text)) => Ok(Content::Plain(text)),
            (None, None) => Err(DispatchError::message("no message body set")),
        }
    }

    pub fn sender(&self) -> Result<Mailbox, DispatchError> {
        let address: Address = self.from.trim().parse().map_err(|e| {
            DispatchError::message(format!("invalid sender address {:?}: {e}", self.from))
        })?;
        Ok(Mailbox::new(self.from_name.clone(), address))
    }

    pub fn recipients(&self) -> Result<Vec<Mailbox>, DispatchError> {
        let to = self.to.trim();
        if to.is_empty() {
            return Err(DispatchError::message("no recipient set"));
        }
        let mailboxes: Mailboxes = to.parse().map_err(|e| {
            DispatchError::message(format!("invalid recipient address {:?}: {e}", self.to))
        })?;
        let result: Vec<Mailbox> = mailboxes.iter().cloned().collect();
        if result.is_empty() {
            return Err(DispatchError::message("no recipient set"));
        }
        Ok(result)
    }

    pub fn to_message(&self) -> Result<Message, DispatchError> {
        let content = self.content()?;
        let mut builder = Message::builder()
            .from(self.sender()?)
            .subject(self.subject.as_str());
        for recipient in self.recipients()? {
            builder = builder.to(recipient);
        }
        builder
            .header(content.content_type())
            .body(content.text().to_string())
            .map_err(|e| DispatchError::message(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn request() -> MessageRequest {
        MessageRequest {
            from: "support@example.com".to_string(),
            from_name: Some("Email Support".to_string()),
            to: "alice@example.com".to_string(),
            subject: "Greetings".to_string(),
            body: None,
            body_html: None,
        }
    }

    fn formatted(message: &Message) -> String {
        String::from_utf8(message.formatted()).unwrap()
    }

    #[test]
    fn html_wins_over_plain() {
        // Arrange
        let request = MessageRequest {
            body: Some("plain version".to_string()),
            body_html: Some("<p>html version</p>".to_string()),
            ..request()
        };

        // Act
        let content = request.content().unwrap();
        let message = formatted(&request.to_message().unwrap());

        // Assert
        assert_eq!(content, Content::Html("<p>html version</p>"));
        assert!(message.contains("Content-Type: text/html"));
        assert!(message.contains("<p>html version</p>"));
        assert!(!message.contains("plain version"));
    }

    #[test]
    fn plain_only() {
        let request = MessageRequest {
            body: Some("just text".to_string()),
            ..request()
        };
        let content = request.content().unwrap();
        let message = formatted(&request.to_message().unwrap());
        assert_eq!(content, Content::Plain("just text"));
        assert!(message.contains("Content-Type: text/plain"));
        assert!(message.contains("just text"));
    }

    #[test]
    fn no_body_is_error() {
        let err = request().to_message().unwrap_err();
        assert!(matches!(err, DispatchError::Message(_)));
    }

    #[test]
    fn headers_include_sender_name_and_subject() {
        let request = MessageRequest {
            body: Some("x".to_string()),
            ..request()
        };
        let message = formatted(&request.to_message().unwrap());
        assert!(message.contains("Email Support"));
        assert!(message.contains("<support@example.com>"));
        assert!(message.contains("alice@example.com"));
        assert!(message.contains("Subject: Greetings"));
    }

    #[rstest]
    #[case("a@example.com", 1)]
    #[case("a@example.com, b@example.com", 2)]
    #[case("Bob <b@example.com>,c@example.com", 2)]
    #[case("\"Doe, John\" <john@example.com>", 1)]
    #[case("\"Doe, John\" <john@example.com>, c@example.com", 2)]
    fn recipients_split_on_commas(#[case] to: &str, #[case] expected: usize) {
        let request = MessageRequest {
            to: to.to_string(),
            ..request()
        };
        assert_eq!(request.recipients().unwrap().len(), expected);
    }

    #[test]
    fn quoted_display_name_keeps_its_comma() {
        let request = MessageRequest {
            to: "\"Doe, John\" <john@example.com>".to_string(),
            ..request()
        };
        let recipients = request.recipients().unwrap();
        assert_eq!(recipients[0].name.as_deref(), Some("Doe, John"));
        assert_eq!(recipients[0].email.to_string(), "john@example.com");
    }

    #[rstest]
    #[case("")]
    #[case(" , ")]
    #[case("not an address")]
    #[case("a@example.com, broken")]
    fn bad_recipients(#[case] to: &str) {
        let request = MessageRequest {
            to: to.to_string(),
            body: Some("x".to_string()),
            ..request()
        };
        assert!(matches!(
            request.to_message().unwrap_err(),
            DispatchError::Message(_)
        ));
    }

    #[test]
    fn bad_sender() {
        let request = MessageRequest {
            from: "nobody".to_string(),
            body: Some("x".to_string()),
            ..request()
        };
        let err = request.to_message().unwrap_err();
        assert!(err.to_string().contains("invalid sender address"));
    }
}
