//! Outbound message model.

use crate::Result;
use crate::form::FormEncode;
use std::collections::BTreeMap;

/// An address with an optional display name: `(email, name)`.
pub type FullEmail = (String, Option<String>);

/// Per-recipient substitution values, keyed by recipient address.
pub type RecipientVariables = BTreeMap<String, BTreeMap<String, String>>;

const TRACKING_CLICKS: &str = "yes";
const TRACKING_OPENS: &str = "yes";
const USER_ID_PLACEHOLDER: &str = "%recipient.id%";

/// A comma-joined recipient list, as Mailgun expects it in `to`, `cc` and `bcc`.
///
/// Built from a single string, a list of strings, or a list of
/// [`FullEmail`] pairs. Addresses are not validated; Mailgun has the final say.
///
/// # Examples
/// ```
/// use mailgun_client::Recipients;
///
/// let named = Recipients::from(vec![
///     ("bob@example.com".to_string(), Some("Bob".to_string())),
///     ("carol@example.com".to_string(), None),
/// ]);
/// assert_eq!(named.as_str(), "\"Bob <bob@example.com>\",carol@example.com");
///
/// let plain = Recipients::from(vec!["a@example.com", "b@example.com"]);
/// assert_eq!(plain, Recipients::from("a@example.com,b@example.com"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Recipients(String);

impl Recipients {
    /// The canonical comma-joined form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn join<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = addresses
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(",");
        Self(joined)
    }

    fn render(email: &str, name: Option<&str>) -> String {
        match name {
            Some(name) => format!("\"{name} <{email}>\""),
            None => email.to_string(),
        }
    }
}

impl From<&str> for Recipients {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Recipients {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&[&str]> for Recipients {
    fn from(value: &[&str]) -> Self {
        Self::join(value)
    }
}

impl From<Vec<&str>> for Recipients {
    fn from(value: Vec<&str>) -> Self {
        Self::join(value)
    }
}

impl From<Vec<String>> for Recipients {
    fn from(value: Vec<String>) -> Self {
        Self::join(value)
    }
}

impl From<Vec<FullEmail>> for Recipients {
    fn from(value: Vec<FullEmail>) -> Self {
        Self::join(
            value
                .iter()
                .map(|(email, name)| Self::render(email, name.as_deref())),
        )
    }
}

impl From<Vec<(&str, Option<&str>)>> for Recipients {
    fn from(value: Vec<(&str, Option<&str>)>) -> Self {
        Self::join(value.iter().map(|(email, name)| Self::render(email, *name)))
    }
}

/// A file sent along with a message, either attached or inlined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    filename: String,
    content_type: Option<String>,
    data: Vec<u8>,
}

impl Attachment {
    pub fn new(filename: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            data: data.into(),
        }
    }

    /// Set the MIME type, e.g. `application/pdf`.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// One outbound email.
///
/// Start with [`Message::new`] and chain the `with_*` setters. Once handed to
/// the client a message is only ever borrowed.
///
/// Nothing is validated: an empty `to` or a message with neither body nor
/// template is passed through to Mailgun as-is.
///
/// # Examples
/// ```
/// use mailgun_client::Message;
///
/// let message = Message::new("noreply@example.com", "user@example.com", "Welcome")
///     .with_text("Thanks for signing up.")
///     .with_reply_to("support@example.com");
/// assert!(!message.is_batch());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    from: String,
    to: Recipients,
    cc: Recipients,
    bcc: Recipients,
    reply_to: Option<String>,
    subject: String,
    text: Option<String>,
    html: Option<String>,
    attachments: Vec<Attachment>,
    inline: Vec<Attachment>,
    template: Option<String>,
    template_variables: Option<BTreeMap<String, String>>,
    recipient_variables: Option<RecipientVariables>,
    tags: Vec<String>,
}

impl Message {
    /// Create a message.
    ///
    /// `to` accepts any recipient shape [`Recipients`] converts from.
    pub fn new(
        from: impl Into<String>,
        to: impl Into<Recipients>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            cc: Recipients::default(),
            bcc: Recipients::default(),
            reply_to: None,
            subject: subject.into(),
            text: None,
            html: None,
            attachments: Vec::new(),
            inline: Vec::new(),
            template: None,
            template_variables: None,
            recipient_variables: None,
            tags: Vec::new(),
        }
    }

    pub fn with_cc(mut self, cc: impl Into<Recipients>) -> Self {
        self.cc = cc.into();
        self
    }

    pub fn with_bcc(mut self, bcc: impl Into<Recipients>) -> Self {
        self.bcc = bcc.into();
        self
    }

    pub fn with_reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }

    /// Plain-text body.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// HTML body.
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Inline file, referenced from the HTML body as `cid:<filename>`.
    pub fn with_inline(mut self, inline: Attachment) -> Self {
        self.inline.push(inline);
        self
    }

    /// Name of a template stored on the Mailgun side.
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Variables shared by every recipient of a templated message.
    pub fn with_template_variables(mut self, variables: BTreeMap<String, String>) -> Self {
        self.template_variables = Some(variables);
        self
    }

    /// Per-recipient substitutions. Setting these switches the send to the
    /// batch request shape.
    pub fn with_recipient_variables(mut self, variables: RecipientVariables) -> Self {
        self.recipient_variables = Some(variables);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &Recipients {
        &self.to
    }

    pub fn cc(&self) -> &Recipients {
        &self.cc
    }

    pub fn bcc(&self) -> &Recipients {
        &self.bcc
    }

    pub fn reply_to(&self) -> Option<&str> {
        self.reply_to.as_deref()
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn html(&self) -> Option<&str> {
        self.html.as_deref()
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    pub fn inline(&self) -> &[Attachment] {
        &self.inline
    }

    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn recipient_variables(&self) -> Option<&RecipientVariables> {
        self.recipient_variables.as_ref()
    }

    /// Whether this message goes out as a batch send.
    pub fn is_batch(&self) -> bool {
        self.recipient_variables.is_some()
    }

    /// Render the message as a JSON object keyed by wire field names.
    ///
    /// Repeated fields (`o:tag`) become arrays. Files are not representable
    /// and are left out.
    pub(crate) fn json_body(&self) -> Result<serde_json::Value> {
        let mut body = serde_json::Map::new();
        for (name, value) in self.fields()? {
            match body.get_mut(name) {
                Some(serde_json::Value::Array(values)) => values.push(value.into()),
                Some(existing) => {
                    let first = existing.take();
                    *existing = serde_json::Value::Array(vec![first, value.into()]);
                }
                None => {
                    body.insert(name.to_string(), value.into());
                }
            }
        }
        Ok(serde_json::Value::Object(body))
    }
}

impl FormEncode for Message {
    fn fields(&self) -> Result<Vec<(&'static str, String)>> {
        let mut fields = vec![("from", self.from.clone()), ("to", self.to.0.clone())];

        if !self.cc.is_empty() {
            fields.push(("cc", self.cc.0.clone()));
        }
        if !self.bcc.is_empty() {
            fields.push(("bcc", self.bcc.0.clone()));
        }
        if let Some(reply_to) = &self.reply_to {
            fields.push(("h:Reply-To", reply_to.clone()));
        }
        fields.push(("subject", self.subject.clone()));
        if let Some(text) = &self.text {
            fields.push(("text", text.clone()));
        }
        if let Some(html) = &self.html {
            fields.push(("html", html.clone()));
        }
        if let Some(template) = &self.template {
            fields.push(("template", template.clone()));
        }
        if let Some(variables) = &self.template_variables {
            fields.push(("h:X-Mailgun-Variables", serde_json::to_string(variables)?));
        }
        if let Some(variables) = &self.recipient_variables {
            fields.push(("recipient-variables", serde_json::to_string(variables)?));
        }
        for tag in &self.tags {
            fields.push(("o:tag", tag.clone()));
        }
        fields.push(("o:tracking-clicks", TRACKING_CLICKS.to_string()));
        fields.push(("o:tracking-opens", TRACKING_OPENS.to_string()));
        fields.push(("v:user-id", USER_ID_PLACEHOLDER.to_string()));

        Ok(fields)
    }

    fn files(&self) -> Vec<(&'static str, &Attachment)> {
        self.attachments
            .iter()
            .map(|a| ("attachment", a))
            .chain(self.inline.iter().map(|a| ("inline", a)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field<'a>(fields: &'a [(&'static str, String)], name: &str) -> Option<&'a str> {
        fields
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    #[test]
    fn recipient_shapes_agree() {
        let single = Message::new("a@x.com", "b@x.com,c@x.com", "s");
        let list = Message::new("a@x.com", vec!["b@x.com", "c@x.com"], "s");
        let owned = Message::new(
            "a@x.com",
            vec!["b@x.com".to_string(), "c@x.com".to_string()],
            "s",
        );
        let pairs = Message::new(
            "a@x.com",
            vec![("b@x.com", None::<&str>), ("c@x.com", None)],
            "s",
        );

        assert_eq!(single.to(), list.to());
        assert_eq!(list.to(), owned.to());
        assert_eq!(owned.to(), pairs.to());

        let cc_slice =
            Message::new("a@x.com", "b@x.com", "s").with_cc(&["d@x.com", "e@x.com"][..]);
        assert_eq!(cc_slice.cc().as_str(), "d@x.com,e@x.com");
    }

    #[test]
    fn cc_and_bcc_fields_agree_across_shapes() {
        let single = Message::new("a@x.com", "b@x.com", "s")
            .with_cc("d@x.com,e@x.com")
            .with_bcc("f@x.com,g@x.com");
        let owned = Message::new("a@x.com", "b@x.com", "s")
            .with_cc(vec!["d@x.com".to_string(), "e@x.com".to_string()])
            .with_bcc(vec!["f@x.com".to_string(), "g@x.com".to_string()]);
        let cc_pairs: Vec<FullEmail> = vec![
            ("d@x.com".to_string(), None),
            ("e@x.com".to_string(), None),
        ];
        let bcc_pairs: Vec<FullEmail> = vec![
            ("f@x.com".to_string(), None),
            ("g@x.com".to_string(), None),
        ];
        let pairs = Message::new("a@x.com", "b@x.com", "s")
            .with_cc(cc_pairs)
            .with_bcc(bcc_pairs);

        let expected = [("cc", "d@x.com,e@x.com"), ("bcc", "f@x.com,g@x.com")];
        for message in [&single, &owned, &pairs] {
            let fields = message.fields().unwrap();
            for (name, value) in expected {
                assert_eq!(field(&fields, name), Some(value), "{name} for {message:?}");
            }
        }
    }

    #[test]
    fn named_cc_and_bcc_are_quoted() {
        let message = Message::new("a@x.com", "b@x.com", "s")
            .with_cc(vec![("d@x.com", Some("Dee")), ("e@x.com", None)])
            .with_bcc(vec![("f@x.com".to_string(), Some("Eff".to_string()))]);
        let fields = message.fields().unwrap();

        assert_eq!(field(&fields, "cc"), Some("\"Dee <d@x.com>\",e@x.com"));
        assert_eq!(field(&fields, "bcc"), Some("\"Eff <f@x.com>\""));
    }

    #[test]
    fn named_recipients_are_quoted() {
        let message = Message::new(
            "a@x.com",
            vec![
                ("b@x.com".to_string(), Some("Bob".to_string())),
                ("c@x.com".to_string(), None),
            ],
            "s",
        );

        assert_eq!(message.to().as_str(), "\"Bob <b@x.com>\",c@x.com");
    }

    #[test]
    fn field_names_match_wire_table() {
        let message = Message::new("a@x.com", "b@x.com", "Hello")
            .with_reply_to("reply@x.com")
            .with_text("hi")
            .with_html("<p>hi</p>")
            .with_template("welcome")
            .with_tag("onboarding")
            .with_tag("v2");
        let fields = message.fields().unwrap();

        assert_eq!(field(&fields, "from"), Some("a@x.com"));
        assert_eq!(field(&fields, "h:Reply-To"), Some("reply@x.com"));
        assert_eq!(field(&fields, "subject"), Some("Hello"));
        assert_eq!(field(&fields, "template"), Some("welcome"));
        assert_eq!(field(&fields, "o:tracking-clicks"), Some("yes"));
        assert_eq!(field(&fields, "o:tracking-opens"), Some("yes"));
        assert_eq!(field(&fields, "v:user-id"), Some("%recipient.id%"));
        assert_eq!(fields.iter().filter(|(k, _)| *k == "o:tag").count(), 2);
        assert_eq!(field(&fields, "cc"), None);
        assert_eq!(field(&fields, "recipient-variables"), None);
    }

    #[test]
    fn recipient_variables_are_json_text() {
        let mut vars = RecipientVariables::new();
        vars.insert(
            "b@x.com".to_string(),
            BTreeMap::from([("id".to_string(), "1".to_string())]),
        );
        let message = Message::new("a@x.com", "b@x.com", "s").with_recipient_variables(vars);
        let fields = message.fields().unwrap();

        assert!(message.is_batch());
        assert_eq!(
            field(&fields, "recipient-variables"),
            Some(r#"{"b@x.com":{"id":"1"}}"#)
        );
    }

    #[test]
    fn empty_recipient_variables_still_batch() {
        let message =
            Message::new("a@x.com", "b@x.com", "s").with_recipient_variables(Default::default());
        assert!(message.is_batch());
    }

    #[test]
    fn json_body_collects_repeated_fields() {
        let message = Message::new("a@x.com", "b@x.com", "s")
            .with_tag("one")
            .with_tag("two");
        let body = message.json_body().unwrap();

        assert_eq!(body["o:tag"], json!(["one", "two"]));
        assert_eq!(body["to"], json!("b@x.com"));
    }

    #[test]
    fn files_are_named_by_disposition() {
        let message = Message::new("a@x.com", "b@x.com", "s")
            .with_attachment(Attachment::new("report.pdf", b"%PDF".to_vec()))
            .with_inline(Attachment::new("logo.png", vec![0x89, 0x50]).with_content_type("image/png"));
        let files = message.files();

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].0, "attachment");
        assert_eq!(files[1].0, "inline");
        assert_eq!(files[1].1.content_type(), Some("image/png"));
    }

    #[test]
    fn no_validation_of_empty_fields() {
        let message = Message::new("", Vec::<String>::new(), "");
        let fields = message.fields().unwrap();
        assert_eq!(field(&fields, "to"), Some(""));
        assert_eq!(field(&fields, "text"), None);
    }
}
