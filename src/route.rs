//! Inbound route configuration.

use crate::Result;
use crate::form::FormEncode;

/// A rule telling Mailgun what to do with inbound mail matching an expression.
///
/// # Examples
/// ```
/// use mailgun_client::RouteSetup;
///
/// let route = RouteSetup::forward_all("https://example.com/inbound", "all inbound mail");
/// assert_eq!(route.expression(), "catch_all()");
/// assert_eq!(route.actions(), ["forward(\"https://example.com/inbound\")", "stop()"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSetup {
    priority: u32,
    description: String,
    expression: String,
    actions: Vec<String>,
}

impl RouteSetup {
    /// A route with priority 0 and no actions yet.
    ///
    /// `expression` uses Mailgun's filter syntax, e.g.
    /// `match_recipient(".*@example.com")`.
    pub fn new(expression: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            priority: 0,
            description: description.into(),
            expression: expression.into(),
            actions: Vec::new(),
        }
    }

    /// Forward every inbound message to `url` and stop evaluating routes.
    pub fn forward_all(url: impl AsRef<str>, description: impl Into<String>) -> Self {
        Self::new("catch_all()", description)
            .with_action(format!("forward(\"{}\")", url.as_ref()))
            .with_action("stop()")
    }

    /// Lower numbers are evaluated first.
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Append an action such as `forward("...")`, `store()` or `stop()`.
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.actions.push(action.into());
        self
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn actions(&self) -> &[String] {
        &self.actions
    }
}

impl FormEncode for RouteSetup {
    fn fields(&self) -> Result<Vec<(&'static str, String)>> {
        let mut fields = vec![
            ("priority", self.priority.to_string()),
            ("description", self.description.clone()),
            ("expression", self.expression.clone()),
        ];
        fields.extend(self.actions.iter().map(|a| ("action", a.clone())));
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_repeat_actions() {
        let route = RouteSetup::new("match_recipient(\"support@.*\")", "support desk")
            .with_priority(10)
            .with_action("store()")
            .with_action("stop()");
        let fields = route.fields().unwrap();

        assert_eq!(
            fields,
            vec![
                ("priority", "10".to_string()),
                ("description", "support desk".to_string()),
                ("expression", "match_recipient(\"support@.*\")".to_string()),
                ("action", "store()".to_string()),
                ("action", "stop()".to_string()),
            ]
        );
    }

    #[test]
    fn forward_all_defaults() {
        let route = RouteSetup::forward_all("https://hooks.example.com/mail", "inbound");
        assert_eq!(route.priority(), 0);
        assert_eq!(route.description(), "inbound");
        assert_eq!(route.actions().len(), 2);
    }
}
