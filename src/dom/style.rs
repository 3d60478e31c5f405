/// Inline `style` declarations of an element.
///
/// The declaration text is parsed on every lookup; there is no cached
/// property map to keep in sync with the attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    text: String,
}

impl Style {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Value of `property`, trimmed. Later declarations win.
    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations()
            .filter(|(name, _)| name.eq_ignore_ascii_case(property))
            .map(|(_, value)| value)
            .last()
    }

    /// Replace any declaration of `property` with `property: value`.
    pub fn set(&mut self, property: &str, value: &str) {
        let mut parts: Vec<String> = self
            .declarations()
            .filter(|(name, _)| !name.eq_ignore_ascii_case(property))
            .map(|(name, value)| format!("{name}: {value}"))
            .collect();
        parts.push(format!("{property}: {value}"));
        self.text = format!("{};", parts.join("; "));
    }

    /// Drop every declaration of `property`.
    pub fn remove(&mut self, property: &str) {
        let parts: Vec<String> = self
            .declarations()
            .filter(|(name, _)| !name.eq_ignore_ascii_case(property))
            .map(|(name, value)| format!("{name}: {value}"))
            .collect();
        self.text = if parts.is_empty() {
            String::new()
        } else {
            format!("{};", parts.join("; "))
        };
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.declarations().next().is_none()
    }

    fn declarations(&self) -> impl Iterator<Item = (&str, &str)> {
        self.text.split(';').filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim();
            (!name.is_empty()).then(|| (name, value.trim()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_trims_and_ignores_case() {
        let style = Style::new(" display : none ;Color:red");
        assert_eq!(style.get("display"), Some("none"));
        assert_eq!(style.get("color"), Some("red"));
        assert_eq!(style.get("width"), None);
    }

    #[test]
    fn test_set_replaces_existing_declaration() {
        let mut style = Style::new("display: block; color: red");
        style.set("display", "inline");
        assert_eq!(style.as_str(), "color: red; display: inline;");
        assert_eq!(style.get("display"), Some("inline"));
    }

    #[test]
    fn test_remove_last_declaration_empties_text() {
        let mut style = Style::new("display: none;");
        style.remove("display");
        assert!(style.is_empty());
        assert_eq!(style.as_str(), "");
    }

    #[test]
    fn test_value_may_contain_colons() {
        let style = Style::new("background: url(http://x/y.png)");
        assert_eq!(style.get("background"), Some("url(http://x/y.png)"));
    }
}
