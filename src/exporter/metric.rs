use std::borrow::Cow;

/// One gauge sample produced by a collection pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub name: String,
    pub help: Cow<'static, str>,
    pub labels: Labels,
    pub value: f64,
}

impl Metric {
    pub fn new(name: &str, help: impl Into<Cow<'static, str>>, labels: Labels, value: f64) -> Self {
        Metric {
            name: sanitize_name(name),
            help: help.into(),
            labels,
            value,
        }
    }
}

/// Ordered label set with unique names. Inserting an existing name replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Labels(Vec<(String, String)>);

impl Labels {
    pub fn new() -> Self {
        Labels(Vec::new())
    }

    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        let name = sanitize_name(name);
        let value = value.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.iter().find(|(existing, _)| existing == name).map(|(_, value)| value.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    /// Positionally aligned with [`Labels::names`].
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names().zip(self.values())
    }
}

/// Maps a name onto the Prometheus charset `[a-zA-Z_][a-zA-Z0-9_]*`; valid names are returned unchanged.
pub fn sanitize_name(name: &str) -> String {
    let mut sanitized = String::with_capacity(name.len() + 1);
    if name.chars().next().is_none_or(|c| c.is_ascii_digit()) {
        sanitized.push('_');
    }
    sanitized.extend(name.chars().map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' }));
    sanitized
}
