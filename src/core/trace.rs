/// Diagnostic entries collected during one invocation and returned as `debug`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    enabled: bool,
    entries: Vec<String>,
}

impl Trace {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: Vec::new(),
        }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn record(&mut self, entry: impl Into<String>) {
        if self.enabled {
            let entry = entry.into();
            tracing::trace!("{}", entry);
            self.entries.push(entry);
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// `None` when tracing is off, so the envelope omits `debug` entirely.
    pub fn into_entries(self) -> Option<Vec<String>> {
        self.enabled.then_some(self.entries)
    }
}
