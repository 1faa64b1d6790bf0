use serde::Serialize;

/// Before/after PHP snippets illustrating a rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CodeSample {
    pub before: String,
    pub after: String,
}

impl CodeSample {
    pub fn new(before: impl Into<String>, after: impl Into<String>) -> Self {
        Self {
            before: before.into(),
            after: after.into(),
        }
    }
}

/// Human-facing documentation of a rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RuleDefinition {
    pub description: String,
    pub samples: Vec<CodeSample>,
}

impl RuleDefinition {
    pub fn new(description: impl Into<String>, samples: Vec<CodeSample>) -> Self {
        Self {
            description: description.into(),
            samples,
        }
    }

    /// Markdown rendering: the description followed by a before and an
    /// after block per sample.
    pub fn to_markdown(&self) -> String {
        let mut out = format!("{}\n", self.description);
        for sample in &self.samples {
            for code in [&sample.before, &sample.after] {
                out.push_str("\n```php\n");
                out.push_str(code.trim_end());
                out.push_str("\n```\n");
            }
        }
        out
    }
}
