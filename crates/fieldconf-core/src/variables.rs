//! Template variable replacement capability
//!
//! The host owns variable expansion. The pipeline receives it as an injected
//! [`VariableReplacer`] and only calls it for string overrides whose settings
//! opt in with `expandTemplateVars`.

use crate::types::ScopedVars;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Substitutes template variables in a string
pub trait VariableReplacer: Send + Sync {
    fn replace(&self, template: &str, scoped_vars: &ScopedVars) -> String;
}

impl<F> VariableReplacer for F
where
    F: Fn(&str, &ScopedVars) -> String + Send + Sync,
{
    fn replace(&self, template: &str, scoped_vars: &ScopedVars) -> String {
        self(template, scoped_vars)
    }
}

impl fmt::Debug for dyn VariableReplacer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VariableReplacer")
    }
}

static VARIABLE_REGEX: OnceLock<Regex> = OnceLock::new();

fn variable_regex() -> &'static Regex {
    VARIABLE_REGEX.get_or_init(|| {
        Regex::new(r"\$\{(\w+)(?::[^}]+)?\}|\[\[(\w+)(?::\w+)?\]\]|\$(\w+)")
            .expect("variable pattern is valid")
    })
}

/// Expands `$name`, `${name}` and `[[name]]`
///
/// Scoped variables win over globals. Unknown variables are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ScopedVarsReplacer {
    globals: HashMap<String, String>,
}

impl ScopedVarsReplacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replacer with a fixed set of dashboard-level variables
    pub fn with_globals(globals: HashMap<String, String>) -> Self {
        Self { globals }
    }

    pub fn set_global(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.globals.insert(name.into(), value.into());
    }

    fn lookup<'a>(&'a self, name: &str, scoped_vars: &'a ScopedVars) -> Option<&'a str> {
        scoped_vars
            .get(name)
            .map(|var| var.text.as_str())
            .or_else(|| self.globals.get(name).map(String::as_str))
    }
}

impl VariableReplacer for ScopedVarsReplacer {
    fn replace(&self, template: &str, scoped_vars: &ScopedVars) -> String {
        variable_regex()
            .replace_all(template, |caps: &Captures| {
                let name = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .or_else(|| caps.get(3))
                    .map(|m| m.as_str())
                    .unwrap_or_default();

                match self.lookup(name, scoped_vars) {
                    Some(text) => text.to_string(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}
