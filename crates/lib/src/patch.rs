//! Rewrites the generated loader script for a plain `<script>` context.
//!
//! The binding generator emits a loader meant to run as an ES module. The
//! frontend loads it differently, so two things are rewritten:
//! - the statement that derives the `.wasm` location from `import.meta.url`
//!   is dropped, because the caller passes the binary's path explicitly
//! - bare `globalThis` / `self` lookups are qualified as `window.globalThis` /
//!   `window.self`
//!
//! Rules are plain data applied in order. Applying them to already-patched
//! text changes nothing. A rule that still has something to rewrite after
//! patching, or a loader that still mentions `import.meta.url`, is an error.

use regex::{Captures, Regex};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Marker of a loader that locates its own resources.
const SELF_LOCATING_MARKER: &str = "import.meta.url";

#[derive(Debug, Error)]
pub enum PatchError {
  #[error("invalid pattern for rule {rule}: {source}")]
  InvalidPattern {
    rule: &'static str,
    #[source]
    source: regex::Error,
  },

  #[error("rule {rule} left {remaining} match(es) unrewritten")]
  Incomplete { rule: &'static str, remaining: usize },

  #[error("patched loader still derives a path from import.meta.url (line {line})")]
  SelfLocatingUrl { line: usize },
}

/// Context in which a match is left alone.
///
/// Both patterns must hold around the match (or around its `target` group):
/// `before` at the end of the preceding text, `after` at the start of the
/// following text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exemption {
  pub before: &'static str,
  pub after: &'static str,
}

/// A single textual rewrite.
///
/// Matches in which the named group `skip` participates are left unchanged;
/// this is how string literals and comments are stepped over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchRule {
  pub name: &'static str,
  pub pattern: &'static str,
  /// Replacement in `regex` syntax (`${lead}` refers to a capture group).
  pub replacement: &'static str,
  pub exempt: Option<Exemption>,
}

impl PatchRule {
  pub fn compile(&self) -> Result<CompiledRule<'_>, PatchError> {
    let regex = |pattern: &str| {
      Regex::new(pattern).map_err(|source| PatchError::InvalidPattern { rule: self.name, source })
    };

    let exempt = match self.exempt {
      Some(e) => Some((
        regex(format!("(?:{})$", e.before).as_str())?,
        regex(format!("^(?:{})", e.after).as_str())?,
      )),
      None => None,
    };

    Ok(CompiledRule {
      rule: self,
      re: regex(self.pattern)?,
      exempt,
    })
  }
}

/// A rule with its patterns compiled.
#[derive(Debug)]
pub struct CompiledRule<'a> {
  rule: &'a PatchRule,
  re: Regex,
  exempt: Option<(Regex, Regex)>,
}

impl CompiledRule<'_> {
  fn rewrites(&self, content: &str, caps: &Captures<'_>) -> bool {
    if caps.name("skip").is_some() {
      return false;
    }
    let Some((before, after)) = &self.exempt else {
      return true;
    };
    let Some(target) = caps.name("target").or_else(|| caps.get(0)) else {
      return false;
    };
    !(before.is_match(&content[..target.start()]) && after.is_match(&content[target.end()..]))
  }

  /// Number of matches in `content` this rule would rewrite.
  pub fn pending(&self, content: &str) -> usize {
    self
      .re
      .captures_iter(content)
      .filter(|caps| self.rewrites(content, caps))
      .count()
  }

  /// Rewrite `content`, returning the new text and the number of rewrites.
  pub fn apply(&self, content: &str) -> (String, usize) {
    let mut out = String::with_capacity(content.len());
    let mut last = 0;
    let mut count = 0;

    for caps in self.re.captures_iter(content) {
      let Some(m) = caps.get(0) else { continue };
      if !self.rewrites(content, &caps) {
        continue;
      }
      out.push_str(&content[last..m.start()]);
      caps.expand(self.rule.replacement, &mut out);
      last = m.end();
      count += 1;
    }
    out.push_str(&content[last..]);

    (out, count)
  }
}

/// Rules applied to the loader script, in order.
pub const LOADER_RULES: &[PatchRule] = &[
  PatchRule {
    name: "drop-self-locating-url",
    pattern: r"(?m)^[ \t]*(?:(?:const|let|var)[ \t]+)?[A-Za-z_$][\w$]*\s*=\s*new URL\([^;]*?import\.meta\.url\s*\)[ \t]*;?[ \t]*(?:\r?\n)?",
    replacement: "",
    exempt: None,
  },
  PatchRule {
    name: "qualify-global-lookups",
    pattern: r#"(?P<skip>"(?:[^"\\\n]|\\.)*"|'(?:[^'\\\n]|\\.)*'|`(?:[^`\\]|\\.)*`|//[^\n]*|/\*(?s:.)*?\*/)|(?P<lead>^|[^.\w$])(?P<target>globalThis|self)\b"#,
    replacement: "${lead}window.${target}",
    // object keys: `{ self: ... }`, `, globalThis: ...`
    exempt: Some(Exemption {
      before: r"[{,]\s*",
      after: r"\s*:",
    }),
  },
];

/// How often a rule matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleHits {
  pub rule: &'static str,
  pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOutcome {
  pub content: String,
  pub hits: Vec<RuleHits>,
}

impl PatchOutcome {
  pub fn total_hits(&self) -> usize {
    self.hits.iter().map(|h| h.count).sum()
  }
}

/// Apply [`LOADER_RULES`] to `source`.
///
/// # Errors
///
/// Besides rule failures, returns [`PatchError::SelfLocatingUrl`] if the
/// result still references `import.meta.url`.
pub fn patch_loader(source: &str) -> Result<PatchOutcome, PatchError> {
  let outcome = apply_rules(source, LOADER_RULES)?;

  if let Some(index) = outcome.content.find(SELF_LOCATING_MARKER) {
    let line = outcome.content[..index].matches('\n').count() + 1;
    return Err(PatchError::SelfLocatingUrl { line });
  }

  Ok(outcome)
}

/// Apply `rules` in order, then verify none of them has anything left to rewrite.
pub fn apply_rules(source: &str, rules: &[PatchRule]) -> Result<PatchOutcome, PatchError> {
  let compiled = rules.iter().map(PatchRule::compile).collect::<Result<Vec<_>, _>>()?;

  let mut content = source.to_string();
  let mut hits = Vec::with_capacity(rules.len());

  for rule in &compiled {
    let (rewritten, count) = rule.apply(&content);
    content = rewritten;
    debug!(rule = rule.rule.name, count, "applied patch rule");
    hits.push(RuleHits {
      rule: rule.rule.name,
      count,
    });
  }

  for rule in &compiled {
    let remaining = rule.pending(&content);
    if remaining > 0 {
      return Err(PatchError::Incomplete {
        rule: rule.rule.name,
        remaining,
      });
    }
  }

  Ok(PatchOutcome { content, hits })
}
