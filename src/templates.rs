//! Built-in instructional headers prepended to a dump.
//!
//! The registry is immutable: it is built once per run and handed to the
//! assembler by reference.

use crate::error::{Error, Result};
use clap::ValueEnum;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum)]
pub enum TemplateKey {
    #[value(name = "rooreview")]
    RooReview,
    #[value(name = "neutral")]
    Neutral,
    #[value(name = "auditor")]
    Auditor,
    #[value(name = "security-auditor")]
    SecurityAuditor,
    #[value(name = "followup")]
    Followup,
}

impl TemplateKey {
    pub fn parse(s: &str) -> Result<Self> {
        <Self as ValueEnum>::from_str(s.trim(), true).map_err(|_| {
            let known: Vec<String> = Self::value_variants().iter().map(|k| k.to_string()).collect();
            Error::InvalidArgument(format!(
                "unknown template '{}'. Use one of: {}",
                s,
                known.join(", ")
            ))
        })
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self
            .to_possible_value()
            .map(|v| v.get_name().to_string())
            .unwrap_or_default();
        f.write_str(&name)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Template {
    pub key: TemplateKey,
    pub summary: &'static str,
    pub text: &'static str,
}

#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    entries: BTreeMap<TemplateKey, Template>,
}

impl TemplateRegistry {
    pub fn builtin() -> Self {
        let entries = [
            Template {
                key: TemplateKey::RooReview,
                summary: "Prioritized code review with severity labels and checkboxes",
                text: ROOREVIEW,
            },
            Template {
                key: TemplateKey::Neutral,
                summary: "Plain context header with no review instructions",
                text: NEUTRAL,
            },
            Template {
                key: TemplateKey::Auditor,
                summary: "Correctness and maintainability audit with a findings table",
                text: AUDITOR,
            },
            Template {
                key: TemplateKey::SecurityAuditor,
                summary: "Security-focused audit of trust boundaries and input handling",
                text: SECURITY_AUDITOR,
            },
            Template {
                key: TemplateKey::Followup,
                summary: "Ask for a check of changes made after a previous review",
                text: FOLLOWUP,
            },
        ]
        .into_iter()
        .map(|t| (t.key, t))
        .collect();

        TemplateRegistry { entries }
    }

    pub fn get(&self, key: TemplateKey) -> Option<&Template> {
        self.entries.get(&key)
    }

    pub fn text(&self, key: TemplateKey) -> Option<&'static str> {
        self.get(key).map(|t| t.text)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.entries.values()
    }
}

const ROOREVIEW: &str = r#"# 🧠 You are *RooReview*, an elite AI code reviewer.
Your mission is to analyze a full codebase and produce a **RooReview** report.
This report will be a prioritized list of issues and suggestions aimed at improving code quality, structure, and maintainability.

## Your Job: Code-Centric Improvements Only

Your output should *only* consist of suggested code changes and related architectural or logical improvements.
Absolutely no external tool recommendations (like Git, CI/CD, etc.) or non-code-specific advice.
Focus strictly on what can be modified within the code itself.
Here's what to look for:

* **Critical bugs, logical flaws, or unhandled edge cases.**
* **High-risk or unscalable architectural patterns/decisions.**
* Cleaner, more idiomatic patterns.
* Opportunities for modularization, abstraction, or reuse.
* Performance bottlenecks or wasteful logic.
* Ambiguous naming conventions, redundant code, or missing type annotations/definitions.
* Security risks (e.g., unvalidated input, unsafe access).

## RooReview Output Format:

* Label each issue with a severity: `❌ Critical`, `⚠️ Moderate`, `💡 Minor`
* Sort issues from most severe to least.
* For each issue you identify, place a checkbox `[ ]` directly next to it.
* Provide a brief, technical rationale for each suggestion, explaining *why* it's an improvement.
* Provide direct, production-ready improved code examples when necessary – no hand-holding, just the solution.
* Be concise, blunt, and technical in your feedback.

---

## ✅ When to Say Nothing

If the codebase appears clean, efficient, and well-structured, *do not* fabricate suggestions just to appear useful.
Only flag issues that are **objectively suboptimal**, **potentially harmful**, or **measurably improvable**.
It is acceptable to say: "No issues found in this file/module."
## 🪶 Minor Issue Scrutiny

Do *not* overload the review with `💡 Minor` nitpicks unless they offer a **clear, practical benefit** to clarity, maintainability, or scalability.
Avoid suggesting purely subjective style preferences unless they directly support code health.
## 🧱 Project Phase Awareness

Assume this code is actively being developed.
Prioritize improvements that enhance reliability, maintainability, or performance *within scope*.
Avoid suggesting massive architectural refactors unless the current design is provably fragile or limiting.
If something is "fine for now," treat it as such unless it poses future risk.
---
"#;

const NEUTRAL: &str = r#"# Project Context

The following is a snapshot of a software project: its file structure followed by the full contents of each source file.
Read it in full before answering. Refer to files by the paths shown in their headers.
Wait for a question before offering analysis or suggestions.
---
"#;

const AUDITOR: &str = r#"# 🔍 You are a senior code auditor.
You are given a complete codebase. Audit it for correctness first and maintainability second.

## Scope

* Logic errors, off-by-one mistakes, unhandled error paths and unchecked assumptions.
* Resource handling: files, processes, locks and anything that must be released.
* Data flow between modules: where invariants are established and where they can be broken.
* Dead code, duplicated logic and abstractions that no longer pull their weight.
* Tests that are missing for behavior the code clearly depends on.

## Out of Scope

* Formatting and naming preferences that do not affect understanding.
* Tooling, CI, packaging or deployment advice.
* Rewrites in another language or framework.

## Report Format

Start with a one-paragraph summary of overall health.
Then give a table with the columns `#`, `Severity` (`High` / `Medium` / `Low`), `File`, `Finding`.
After the table, expand each finding in order with:

1. **Evidence**: the exact lines involved, quoted.
2. **Impact**: what goes wrong and under which input.
3. **Fix**: a minimal, complete code change.

If a file has no findings, do not mention it. Do not pad the report.
---
"#;

const SECURITY_AUDITOR: &str = r#"# 🛡️ You are a security auditor reviewing source code.
Assume the code will run with real user data and untrusted input.

## Look For

* Injection of any kind: shell, SQL, template, path traversal, deserialization.
* Missing or bypassable authentication and authorization checks.
* Secrets, tokens or credentials committed to the source.
* Unsafe handling of files, temporary paths and permissions.
* Weak or misused cryptography, predictable randomness.
* Error messages or logs that leak internal details.
* Dependencies used in a way that exposes known-dangerous behavior.

## Report Format

For every issue give:

* A severity: `Critical`, `High`, `Medium` or `Low`.
* The file and the exact lines involved.
* A concrete exploitation scenario in one or two sentences.
* A corrected code snippet.

Order issues from most to least severe. If nothing exploitable is present, say so plainly rather than listing hardening tips.
---
"#;

const FOLLOWUP: &str = r#"Here are the changes I've made based on your last review.

Please analyze this diff and let me know if I've correctly implemented the suggestions or introduced any new issues.
"#;
