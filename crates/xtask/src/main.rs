use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::Context;
use regex_lite::Regex;
use serde::Deserialize;

/// Internal crates each workspace crate may depend on: domain <- shared <- engine.
const ALLOWED_INTERNAL_DEPS: &[(&str, &[&str])] = &[
    ("lingshu-domain", &[]),
    ("lingshu-shared", &["lingshu-domain"]),
    ("lingshu-engine", &["lingshu-domain", "lingshu-shared"]),
];

/// The domain crate stays free of I/O, async, logging and text parsing.
static DOMAIN_FORBIDDEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:tokio|tracing|regex_lite|std::fs|std::net|std::process)\b")
        .expect("valid regex")
});

#[derive(Debug, Deserialize)]
struct Metadata {
    packages: Vec<Package>,
}

#[derive(Debug, Deserialize)]
struct Package {
    name: String,
    manifest_path: PathBuf,
    dependencies: Vec<Dependency>,
}

#[derive(Debug, Deserialize)]
struct Dependency {
    name: String,
    #[serde(default)]
    kind: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("arch-check") => arch_check(),
        Some(cmd) => anyhow::bail!("Unknown xtask command: {cmd}"),
        None => anyhow::bail!("Usage: cargo xtask <command>\n\nCommands:\n  arch-check"),
    }
}

fn arch_check() -> anyhow::Result<()> {
    let output = std::process::Command::new("cargo")
        .args(["metadata", "--format-version", "1", "--no-deps"])
        .output()
        .context("running cargo metadata")?;

    if !output.status.success() {
        anyhow::bail!("cargo metadata failed")
    }

    let metadata: Metadata =
        serde_json::from_slice(&output.stdout).context("parsing cargo metadata")?;

    let mut violations = dependency_violations(&metadata);
    if let Some(domain) = metadata.packages.iter().find(|p| p.name == "lingshu-domain") {
        let src = domain
            .manifest_path
            .parent()
            .map(|dir| dir.join("src"))
            .context("domain manifest has no parent directory")?;
        violations.extend(domain_source_violations(&src)?);
    }

    if violations.is_empty() {
        println!("arch-check: ok");
        return Ok(());
    }
    for violation in &violations {
        eprintln!("arch-check: {violation}");
    }
    anyhow::bail!("{} architecture violation(s)", violations.len())
}

/// Internal dependencies outside the allowed direction. Dev-dependencies count
/// too: a test-only back edge still couples the layers.
fn dependency_violations(metadata: &Metadata) -> Vec<String> {
    let allowed: BTreeMap<&str, BTreeSet<&str>> = ALLOWED_INTERNAL_DEPS
        .iter()
        .map(|(name, deps)| (*name, deps.iter().copied().collect()))
        .collect();

    let mut violations = Vec::new();
    for package in &metadata.packages {
        let Some(permitted) = allowed.get(package.name.as_str()) else {
            continue;
        };
        for dep in &package.dependencies {
            let internal = allowed.contains_key(dep.name.as_str());
            if internal && !permitted.contains(dep.name.as_str()) {
                violations.push(format!(
                    "{} must not depend on {} ({})",
                    package.name,
                    dep.name,
                    dep.kind.as_deref().unwrap_or("normal")
                ));
            }
        }
    }
    violations
}

fn domain_source_violations(src: &Path) -> anyhow::Result<Vec<String>> {
    let mut violations = Vec::new();
    for file in rust_files(src)? {
        let text = std::fs::read_to_string(&file)
            .with_context(|| format!("reading {}", file.display()))?;
        for (number, line) in text.lines().enumerate() {
            let code = line.split("//").next().unwrap_or_default();
            if let Some(found) = DOMAIN_FORBIDDEN_RE.find(code) {
                violations.push(format!(
                    "{}:{} domain code references `{}`",
                    file.display(),
                    number + 1,
                    found.as_str()
                ));
            }
        }
    }
    Ok(violations)
}

fn rust_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
        let path = entry?.path();
        if path.is_dir() {
            files.extend(rust_files(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
