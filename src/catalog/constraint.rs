// src/catalog/constraint.rs
//! Build constraints: which files of a directory belong to the build.
//!
//! A file is part of the package when its `_GOOS`, `_GOARCH` or
//! `_GOOS_GOARCH` name suffix matches the target platform and its
//! `//go:build` expression holds. Both follow `go build`, so a
//! `//go:build ignore` generator or a per-platform file next to the package
//! is left out the same way the Go toolchain leaves it out.

use crate::errors::ConstraintError;

const KNOWN_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "js", "linux",
    "nacl", "netbsd", "openbsd", "plan9", "solaris", "wasip1", "windows", "zos",
];

const KNOWN_ARCH: &[&str] = &[
    "386", "amd64", "amd64p32", "arm", "armbe", "arm64", "arm64be", "loong64", "mips", "mipsle",
    "mips64", "mips64le", "mips64p32", "mips64p32le", "ppc", "ppc64", "ppc64le", "riscv",
    "riscv64", "s390", "s390x", "sparc", "sparc64", "wasm",
];

const UNIX_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "linux",
    "netbsd", "openbsd", "solaris",
];

/// The platform and tags files are selected for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    pub goos: String,
    pub goarch: String,
    pub cgo: bool,
    /// Extra tags, as given to `go build -tags`
    pub tags: Vec<String>,
}

impl BuildContext {
    pub fn new(goos: impl Into<String>, goarch: impl Into<String>) -> Self {
        Self {
            goos: goos.into(),
            goarch: goarch.into(),
            cgo: false,
            tags: Vec::new(),
        }
    }

    /// The platform `go generate` builds for: `GOOS` and `GOARCH` from the
    /// environment, else the host. Cgo follows `CGO_ENABLED` and is on for
    /// native builds when that is unset.
    pub fn host() -> Self {
        let host_os = go_os(std::env::consts::OS);
        let host_arch = go_arch(std::env::consts::ARCH);
        let goos = non_empty_var("GOOS").unwrap_or_else(|| host_os.to_string());
        let goarch = non_empty_var("GOARCH").unwrap_or_else(|| host_arch.to_string());
        let cgo = match non_empty_var("CGO_ENABLED").as_deref() {
            Some("1") => true,
            Some(_) => false,
            None => goos == host_os && goarch == host_arch,
        };
        Self {
            goos,
            goarch,
            cgo,
            tags: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(
            tags.into_iter()
                .map(Into::into)
                .filter(|tag: &String| !tag.is_empty()),
        );
        self
    }

    /// Whether a single build tag is satisfied.
    pub fn has_tag(&self, tag: &str) -> bool {
        if tag == self.goos || tag == self.goarch {
            return true;
        }
        match tag {
            "linux" => self.goos == "android",
            "solaris" => self.goos == "illumos",
            "darwin" => self.goos == "ios",
            "unix" => UNIX_OS.contains(&self.goos.as_str()),
            "cgo" => self.cgo,
            "gc" => true,
            _ => is_release_tag(tag) || self.tags.iter().any(|t| t == tag),
        }
    }

    /// Whether a file name's platform suffix, if it has one, matches.
    /// The part before the first `_` never counts, so `linux.go` is
    /// always included.
    pub fn matches_file_name(&self, name: &str) -> bool {
        let stem = name.strip_suffix(".go").unwrap_or(name);
        let Some(first) = stem.find('_') else {
            return true;
        };
        let suffix = &stem[first..];
        let suffix = suffix.strip_suffix("_test").unwrap_or(suffix);
        let parts: Vec<&str> = suffix.split('_').collect();

        let n = parts.len();
        if n >= 2 && KNOWN_OS.contains(&parts[n - 2]) && KNOWN_ARCH.contains(&parts[n - 1]) {
            return self.has_tag(parts[n - 2]) && self.has_tag(parts[n - 1]);
        }
        let last = parts[n - 1];
        if KNOWN_OS.contains(&last) || KNOWN_ARCH.contains(&last) {
            return self.has_tag(last);
        }
        true
    }

    /// Whether the file `name` with source `text` belongs to the build.
    pub fn includes(&self, name: &str, text: &str) -> Result<bool, ConstraintError> {
        if !self.matches_file_name(name) {
            return Ok(false);
        }
        match build_line(text)? {
            Some((offset, expr)) => Ok(Constraint::parse(expr, offset)?.eval(self)),
            None => Ok(true),
        }
    }
}

/// A parsed `//go:build` expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    Tag(String),
    Not(Box<Constraint>),
    And(Box<Constraint>, Box<Constraint>),
    Or(Box<Constraint>, Box<Constraint>),
}

impl Constraint {
    /// Parse `expr`, which starts at byte `offset` of its file.
    pub fn parse(expr: &str, offset: usize) -> Result<Self, ConstraintError> {
        let mut parser = ConstraintParser {
            tokens: tokenize(expr, offset)?,
            pos: 0,
            end: offset + expr.trim_end().len(),
        };
        let constraint = parser.or()?;
        match parser.tokens.get(parser.pos) {
            Some(token) => Err(token.unexpected()),
            None => Ok(constraint),
        }
    }

    pub fn eval(&self, build: &BuildContext) -> bool {
        match self {
            Constraint::Tag(tag) => build.has_tag(tag),
            Constraint::Not(inner) => !inner.eval(build),
            Constraint::And(left, right) => left.eval(build) && right.eval(build),
            Constraint::Or(left, right) => left.eval(build) || right.eval(build),
        }
    }
}

/// The expression of the `//go:build` line and its byte offset, when the
/// file has one before its package clause.
fn build_line(text: &str) -> Result<Option<(usize, &str)>, ConstraintError> {
    const DIRECTIVE: &str = "//go:build";

    let mut found: Option<(usize, &str)> = None;
    let mut offset = 0;
    let mut in_block = false;
    for line in text.split_inclusive('\n') {
        let start = offset;
        offset += line.len();
        let indent = line.len() - line.trim_start().len();
        let trimmed = line.trim();

        if in_block {
            if let Some(end) = trimmed.find("*/") {
                in_block = false;
                if !trimmed[end + 2..].trim().is_empty() {
                    break;
                }
            }
            continue;
        }
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix(DIRECTIVE) {
            if rest.is_empty() || rest.starts_with([' ', '\t']) {
                let at = start + indent;
                if found.is_some() {
                    return Err(ConstraintError::Multiple {
                        at,
                        len: trimmed.len(),
                    });
                }
                found = Some((at + DIRECTIVE.len(), rest));
            }
            continue;
        }
        if trimmed.starts_with("//") {
            continue;
        }
        if let Some(body) = trimmed.strip_prefix("/*") {
            // Comment text, then code on the same line, ends the header
            match body.find("*/") {
                Some(end) if !body[end + 2..].trim().is_empty() => break,
                Some(_) => {}
                None => in_block = true,
            }
            continue;
        }
        break;
    }
    Ok(found)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Tag,
    And,
    Or,
    Not,
    LParen,
    RParen,
}

#[derive(Debug, Clone)]
struct ConstraintToken<'a> {
    kind: Kind,
    text: &'a str,
    at: usize,
}

impl ConstraintToken<'_> {
    fn unexpected(&self) -> ConstraintError {
        ConstraintError::Unexpected {
            found: self.text.to_string(),
            at: self.at,
        }
    }
}

fn tokenize(expr: &str, offset: usize) -> Result<Vec<ConstraintToken<'_>>, ConstraintError> {
    let mut tokens = Vec::new();
    let mut chars = expr.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        let (kind, len) = match c {
            ' ' | '\t' | '\r' | '\n' => continue,
            '!' => (Kind::Not, 1),
            '(' => (Kind::LParen, 1),
            ')' => (Kind::RParen, 1),
            '&' if chars.next_if(|&(_, c)| c == '&').is_some() => (Kind::And, 2),
            '|' if chars.next_if(|&(_, c)| c == '|').is_some() => (Kind::Or, 2),
            c if is_tag_char(c) => {
                let mut end = i + c.len_utf8();
                while let Some((j, c)) = chars.next_if(|&(_, c)| is_tag_char(c)) {
                    end = j + c.len_utf8();
                }
                (Kind::Tag, end - i)
            }
            c => {
                return Err(ConstraintError::Unexpected {
                    found: c.to_string(),
                    at: offset + i,
                });
            }
        };
        tokens.push(ConstraintToken {
            kind,
            text: &expr[i..i + len],
            at: offset + i,
        });
    }
    Ok(tokens)
}

fn is_tag_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

/// Recursive descent over `||`, `&&`, `!` and parentheses, binding in that
/// order from loosest to tightest.
struct ConstraintParser<'a> {
    tokens: Vec<ConstraintToken<'a>>,
    pos: usize,
    end: usize,
}

impl ConstraintParser<'_> {
    fn or(&mut self) -> Result<Constraint, ConstraintError> {
        let mut left = self.and()?;
        while self.match_kind(Kind::Or) {
            let right = self.and()?;
            left = Constraint::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn and(&mut self) -> Result<Constraint, ConstraintError> {
        let mut left = self.unary()?;
        while self.match_kind(Kind::And) {
            let right = self.unary()?;
            left = Constraint::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Constraint, ConstraintError> {
        let Some(token) = self.tokens.get(self.pos).cloned() else {
            return Err(ConstraintError::UnexpectedEnd { at: self.end });
        };
        self.pos += 1;
        match token.kind {
            Kind::Not => Ok(Constraint::Not(Box::new(self.unary()?))),
            Kind::LParen => {
                let inner = self.or()?;
                if !self.match_kind(Kind::RParen) {
                    return Err(match self.tokens.get(self.pos) {
                        Some(token) => token.unexpected(),
                        None => ConstraintError::UnexpectedEnd { at: self.end },
                    });
                }
                Ok(inner)
            }
            Kind::Tag => Ok(Constraint::Tag(token.text.to_string())),
            Kind::And | Kind::Or | Kind::RParen => Err(token.unexpected()),
        }
    }

    fn match_kind(&mut self, kind: Kind) -> bool {
        if self.tokens.get(self.pos).is_some_and(|t| t.kind == kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }
}

/// `go1.N` release tags; every release is assumed to be satisfied.
fn is_release_tag(tag: &str) -> bool {
    tag.strip_prefix("go1.")
        .is_some_and(|minor| !minor.is_empty() && minor.bytes().all(|b| b.is_ascii_digit()))
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn go_os(os: &str) -> &str {
    match os {
        "macos" => "darwin",
        other => other,
    }
}

fn go_arch(arch: &str) -> &'static str {
    match arch {
        "x86" => "386",
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "arm" => "arm",
        "loongarch64" => "loong64",
        "mips" if cfg!(target_endian = "little") => "mipsle",
        "mips" => "mips",
        "mips64" if cfg!(target_endian = "little") => "mips64le",
        "mips64" => "mips64",
        "powerpc" => "ppc",
        "powerpc64" if cfg!(target_endian = "little") => "ppc64le",
        "powerpc64" => "ppc64",
        "riscv64" => "riscv64",
        "s390x" => "s390x",
        "sparc64" => "sparc64",
        "wasm32" => "wasm",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linux() -> BuildContext {
        BuildContext::new("linux", "amd64")
    }

    fn holds(expr: &str, build: &BuildContext) -> bool {
        Constraint::parse(expr, 0).expect("constraint parses").eval(build)
    }

    #[test]
    fn parse_respects_precedence() {
        let c = Constraint::parse("a || b && !c", 0).unwrap();
        let tag = |t: &str| Box::new(Constraint::Tag(t.to_string()));
        assert_eq!(
            c,
            Constraint::Or(
                tag("a"),
                Box::new(Constraint::And(tag("b"), Box::new(Constraint::Not(tag("c")))))
            )
        );
    }

    #[test]
    fn evaluates_platform_tags() {
        let build = linux();
        assert!(holds("linux", &build));
        assert!(holds("linux && amd64", &build));
        assert!(holds("unix && !windows", &build));
        assert!(!holds("darwin || windows", &build));
        assert!(holds("(darwin || linux) && go1.21", &build));
        assert!(!holds("cgo", &build));
        assert!(!holds("ignore", &build));
    }

    #[test]
    fn extra_tags_are_satisfied() {
        let build = linux().with_tags(["enterprise", ""]);
        assert!(holds("enterprise", &build));
        assert!(!holds("!enterprise", &build));
        assert_eq!(build.tags, ["enterprise"]);
    }

    #[test]
    fn android_satisfies_linux() {
        let build = BuildContext::new("android", "arm64");
        assert!(holds("linux", &build));
        assert!(build.matches_file_name("poll_linux.go"));
    }

    #[test]
    fn malformed_expressions() {
        assert_eq!(
            Constraint::parse("linux &&", 10),
            Err(ConstraintError::UnexpectedEnd { at: 18 })
        );
        assert_eq!(
            Constraint::parse("linux darwin", 0),
            Err(ConstraintError::Unexpected {
                found: "darwin".to_string(),
                at: 6
            })
        );
        assert!(matches!(
            Constraint::parse("(linux", 0),
            Err(ConstraintError::UnexpectedEnd { .. })
        ));
        assert!(matches!(
            Constraint::parse("linux & amd64", 0),
            Err(ConstraintError::Unexpected { ref found, .. }) if found == "&"
        ));
    }

    #[test]
    fn file_name_suffixes() {
        let build = linux();
        assert!(build.matches_file_name("handle.go"));
        assert!(build.matches_file_name("linux.go"));
        assert!(build.matches_file_name("handle_linux.go"));
        assert!(!build.matches_file_name("handle_windows.go"));
        assert!(build.matches_file_name("handle_amd64.go"));
        assert!(!build.matches_file_name("handle_arm64.go"));
        assert!(build.matches_file_name("handle_linux_amd64.go"));
        assert!(!build.matches_file_name("handle_linux_arm64.go"));
        assert!(!build.matches_file_name("handle_windows_amd64_test.go"));
        assert!(build.matches_file_name("read_me_please.go"));
    }

    #[test]
    fn build_line_must_precede_package_clause() {
        let build = linux();
        let ignored = "// Code generator.\n\n//go:build ignore\n\npackage main\n";
        assert_eq!(build.includes("gen.go", ignored), Ok(false));

        let late = "package main\n\n//go:build ignore\n";
        assert_eq!(build.includes("gen.go", late), Ok(true));

        let block = "/* header\n*/\n//go:build windows\npackage p\n";
        assert_eq!(build.includes("p.go", block), Ok(false));

        let similar = "//go:buildx ignore\npackage p\n";
        assert_eq!(build.includes("p.go", similar), Ok(true));
    }

    #[test]
    fn build_line_offsets_point_into_the_file() {
        let text = "//go:build linux &&\npackage p\n";
        assert_eq!(
            linux().includes("p.go", text),
            Err(ConstraintError::UnexpectedEnd { at: 19 })
        );

        let twice = "//go:build linux\n//go:build amd64\npackage p\n";
        assert_eq!(
            linux().includes("p.go", twice),
            Err(ConstraintError::Multiple { at: 17, len: 16 })
        );
    }

    #[test]
    fn host_context_names_go_platforms() {
        let host = BuildContext::host();
        assert!(!host.goos.is_empty());
        assert!(!host.goarch.is_empty());
        assert_eq!(go_os("macos"), "darwin");
        assert_eq!(go_arch("x86_64"), "amd64");
        assert_eq!(go_arch("aarch64"), "arm64");
    }
}
