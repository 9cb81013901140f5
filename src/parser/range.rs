//! npm range expressions evaluated with the semver crate
//!
//! The semver crate speaks Cargo's requirement dialect, which differs from
//! npm in a few places. Each `||` alternative is rewritten before parsing:
//! - comparators are separated by whitespace in npm, by commas in Cargo
//! - a bare full version is exact in npm (`1.2.3` means `=1.2.3`)
//! - a bare partial version is a tilde range in npm (`1.2` means `~1.2`)
//! - hyphen ranges (`1.0.0 - 2.0.0`) become `>=1.0.0, <=2.0.0`
//! - `x`/`X`/`*` components are dropped (`>=1.x` means `>=1`)
//! - build metadata is dropped (`1.2.3+b7` means `=1.2.3`)

use crate::domain::compare_precedence;
use regex::Regex;
use semver::{BuildMetadata, Comparator, Op, Prerelease, Version, VersionReq};
use std::cmp::Ordering;
use std::sync::LazyLock;

static HYPHEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\s+-\s+(\S+)$").unwrap());
static OPERATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(<=|>=|<|>|=|\^|~>|~)?(.*)$").unwrap());
static FULL_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+(?:-[0-9A-Za-z.-]+)?$").unwrap());

/// A parsed npm range: a union of comparator sets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpmRange {
    alternatives: Vec<VersionReq>,
}

impl NpmRange {
    /// Parse an npm range expression
    pub fn parse(raw: &str) -> Result<Self, semver::Error> {
        let alternatives = raw
            .split("||")
            .map(|alternative| VersionReq::parse(&translate_alternative(alternative)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { alternatives })
    }

    /// Lowest version satisfying the range, `None` if nothing satisfies it
    pub fn floor(&self) -> Option<Version> {
        self.alternatives
            .iter()
            .filter_map(alternative_floor)
            .min_by(compare_precedence)
    }
}

/// Rewrite one npm comparator set into the semver crate's syntax
fn translate_alternative(alternative: &str) -> String {
    let alternative = alternative.trim();
    if alternative.is_empty() {
        return "*".to_string();
    }

    if let Some(caps) = HYPHEN_RE.captures(alternative) {
        let lower = normalize_comparator(&format!(">={}", &caps[1]));
        let upper = normalize_comparator(&format!("<={}", &caps[2]));
        return format!("{}, {}", lower, upper);
    }

    let mut comparators = Vec::new();
    let mut pending_operator: Option<&str> = None;

    for token in alternative.split_whitespace() {
        // npm tolerates a space between the operator and the version (`>= 1.2.3`)
        if is_bare_operator(token) {
            pending_operator = Some(token);
            continue;
        }
        let token = match pending_operator.take() {
            Some(op) => format!("{}{}", op, token),
            None => token.to_string(),
        };
        comparators.push(normalize_comparator(&token));
    }

    // A dangling operator is invalid; pass it through so parsing fails
    if let Some(op) = pending_operator {
        comparators.push(op.to_string());
    }

    comparators.join(", ")
}

fn is_bare_operator(token: &str) -> bool {
    matches!(token, "<" | "<=" | ">" | ">=" | "=" | "^" | "~" | "~>")
}

fn normalize_comparator(token: &str) -> String {
    let Some(caps) = OPERATOR_RE.captures(token) else {
        return token.to_string();
    };
    let operator = match caps.get(1).map_or("", |m| m.as_str()) {
        "~>" => "~",
        op => op,
    };
    let version = caps.get(2).map_or("", |m| m.as_str());
    let version = version.strip_prefix('v').unwrap_or(version);
    // Build metadata never affects range matching
    let version = version.split('+').next().unwrap_or(version);
    let version = strip_wildcards(version);

    if version.is_empty() {
        // `*`, `x`, `>=*` and friends admit everything
        return if matches!(operator, "<" | ">") {
            format!("{}0.0.0", operator)
        } else {
            "*".to_string()
        };
    }

    if operator.is_empty() {
        if FULL_VERSION_RE.is_match(&version) {
            return format!("={}", version);
        }
        return format!("~{}", version);
    }

    format!("{}{}", operator, version)
}

/// Drop wildcard components among major/minor/patch (`1.2.x` -> `1.2`)
fn strip_wildcards(version: &str) -> String {
    let mut kept = Vec::new();
    for (index, part) in version.split('.').enumerate() {
        if index < 3 && matches!(part, "x" | "X" | "*") {
            break;
        }
        kept.push(part);
    }
    kept.join(".")
}

/// Lowest version admitted by a single comparator set
fn alternative_floor(req: &VersionReq) -> Option<Version> {
    let mut floor = Version::new(0, 0, 0);

    for comparator in &req.comparators {
        if let Some(lower) = comparator_floor(comparator) {
            if compare_precedence(&lower, &floor) == Ordering::Greater {
                floor = lower;
            }
        }
    }

    if req.matches(&floor) {
        Some(floor)
    } else {
        None
    }
}

fn comparator_floor(comparator: &Comparator) -> Option<Version> {
    let major = comparator.major;
    let minor = comparator.minor.unwrap_or(0);
    let patch = comparator.patch.unwrap_or(0);

    match comparator.op {
        Op::Exact | Op::GreaterEq | Op::Tilde | Op::Caret | Op::Wildcard => Some(Version {
            major,
            minor,
            patch,
            pre: comparator.pre.clone(),
            build: BuildMetadata::EMPTY,
        }),
        // A component already at u64::MAX has no successor, so nothing is above it
        Op::Greater => match (comparator.minor, comparator.patch) {
            (None, _) => Some(Version::new(major.checked_add(1)?, 0, 0)),
            (Some(minor), None) => Some(Version::new(major, minor.checked_add(1)?, 0)),
            (Some(_), Some(_)) if comparator.pre.is_empty() => {
                Some(Version::new(major, minor, patch.checked_add(1)?))
            }
            (Some(_), Some(_)) => Some(Version {
                major,
                minor,
                patch,
                pre: Prerelease::new(&format!("{}.0", comparator.pre)).ok()?,
                build: BuildMetadata::EMPTY,
            }),
        },
        // Upper bounds do not raise the floor
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor(raw: &str) -> Option<String> {
        NpmRange::parse(raw).unwrap().floor().map(|v| v.to_string())
    }

    #[test]
    fn test_translate_bare_versions() {
        assert_eq!(translate_alternative("1.2.3"), "=1.2.3");
        assert_eq!(translate_alternative("1.2"), "~1.2");
        assert_eq!(translate_alternative("v1.2.3"), "=1.2.3");
        assert_eq!(translate_alternative("1.2.3+build.7"), "=1.2.3");
        assert_eq!(translate_alternative(""), "*");
    }

    #[test]
    fn test_translate_comparator_set() {
        assert_eq!(
            translate_alternative(">=1.0.0 <2.0.0"),
            ">=1.0.0, <2.0.0"
        );
        assert_eq!(translate_alternative(">= 1.0.0 < 2.0.0"), ">=1.0.0, <2.0.0");
    }

    #[test]
    fn test_translate_hyphen_range() {
        assert_eq!(translate_alternative("1.0.0 - 2.0.0"), ">=1.0.0, <=2.0.0");
    }

    #[test]
    fn test_translate_wildcards() {
        assert_eq!(translate_alternative("*"), "*");
        assert_eq!(translate_alternative("x"), "*");
        assert_eq!(translate_alternative("1.x"), "~1");
        assert_eq!(translate_alternative("1.2.*"), "~1.2");
        assert_eq!(translate_alternative(">=1.x"), ">=1");
    }

    #[test]
    fn test_floor_of_common_ranges() {
        assert_eq!(floor("^2.11.0").as_deref(), Some("2.11.0"));
        assert_eq!(floor("~1.2.3").as_deref(), Some("1.2.3"));
        assert_eq!(floor(">=1.5.0").as_deref(), Some("1.5.0"));
        assert_eq!(floor("1.2.3").as_deref(), Some("1.2.3"));
        assert_eq!(floor("*").as_deref(), Some("0.0.0"));
        assert_eq!(floor("").as_deref(), Some("0.0.0"));
        assert_eq!(floor("1.x").as_deref(), Some("1.0.0"));
    }

    #[test]
    fn test_floor_of_strict_greater() {
        assert_eq!(floor(">1.2.3").as_deref(), Some("1.2.4"));
        assert_eq!(floor(">1.2").as_deref(), Some("1.3.0"));
        assert_eq!(floor(">1").as_deref(), Some("2.0.0"));
    }

    #[test]
    fn test_floor_of_upper_bound_only() {
        assert_eq!(floor("<2.0.0").as_deref(), Some("0.0.0"));
        assert_eq!(floor("<=1.4.0").as_deref(), Some("0.0.0"));
    }

    #[test]
    fn test_floor_of_union_is_lowest_alternative() {
        assert_eq!(floor("^2.0.0 || ^1.4.0").as_deref(), Some("1.4.0"));
    }

    #[test]
    fn test_floor_of_hyphen_range() {
        assert_eq!(floor("1.3.0 - 2.0.0").as_deref(), Some("1.3.0"));
    }

    #[test]
    fn test_floor_with_prerelease() {
        assert_eq!(floor("^1.0.0-beta.2").as_deref(), Some("1.0.0-beta.2"));
    }

    #[test]
    fn test_unsatisfiable_range_has_no_floor() {
        assert_eq!(floor(">=2.0.0 <1.0.0"), None);
    }

    #[test]
    fn test_caret_floor_is_its_own_version() {
        let range = NpmRange::parse("^1.2.0").unwrap();
        assert_eq!(range.floor(), Some(Version::new(1, 2, 0)));
        assert_eq!(range.alternatives.len(), 1);
    }

    #[test]
    fn test_bare_version_is_exact() {
        let range = NpmRange::parse("1.2.3").unwrap();
        assert!(range.alternatives[0].matches(&Version::new(1, 2, 3)));
        assert!(!range.alternatives[0].matches(&Version::new(1, 2, 4)));
    }

    #[test]
    fn test_greater_than_max_component_has_no_floor() {
        assert_eq!(floor(">18446744073709551615"), None);
        assert_eq!(floor(">1.18446744073709551615"), None);
        assert_eq!(floor(">1.2.18446744073709551615"), None);
    }

    #[test]
    fn test_greater_than_max_component_in_union() {
        assert_eq!(
            floor(">1.2.18446744073709551615 || ^3.0.0").as_deref(),
            Some("3.0.0")
        );
    }

    #[test]
    fn test_rejects_non_ranges() {
        assert!(NpmRange::parse("latest").is_err());
        assert!(NpmRange::parse("file:../local-lib").is_err());
        assert!(NpmRange::parse("git+https://github.com/a/b.git").is_err());
        assert!(NpmRange::parse("workspace:*").is_err());
        assert!(NpmRange::parse(">=").is_err());
    }
}
