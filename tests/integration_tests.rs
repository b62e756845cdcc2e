//! Integration tests for uptick
//!
//! These tests verify:
//! - Update checker scenarios across ecosystems
//! - Ordering and display properties of parsed versions
//! - Requirement semantics through the dialect registry
//! - Filter pipeline behavior on its own output

use chrono::{Duration, TimeZone, Utc};
use uptick::cooldown::{CooldownPolicy, SemverBumpKind};
use uptick::dialect::Dialect;
use uptick::domain::{Dependency, EcosystemId, ManifestRequirement, Release, SecurityAdvisory};
use uptick::error::FetchError;
use uptick::requirement::Requirement;
use uptick::update::{CheckOptions, FilterContext, Pipeline, UpdateChecker};
use uptick::version::Version;

fn dialect(ecosystem: EcosystemId) -> Dialect {
    ecosystem.dialect()
}

fn version(ecosystem: EcosystemId, raw: &str) -> Version {
    Version::parse(raw, dialect(ecosystem).version).unwrap()
}

fn requirement(ecosystem: EcosystemId, raw: &str) -> Requirement {
    Requirement::parse(raw, dialect(ecosystem).requirement).unwrap()
}

fn releases(ecosystem: EcosystemId, list: &[&str]) -> Vec<Release> {
    list.iter()
        .map(|raw| Release::new(version(ecosystem, raw)))
        .collect()
}

fn selected(result: Result<Option<&Release>, uptick::error::CheckError>) -> Option<String> {
    result.unwrap().map(|r| r.version.to_string())
}

mod scenarios {
    use super::*;

    fn left_pad() -> Dependency {
        Dependency::new("left-pad", EcosystemId::Npm)
            .with_current_version(version(EcosystemId::Npm, "1.0.0"))
    }

    #[test]
    fn test_latest_skips_prereleases() {
        let checker = UpdateChecker::new(
            left_pad(),
            Ok(releases(EcosystemId::Npm, &["1.0.0", "1.0.1", "1.1.0-rc1", "1.1.0"])),
            CheckOptions::new(),
        );
        assert_eq!(selected(checker.latest_version()), Some("1.1.0".to_string()));
    }

    #[test]
    fn test_latest_respects_ignore_rule() {
        let ignore = Requirement::parse_ignore_rule(">= 1.1.0", dialect(EcosystemId::Npm).requirement)
            .unwrap();
        let checker = UpdateChecker::new(
            left_pad(),
            Ok(releases(EcosystemId::Npm, &["1.0.0", "1.0.1", "1.1.0-rc1", "1.1.0"])),
            CheckOptions::new().with_ignored(vec![ignore]),
        );
        assert_eq!(selected(checker.latest_version()), Some("1.0.1".to_string()));
    }

    #[test]
    fn test_no_unlock_stays_within_pessimistic_requirement() {
        let dep = Dependency::new("rack", EcosystemId::Bundler)
            .with_current_version(version(EcosystemId::Bundler, "1.0.0"))
            .with_requirement(ManifestRequirement::new(
                requirement(EcosystemId::Bundler, "~> 1.0.0"),
                "Gemfile",
            ));
        let checker = UpdateChecker::new(
            dep,
            Ok(releases(EcosystemId::Bundler, &["1.0.0", "1.0.5", "1.1.0"])),
            CheckOptions::new(),
        );

        assert_eq!(
            selected(checker.latest_version_with_no_unlock()),
            Some("1.0.5".to_string())
        );
        assert_eq!(selected(checker.latest_version()), Some("1.1.0".to_string()));

        let target = checker.latest_version_with_no_unlock().unwrap().unwrap().clone();
        let updated = checker.updated_requirements(&target);
        assert_eq!(updated[0].requirement.as_str(), "~> 1.0.5");
    }

    #[test]
    fn test_lowest_security_fix() {
        let dep = Dependency::new("lodash", EcosystemId::Npm)
            .with_current_version(version(EcosystemId::Npm, "1.2.0"));
        let advisory =
            SecurityAdvisory::new("lodash").with_vulnerable(requirement(EcosystemId::Npm, "<1.3.0"));
        let checker = UpdateChecker::new(
            dep,
            Ok(releases(EcosystemId::Npm, &["1.2.0", "1.2.5", "1.3.0", "1.3.1"])),
            CheckOptions::new().with_advisories(vec![advisory]),
        );

        assert!(checker.is_vulnerable());
        assert_eq!(
            selected(checker.lowest_security_fix_version()),
            Some("1.3.0".to_string())
        );
    }

    #[test]
    fn test_fetch_failure_yields_no_update() {
        let checker = UpdateChecker::new(
            left_pad(),
            Err(FetchError::package_not_found("left-pad", "npm")),
            CheckOptions::new(),
        );

        assert!(checker.fetch_error().is_some());
        assert_eq!(selected(checker.latest_version()), None);
        assert_eq!(selected(checker.latest_version_with_no_unlock()), None);
    }

    #[test]
    fn test_cooldown_by_bump_kind() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let published = |raw: &str, days_ago: i64| {
            Release::new(version(EcosystemId::Npm, raw)).with_released_at(now - Duration::days(days_ago))
        };
        let checker = UpdateChecker::new(
            left_pad(),
            Ok(vec![
                published("1.0.1", 20),
                published("1.1.0", 5),
                published("2.0.0", 10),
            ]),
            CheckOptions::new()
                .with_cooldown(CooldownPolicy::default().with_semver_days(30, 7, 1))
                .with_time(now),
        );

        // 2.0.0 waits 30 days as a major bump, 1.1.0 waits 7 as a minor one
        assert_eq!(selected(checker.latest_version()), Some("1.0.1".to_string()));
    }

    #[test]
    fn test_python_latest_with_post_and_dev_releases() {
        let dep = Dependency::new("requests", EcosystemId::Pip)
            .with_current_version(version(EcosystemId::Pip, "2.31.0"))
            .with_requirement(ManifestRequirement::new(
                requirement(EcosystemId::Pip, ">=2.31,<2.33"),
                "requirements.txt",
            ));
        let checker = UpdateChecker::new(
            dep,
            Ok(releases(
                EcosystemId::Pip,
                &["2.31.0", "2.32.0.dev1", "2.32.0", "2.32.0.post1", "2.33.0"],
            )),
            CheckOptions::new(),
        );

        assert_eq!(selected(checker.latest_version()), Some("2.33.0".to_string()));
        assert_eq!(
            selected(checker.latest_version_with_no_unlock()),
            Some("2.32.0.post1".to_string())
        );
    }

    #[tokio::test]
    async fn test_fetch_through_release_file() {
        use std::io::Write;
        use uptick::registry::ReleaseFileFetcher;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"[{"version":"1.0.0"},{"version":"1.2.0"},{"version":"1.3.0","yanked":true}]"#)
            .unwrap();

        let checker =
            UpdateChecker::fetch(left_pad(), &ReleaseFileFetcher::new(file.path()), CheckOptions::new())
                .await;
        assert_eq!(checker.releases().len(), 3);
        assert_eq!(selected(checker.latest_version()), Some("1.2.0".to_string()));
    }
}

mod version_properties {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(EcosystemId::Npm, &["0.9.0", "1.0.0-alpha", "1.0.0-alpha.1", "1.0.0-beta", "1.0.0", "1.0.1", "1.10.0"])]
    #[case(EcosystemId::Bundler, &["0.9", "1.0.0.a", "1.0.0.rc1", "1.0.0", "1.0.0.1", "1.1"])]
    #[case(EcosystemId::Pip, &["1.0.dev1", "1.0a1", "1.0b2", "1.0rc1", "1.0", "1.0.post1", "1!0.1"])]
    #[case(EcosystemId::Maven, &["1.0-alpha-1", "1.0-beta", "1.0-rc1", "1.0", "1.0-sp1", "1.1"])]
    fn test_total_order(#[case] ecosystem: EcosystemId, #[case] ascending: &[&str]) {
        let parsed: Vec<Version> = ascending.iter().map(|raw| version(ecosystem, raw)).collect();

        for (i, a) in parsed.iter().enumerate() {
            for (j, b) in parsed.iter().enumerate() {
                assert_eq!(a.cmp(b), i.cmp(&j), "{} vs {}", a, b);
            }
        }
    }

    #[rstest]
    #[case(EcosystemId::Npm, "1.0.0-rc.1")]
    #[case(EcosystemId::Npm, "v2.3.4")]
    #[case(EcosystemId::Bundler, "1.0.0.pre.rc1")]
    #[case(EcosystemId::Pip, "1.0rc1")]
    #[case(EcosystemId::Maven, "1.0-SNAPSHOT")]
    #[case(EcosystemId::RustToolchain, "nightly-2024-01-15")]
    fn test_display_round_trip(#[case] ecosystem: EcosystemId, #[case] raw: &str) {
        assert_eq!(version(ecosystem, raw).to_string(), raw);
    }

    #[test]
    fn test_trailing_zeros_are_equal() {
        assert_eq!(version(EcosystemId::Pip, "1.0"), version(EcosystemId::Pip, "1.0.0"));
    }

    #[test]
    fn test_bump_kind() {
        let v = |raw| version(EcosystemId::Npm, raw);
        assert_eq!(SemverBumpKind::between(&v("1.2.3"), &v("2.0.0")), SemverBumpKind::Major);
        assert_eq!(SemverBumpKind::between(&v("1.2.3"), &v("1.3.0")), SemverBumpKind::Minor);
        assert_eq!(SemverBumpKind::between(&v("1.2.3"), &v("1.2.4")), SemverBumpKind::Patch);
    }
}

mod requirement_semantics {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("^1.2.3", "1.2.3", true)]
    #[case("^1.2.3", "1.9.9", true)]
    #[case("^1.2.3", "1.2.2", false)]
    #[case("^1.2.3", "2.0.0", false)]
    #[case("^0.2.3", "0.2.9", true)]
    #[case("^0.2.3", "0.3.0", false)]
    #[case("^0.2.3", "0.1.9", false)]
    #[case("~1.5", "1.5.9", true)]
    #[case("~1.5", "1.6.0", false)]
    #[case(">=1.0.0 <2.0.0 || >=3.0.0", "3.1.0", true)]
    #[case(">=1.0.0 <2.0.0 || >=3.0.0", "2.5.0", false)]
    fn test_npm_requirements(#[case] req: &str, #[case] v: &str, #[case] expected: bool) {
        assert_eq!(
            requirement(EcosystemId::Npm, req).satisfied_by(&version(EcosystemId::Npm, v)),
            expected
        );
    }

    #[rstest]
    #[case(EcosystemId::Cargo, "1.2", "1.9.0", true)]
    #[case(EcosystemId::Cargo, "1.2", "2.0.0", false)]
    #[case(EcosystemId::Pip, "~=1.4.2", "1.4.9", true)]
    #[case(EcosystemId::Pip, "~=1.4.2", "1.5.0", false)]
    #[case(EcosystemId::Maven, "[1.0,2.0)", "1.5", true)]
    #[case(EcosystemId::Maven, "[1.0,2.0)", "2.0", false)]
    #[case(EcosystemId::Hex, "~> 2.1 or ~> 3.0", "3.4.0", true)]
    #[case(EcosystemId::Bundler, ">= 1.0, < 2.0", "1.9", true)]
    fn test_dialect_requirements(
        #[case] ecosystem: EcosystemId,
        #[case] req: &str,
        #[case] v: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(
            requirement(ecosystem, req).satisfied_by(&version(ecosystem, v)),
            expected
        );
    }

    #[test]
    fn test_every_ecosystem_is_registered() {
        for ecosystem in EcosystemId::all() {
            assert!(Dialect::registered(*ecosystem).is_ok(), "{}", ecosystem);
        }
    }
}

mod pipeline_properties {
    use super::*;

    #[test]
    fn test_pipelines_are_idempotent() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let dep = Dependency::new("left-pad", EcosystemId::Npm)
            .with_current_version(version(EcosystemId::Npm, "1.0.0"))
            .with_requirement(ManifestRequirement::new(
                requirement(EcosystemId::Npm, "^1.0.0"),
                "package.json",
            ));
        let ignored = vec![requirement(EcosystemId::Npm, "1.0.2")];
        let advisories =
            vec![SecurityAdvisory::new("left-pad").with_vulnerable(requirement(EcosystemId::Npm, "<1.0.3"))];
        let cooldown = CooldownPolicy::days(3);
        let ctx = FilterContext {
            dependency: &dep,
            ignored: &ignored,
            advisories: &advisories,
            cooldown: &cooldown,
            now,
        };

        let input: Vec<Release> = [
            ("1.0.0", 100, false),
            ("1.0.1", 50, true),
            ("1.0.2", 40, false),
            ("1.0.3", 30, false),
            ("1.1.0-beta", 20, false),
            ("1.1.0", 1, false),
            ("2.0.0", 10, false),
        ]
        .iter()
        .map(|(raw, days_ago, yanked)| {
            Release::new(version(EcosystemId::Npm, raw))
                .with_released_at(now - Duration::days(*days_ago))
                .with_yanked(*yanked)
        })
        .collect();

        for pipeline in [Pipeline::LATEST, Pipeline::NO_UNLOCK, Pipeline::SECURITY_FIX] {
            let once = pipeline.run(input.clone(), &ctx).releases;
            let twice = pipeline.run(once.clone(), &ctx).releases;
            assert_eq!(once, twice);
        }

        let latest = Pipeline::LATEST.run(input.clone(), &ctx).releases;
        let versions: Vec<String> = latest.iter().map(|r| r.version.to_string()).collect();
        assert_eq!(versions, vec!["1.0.0", "1.0.3", "2.0.0"]);
    }
}
