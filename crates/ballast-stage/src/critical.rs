use regex::{Regex, RegexBuilder};
use std::sync::OnceLock;

/// Default critical-stage classifier: a single named predicate with its
/// own test suite, replacing scattered string comparisons.
const DEFAULT_PATTERN: &str = r"(preballast.*critical|6a.*critical|stage\s*5.*preballast|stage\s*6a)";

fn default_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        RegexBuilder::new(DEFAULT_PATTERN)
            .case_insensitive(true)
            .build()
            .expect("default critical-stage pattern is a fixed, known-valid regex")
    })
}

/// Whether `stage_name` is critical under the built-in pattern.
pub fn is_critical_stage(stage_name: &str) -> bool {
    default_regex().is_match(stage_name)
}

/// Whether `stage_name` is critical under a site profile's
/// `critical_stage_list` (exact membership, checked first if present) or
/// `critical_stage_regex` (checked if the list is absent), falling back to
/// the built-in pattern when the profile supplies neither.
pub fn is_critical_stage_with_profile(
    stage_name: &str,
    critical_stage_list: Option<&[String]>,
    critical_stage_regex: Option<&str>,
) -> Result<bool, regex::Error> {
    if let Some(list) = critical_stage_list {
        return Ok(list.iter().any(|s| s == stage_name));
    }
    if let Some(pattern) = critical_stage_regex {
        let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        return Ok(regex.is_match(stage_name));
    }
    Ok(is_critical_stage(stage_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_stage_5_preballast() {
        assert!(is_critical_stage("Stage 5_PreBallast"));
    }

    #[test]
    fn matches_stage_6a_critical() {
        assert!(is_critical_stage("Stage 6A_Critical"));
    }

    #[test]
    fn is_case_insensitive() {
        assert!(is_critical_stage("stage 6a_critical"));
        assert!(is_critical_stage("STAGE 5_PREBALLAST"));
    }

    #[test]
    fn non_critical_stages_do_not_match() {
        for name in ["Stage 1", "Stage 2", "Stage 3", "Stage 4", "Stage 5", "Stage 6C", "Stage 7"] {
            assert!(!is_critical_stage(name), "{name} should not be critical");
        }
    }

    #[test]
    fn explicit_list_overrides_default_pattern() {
        let list = vec!["Stage 1".to_string()];
        assert!(is_critical_stage_with_profile("Stage 1", Some(&list), None).unwrap());
        assert!(!is_critical_stage_with_profile("Stage 6A_Critical", Some(&list), None).unwrap());
    }

    #[test]
    fn explicit_regex_overrides_default_pattern() {
        assert!(is_critical_stage_with_profile("Stage 2", None, Some("^Stage 2$")).unwrap());
    }
}
