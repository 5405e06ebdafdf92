//! Deterministic naming for everything a construct declares.
//!
//! Logical ids are `{human}{HASH}`: the alphanumeric parts of the construct
//! path followed by the first eight hex digits of the path's MD5. Two
//! constructs whose readable parts collapse to the same string (`my-jobs` and
//! `myjobs`) still get distinct ids because the hash covers the full path.

use crate::config::DeploymentContext;
use itertools::Itertools;
use md5::{Digest, Md5};

/// Provider limit on the length of a logical id.
const MAX_LOGICAL_ID_LEN: usize = 255;
const HASH_LEN: usize = 8;
const PATH_SEPARATOR: &str = "/";
/// Leaf name of the underlying resource inside a construct path.
const RESOURCE_LEAF: &str = "Resource";

pub const QUEUE_NAME_MAX_LEN: usize = 80;
pub const TOPIC_NAME_MAX_LEN: usize = 256;
pub const ALARM_NAME_MAX_LEN: usize = 255;
pub const FUNCTION_NAME_MAX_LEN: usize = 64;

/// Suffix appended to a construct name to form its worker function name.
pub const WORKER_NAME_SUFFIX: &str = "Worker";

/// Separators plus hash added to a truncated physical name.
const TRUNCATION_OVERHEAD: usize = 3 + HASH_LEN;

/// Longest stage token for which every physical name still fits its limit.
/// The worker function name has the tightest budget.
pub const MAX_STAGE_LEN: usize =
    FUNCTION_NAME_MAX_LEN - WORKER_NAME_SUFFIX.len() - TRUNCATION_OVERHEAD;

/// Logical id of the execution role the host shares between all workers.
pub const EXECUTION_ROLE_LOGICAL_ID: &str = "IamRoleLambdaExecution";

/// Logical id of the resource playing `role` inside `construct`.
pub fn logical_id(construct: &str, role: &str) -> String {
    unique_id(&[construct, role, RESOURCE_LEAF])
}

/// Logical id of an output named `name` declared by `construct`.
pub fn output_id(construct: &str, name: &str) -> String {
    unique_id(&[construct, name])
}

fn unique_id(components: &[&str]) -> String {
    let hash = path_hash(components);
    let human: String = components
        .iter()
        .dedup()
        .filter(|c| **c != RESOURCE_LEAF)
        .flat_map(|c| c.chars())
        .filter(char::is_ascii_alphanumeric)
        .take(MAX_LOGICAL_ID_LEN - HASH_LEN)
        .collect();
    human + &hash
}

fn path_hash(components: &[&str]) -> String {
    let digest = Md5::digest(components.join(PATH_SEPARATOR).as_bytes());
    digest
        .iter()
        .take(HASH_LEN / 2)
        .map(|byte| format!("{:02X}", byte))
        .join("")
}

/// Globally visible name: `{app}-{stage}-{construct}{suffix}`.
///
/// Names that fit within `max_len` are returned as is. Longer ones become
/// `{app}-{stage}-{construct}-{HASH}{suffix}`, where `HASH` covers the full
/// untruncated app, stage and construct so that constructs sharing a long
/// prefix stay distinct. Characters are dropped from the end of whichever of
/// the app and construct portions is currently longer; the stage token, the
/// hash and the suffix are always kept whole.
///
/// [`DeploymentContext::validate`] bounds the stage so that every name built
/// by this crate fits its limit.
pub fn physical_name(
    context: &DeploymentContext,
    construct: &str,
    suffix: &str,
    max_len: usize,
) -> String {
    let app = context.app.as_str();
    let stage = context.stage.as_str();
    let full = format!("{}-{}-{}{}", app, stage, construct, suffix);
    if full.chars().count() <= max_len {
        return full;
    }

    let hash = path_hash(&[app, stage, construct]);
    let fixed = stage.chars().count() + suffix.chars().count() + TRUNCATION_OVERHEAD;
    let budget = max_len.saturating_sub(fixed);

    let mut app_keep = app.chars().count();
    let mut construct_keep = construct.chars().count();
    while app_keep + construct_keep > budget {
        if construct_keep >= app_keep && construct_keep > 0 {
            construct_keep -= 1;
        } else if app_keep > 0 {
            app_keep -= 1;
        } else {
            break;
        }
    }

    let app: String = app.chars().take(app_keep).collect();
    let construct: String = construct.chars().take(construct_keep).collect();
    format!("{}-{}-{}-{}{}", app, stage, construct, hash, suffix)
}

/// The key under which the host registers a construct's worker function.
pub fn worker_function_key(construct: &str) -> String {
    format!("{}{}", construct, WORKER_NAME_SUFFIX)
}

/// Logical id the host gives to the function registered under `function_key`.
pub fn function_logical_id(function_key: &str) -> String {
    format!("{}LambdaFunction", normalize_function_name(function_key))
}

/// Logical id of the binding between a queue and a worker function.
pub fn event_source_mapping_id(function_key: &str, queue_logical_id: &str) -> String {
    let queue: String = queue_logical_id
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    format!(
        "{}EventSourceMappingSQS{}",
        normalize_function_name(function_key),
        upper_first(&queue)
    )
}

fn normalize_function_name(function_key: &str) -> String {
    upper_first(
        &function_key
            .replace('-', "Dash")
            .replace('_', "Underscore"),
    )
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> DeploymentContext {
        DeploymentContext::new("app", "dev")
    }

    #[test]
    fn readable_prefix_drops_separators_but_hash_keeps_them() {
        let dashed = logical_id("my-jobs", "Queue");
        let plain = logical_id("myjobs", "Queue");
        assert!(dashed.starts_with("myjobsQueue"));
        assert!(plain.starts_with("myjobsQueue"));
        assert_ne!(dashed, plain);
    }

    #[test]
    fn long_logical_ids_are_capped() {
        let construct = "x".repeat(400);
        let id = logical_id(&construct, "Queue");
        assert_eq!(id.len(), MAX_LOGICAL_ID_LEN);
    }

    #[test]
    fn physical_name_truncates_longest_portion_first() {
        let construct = "c".repeat(100);
        let name = physical_name(&context(), &construct, "-dlq", QUEUE_NAME_MAX_LEN);
        let hash = path_hash(&["app", "dev", &construct]);
        assert_eq!(name.len(), QUEUE_NAME_MAX_LEN);
        assert!(name.starts_with("app-dev-ccc"));
        assert!(name.ends_with(&format!("c-{}-dlq", hash)));
    }

    #[test]
    fn physical_name_keeps_short_construct_whole() {
        let context = DeploymentContext::new("a".repeat(100), "prod");
        let name = physical_name(&context, "jobs", "", 30);
        let hash = path_hash(&["a".repeat(100).as_str(), "prod", "jobs"]);
        assert_eq!(name, format!("{}-prod-jobs-{}", "a".repeat(11), hash));
    }

    #[test]
    fn physical_name_untouched_when_it_fits() {
        let name = physical_name(&context(), "jobs", "-dlq", QUEUE_NAME_MAX_LEN);
        assert_eq!(name, "app-dev-jobs-dlq");
    }

    #[test]
    fn longest_stage_still_fits_worker_name() {
        let context = DeploymentContext::new("app", "s".repeat(MAX_STAGE_LEN));
        let construct = "w".repeat(80);
        let name = physical_name(&context, &construct, WORKER_NAME_SUFFIX, FUNCTION_NAME_MAX_LEN);
        assert_eq!(name.len(), FUNCTION_NAME_MAX_LEN);
        assert!(name.contains(&"s".repeat(MAX_STAGE_LEN)));
        assert!(name.ends_with(WORKER_NAME_SUFFIX));
    }

    #[test]
    fn hash_digits_are_uppercase_hex() {
        let hash = path_hash(&["emails", "Queue", RESOURCE_LEAF]);
        assert_eq!(hash, "F057328A");
    }

    #[test]
    fn upper_first_handles_empty_input() {
        assert_eq!(upper_first(""), "");
        assert_eq!(upper_first("emails"), "Emails");
    }
}
