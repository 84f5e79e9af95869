use crate::config::ProvisionerConfig;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Version tags are drawn from `0..=MAX_VERSION`. They are not unique across
/// runs, so two instances can end up with the same image and function name.
pub const MAX_VERSION: u16 = 999;

const ADJECTIVES: &[&str] = &[
    "agile", "brave", "calm", "clever", "eager", "fancy", "gentle", "happy", "jolly", "keen",
    "lively", "mighty", "nimble", "proud", "quick", "quiet", "rapid", "shiny", "swift", "witty",
];

const NOUNS: &[&str] = &[
    "albatross", "badger", "condor", "dolphin", "falcon", "gecko", "heron", "ibis", "jaguar",
    "kestrel", "lynx", "marmot", "narwhal", "otter", "panda", "quokka", "raven", "salmon",
    "turtle", "walrus",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceIdentity {
    pub name: String,
    pub version: u16,
}

impl InstanceIdentity {
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Self::generate_with(&mut rng)
    }

    pub fn generate_with<R: Rng>(rng: &mut R) -> Self {
        Self {
            name: unique_name_with(rng),
            version: rng.gen_range(0..=MAX_VERSION),
        }
    }

    pub fn new(name: impl Into<String>, version: u16) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }
}

/// Readable instance name, e.g. `swift_otter_3f9a1c2e`. The uuid suffix keeps
/// working directories apart when the word pair repeats.
pub fn unique_name() -> String {
    unique_name_with(&mut rand::thread_rng())
}

fn unique_name_with<R: Rng>(rng: &mut R) -> String {
    let adjective = ADJECTIVES.choose(rng).copied().unwrap_or("fog");
    let noun = NOUNS.choose(rng).copied().unwrap_or("instance");
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{adjective}_{noun}_{}", &suffix[..8])
}

/// Everything derived from an identity plus configuration. Computed once at
/// construction and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifiers {
    pub instance_name: String,
    pub version: u16,
    pub working_dir: PathBuf,
    pub image_ref: String,
    pub function_name: String,
    pub response_path: PathBuf,
}

impl Identifiers {
    pub fn derive(
        identity: &InstanceIdentity,
        config: &ProvisionerConfig,
        instances_dir: &std::path::Path,
    ) -> Self {
        let function_name = function_name(&config.function.name_prefix, identity.version);
        let response_path = config
            .function
            .response_dir
            .join(format!("response-{function_name}.json"));
        Self {
            instance_name: identity.name.clone(),
            version: identity.version,
            working_dir: instances_dir.join(&identity.name),
            image_ref: image_ref(&config.registry.repository_uri, identity.version),
            function_name,
            response_path,
        }
    }
}

pub fn image_ref(repository_uri: &str, version: u16) -> String {
    format!("{repository_uri}:{version}")
}

pub fn function_name(prefix: &str, version: u16) -> String {
    format!("{prefix}-{version}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::path::Path;

    #[test]
    fn test_identifiers_for_every_version() {
        let config = ProvisionerConfig::default();
        let registry = "736982044827.dkr.ecr.us-west-1.amazonaws.com/fogros_lambda";
        for version in 0..=MAX_VERSION {
            let ids = Identifiers::derive(
                &InstanceIdentity::new("inst", version),
                &config,
                Path::new("/tmp/instances"),
            );
            assert_eq!(ids.image_ref, format!("{registry}:{version}"));
            assert_eq!(ids.function_name, format!("fogros-lambda-{version}"));
            assert_eq!(
                ids.response_path,
                PathBuf::from(format!("/tmp/response-fogros-lambda-{version}.json"))
            );
        }
    }

    #[test]
    fn test_working_dir_is_named_after_instance() {
        let ids = Identifiers::derive(
            &InstanceIdentity::new("brave_otter_0123abcd", 7),
            &ProvisionerConfig::default(),
            Path::new("/tmp/instances"),
        );
        assert_eq!(
            ids.working_dir,
            PathBuf::from("/tmp/instances/brave_otter_0123abcd")
        );
    }

    #[test]
    fn test_generated_version_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..2000 {
            let identity = InstanceIdentity::generate_with(&mut rng);
            assert!(identity.version <= MAX_VERSION);
        }
    }

    #[test]
    fn test_unique_names_differ() {
        let a = unique_name();
        let b = unique_name();
        assert_ne!(a, b);
        assert_eq!(a.split('_').count(), 3);
        assert!(!a.contains('/'));
    }
}
