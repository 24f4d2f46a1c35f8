use scripting::Uid;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const ACTIVATE_ENV_VAR: &str = "LEVEL_DEMO_ACTIVATE";
const SEED_ENV_VAR: &str = "LEVEL_DEMO_SEED";
const DEFAULT_ACTIVATED_UID: Uid = Uid(14);

pub(crate) const DEMO_LEVEL_NAME: &str = "jewel_cave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DemoConfig {
    pub(crate) level_name: String,
    pub(crate) activate: Vec<Uid>,
    pub(crate) seed: Option<u64>,
}

pub(crate) fn build_config() -> DemoConfig {
    init_tracing();
    info!("=== Level Demo Startup ===");

    let activate = std::env::var(ACTIVATE_ENV_VAR)
        .ok()
        .map(|raw| parse_uid_list(&raw))
        .unwrap_or_else(|| vec![DEFAULT_ACTIVATED_UID]);
    let seed = std::env::var(SEED_ENV_VAR)
        .ok()
        .and_then(|raw| parse_seed(&raw));

    DemoConfig {
        level_name: DEMO_LEVEL_NAME.to_string(),
        activate,
        seed,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_uid_list(raw: &str) -> Vec<Uid> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match entry.parse::<u64>() {
            Ok(value) => Some(Uid(value)),
            Err(error) => {
                warn!(entry, error = %error, "ignoring_invalid_uid");
                None
            }
        })
        .collect()
}

fn parse_seed(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<u64>() {
        Ok(seed) => Some(seed),
        Err(error) => {
            warn!(value = trimmed, error = %error, "ignoring_invalid_seed");
            None
        }
    }
}
