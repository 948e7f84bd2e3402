//! Configuration loading and env substitution.
//!
//! Config files: `botbridge.toml`, `botbridge.yaml`, or `botbridge.json`,
//! searched in `./` then `~/.config/botbridge/`. All string values support
//! `${ENV_VAR}` substitution.

pub mod env_subst;
pub mod loader;
pub mod schema;

pub use {
    env_subst::substitute_env,
    loader::{config_dir, discover_and_load, find_config_file, load_config, save_config},
    schema::{BridgeConfig, ChannelSeed, IdentityConfig, ServerConfig},
};
