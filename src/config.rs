//! Configuration for warsweep
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;

/// Warsweep - duplicate war-history reconciler
///
/// Finds summary war records shadowed by a detailed record of the same war
/// and deletes them. Detailed records are never touched.
#[derive(Parser, Debug, Clone)]
#[command(name = "warsweep")]
#[command(about = "Batch reconciler for duplicate clan-war history records")]
pub struct Args {
    /// MongoDB connection URI (service credential, required)
    #[arg(long, env = "MONGODB_URI")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "clashhub")]
    pub mongodb_db: String,

    /// Report matches without deleting anything
    #[arg(long, env = "DRY_RUN", default_value = "false")]
    pub dry_run: bool,

    /// Restrict the run to a single clan tag (e.g. "#2PP0R9Y")
    #[arg(long, env = "CLAN_TAG")]
    pub clan_tag: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.mongodb_uri.trim().is_empty() {
            return Err("MONGODB_URI must not be empty".to_string());
        }

        if !self.mongodb_uri.starts_with("mongodb://")
            && !self.mongodb_uri.starts_with("mongodb+srv://")
        {
            return Err("MONGODB_URI must be a mongodb:// or mongodb+srv:// URI".to_string());
        }

        if let Some(ref tag) = self.clan_tag {
            if !tag.starts_with('#') {
                return Err(format!("CLAN_TAG must start with '#', got '{}'", tag));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            mongodb_db: "clashhub".to_string(),
            dry_run: false,
            clan_tag: None,
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(base_args().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_mongo_uri() {
        let mut args = base_args();
        args.mongodb_uri = "postgres://localhost".to_string();
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_tag_without_hash() {
        let mut args = base_args();
        args.clan_tag = Some("2PP0R9Y".to_string());
        assert!(args.validate().is_err());
    }
}
