use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;

/// Failures outside the query path: loading configuration and seller data,
/// or talking to the terminal. Answering a query never fails.
#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("terminal i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

impl ApplicationError {
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "config_validation",
            Self::Catalog(_) => "catalog_load",
            Self::Io(_) => "io",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Configuration(_) => 2,
            Self::Catalog(_) => 3,
            Self::Io(_) => 1,
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Configuration(_) => {
                "Configuration is invalid. Check sellerbot.toml and SELLERBOT_* variables."
            }
            Self::Catalog(_) => {
                "Seller data could not be loaded. Re-run the scraping pipeline or fix the file."
            }
            Self::Io(_) => "Reading input or writing output failed.",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::catalog::CatalogError;
    use crate::config::ConfigError;

    use super::ApplicationError;

    #[test]
    fn configuration_errors_map_to_exit_code_two() {
        let error = ApplicationError::from(ConfigError::Validation("bad".to_owned()));
        assert_eq!(error.exit_code(), 2);
        assert_eq!(error.error_class(), "config_validation");
        assert!(error.to_string().contains("bad"));
    }

    #[test]
    fn catalog_errors_map_to_exit_code_three() {
        let error = ApplicationError::from(CatalogError::ReadFile {
            path: PathBuf::from("clean_seller_data.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        });
        assert_eq!(error.exit_code(), 3);
        assert_eq!(error.error_class(), "catalog_load");
        assert!(error.to_string().contains("clean_seller_data.json"));
        assert!(error.user_message().starts_with("Seller data"));
    }
}
