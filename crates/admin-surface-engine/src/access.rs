use admin_surface_core::types::Viewer;

use crate::config::EngineConfig;
use crate::error::EngineError;

/// Check whether `viewer` may change shared admin surface settings.
///
/// Access rules (in order):
/// 1. Unrestricted viewer => permit
/// 2. Viewer holds the configured manage capability => permit
/// 3. Otherwise => `Unauthorized`
pub fn check_manage_access(viewer: &Viewer, config: &EngineConfig) -> Result<(), EngineError> {
    if viewer.unrestricted || viewer.has_capability(&config.manage_capability) {
        return Ok(());
    }
    tracing::debug!(viewer = %viewer.id, capability = %config.manage_capability, "manage access denied");
    Err(EngineError::Unauthorized {
        viewer: viewer.id.clone(),
        capability: config.manage_capability.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrestricted_viewer_is_permitted() {
        assert!(check_manage_access(&Viewer::unrestricted("root"), &EngineConfig::default()).is_ok());
    }

    #[test]
    fn capability_holder_is_permitted() {
        let viewer = Viewer::new("1", ["administrator"]).with_capabilities(["manage_options"]);
        assert!(check_manage_access(&viewer, &EngineConfig::default()).is_ok());
    }

    #[test]
    fn role_alone_is_not_enough() {
        let viewer = Viewer::new("1", ["administrator"]);
        assert!(matches!(
            check_manage_access(&viewer, &EngineConfig::default()),
            Err(EngineError::Unauthorized { .. })
        ));
    }

    #[test]
    fn configured_capability_is_used() {
        let config = EngineConfig {
            manage_capability: "edit_theme_options".into(),
            ..EngineConfig::default()
        };
        let viewer = Viewer::new("1", ["editor"]).with_capabilities(["edit_theme_options"]);
        assert!(check_manage_access(&viewer, &config).is_ok());
        let other = Viewer::new("2", ["editor"]).with_capabilities(["manage_options"]);
        assert!(check_manage_access(&other, &config).is_err());
    }
}
