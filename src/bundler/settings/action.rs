//! Post-install actions.

use crate::bundler::error::{Error, Result};
use std::{fmt, str::FromStr};

/// Command emitted for [`PostInstallAction::Logout`].
pub const LOGOUT_COMMAND: &str = "shutdown /l";

/// Command emitted for [`PostInstallAction::Restart`].
pub const RESTART_COMMAND: &str = "shutdown /r /t 0";

/// System action run once the payload has been installed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PostInstallAction {
    /// Nothing beyond an informational message.
    #[default]
    None,
    /// Log the interactive session out.
    Logout,
    /// Reboot immediately.
    Restart,
}

impl PostInstallAction {
    /// PowerShell lines implementing the action.
    pub fn script_block(self) -> String {
        match self {
            PostInstallAction::None => "Write-Host 'No post-install action required.'".to_string(),
            PostInstallAction::Logout => format!("Write-Host 'Logging out...'\n{LOGOUT_COMMAND}"),
            PostInstallAction::Restart => {
                format!("Write-Host 'Restarting system...'\n{RESTART_COMMAND}")
            }
        }
    }
}

impl FromStr for PostInstallAction {
    type Err = Error;

    /// Case-insensitive; an empty value means [`PostInstallAction::None`].
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(PostInstallAction::None),
            "logout" => Ok(PostInstallAction::Logout),
            "restart" => Ok(PostInstallAction::Restart),
            other => Err(Error::Config(format!(
                "unsupported postinstall_action {other:?} (expected none, logout or restart)"
            ))),
        }
    }
}

impl fmt::Display for PostInstallAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PostInstallAction::None => "none",
            PostInstallAction::Logout => "logout",
            PostInstallAction::Restart => "restart",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::ErrorKind;

    #[test]
    fn parses_known_actions() {
        assert_eq!("none".parse::<PostInstallAction>().unwrap(), PostInstallAction::None);
        assert_eq!("".parse::<PostInstallAction>().unwrap(), PostInstallAction::None);
        assert_eq!("Logout".parse::<PostInstallAction>().unwrap(), PostInstallAction::Logout);
        assert_eq!(" RESTART ".parse::<PostInstallAction>().unwrap(), PostInstallAction::Restart);
    }

    #[test]
    fn rejects_unknown_action() {
        let err = "shutdown".parse::<PostInstallAction>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn blocks_carry_only_their_command() {
        let none = PostInstallAction::None.script_block();
        assert!(!none.contains("shutdown"));

        let logout = PostInstallAction::Logout.script_block();
        assert!(logout.contains(LOGOUT_COMMAND));
        assert!(!logout.contains(RESTART_COMMAND));

        let restart = PostInstallAction::Restart.script_block();
        assert!(restart.contains(RESTART_COMMAND));
        assert!(!restart.contains(LOGOUT_COMMAND));
    }
}
